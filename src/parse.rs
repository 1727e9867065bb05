//! Turning existing text into field values.

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, NaiveTime,
    format::{Parsed, StrftimeItems},
};

use crate::{
    consts::{CANONICAL_SEPARATOR, HOURS_PER_MERIDIEM, MAX_MINUTE, MAX_MONTH, MAX_YEAR},
    format::FormatTemplate,
    prelude::*,
    types::{Meridiem, days_in_month},
    values::FieldValues,
};

/// Date-time layouts tried when text does not match the template.
const DATETIME_PATTERNS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Date-only layouts tried after [`DATETIME_PATTERNS`].
const DATE_PATTERNS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 0-{})", "_0", MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Parses a canonical `YYYY-MM-DD` string, as sent by the calendar.
///
/// # Errors
/// Returns `ParseError` if the string is empty, not three numeric
/// components, or not a real date.
pub fn parse_canonical_date(s: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let parts: Vec<&str> = trimmed.split(CANONICAL_SEPARATOR).collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(ParseError::InvalidFormat(trimmed.to_owned()));
    };
    let year: i32 = parse_number(year)?;
    let month: u8 = parse_number(month)?;
    let day: u8 = parse_number(day)?;

    let year = u16::try_from(year)
        .ok()
        .filter(|&y| y <= MAX_YEAR)
        .ok_or(ParseError::InvalidYear(year))?;
    if month == 0 || month > MAX_MONTH {
        return Err(ParseError::InvalidMonth(month));
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(ParseError::InvalidDay { year, month, day });
    }

    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))
}

/// Helper to parse a number with better error messages
fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, ParseError> {
    s.trim()
        .parse::<T>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

/// Seeds field values from the text already in a bound element.
///
/// The text is first parsed strictly against `template`, then against a list
/// of common layouts (RFC 3339, ISO 8601, US month-first). Returns `None` if
/// nothing matches, in which case every field starts unset.
pub fn parse_initial(text: &str, template: &FormatTemplate) -> Option<FieldValues> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(values) = parse_strict(text, template) {
        return Some(values);
    }
    tracing::debug!(text, template = %template, "text does not match template, trying common layouts");
    let values = parse_permissive(text);
    if values.is_none() {
        tracing::debug!(text, "unparseable initial value, starting empty");
    }
    values
}

fn parse_strict(text: &str, template: &FormatTemplate) -> Option<FieldValues> {
    let pattern = template.to_strftime();
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, text, StrftimeItems::new(&pattern)).ok()?;

    // a year outside 0-9999 fails the whole match
    let year = match parsed.year() {
        Some(year) => Some(u16::try_from(year).ok().filter(|&y| y <= MAX_YEAR)?),
        None => None,
    };
    let hour = match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (Some(half), Some(hour)) => Some(half * u32::from(HOURS_PER_MERIDIEM) + hour),
        (None, Some(hour)) => Some(hour),
        _ => None,
    };
    let values = FieldValues {
        year,
        month: parsed
            .month()
            .and_then(|m| m.checked_sub(1))
            .and_then(|m| u8::try_from(m).ok()),
        day: parsed.day().and_then(|d| u8::try_from(d).ok()),
        hour: hour.and_then(|h| u8::try_from(h).ok()),
        minute: parsed.minute().and_then(|m| u8::try_from(m).ok()),
        second: parsed
            .second()
            .and_then(|s| u8::try_from(s).ok())
            .filter(|&s| s <= MAX_MINUTE),
        ampm: match (hour, parsed.hour_div_12()) {
            (Some(hour), _) => u8::try_from(hour).ok().map(Meridiem::from_hour),
            (None, Some(0)) => Some(Meridiem::Am),
            (None, Some(_)) => Some(Meridiem::Pm),
            (None, None) => None,
        },
    };

    (values.is_complete(template) && values.is_calendar_valid()).then_some(values)
}

fn parse_permissive(text: &str) -> Option<FieldValues> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return FieldValues::from_datetime(dt.naive_local()).ok();
    }
    DATETIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .or_else(|| {
            DATE_PATTERNS
                .iter()
                .find_map(|pattern| NaiveDate::parse_from_str(text, pattern).ok())
                .map(|date| date.and_time(NaiveTime::default()))
        })
        .and_then(|dt| FieldValues::from_datetime(dt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(s: &str) -> FormatTemplate {
        FormatTemplate::new(s).unwrap()
    }

    #[test]
    fn test_parse_canonical_date() {
        let date = parse_canonical_date("2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        let date = parse_canonical_date(" 0987-01-05 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(987, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_canonical_date_errors() {
        assert_eq!(parse_canonical_date(""), Err(ParseError::EmptyInput));
        assert!(matches!(
            parse_canonical_date("2024-02"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_canonical_date("2024-xx-01"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert_eq!(
            parse_canonical_date("10000-01-01"),
            Err(ParseError::InvalidYear(10000))
        );
        assert_eq!(
            parse_canonical_date("2024-13-01"),
            Err(ParseError::InvalidMonth(13))
        );
        assert_eq!(
            parse_canonical_date("2023-02-29"),
            Err(ParseError::InvalidDay {
                year: 2023,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::InvalidMonth(13).to_string(),
            "Invalid month: 13 (must be 1-12)"
        );
        assert_eq!(
            ParseError::InvalidDay {
                year: 2023,
                month: 2,
                day: 30
            }
            .to_string(),
            "Invalid day 30 for month 2023-02"
        );
    }

    #[test]
    fn test_parse_initial_strict() {
        let values = parse_initial("03/15/2022 04:05 PM", &template("MM/DD/YYYY hh:mm aa")).unwrap();
        assert_eq!(values.year, Some(2022));
        assert_eq!(values.month, Some(2));
        assert_eq!(values.day, Some(15));
        assert_eq!(values.hour, Some(16));
        assert_eq!(values.minute, Some(5));
        assert_eq!(values.second, None);
        assert_eq!(values.ampm, Some(Meridiem::Pm));
    }

    #[test]
    fn test_parse_initial_date_only_template() {
        let values = parse_initial("2022-03-15", &template("YYYY-MM-DD")).unwrap();
        assert_eq!(values.canonical_date(), "2022-03-15");
        assert_eq!(values.hour, None);
    }

    #[test]
    fn test_parse_initial_partial_templates() {
        let values = parse_initial("2024-03", &template("YYYY-MM")).unwrap();
        assert_eq!(values.year, Some(2024));
        assert_eq!(values.month, Some(2));
        assert_eq!(values.day, None);

        let values = parse_initial("03/15 10:30", &template("MM/DD hh:mm")).unwrap();
        assert_eq!(values.year, None);
        assert_eq!(values.month, Some(2));
        assert_eq!(values.day, Some(15));
        assert_eq!(values.hour, Some(10));
        assert_eq!(values.minute, Some(30));
        assert_eq!(values.ampm, Some(Meridiem::Am));

        let values = parse_initial("09 PM", &template("hh aa")).unwrap();
        assert_eq!(values.hour, Some(21));
        assert_eq!(values.ampm, Some(Meridiem::Pm));
        assert_eq!(values.minute, None);

        let values = parse_initial("12 AM", &template("hh aa")).unwrap();
        assert_eq!(values.hour, Some(0));
    }

    #[test]
    fn test_parse_initial_strict_rejects_impossible_values() {
        assert_eq!(parse_initial("02/30", &template("MM/DD")), None);
        assert_eq!(parse_initial("2024-13", &template("YYYY-MM")), None);
        assert_eq!(parse_initial("10:3", &template("hh:mm:ss")), None);
    }

    #[test]
    fn test_parse_initial_time_only_template() {
        let values = parse_initial("09:30 pm", &template("hh:mm aa")).unwrap();
        assert_eq!(values.hour, Some(21));
        assert_eq!(values.minute, Some(30));
        assert_eq!(values.year, None);
    }

    #[test]
    fn test_parse_initial_falls_back_to_rfc3339() {
        let values = parse_initial("2015-01-01T11:19:45Z", &template("MM/DD/YYYY hh:mm")).unwrap();
        assert_eq!(values.canonical_date(), "2015-01-01");
        assert_eq!(values.hour, Some(11));
        assert_eq!(values.minute, Some(19));
        assert_eq!(values.second, Some(45));
    }

    #[test]
    fn test_parse_initial_falls_back_to_common_layouts() {
        let t = template("DD.MM.YYYY");
        assert_eq!(
            parse_initial("2020-07-04 10:11", &t).map(|v| v.canonical_date()),
            Some("2020-07-04".to_owned())
        );
        assert_eq!(
            parse_initial("07/04/2020", &t).map(|v| v.canonical_date()),
            Some("2020-07-04".to_owned())
        );
        assert_eq!(
            parse_initial("July 4, 2020", &t).map(|v| v.canonical_date()),
            Some("2020-07-04".to_owned())
        );
    }

    #[test]
    fn test_parse_initial_failure() {
        let t = template("MM/DD/YYYY");
        assert_eq!(parse_initial("", &t), None);
        assert_eq!(parse_initial("   ", &t), None);
        assert_eq!(parse_initial("not a date", &t), None);
        assert_eq!(parse_initial("13/45/2020", &t), None);
    }
}
