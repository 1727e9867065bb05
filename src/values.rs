use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    consts::{CANONICAL_SEPARATOR, FALLBACK_YEAR, MAX_YEAR},
    format::FormatTemplate,
    parse::ParseError,
    types::{FieldKind, Meridiem, days_in_month},
};

/// The (possibly partial) components of the edited date and time.
///
/// Every component is independently optional; an incomplete date is a valid,
/// renderable state. This is the value handed to validators and returned by
/// [`DtPicker::date_components`](crate::DtPicker::date_components).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldValues {
    pub year:   Option<u16>,
    /// Zero-based: January is 0
    pub month:  Option<u8>,
    pub day:    Option<u8>,
    /// Always on a 24-hour clock, whatever the template displays
    pub hour:   Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub ampm:   Option<Meridiem>,
}

impl FieldValues {
    /// Every component taken from `dt`, with am/pm derived from the hour.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the year is outside 0-9999.
    pub fn from_datetime(dt: NaiveDateTime) -> Result<Self, ParseError> {
        let year = u16::try_from(dt.year())
            .ok()
            .filter(|&y| y <= MAX_YEAR)
            .ok_or(ParseError::InvalidYear(dt.year()))?;
        let hour = dt.hour() as u8;
        Ok(Self {
            year:   Some(year),
            month:  Some(dt.month0() as u8),
            day:    Some(dt.day() as u8),
            hour:   Some(hour),
            minute: Some(dt.minute() as u8),
            second: Some(dt.second() as u8),
            ampm:   Some(Meridiem::from_hour(hour)),
        })
    }

    /// Overwrites year, month and day, leaving the time alone.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.year = u16::try_from(date.year()).ok();
        self.month = Some(date.month0() as u8);
        self.day = Some(date.day() as u8);
    }

    pub const fn is_set(&self, field: FieldKind) -> bool {
        match field {
            FieldKind::Year => self.year.is_some(),
            FieldKind::Month => self.month.is_some(),
            FieldKind::Day => self.day.is_some(),
            FieldKind::Hour => self.hour.is_some(),
            FieldKind::Minute => self.minute.is_some(),
            FieldKind::Second => self.second.is_some(),
            FieldKind::Meridiem => self.ampm.is_some(),
        }
    }

    /// Resets one component to unset.
    pub fn clear(&mut self, field: FieldKind) {
        match field {
            FieldKind::Year => self.year = None,
            FieldKind::Month => self.month = None,
            FieldKind::Day => self.day = None,
            FieldKind::Hour => self.hour = None,
            FieldKind::Minute => self.minute = None,
            FieldKind::Second => self.second = None,
            FieldKind::Meridiem => self.ampm = None,
        }
    }

    /// True once every field shown by `template` has a value
    pub fn is_complete(&self, template: &FormatTemplate) -> bool {
        FieldKind::ALL
            .iter()
            .all(|&field| !template.requires(field) || self.is_set(field))
    }

    /// Renders the values through `template`.
    ///
    /// Unset fields show their lowercase placeholder; set fields are
    /// zero-padded to the run width. The result always has exactly
    /// `template.len()` characters.
    pub fn render(&self, template: &FormatTemplate) -> String {
        let twelve_hour = template.uses_12_hour();
        let mut out = String::with_capacity(template.len());
        for run in template.runs() {
            let Some(field) = run.field else {
                for pos in run.start..run.end() {
                    if let Some(c) = template.char_at(pos) {
                        out.push(c);
                    }
                }
                continue;
            };
            let shown = match field {
                FieldKind::Meridiem => self.ampm.map(|m| fit_text(&m.to_string(), run.len)),
                _ => self
                    .display_number(field, twelve_hour)
                    .map(|n| fit_number(n, run.len)),
            };
            match shown {
                Some(text) => out.push_str(&text),
                None => out.extend(std::iter::repeat_n(field.placeholder(), run.len)),
            }
        }
        out
    }

    /// Value of a numeric field as it appears on screen
    fn display_number(&self, field: FieldKind, twelve_hour: bool) -> Option<u32> {
        match field {
            FieldKind::Year => self.year.map(u32::from),
            FieldKind::Month => self.month.map(|m| u32::from(m) + 1),
            FieldKind::Day => self.day.map(u32::from),
            FieldKind::Hour if twelve_hour => self.hour.map(|h| match h % 12 {
                0 => 12,
                h => u32::from(h),
            }),
            FieldKind::Hour => self.hour.map(u32::from),
            FieldKind::Minute => self.minute.map(u32::from),
            FieldKind::Second => self.second.map(u32::from),
            FieldKind::Meridiem => None,
        }
    }

    /// The canonical `YYYY-MM-DD` form, or an empty string unless year,
    /// month and day are all set.
    pub fn canonical_date(&self) -> String {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => format!(
                "{year:04}{CANONICAL_SEPARATOR}{:02}{CANONICAL_SEPARATOR}{day:02}",
                month + 1
            ),
            _ => String::new(),
        }
    }

    /// True when the set components can exist on a calendar and clock.
    ///
    /// Unset components never make the values invalid.
    pub fn is_calendar_valid(&self) -> bool {
        let day_fits = match (self.month, self.day) {
            (Some(month), Some(day)) => {
                day <= days_in_month(self.year.unwrap_or(FALLBACK_YEAR), month + 1)
            }
            _ => true,
        };
        day_fits && self.hour.is_none_or(|h| h < 24)
    }

    /// Best-effort conversion that always succeeds.
    ///
    /// Unset components count as zero, and out-of-range components roll over
    /// into the next larger unit the way a calendar would: day 0 is the last
    /// day of the previous month, day 31 of April is May 1st.
    pub fn to_datetime_lossy(&self) -> NaiveDateTime {
        let first_of_month = NaiveDate::from_ymd_opt(
            i32::from(self.year.unwrap_or(0)),
            u32::from(self.month.unwrap_or(0)) + 1,
            1,
        )
        .unwrap_or_default()
        .and_time(NaiveTime::default());

        let offset = TimeDelta::days(i64::from(self.day.unwrap_or(0)) - 1)
            + TimeDelta::hours(i64::from(self.hour.unwrap_or(0)))
            + TimeDelta::minutes(i64::from(self.minute.unwrap_or(0)))
            + TimeDelta::seconds(i64::from(self.second.unwrap_or(0)));

        first_of_month
            .checked_add_signed(offset)
            .unwrap_or(first_of_month)
    }

    /// Strict conversion for a template.
    ///
    /// Returns `None` if any field the template shows is unset or the values
    /// do not form a real date and time. Fields the template does not show
    /// fall back to 1970-01-01 00:00:00.
    pub fn to_datetime(&self, template: &FormatTemplate) -> Option<NaiveDateTime> {
        if !self.is_complete(template) {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.year.unwrap_or(FALLBACK_YEAR)),
            self.month.map_or(1, |m| u32::from(m) + 1),
            self.day.map_or(1, u32::from),
        )?;
        let time = NaiveTime::from_hms_opt(
            self.hour.map_or(0, u32::from),
            self.minute.map_or(0, u32::from),
            self.second.map_or(0, u32::from),
        )?;
        Some(date.and_time(time))
    }
}

/// Zero-pads `n` to `width`, keeping only the rightmost digits if it is wider
fn fit_number(n: u32, width: usize) -> String {
    let padded = format!("{n:0width$}");
    padded[padded.len() - width..].to_owned()
}

/// Left-aligns `text` in `width` columns, truncating on the right
fn fit_text(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    while fitted.chars().count() < width {
        fitted.push(' ');
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn template(s: &str) -> FormatTemplate {
        FormatTemplate::new(s).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_render_unset() {
        let values = FieldValues::default();
        assert_eq!(
            values.render(&template("MM/DD/YYYY hh:mm aa")),
            "mm/dd/yyyy hh:mm aa"
        );
        assert_eq!(
            values.render(&template("YYYY-MM-DD hh:mm:ss")),
            "yyyy-mm-dd hh:mm:ss"
        );
    }

    #[test]
    fn test_render_partial() {
        let values = FieldValues {
            month: Some(11),
            year: Some(2025),
            ..FieldValues::default()
        };
        assert_eq!(
            values.render(&template("MM/DD/YYYY hh:mm aa")),
            "12/dd/2025 hh:mm aa"
        );
    }

    #[test]
    fn test_render_month_never_collides_with_minute() {
        let values = FieldValues {
            month: Some(0),
            minute: None,
            ..FieldValues::default()
        };
        assert_eq!(values.render(&template("MM mm")), "01 mm");

        let values = FieldValues {
            month: None,
            minute: Some(5),
            ..FieldValues::default()
        };
        assert_eq!(values.render(&template("MM mm")), "mm 05");
    }

    #[test]
    fn test_render_twelve_hour() {
        let t = template("hh:mm aa");
        let render = |hour| {
            FieldValues {
                hour: Some(hour),
                minute: Some(7),
                ampm: Some(Meridiem::from_hour(hour)),
                ..FieldValues::default()
            }
            .render(&t)
        };
        assert_eq!(render(0), "12:07 AM");
        assert_eq!(render(9), "09:07 AM");
        assert_eq!(render(12), "12:07 PM");
        assert_eq!(render(13), "01:07 PM");
        assert_eq!(render(23), "11:07 PM");
    }

    #[test]
    fn test_render_twenty_four_hour() {
        let values = FieldValues {
            hour: Some(21),
            minute: Some(30),
            ampm: Some(Meridiem::Pm),
            ..FieldValues::default()
        };
        assert_eq!(values.render(&template("hh:mm")), "21:30");
    }

    #[test]
    fn test_render_keeps_template_width() {
        let values = FieldValues {
            year: Some(2025),
            month: Some(2),
            ampm: Some(Meridiem::Am),
            ..FieldValues::default()
        };
        let t = template("YY/M a");
        let rendered = values.render(&t);
        assert_eq!(rendered, "25/3 A");
        assert_eq!(rendered.chars().count(), t.len());
    }

    #[test]
    fn test_render_is_idempotent() {
        let t = template("MM/DD/YYYY hh:mm:ss aa");
        let values = FieldValues::from_datetime(datetime(2024, 2, 29, 18, 5, 9)).unwrap();
        assert_eq!(values.render(&t), values.render(&t));
        assert_eq!(values.render(&t), "02/29/2024 06:05:09 PM");
    }

    #[test]
    fn test_canonical_date() {
        let mut values = FieldValues {
            year: Some(987),
            month: Some(0),
            ..FieldValues::default()
        };
        assert_eq!(values.canonical_date(), "");
        values.day = Some(5);
        assert_eq!(values.canonical_date(), "0987-01-05");
    }

    #[test]
    fn test_clear_touches_one_field() {
        let mut values = FieldValues::from_datetime(datetime(2020, 6, 15, 8, 30, 0)).unwrap();
        let before = values;
        values.clear(FieldKind::Day);
        assert_eq!(values.day, None);
        assert_eq!(
            FieldValues {
                day: before.day,
                ..values
            },
            before
        );
    }

    #[test]
    fn test_to_datetime_requires_template_fields() {
        let t = template("MM/DD/YYYY hh:mm");
        let mut values = FieldValues {
            year: Some(2021),
            month: Some(3),
            day: Some(10),
            hour: Some(14),
            ..FieldValues::default()
        };
        assert_eq!(values.to_datetime(&t), None);
        values.minute = Some(45);
        assert_eq!(values.to_datetime(&t), Some(datetime(2021, 4, 10, 14, 45, 0)));
    }

    #[test]
    fn test_to_datetime_rejects_impossible_dates() {
        let values = FieldValues {
            year: Some(2021),
            month: Some(1),
            day: Some(30),
            ..FieldValues::default()
        };
        assert!(!values.is_calendar_valid());
        assert_eq!(values.to_datetime(&template("YYYY-MM-DD")), None);
    }

    #[test]
    fn test_to_datetime_fallbacks() {
        let values = FieldValues {
            hour: Some(7),
            minute: Some(15),
            ..FieldValues::default()
        };
        assert_eq!(
            values.to_datetime(&template("hh:mm")),
            Some(datetime(1970, 1, 1, 7, 15, 0))
        );
    }

    #[test]
    fn test_to_datetime_lossy() {
        assert_eq!(
            FieldValues::default().to_datetime_lossy(),
            datetime(-1, 12, 31, 0, 0, 0)
        );
        let values = FieldValues {
            year: Some(2023),
            month: Some(3),
            day: Some(31),
            hour: Some(10),
            ..FieldValues::default()
        };
        assert_eq!(values.to_datetime_lossy(), datetime(2023, 5, 1, 10, 0, 0));
    }

    #[test]
    fn test_from_datetime_round_trip() {
        let t = template("YYYY-MM-DD hh:mm:ss");
        let dt = datetime(1999, 12, 31, 23, 59, 58);
        let values = FieldValues::from_datetime(dt).unwrap();
        assert_eq!(values.ampm, Some(Meridiem::Pm));
        assert_eq!(values.month, Some(11));
        assert_eq!(values.to_datetime(&t), Some(dt));
    }

    #[test]
    fn test_from_datetime_year_bounds() {
        let t = template("YYYY-MM-DD");
        for year in [0, 9999] {
            let dt = datetime(year, 3, 1, 0, 0, 0);
            let values = FieldValues::from_datetime(dt).unwrap();
            assert_eq!(values.to_datetime(&t), Some(dt));
        }
        assert_eq!(
            FieldValues::from_datetime(datetime(-5, 3, 1, 0, 0, 0)),
            Err(ParseError::InvalidYear(-5))
        );
        assert_eq!(
            FieldValues::from_datetime(datetime(10000, 3, 1, 0, 0, 0)),
            Err(ParseError::InvalidYear(10000))
        );
    }

    #[test]
    fn test_serde() {
        let values = FieldValues {
            year: Some(2024),
            ampm: Some(Meridiem::Pm),
            ..FieldValues::default()
        };
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"{"year":2024,"month":null,"day":null,"hour":null,"minute":null,"second":null,"ampm":"PM"}"#
        );
        let parsed: FieldValues = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, values);
    }
}
