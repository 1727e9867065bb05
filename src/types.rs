use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, HOURS_PER_MERIDIEM,
    LEAP_YEAR_CYCLE, MAX_MONTH,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// The editable components a template can contain.
///
/// Each kind is marked in a template by one repeated letter:
/// `Y` year, `M` month, `D` day, `h` hour, `m` minute, `s` second,
/// `a` am/pm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FieldKind {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "second")]
    Second,
    #[display(fmt = "am/pm")]
    Meridiem,
}

impl FieldKind {
    /// Every field kind, in template-marker order
    pub const ALL: [Self; 7] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Meridiem,
    ];

    /// Maps a template character to the field it marks, if any
    pub const fn from_marker(c: char) -> Option<Self> {
        match c {
            'Y' => Some(Self::Year),
            'M' => Some(Self::Month),
            'D' => Some(Self::Day),
            'h' => Some(Self::Hour),
            'm' => Some(Self::Minute),
            's' => Some(Self::Second),
            'a' => Some(Self::Meridiem),
            _ => None,
        }
    }

    /// The template letter marking this field
    pub const fn marker(self) -> char {
        match self {
            Self::Year => 'Y',
            Self::Month => 'M',
            Self::Day => 'D',
            Self::Hour => 'h',
            Self::Minute => 'm',
            Self::Second => 's',
            Self::Meridiem => 'a',
        }
    }

    /// The letter shown while the field is unset.
    ///
    /// Month and minute share `m`; this is display text only and is never
    /// read back as a marker.
    pub const fn placeholder(self) -> char {
        self.marker().to_ascii_lowercase()
    }

    /// True for every field that takes digits
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Meridiem)
    }
}

/// Half of the day an hour falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Meridiem {
    #[display(fmt = "AM")]
    Am,
    #[display(fmt = "PM")]
    Pm,
}

impl Meridiem {
    /// The half of the day a 24-hour clock hour belongs to
    pub const fn from_hour(hour: u8) -> Self {
        if hour >= HOURS_PER_MERIDIEM {
            Self::Pm
        } else {
            Self::Am
        }
    }

    /// Maps the `a`/`p` keys to a meridiem
    pub const fn from_key(c: char) -> Option<Self> {
        match c {
            'a' => Some(Self::Am),
            'p' => Some(Self::Pm),
            _ => None,
        }
    }

    /// Moves a 24-hour clock hour into this half of the day
    pub const fn apply(self, hour: u8) -> u8 {
        match self {
            Self::Am if hour >= HOURS_PER_MERIDIEM => hour - HOURS_PER_MERIDIEM,
            Self::Pm if hour < HOURS_PER_MERIDIEM => hour + HOURS_PER_MERIDIEM,
            _ => hour,
        }
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
