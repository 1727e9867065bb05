/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month, 1-based (December)
pub const MAX_MONTH: u8 = 12;

/// Maximum day of any month
pub const MAX_DAY: u8 = 31;

/// Maximum hour on a 24-hour clock
pub const MAX_HOUR_24: u8 = 23;

/// Maximum hour on a 12-hour clock
pub const MAX_HOUR_12: u8 = 12;

/// Hours in half a day, added when switching to PM
pub const HOURS_PER_MERIDIEM: u8 = 12;

/// Maximum minute and second value
pub const MAX_MINUTE: u8 = 59;

/// Digits accepted into the year field before it commits
pub const YEAR_DIGITS: usize = 4;

/// Digits accepted into every other numeric field before it commits
pub const FIELD_DIGITS: usize = 2;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Template used when no format is configured
pub const DEFAULT_FORMAT: &str = "MM/DD/YYYY hh:mm aa";

/// Template of the canonical date string exchanged with the calendar
pub const CANONICAL_FORMAT: &str = "YYYY-MM-DD";

/// Separator between canonical date components
pub const CANONICAL_SEPARATOR: char = '-';

/// Class toggled on the bound element while its value is invalid.
/// Callers style this externally, so the name must not change.
pub const INVALID_CLASS: &str = "dtpicker-invalid";

/// Typed characters that jump to the next field
pub const ADVANCE_CHARS: [char; 6] = [' ', '.', '-', ',', '/', ':'];

/// Year a structured value falls back to when the template has no year
pub const FALLBACK_YEAR: u16 = 1970;
