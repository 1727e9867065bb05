//! The per-keystroke field state machine.
//!
//! [`FieldEditor`] owns the template, the current [`FieldValues`], the
//! logical cursor and the digits typed into the current field. Each
//! [`Input`] updates at most one field and decides whether the cursor jumps
//! to the next field.

use crate::{
    consts::{
        ADVANCE_CHARS, FIELD_DIGITS, MAX_DAY, MAX_HOUR_12, MAX_HOUR_24, MAX_MINUTE, MAX_MONTH,
        MAX_YEAR, YEAR_DIGITS,
    },
    format::FormatTemplate,
    selection::SelectionRange,
    types::{FieldKind, Meridiem},
    values::FieldValues,
};

/// A keystroke the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    /// A decimal digit, `0..=9`
    Digit(u8),
    /// One of the separator keys; skips to the next field
    Advance,
    /// `a` or `p`
    Meridiem(Meridiem),
    /// Backspace or delete
    Clear,
}

impl Input {
    /// Maps a typed character; `None` for characters the editor ignores.
    pub fn from_char(c: char) -> Option<Self> {
        if let Some(digit) = c.to_digit(10) {
            return u8::try_from(digit).ok().map(Self::Digit);
        }
        if ADVANCE_CHARS.contains(&c) {
            return Some(Self::Advance);
        }
        Meridiem::from_key(c).map(Self::Meridiem)
    }
}

/// What a keystroke did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    /// A field changed or was cleared; the cursor stays in its field
    Updated,
    /// The cursor moved on to the next field (or to the end)
    Advanced,
}

/// Inclusive bounds and digit count for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    min:   u32,
    max:   u32,
    width: usize,
}

impl Bounds {
    const fn new(min: u8, max: u8) -> Self {
        Self {
            min:   min as u32,
            max:   max as u32,
            width: FIELD_DIGITS,
        }
    }

    const YEAR: Self = Self {
        min:   0,
        max:   MAX_YEAR as u32,
        width: YEAR_DIGITS,
    };
    const MONTH: Self = Self::new(1, MAX_MONTH);
    const DAY: Self = Self::new(1, MAX_DAY);
    const HOUR_24: Self = Self::new(0, MAX_HOUR_24);
    const HOUR_12: Self = Self::new(1, MAX_HOUR_12);
    const SIXTY: Self = Self::new(0, MAX_MINUTE);

    /// `None` for fields that do not take digits
    const fn of(field: FieldKind, twelve_hour: bool) -> Option<Self> {
        match field {
            FieldKind::Year => Some(Self::YEAR),
            FieldKind::Month => Some(Self::MONTH),
            FieldKind::Day => Some(Self::DAY),
            FieldKind::Hour if twelve_hour => Some(Self::HOUR_12),
            FieldKind::Hour => Some(Self::HOUR_24),
            FieldKind::Minute | FieldKind::Second => Some(Self::SIXTY),
            FieldKind::Meridiem => None,
        }
    }

    /// Appending another digit to `value` could not stay within `max`
    const fn is_settled(&self, value: u32, digits: usize) -> bool {
        digits >= self.width || value * 10 > self.max
    }
}

/// Digits typed into one field since the cursor arrived there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PartialEntry {
    field:  Option<FieldKind>,
    digits: Vec<u8>,
}

impl PartialEntry {
    fn value(&self) -> u32 {
        self.digits
            .iter()
            .fold(0, |acc, &digit| acc * 10 + u32::from(digit))
    }

    fn reset(&mut self, field: Option<FieldKind>) {
        self.field = field;
        self.digits.clear();
    }
}

/// The field-by-field editing state for one bound element.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    template: FormatTemplate,
    values:   FieldValues,
    cursor:   usize,
    pending:  PartialEntry,
}

impl FieldEditor {
    pub fn new(template: FormatTemplate) -> Self {
        Self::with_values(template, FieldValues::default())
    }

    pub fn with_values(template: FormatTemplate, values: FieldValues) -> Self {
        Self {
            template,
            values,
            cursor: 0,
            pending: PartialEntry::default(),
        }
    }

    pub const fn template(&self) -> &FormatTemplate {
        &self.template
    }

    pub const fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Replaces every value and forgets any partial entry.
    pub fn set_values(&mut self, values: FieldValues) {
        self.values = values;
        self.pending.reset(None);
    }

    /// Logical cursor offset; `template().len()` once past the last field
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Places the cursor, clamped to the end of the template.
    ///
    /// Digits already typed keep accumulating if the cursor stays in the
    /// same field; see [`reset_entry`](Self::reset_entry).
    pub fn move_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.template.len());
    }

    /// Forgets the digits typed into the current field.
    pub fn reset_entry(&mut self) {
        self.pending.reset(None);
    }

    /// The current display string.
    pub fn render(&self) -> String {
        self.values.render(&self.template)
    }

    /// The span of the field under the cursor.
    pub fn highlight(&self) -> SelectionRange {
        self.template.highlight(self.cursor)
    }

    /// Applies one keystroke.
    pub fn apply(&mut self, input: Input) -> Outcome {
        match input {
            Input::Clear => self.clear_at_cursor(),
            Input::Advance => {
                let start = self.cursor.min(self.template.len().saturating_sub(1));
                self.advance_from(start);
                Outcome::Advanced
            }
            Input::Digit(digit) => {
                let Some((pos, field)) = self.template.resolve_field(self.cursor) else {
                    return Outcome::Ignored;
                };
                let Some(bounds) = Bounds::of(field, self.template.uses_12_hour()) else {
                    return Outcome::Ignored;
                };
                self.enter(pos, field);
                if self.accumulate(field, bounds, digit) {
                    self.advance_from(pos);
                    Outcome::Advanced
                } else {
                    Outcome::Updated
                }
            }
            Input::Meridiem(meridiem) => {
                let Some((pos, FieldKind::Meridiem)) = self.template.resolve_field(self.cursor)
                else {
                    return Outcome::Ignored;
                };
                self.enter(pos, FieldKind::Meridiem);
                self.set_meridiem(meridiem);
                self.advance_from(pos);
                Outcome::Advanced
            }
        }
    }

    /// Moves the cursor onto `field` at `pos`, starting a fresh entry if the
    /// field differs from the one being typed into.
    fn enter(&mut self, pos: usize, field: FieldKind) {
        if self.pending.field != Some(field) {
            self.pending.reset(Some(field));
        }
        self.cursor = pos;
    }

    fn advance_from(&mut self, pos: usize) {
        let next = self.template.next_field_position(pos);
        tracing::trace!(from = pos, to = next, "advancing to next field");
        self.cursor = next;
        self.pending.reset(None);
    }

    /// Adds `digit` to the field's entry and stores the result.
    ///
    /// Returns true when no further digit could keep the field in range.
    fn accumulate(&mut self, field: FieldKind, bounds: Bounds, digit: u8) -> bool {
        self.pending.digits.push(digit);

        let mut value = self.pending.value();
        let digits = self.pending.digits.len();
        if digits > bounds.width || value > bounds.max || (digits == bounds.width && value < bounds.min)
        {
            tracing::debug!(%field, value, "entry out of range, restarting with new digit");
            self.pending.digits.clear();
            self.pending.digits.push(digit);
            value = u32::from(digit);
        }

        if value < bounds.min {
            self.values.clear(field);
        } else {
            self.store(field, value);
        }
        bounds.is_settled(value, self.pending.digits.len())
    }

    fn store(&mut self, field: FieldKind, value: u32) {
        let small = u8::try_from(value).ok();
        match field {
            FieldKind::Year => self.values.year = u16::try_from(value).ok(),
            FieldKind::Month => self.values.month = small.map(|m| m - 1),
            FieldKind::Day => self.values.day = small,
            FieldKind::Hour if self.template.uses_12_hour() => {
                let meridiem = self.values.ampm.unwrap_or(Meridiem::Am);
                self.values.hour = small.map(|h| meridiem.apply(h % 12));
            }
            FieldKind::Hour => {
                self.values.hour = small;
                self.values.ampm = small.map(Meridiem::from_hour);
            }
            FieldKind::Minute => self.values.minute = small,
            FieldKind::Second => self.values.second = small,
            FieldKind::Meridiem => {}
        }
    }

    fn set_meridiem(&mut self, meridiem: Meridiem) {
        self.values.ampm = Some(meridiem);
        self.values.hour = self.values.hour.map(|h| meridiem.apply(h));
    }

    /// Clears the field under the cursor, or the nearest one to its left
    /// when the cursor sits on a literal or at the end.
    fn clear_at_cursor(&mut self) -> Outcome {
        self.pending.reset(None);
        let cursor = self.cursor.min(self.template.len());
        let field = (0..=cursor)
            .rev()
            .find_map(|pos| self.template.field_at(pos))
            .or_else(|| self.template.resolve_field(cursor).map(|(_, field)| field));
        match field {
            Some(field) => {
                tracing::debug!(%field, "clearing field");
                self.values.clear(field);
                Outcome::Updated
            }
            None => Outcome::Ignored,
        }
    }
}
