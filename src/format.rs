//! Format templates: which fields a display string contains and where.

use crate::{prelude::*, selection::SelectionRange, types::FieldKind};

/// A maximal run of one template character class.
///
/// Field runs repeat a single marker letter (`YYYY`, `MM`). Literal runs are
/// any stretch of non-marker characters (`/`, ` `, `T`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub start: usize,
    pub len:   usize,
    /// `None` for literal runs
    pub field: Option<FieldKind>,
}

impl Run {
    /// Offset one past the last character of the run
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end()
    }

    pub const fn span(&self) -> SelectionRange {
        SelectionRange {
            start: self.start,
            end:   self.end(),
        }
    }
}

/// Error type for template construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The template has no characters at all.
    #[error("Empty format template")]
    Empty,

    /// The template has no field markers, so nothing is editable.
    #[error("Format template {0:?} contains no date or time fields")]
    NoFields(String),

    /// A field class is split across more than one run.
    #[error("Field {field} appears more than once in format template {template:?}")]
    DuplicateField { field: FieldKind, template: String },
}

/// A parsed display template such as `MM/DD/YYYY hh:mm aa`.
///
/// Offsets used by every method are character offsets, which equal the
/// offsets into any string rendered from the template.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{text}")]
pub struct FormatTemplate {
    text:  String,
    chars: Vec<char>,
    runs:  Vec<Run>,
}

impl FormatTemplate {
    /// Parses a template into its runs.
    ///
    /// # Errors
    /// Returns `FormatError` if the template is empty, has no fields, or
    /// repeats a field class in two places.
    pub fn new(text: &str) -> Result<Self, FormatError> {
        if text.is_empty() {
            return Err(FormatError::Empty);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut runs: Vec<Run> = Vec::new();
        for (pos, &c) in chars.iter().enumerate() {
            let field = FieldKind::from_marker(c);
            let extends = runs.last().is_some_and(|run| match (run.field, field) {
                (Some(_), Some(_)) => chars[run.start] == c,
                (None, None) => true,
                _ => false,
            });
            match runs.last_mut() {
                Some(run) if extends => run.len += 1,
                _ => runs.push(Run {
                    start: pos,
                    len: 1,
                    field,
                }),
            }
        }

        let mut seen: Vec<FieldKind> = Vec::new();
        for field in runs.iter().filter_map(|run| run.field) {
            if seen.contains(&field) {
                return Err(FormatError::DuplicateField {
                    field,
                    template: text.to_owned(),
                });
            }
            seen.push(field);
        }
        if seen.is_empty() {
            return Err(FormatError::NoFields(text.to_owned()));
        }

        Ok(Self {
            text: text.to_owned(),
            chars,
            runs,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters in the template (and in every rendering of it)
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false: construction rejects empty templates
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// The field marked at `pos`, or `None` on a literal or past the end
    pub fn field_at(&self, pos: usize) -> Option<FieldKind> {
        self.char_at(pos).and_then(FieldKind::from_marker)
    }

    /// The run of `field`, if the template contains it
    pub fn field_span(&self, field: FieldKind) -> Option<&Run> {
        self.runs.iter().find(|run| run.field == Some(field))
    }

    /// A field is required exactly when the template shows it
    pub fn requires(&self, field: FieldKind) -> bool {
        self.field_span(field).is_some()
    }

    /// Hours display on a 12-hour clock whenever an am/pm field is present
    pub fn uses_12_hour(&self) -> bool {
        self.requires(FieldKind::Meridiem)
    }

    /// Offset of the next field to the right of `pos`.
    ///
    /// Skips the rest of the run `pos` sits in plus any literals after it.
    /// Returns `len()` when no field follows; callers clamp.
    pub fn next_field_position(&self, pos: usize) -> usize {
        let Some(&current) = self.chars.get(pos) else {
            return self.len();
        };
        let mut next = pos + 1;
        while next < self.len()
            && (self.chars[next] == current || FieldKind::from_marker(self.chars[next]).is_none())
        {
            next += 1;
        }
        next
    }

    /// Offset of the field a keystroke at `pos` should edit.
    ///
    /// A position on a literal moves to the next field. Positions at or past
    /// the end are first pulled back onto the last template character.
    /// Returns `None` if no field lies at or after that point.
    pub fn resolve_field(&self, pos: usize) -> Option<(usize, FieldKind)> {
        let pos = pos.min(self.len().saturating_sub(1));
        if let Some(field) = self.field_at(pos) {
            return Some((pos, field));
        }
        let next = self.next_field_position(pos);
        self.field_at(next).map(|field| (next, field))
    }

    /// The span to highlight for a cursor at `pos`.
    ///
    /// Covers the whole run under the cursor; a cursor on a literal selects
    /// the next field instead. With nothing to select the result is a caret
    /// at the end of the template.
    pub fn highlight(&self, pos: usize) -> SelectionRange {
        let end = SelectionRange::caret(self.len());
        if pos >= self.len() {
            return end;
        }
        let pos = if self.field_at(pos).is_some() {
            pos
        } else {
            self.next_field_position(pos)
        };
        self.runs
            .iter()
            .find(|run| run.contains(pos))
            .map_or(end, Run::span)
    }

    /// The string shown while every field is unset, e.g. `mm/dd/yyyy`
    pub fn placeholder(&self) -> String {
        self.chars
            .iter()
            .map(|&c| FieldKind::from_marker(c).map_or(c, FieldKind::placeholder))
            .collect()
    }

    /// The equivalent `chrono` strftime pattern, for strict parsing
    pub fn to_strftime(&self) -> String {
        let mut pattern = String::with_capacity(self.text.len() * 2);
        for run in &self.runs {
            match run.field {
                Some(field) => pattern.push_str(match field {
                    FieldKind::Year => "%Y",
                    FieldKind::Month => "%m",
                    FieldKind::Day => "%d",
                    FieldKind::Hour if self.uses_12_hour() => "%I",
                    FieldKind::Hour => "%H",
                    FieldKind::Minute => "%M",
                    FieldKind::Second => "%S",
                    FieldKind::Meridiem => "%p",
                }),
                None => {
                    for &c in &self.chars[run.start..run.end()] {
                        if c == '%' {
                            pattern.push_str("%%");
                        } else {
                            pattern.push(c);
                        }
                    }
                }
            }
        }
        pattern
    }
}

impl std::str::FromStr for FormatTemplate {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
