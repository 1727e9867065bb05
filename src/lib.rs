//! A keyboard-driven date/time field editor.
//!
//! A [`DtPicker`] turns a single text field into a structured editor: the
//! text always follows a template such as `MM/DD/YYYY hh:mm aa`, and typed
//! characters fill in one field at a time, jumping to the next field as soon
//! as the current one cannot take another digit.
//!
//! The picker does no drawing. The host forwards keystrokes and cursor
//! placements, then reads back [`display`](DtPicker::display),
//! [`selection`](DtPicker::selection) and
//! [`is_invalid`](DtPicker::is_invalid) to paint the element.

mod consts;
mod editor;
mod format;
mod options;
mod parse;
mod prelude;
mod registry;
mod selection;
mod types;
mod values;

pub use consts::*;
pub use editor::{FieldEditor, Input, Outcome};
pub use format::{FormatError, FormatTemplate, Run};
pub use options::{
    BlurCallback, CalendarOptions, PickerConfig, PickerOptions, SelectCallback, Validator,
};
pub use parse::{ParseError, parse_canonical_date, parse_initial};
pub use registry::PickerRegistry;
pub use selection::SelectionRange;
pub use types::{FieldKind, Meridiem};
pub use values::FieldValues;

use chrono::NaiveDateTime;
use std::fmt;

/// A key event routed from the host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character
    Char(char),
    Backspace,
    Delete,
    /// Navigation and anything else the picker leaves to the host
    Other,
}

/// Whether the host should still run its default handling for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Propagation {
    /// The picker handled the event; suppress the default action
    Consumed,
    /// Let the host handle the event normally
    Propagate,
}

/// A date/time picker bound to one text element.
pub struct DtPicker {
    editor:         FieldEditor,
    calendar:       Option<CalendarOptions>,
    validate:       Option<Validator>,
    on_blur:        Option<BlurCallback>,
    on_select:      Option<SelectCallback>,
    display:        String,
    selection:      SelectionRange,
    invalid:        bool,
    visible:        bool,
    calendar_value: Option<String>,
}

impl DtPicker {
    /// Binds a picker to an element whose current text is `initial_text`.
    ///
    /// The text is parsed against the format first, then against common
    /// layouts; if neither works every field starts unset and the element
    /// shows the placeholder, e.g. `mm/dd/yyyy hh:mm aa`.
    ///
    /// # Errors
    /// Returns `FormatError` if the configured format is not a usable
    /// template.
    pub fn bind(initial_text: &str, options: PickerOptions) -> Result<Self, FormatError> {
        let PickerOptions {
            config,
            validate,
            on_blur,
            on_select,
        } = options;
        let template = config.template()?;
        let values = parse_initial(initial_text, &template).unwrap_or_default();
        let calendar = config
            .calendar
            .filter(CalendarOptions::enables_calendar);

        tracing::debug!(
            format = %template,
            initial_text,
            calendar = calendar.is_some(),
            "binding date/time picker"
        );

        let mut picker = Self {
            editor: FieldEditor::with_values(template, values),
            calendar,
            validate,
            on_blur,
            on_select,
            display: String::new(),
            selection: SelectionRange::default(),
            invalid: false,
            visible: true,
            calendar_value: None,
        };
        picker.refresh();
        Ok(picker)
    }

    pub const fn template(&self) -> &FormatTemplate {
        self.editor.template()
    }

    /// The text the element should show
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The span the element should highlight
    pub const fn selection(&self) -> SelectionRange {
        self.selection
    }

    pub const fn cursor(&self) -> usize {
        self.editor.cursor()
    }

    /// True while the value is incomplete, impossible, or rejected by the
    /// validator
    pub const fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// [`INVALID_CLASS`] while the value is invalid
    pub const fn class_name(&self) -> Option<&'static str> {
        if self.invalid { Some(INVALID_CLASS) } else { None }
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the icon that opens the calendar should be shown
    pub const fn calendar_trigger_visible(&self) -> bool {
        self.visible && self.calendar.is_some()
    }

    /// Options to hand the calendar popup, or `None` if the calendar is off
    pub fn calendar_options(&self) -> Option<CalendarOptions> {
        self.calendar.as_ref().map(CalendarOptions::forwarded)
    }

    /// The calendar's seed value: canonical `YYYY-MM-DD`, empty while the
    /// date is incomplete, `None` if the calendar is off
    pub fn calendar_value(&self) -> Option<&str> {
        self.calendar_value.as_deref()
    }

    /// Feeds one key event through the picker.
    pub fn handle_key(&mut self, key: Key) -> Propagation {
        let input = match key {
            Key::Char(c) => Input::from_char(c),
            Key::Backspace | Key::Delete => Some(Input::Clear),
            Key::Other => return Propagation::Propagate,
        };
        let outcome = input.map_or(Outcome::Ignored, |input| self.editor.apply(input));
        self.refresh();
        tracing::debug!(?key, ?outcome, display = %self.display, cursor = self.cursor(), "key handled");
        Propagation::Consumed
    }

    /// The element gained focus with its caret at `pos`.
    pub fn focus(&mut self, pos: usize) {
        self.editor.move_cursor(pos);
        self.selection = self.editor.highlight();
    }

    /// The user clicked into the element at `pos`; typing starts over in
    /// whichever field that lands on.
    pub fn click(&mut self, pos: usize) {
        self.editor.move_cursor(pos);
        self.editor.reset_entry();
        self.selection = self.editor.highlight();
    }

    /// The element lost focus.
    pub fn blur(&mut self) {
        if let Some(on_blur) = self.on_blur.as_mut() {
            on_blur();
        }
    }

    /// Applies a date chosen in the calendar popup.
    ///
    /// Year, month and day are overwritten and the time is kept. The caller's
    /// `on_select` callback then receives `date` unchanged.
    ///
    /// # Errors
    /// Returns `ParseError` if `date` is not a valid `YYYY-MM-DD` string;
    /// the picker is left untouched.
    pub fn select_calendar_date(&mut self, date: &str) -> Result<(), ParseError> {
        let parsed = parse_canonical_date(date).inspect_err(|err| {
            tracing::warn!(date, %err, "ignoring calendar selection");
        })?;
        let mut values = *self.editor.values();
        values.set_date(parsed);
        self.editor.set_values(values);
        self.refresh();
        if let Some(on_select) = self.on_select.as_mut() {
            on_select(date);
        }
        Ok(())
    }

    /// Best-effort date and time: unset fields count as zero, and values
    /// past the end of a month roll over into the next.
    pub fn date(&self) -> NaiveDateTime {
        self.editor.values().to_datetime_lossy()
    }

    /// The raw, possibly partial, field values
    pub const fn date_components(&self) -> FieldValues {
        *self.editor.values()
    }

    /// The value as a date and time, or `None` while any field shown by the
    /// template is unset or the fields do not form a real date.
    pub fn structured_value(&self) -> Option<NaiveDateTime> {
        self.editor.values().to_datetime(self.template())
    }

    /// Overwrites every field from `date`.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the year is outside 0-9999; the
    /// picker is left untouched.
    pub fn set_date(&mut self, date: NaiveDateTime) -> Result<(), ParseError> {
        self.set_structured_value(Some(date))
    }

    /// Overwrites every field from `value`, or clears them all for `None`.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the year is outside 0-9999; the
    /// picker is left untouched.
    pub fn set_structured_value(
        &mut self,
        value: Option<NaiveDateTime>,
    ) -> Result<(), ParseError> {
        let values = value
            .map(FieldValues::from_datetime)
            .transpose()
            .inspect_err(|err| {
                tracing::warn!(%err, "ignoring structured value");
            })?
            .unwrap_or_default();
        self.editor.set_values(values);
        self.refresh();
        Ok(())
    }

    /// Hides the element and its calendar icon.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Shows the element and its calendar icon.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Re-renders the text, highlight, validity and calendar seed.
    fn refresh(&mut self) {
        self.display = self.editor.render();
        self.selection = self.editor.highlight();

        let complete = self.structured_value().is_some();
        let accepted = self
            .validate
            .as_ref()
            .is_none_or(|validate| validate(self.editor.values()));
        self.invalid = !(complete && accepted);

        if self.calendar.is_some() {
            self.calendar_value = Some(self.editor.values().canonical_date());
        }
    }
}

impl fmt::Debug for DtPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DtPicker")
            .field("editor", &self.editor)
            .field("calendar", &self.calendar)
            .field("display", &self.display)
            .field("selection", &self.selection)
            .field("invalid", &self.invalid)
            .field("visible", &self.visible)
            .field("calendar_value", &self.calendar_value)
            .finish_non_exhaustive()
    }
}
