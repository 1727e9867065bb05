//! Configuration accepted when binding a picker.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    consts::{CANONICAL_FORMAT, DEFAULT_FORMAT},
    format::{FormatError, FormatTemplate},
    values::FieldValues,
};

/// Caller-supplied check run after every change; `false` marks the value
/// invalid without clearing anything.
pub type Validator = Box<dyn Fn(&FieldValues) -> bool>;
/// Runs when the bound element loses focus.
pub type BlurCallback = Box<dyn FnMut()>;
/// Runs with the canonical `YYYY-MM-DD` string after a calendar selection.
pub type SelectCallback = Box<dyn FnMut(&str)>;

/// Options handed through to the calendar popup.
///
/// Only `button_image` means anything to the picker: the calendar is used
/// only when it is set. Every other key is kept verbatim in `extra` and
/// forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format:  Option<String>,
    #[serde(flatten)]
    pub extra:        Map<String, Value>,
}

impl CalendarOptions {
    pub fn with_button_image(image: impl Into<String>) -> Self {
        Self {
            button_image: Some(image.into()),
            ..Self::default()
        }
    }

    /// Whether these options switch the calendar popup on
    pub const fn enables_calendar(&self) -> bool {
        self.button_image.is_some()
    }

    /// The options as the calendar receives them: the date format is forced
    /// to the canonical form the picker exchanges with it.
    pub fn forwarded(&self) -> Self {
        Self {
            date_format: Some(CANONICAL_FORMAT.to_owned()),
            ..self.clone()
        }
    }
}

/// The serializable part of the picker options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Display template, e.g. `MM/DD/YYYY hh:mm aa`
    pub format:   String,
    #[serde(rename = "calendarOptions", skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarOptions>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            format:   DEFAULT_FORMAT.to_owned(),
            calendar: None,
        }
    }
}

impl PickerConfig {
    /// Reads a config from JSON; missing keys take their defaults.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed JSON or mistyped keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses the configured format.
    ///
    /// # Errors
    /// Returns `FormatError` if the format is not a usable template.
    pub fn template(&self) -> Result<FormatTemplate, FormatError> {
        FormatTemplate::new(&self.format)
    }
}

/// Everything [`DtPicker::bind`](crate::DtPicker::bind) accepts: the
/// config plus the callbacks that cannot be serialized.
#[derive(Default)]
pub struct PickerOptions {
    pub config:           PickerConfig,
    pub(crate) validate:  Option<Validator>,
    pub(crate) on_blur:   Option<BlurCallback>,
    pub(crate) on_select: Option<SelectCallback>,
}

impl PickerOptions {
    pub fn new(format: impl Into<String>) -> Self {
        Self::from(PickerConfig {
            format: format.into(),
            ..PickerConfig::default()
        })
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarOptions) -> Self {
        self.config.calendar = Some(calendar);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validate: impl Fn(&FieldValues) -> bool + 'static) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    #[must_use]
    pub fn on_blur(mut self, on_blur: impl FnMut() + 'static) -> Self {
        self.on_blur = Some(Box::new(on_blur));
        self
    }

    #[must_use]
    pub fn on_select(mut self, on_select: impl FnMut(&str) + 'static) -> Self {
        self.on_select = Some(Box::new(on_select));
        self
    }
}

impl From<PickerConfig> for PickerOptions {
    fn from(config: PickerConfig) -> Self {
        Self {
            config,
            validate: None,
            on_blur: None,
            on_select: None,
        }
    }
}

impl fmt::Debug for PickerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerOptions")
            .field("config", &self.config)
            .field("validate", &self.validate.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}
