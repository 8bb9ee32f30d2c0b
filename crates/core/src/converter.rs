//! Value converters: storage ⇄ editor transformation of a single field value.
//!
//! A converter is created fresh for every use and owns the configuration of
//! the one field it converts for. Converters never hold a reference back to
//! the editor that created them.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};
use tracing::{trace, warn};

use crate::configuration::{short_type_name, ConfigurationObject, SharedConfiguration};
use crate::editor::EditorDefinition;
use crate::error::{EditorError, Result};
use crate::instance::CloneBoxed;
use crate::lookup::DataTypeLookup;
use crate::types::{ConfigurationMap, EditorSubmission, PropertyType, StorageKind, ValueType};

/// Configuration key that hides the property label.
pub const HIDE_LABEL_KEY: &str = "hideLabel";

/// Configuration key that overrides the converter's value type.
pub const VALUE_TYPE_KEY: &str = "umbracoDataValueType";

const EDITOR_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const STORED_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_ONLY: &str = "%Y-%m-%d";
const TIME_ONLY: &str = "%H:%M:%S";

/// Converts a field value between its stored form and its editor form.
pub trait ValueConverter: Send + Sync + fmt::Debug {
    /// Declared type of the values this converter produces for storage.
    fn value_type(&self) -> ValueType;

    /// Editor view used to render the value.
    fn view(&self) -> &str;

    /// Whether the editor hides the property label.
    fn hide_label(&self) -> bool;

    fn configuration(&self) -> Option<&dyn ConfigurationObject>;

    /// Assign the field's configuration.
    ///
    /// Fails without side effects if the object is not of the type this
    /// converter expects.
    fn set_configuration(&mut self, configuration: Option<SharedConfiguration>) -> Result<()>;

    /// Convert a stored value into the value shown to the author.
    ///
    /// `Value::Null` is the absent value. The stored value is never modified.
    fn convert_stored_to_editor(
        &self,
        stored: &Value,
        property_type: &PropertyType,
        data_types: &dyn DataTypeLookup,
    ) -> Result<Value>;

    /// Convert an author's submission into the value to store.
    ///
    /// `current` is the previously stored value; it may be malformed.
    fn convert_editor_to_storage(
        &self,
        submission: &EditorSubmission,
        current: &Value,
    ) -> Result<Value>;

    fn clone_box(&self) -> Box<dyn ValueConverter>;
}

impl CloneBoxed for dyn ValueConverter {
    fn clone_boxed(&self) -> Box<Self> {
        self.clone_box()
    }
}

/// Converter used by editors that do not provide their own.
///
/// Expects a [`ConfigurationMap`] and converts according to its value type.
#[derive(Debug, Clone)]
pub struct DefaultValueConverter {
    value_type: ValueType,
    view: String,
    hide_label: bool,
    configuration: Option<SharedConfiguration>,
}

impl DefaultValueConverter {
    pub fn new(value_type: ValueType, view: impl Into<String>) -> Self {
        Self {
            value_type,
            view: view.into(),
            hide_label: false,
            configuration: None,
        }
    }

    #[must_use]
    pub fn with_hide_label(mut self, hide_label: bool) -> Self {
        self.hide_label = hide_label;
        self
    }

    pub(crate) fn from_definition(definition: &EditorDefinition) -> Self {
        Self::new(definition.value_type(), definition.view())
            .with_hide_label(definition.hide_label())
    }

    /// Store an already validated configuration.
    pub(crate) fn store_configuration(&mut self, configuration: SharedConfiguration, hide_label: bool) {
        self.hide_label = hide_label;
        self.configuration = Some(configuration);
    }
}

impl ValueConverter for DefaultValueConverter {
    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn view(&self) -> &str {
        &self.view
    }

    fn hide_label(&self) -> bool {
        self.hide_label
    }

    fn configuration(&self) -> Option<&dyn ConfigurationObject> {
        self.configuration.as_deref()
    }

    fn set_configuration(&mut self, configuration: Option<SharedConfiguration>) -> Result<()> {
        let Some(configuration) = configuration else {
            self.configuration = None;
            return Ok(());
        };
        let Some(map) = configuration.downcast_ref::<ConfigurationMap>() else {
            return Err(EditorError::WrongConfigurationType {
                converter: "DefaultValueConverter",
                expected: short_type_name::<ConfigurationMap>(),
                actual: configuration.type_name(),
            });
        };

        let value_type = match map.get(VALUE_TYPE_KEY) {
            None | Some(Value::Null) => self.value_type,
            Some(Value::String(name)) => name.parse()?,
            Some(other) => return Err(EditorError::UnknownValueType(other.to_string())),
        };
        let hide_label = map
            .get(HIDE_LABEL_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(self.hide_label);

        self.value_type = value_type;
        self.store_configuration(configuration, hide_label);
        Ok(())
    }

    fn convert_stored_to_editor(
        &self,
        stored: &Value,
        property_type: &PropertyType,
        _data_types: &dyn DataTypeLookup,
    ) -> Result<Value> {
        trace!(property = %property_type.alias, value_type = %self.value_type, "stored -> editor");
        stored_to_editor(self.value_type, stored)
    }

    fn convert_editor_to_storage(
        &self,
        submission: &EditorSubmission,
        _current: &Value,
    ) -> Result<Value> {
        trace!(value_type = %self.value_type, "editor -> storage");
        editor_to_storage(self.value_type, &submission.value)
    }

    fn clone_box(&self) -> Box<dyn ValueConverter> {
        Box::new(self.clone())
    }
}

/// String form of a value; strings are taken verbatim.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid(value_type: ValueType, value: &Value) -> EditorError {
    EditorError::InvalidValue {
        value_type,
        value: value.to_string(),
    }
}

#[derive(Clone, Copy)]
enum Side {
    Editor,
    Storage,
}

fn stored_to_editor(value_type: ValueType, stored: &Value) -> Result<Value> {
    if stored.is_null() {
        return Ok(Value::Null);
    }
    match value_type.storage_kind() {
        StorageKind::Integer => to_integer(value_type, stored),
        StorageKind::Decimal => to_decimal(value_type, stored),
        StorageKind::Date => to_date(value_type, stored, Side::Editor),
        StorageKind::Nvarchar | StorageKind::Ntext => match (value_type, stored) {
            (ValueType::Json, Value::String(text)) => match serde_json::from_str(text) {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!(error = %e, "stored value is not valid JSON, passing it through as text");
                    Ok(stored.clone())
                }
            },
            (ValueType::Json, _) => Ok(stored.clone()),
            _ => Ok(Value::String(text_of(stored))),
        },
    }
}

fn editor_to_storage(value_type: ValueType, value: &Value) -> Result<Value> {
    let kind = value_type.storage_kind();
    let blank = matches!(value, Value::String(s) if s.trim().is_empty());
    if value.is_null() || (blank && !kind.is_text()) {
        return Ok(Value::Null);
    }
    match kind {
        StorageKind::Integer => to_integer(value_type, value),
        StorageKind::Decimal => to_decimal(value_type, value),
        StorageKind::Date => to_date(value_type, value, Side::Storage),
        StorageKind::Nvarchar | StorageKind::Ntext => match (value_type, value) {
            // Strings are serialized too, so a stored JSON string literal survives a round trip
            (ValueType::Json, _) => Ok(Value::String(value.to_string())),
            _ => Ok(Value::String(text_of(value))),
        },
    }
}

// Bounds of the floats that convert to an i64 without saturating
const I64_MIN: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_EXCLUSIVE: f64 = 9_223_372_036_854_775_808.0;

fn to_integer(value_type: ValueType, value: &Value) -> Result<Value> {
    let parsed = match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (I64_MIN..I64_MAX_EXCLUSIVE).contains(f))
            .map(|f| f as i64),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    parsed.map(Value::from).ok_or_else(|| invalid(value_type, value))
}

fn to_decimal(value_type: ValueType, value: &Value) -> Result<Value> {
    let parsed = match value {
        Value::Number(n) => return Ok(Value::Number(n.clone())),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(Number::from_f64),
        _ => None,
    };
    parsed.map(Value::Number).ok_or_else(|| invalid(value_type, value))
}

fn to_date(value_type: ValueType, value: &Value, side: Side) -> Result<Value> {
    let Value::String(text) = value else {
        return Err(invalid(value_type, value));
    };
    let formatted = if value_type == ValueType::Time {
        parse_time(text).map(|t| t.format(TIME_ONLY).to_string())
    } else {
        let format = match (value_type, side) {
            (ValueType::Date, _) => DATE_ONLY,
            (_, Side::Editor) => EDITOR_DATETIME,
            (_, Side::Storage) => STORED_DATETIME,
        };
        parse_datetime(text).map(|dt| dt.format(format).to_string())
    };
    formatted
        .map(Value::String)
        .ok_or_else(|| invalid(value_type, value))
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_ONLY)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let trimmed = text.trim();
    NaiveTime::parse_from_str(trimmed, TIME_ONLY)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
        .or_else(|| parse_datetime(trimmed).map(|dt| dt.time()))
}
