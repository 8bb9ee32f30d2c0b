//! Plain text editors (textbox, textarea).
//!
//! Values are stored verbatim as text; no JSON handling takes place in
//! either direction.

use serde_json::Value;
use tracing::trace;

use crate::configuration::{
    ConfigurationField, ConfigurationObject, ConfigurationProvider, DefaultConfigurationProvider,
    SharedConfiguration,
};
use crate::converter::{text_of, DefaultValueConverter, ValueConverter};
use crate::editor::{EditorDefinition, EditorDefinitionBuilder, PropertyEditor};
use crate::error::{EditorError, Result};
use crate::instance::Instance;
use crate::lookup::DataTypeLookup;
use crate::types::{EditorSubmission, PropertyType, ValueType};

pub const TEXTBOX_ALIAS: &str = "Umbraco.TextBox";
pub const TEXTAREA_ALIAS: &str = "Umbraco.TextArea";

/// A single- or multi-line plain text editor.
#[derive(Debug)]
pub struct PlainTextPropertyEditor {
    definition: EditorDefinition,
    multiline: bool,
}

impl PlainTextPropertyEditor {
    /// Single-line editor, stored as a short string.
    pub fn textbox() -> Self {
        let definition = EditorDefinitionBuilder::new(TEXTBOX_ALIAS, "Textbox")
            .view("textbox")
            .value_type(ValueType::String)
            .parameter_editor(true)
            .finish();
        Self {
            definition,
            multiline: false,
        }
    }

    /// Multi-line editor, stored as long text.
    pub fn textarea() -> Self {
        let definition = EditorDefinitionBuilder::new(TEXTAREA_ALIAS, "Textarea")
            .view("textarea")
            .icon("icon-application-window-alt")
            .value_type(ValueType::Text)
            .parameter_editor(true)
            .finish();
        Self {
            definition,
            multiline: true,
        }
    }

    fn configuration_fields(&self) -> Vec<ConfigurationField> {
        let mut fields = vec![ConfigurationField::new("maxChars", "Maximum allowed characters", "number")
            .with_description("If empty, no character limit")];
        if self.multiline {
            fields.push(
                ConfigurationField::new("rows", "Number of rows", "number")
                    .with_description("If empty, 10 rows would be set as the default value"),
            );
        }
        fields
    }
}

impl PropertyEditor for PlainTextPropertyEditor {
    fn definition(&self) -> &EditorDefinition {
        &self.definition
    }

    fn create_value_converter(&self) -> Instance<'_, dyn ValueConverter> {
        Instance::Created(Box::new(PlainTextValueConverter::new(
            DefaultValueConverter::from_definition(&self.definition),
        )))
    }

    fn create_configuration_provider(&self) -> Instance<'_, dyn ConfigurationProvider> {
        Instance::Created(Box::new(
            DefaultConfigurationProvider::new().with_fields(self.configuration_fields()),
        ))
    }
}

/// Converter that only accepts fields stored as text.
#[derive(Debug, Clone)]
pub struct PlainTextValueConverter {
    inner: DefaultValueConverter,
}

impl PlainTextValueConverter {
    pub fn new(inner: DefaultValueConverter) -> Self {
        Self { inner }
    }
}

impl ValueConverter for PlainTextValueConverter {
    fn value_type(&self) -> ValueType {
        self.inner.value_type()
    }

    fn view(&self) -> &str {
        self.inner.view()
    }

    fn hide_label(&self) -> bool {
        self.inner.hide_label()
    }

    fn configuration(&self) -> Option<&dyn ConfigurationObject> {
        self.inner.configuration()
    }

    fn set_configuration(&mut self, configuration: Option<SharedConfiguration>) -> Result<()> {
        self.inner.set_configuration(configuration)
    }

    /// Always yields a string; an absent value becomes `""`.
    fn convert_stored_to_editor(
        &self,
        stored: &Value,
        property_type: &PropertyType,
        data_types: &dyn DataTypeLookup,
    ) -> Result<Value> {
        if stored.is_null() {
            return Ok(Value::String(String::new()));
        }

        let value_type = data_types
            .data_type(&property_type.data_type_key)
            .map_or_else(|| self.value_type(), |info| info.value_type);
        let kind = value_type.storage_kind();
        trace!(property = %property_type.alias, %kind, "plain text stored -> editor");

        if !kind.is_text() {
            return Err(EditorError::UnsupportedStorageKind {
                converter: "PlainTextValueConverter",
                kind,
            });
        }
        Ok(Value::String(text_of(stored)))
    }

    fn convert_editor_to_storage(
        &self,
        submission: &EditorSubmission,
        current: &Value,
    ) -> Result<Value> {
        self.inner.convert_editor_to_storage(submission, current)
    }

    fn clone_box(&self) -> Box<dyn ValueConverter> {
        Box::new(self.clone())
    }
}
