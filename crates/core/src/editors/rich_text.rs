//! Rich text editor.
//!
//! Persisted rich text embeds macros in a syntax the editor cannot render.
//! The converter runs every value through a [`MarkupRewriter`] on the way in
//! and out.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::trace;

use crate::configuration::{
    short_type_name, ConfigurationField, ConfigurationObject, ConfigurationProvider,
    SharedConfiguration,
};
use crate::converter::{text_of, DefaultValueConverter, ValueConverter};
use crate::editor::{EditorDefinition, EditorDefinitionBuilder, PropertyEditor};
use crate::error::{EditorError, Result};
use crate::instance::Instance;
use crate::lookup::DataTypeLookup;
use crate::markup::MarkupRewriter;
use crate::types::{ConfigurationMap, EditorSubmission, PropertyType, ValueType};

pub const RICH_TEXT_ALIAS: &str = "Umbraco.TinyMCE";

const CONVERTER_NAME: &str = "RichTextValueConverter";

/// Configuration of a rich text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextConfiguration {
    /// Editor settings (toolbar, stylesheets, dimensions, ...).
    #[serde(default)]
    pub editor: Value,
    #[serde(default)]
    pub hide_label: bool,
    /// Folder uploaded images are placed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_parent_id: Option<String>,
}

impl ConfigurationObject for RichTextConfiguration {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The rich text property editor.
pub struct RichTextPropertyEditor {
    definition: EditorDefinition,
    rewriter: Arc<dyn MarkupRewriter>,
}

impl RichTextPropertyEditor {
    pub fn new(rewriter: Arc<dyn MarkupRewriter>) -> Self {
        let definition = EditorDefinitionBuilder::new(RICH_TEXT_ALIAS, "Rich Text Editor")
            .view("rte")
            .value_type(ValueType::Text)
            .group("Rich Content")
            .icon("icon-browser-window")
            .parameter_editor(true)
            .finish();
        Self {
            definition,
            rewriter,
        }
    }

    pub fn builder() -> RichTextPropertyEditorBuilder {
        RichTextPropertyEditorBuilder::default()
    }
}

impl fmt::Debug for RichTextPropertyEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichTextPropertyEditor")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl PropertyEditor for RichTextPropertyEditor {
    fn definition(&self) -> &EditorDefinition {
        &self.definition
    }

    fn create_value_converter(&self) -> Instance<'_, dyn ValueConverter> {
        Instance::Created(Box::new(RichTextValueConverter::new(
            DefaultValueConverter::from_definition(&self.definition),
            Arc::clone(&self.rewriter),
        )))
    }

    fn create_configuration_provider(&self) -> Instance<'_, dyn ConfigurationProvider> {
        Instance::Created(Box::new(RichTextConfigurationProvider::new()))
    }
}

/// Builds a [`RichTextPropertyEditor`] from optional collaborators.
#[derive(Default)]
pub struct RichTextPropertyEditorBuilder {
    rewriter: Option<Arc<dyn MarkupRewriter>>,
}

impl RichTextPropertyEditorBuilder {
    #[must_use]
    pub fn rewriter(mut self, rewriter: Arc<dyn MarkupRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Fails if no markup rewriter was supplied.
    pub fn build(self) -> Result<RichTextPropertyEditor> {
        let rewriter = self.rewriter.ok_or(EditorError::MissingCollaborator {
            editor: "RichTextPropertyEditor",
            collaborator: "markup rewriter",
        })?;
        Ok(RichTextPropertyEditor::new(rewriter))
    }
}

/// Rewrites macro markup between stored and editor forms.
#[derive(Clone)]
pub struct RichTextValueConverter {
    inner: DefaultValueConverter,
    rewriter: Arc<dyn MarkupRewriter>,
}

impl RichTextValueConverter {
    pub fn new(inner: DefaultValueConverter, rewriter: Arc<dyn MarkupRewriter>) -> Self {
        Self { inner, rewriter }
    }
}

impl fmt::Debug for RichTextValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichTextValueConverter")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl ValueConverter for RichTextValueConverter {
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

    /// Requires a [`RichTextConfiguration`]; its `hide_label` becomes the
    /// converter's display hint.
    fn set_configuration(&mut self, configuration: Option<SharedConfiguration>) -> Result<()> {
        let configuration = configuration.ok_or(EditorError::MissingConfiguration {
            converter: CONVERTER_NAME,
        })?;
        let hide_label = configuration
            .downcast_ref::<RichTextConfiguration>()
            .map(|rich| rich.hide_label)
            .ok_or_else(|| EditorError::WrongConfigurationType {
                converter: CONVERTER_NAME,
                expected: short_type_name::<RichTextConfiguration>(),
                actual: configuration.type_name(),
            })?;
        self.inner.store_configuration(configuration, hide_label);
        Ok(())
    }

    fn convert_stored_to_editor(
        &self,
        stored: &Value,
        property_type: &PropertyType,
        _data_types: &dyn DataTypeLookup,
    ) -> Result<Value> {
        if stored.is_null() {
            return Ok(Value::Null);
        }
        trace!(property = %property_type.alias, "rich text stored -> editor");
        let substitutions = BTreeMap::new();
        Ok(Value::String(
            self.rewriter
                .normalize_for_editing(&text_of(stored), &substitutions),
        ))
    }

    fn convert_editor_to_storage(
        &self,
        submission: &EditorSubmission,
        _current: &Value,
    ) -> Result<Value> {
        if submission.value.is_null() {
            return Ok(Value::Null);
        }
        trace!("rich text editor -> storage");
        Ok(Value::String(
            self.rewriter
                .normalize_for_persistence(&text_of(&submission.value)),
        ))
    }

    fn clone_box(&self) -> Box<dyn ValueConverter> {
        Box::new(self.clone())
    }
}

/// Options and defaults of the rich text editor.
#[derive(Debug, Clone)]
pub struct RichTextConfigurationProvider {
    fields: Vec<ConfigurationField>,
}

impl RichTextConfigurationProvider {
    pub fn new() -> Self {
        Self {
            fields: vec![
                ConfigurationField::new("editor", "Editor", "rte"),
                ConfigurationField::new("hideLabel", "Hide Label", "boolean"),
                ConfigurationField::new("mediaParentId", "Image Upload Folder", "mediafolderpicker")
                    .with_description("Choose the upload location of pasted images"),
            ],
        }
    }
}

impl Default for RichTextConfigurationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationProvider for RichTextConfigurationProvider {
    fn fields(&self) -> &[ConfigurationField] {
        &self.fields
    }

    fn default_configuration(&self) -> ConfigurationMap {
        let mut defaults = ConfigurationMap::new();
        defaults.insert(
            "editor".into(),
            json!({
                "toolbar": [
                    "ace", "styleselect", "bold", "italic", "alignleft", "aligncenter",
                    "alignright", "bullist", "numlist", "outdent", "indent", "link",
                    "umbmediapicker", "umbmacro", "umbembeddialog"
                ],
                "stylesheets": [],
                "maxImageSize": 500,
                "mode": "classic"
            }),
        );
        defaults.insert("hideLabel".into(), json!(false));
        defaults
    }

    fn to_configuration_object(&self, configuration: &ConfigurationMap) -> Result<SharedConfiguration> {
        let mut merged = self.default_configuration();
        merged.extend(configuration.iter().map(|(k, v)| (k.clone(), v.clone())));
        let typed: RichTextConfiguration =
            serde_json::from_value(Value::Object(merged.into_iter().collect())).map_err(|e| {
                EditorError::InvalidConfiguration {
                    editor: RICH_TEXT_ALIAS.to_string(),
                    message: e.to_string(),
                }
            })?;
        Ok(Arc::new(typed))
    }

    fn to_editor_configuration(&self, configuration: &dyn ConfigurationObject) -> Result<ConfigurationMap> {
        let rich = configuration
            .downcast_ref::<RichTextConfiguration>()
            .ok_or_else(|| EditorError::WrongConfigurationType {
                converter: "RichTextConfigurationProvider",
                expected: short_type_name::<RichTextConfiguration>(),
                actual: configuration.type_name(),
            })?;
        let value = serde_json::to_value(rich).map_err(|e| EditorError::InvalidConfiguration {
            editor: RICH_TEXT_ALIAS.to_string(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Ok(ConfigurationMap::new()),
        }
    }

    fn clone_box(&self) -> Box<dyn ConfigurationProvider> {
        Box::new(self.clone())
    }
}
