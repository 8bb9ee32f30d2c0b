//! Declarative editor descriptors, as found in package manifests.
//!
//! Field names are fixed for compatibility with existing manifests; in
//! particular the configuration provider is still read from `prevalues`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::configuration::{ConfigurationField, DefaultConfigurationProvider};
use crate::converter::DefaultValueConverter;
use crate::editor::EditorDefinition;
use crate::error::Result;
use crate::types::{ConfigurationMap, ValueType};

/// A package manifest listing property editors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub property_editors: Vec<EditorDescriptor>,
}

impl Manifest {
    /// Parse a manifest from JSON.
    pub fn parse(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        debug!(editors = manifest.property_editors.len(), "parsed editor manifest");
        Ok(manifest)
    }
}

/// Declarative form of an [`EditorDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDescriptor {
    pub alias: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "isParameterEditor", default)]
    pub is_parameter_editor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<ValueConverterDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevalues: Option<ConfigurationDescriptor>,
}

/// Declarative value converter: an editor view and its value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueConverterDescriptor {
    pub view: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub hide_label: bool,
}

/// Declarative configuration provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDescriptor {
    #[serde(default)]
    pub fields: Vec<ConfigurationField>,
    #[serde(rename = "defaultConfig", default)]
    pub default_config: ConfigurationMap,
}

impl EditorDefinition {
    /// Build a definition from a descriptor.
    ///
    /// `editor` becomes the assigned converter and `prevalues` the assigned
    /// configuration provider.
    pub fn from_descriptor(descriptor: EditorDescriptor) -> Result<Self> {
        let mut builder = EditorDefinition::builder(descriptor.alias, descriptor.name)
            .parameter_editor(descriptor.is_parameter_editor);
        if let Some(icon) = descriptor.icon {
            builder = builder.icon(icon);
        }
        if let Some(group) = descriptor.group {
            builder = builder.group(group);
        }
        if let Some(editor) = descriptor.editor {
            builder = builder
                .value_type(editor.value_type)
                .view(editor.view.clone())
                .hide_label(editor.hide_label)
                .value_converter(Box::new(
                    DefaultValueConverter::new(editor.value_type, editor.view)
                        .with_hide_label(editor.hide_label),
                ));
        }
        if let Some(prevalues) = descriptor.prevalues {
            builder = builder.configuration_provider(Box::new(
                DefaultConfigurationProvider::new()
                    .with_fields(prevalues.fields)
                    .with_defaults(prevalues.default_config),
            ));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PropertyEditor;
    use crate::error::EditorError;
    use crate::instance::Instance;
    use serde_json::json;

    const MANIFEST: &str = r#"{
        "propertyEditors": [
            {
                "alias": "Acme.Rating",
                "name": "Star rating",
                "icon": "icon-star",
                "group": "Pickers",
                "isParameterEditor": true,
                "editor": { "view": "~/App_Plugins/rating/rating.html", "valueType": "INT" },
                "prevalues": {
                    "fields": [
                        { "key": "max", "label": "Maximum stars", "view": "number" }
                    ],
                    "defaultConfig": { "max": 5 }
                }
            },
            { "alias": "Acme.Plain", "name": "Plain" }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.property_editors.len(), 2);

        let rating = &manifest.property_editors[0];
        assert!(rating.is_parameter_editor);
        assert_eq!(rating.editor.as_ref().unwrap().value_type, ValueType::Integer);
        assert_eq!(rating.prevalues.as_ref().unwrap().fields[0].name, "Maximum stars");
    }

    #[test]
    fn test_definition_from_descriptor() {
        let mut manifest = Manifest::parse(MANIFEST).unwrap();
        let def = EditorDefinition::from_descriptor(manifest.property_editors.remove(0)).unwrap();

        assert_eq!(def.alias(), "Acme.Rating");
        assert_eq!(def.icon(), "icon-star");
        assert_eq!(def.group(), "Pickers");
        assert_eq!(def.value_type(), ValueType::Integer);

        let first = def.create_value_converter();
        let second = def.create_value_converter();
        assert!(Instance::ptr_eq(&first, &second));

        let provider = def.create_configuration_provider();
        assert_eq!(provider.default_configuration()["max"], json!(5));
        assert_eq!(provider.fields().len(), 1);
    }

    #[test]
    fn test_minimal_descriptor_uses_defaults() {
        let mut manifest = Manifest::parse(MANIFEST).unwrap();
        let def = EditorDefinition::from_descriptor(manifest.property_editors.remove(1)).unwrap();

        assert_eq!(def.icon(), crate::editor::DEFAULT_ICON);
        assert!(def.assigned_value_converter().is_none());
        assert!(!def.create_value_converter().is_assigned());
        assert!(def.create_configuration_provider().default_configuration().is_empty());
    }

    #[test]
    fn test_missing_alias_is_an_error() {
        let err = Manifest::parse(r#"{"propertyEditors": [{"name": "No alias"}]}"#).unwrap_err();
        assert!(matches!(err, EditorError::Manifest(_)));
    }

    #[test]
    fn test_blank_alias_is_rejected() {
        let descriptor: EditorDescriptor =
            serde_json::from_value(json!({"alias": "", "name": "Blank"})).unwrap();
        assert!(matches!(
            EditorDefinition::from_descriptor(descriptor),
            Err(EditorError::MissingField { field: "alias" })
        ));
    }
}
