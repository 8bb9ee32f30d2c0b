//! Propedit Core
//!
//! Property editors for a content store: how a declared content field is
//! stored, how it is shown to an author, and how the editor is configured.
//!
//! Editor definitions are long-lived and identified by alias. Every request
//! for a value converter or configuration provider gets a new instance, wired
//! with the configuration of the one field it serves.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use propedit_core::lookup::{DataTypeInfo, InMemoryDataTypes};
//! use propedit_core::markup::PassthroughRewriter;
//! use propedit_core::{EditorCollection, PropertyEditor, PropertyType, ValueType};
//! use serde_json::json;
//!
//! let editors = EditorCollection::with_builtins(Arc::new(PassthroughRewriter));
//! let data_types = InMemoryDataTypes::new()
//!     .with(DataTypeInfo::new("textstring", "Umbraco.TextBox", ValueType::String));
//!
//! let textbox = editors.get("Umbraco.TextBox").unwrap();
//! let converter = textbox.create_value_converter();
//! let shown = converter
//!     .convert_stored_to_editor(&json!(null), &PropertyType::new("title", "textstring"), &data_types)
//!     .unwrap();
//! assert_eq!(shown, json!(""));
//! ```
//!
//! # Manifests
//!
//! ```
//! use propedit_core::EditorCollection;
//!
//! let mut editors = EditorCollection::new();
//! let added = editors
//!     .register_manifest(r#"{"propertyEditors": [{"alias": "Acme.Color", "name": "Color"}]}"#)
//!     .unwrap();
//! assert_eq!(added, 1);
//! assert!(editors.contains("Acme.Color"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

pub mod configuration;
pub mod converter;
pub mod descriptor;
pub mod editor;
pub mod editors;
pub mod error;
pub mod instance;
pub mod lookup;
pub mod markup;
pub mod types;

pub use configuration::{
    ConfigurationField, ConfigurationObject, ConfigurationProvider, DefaultConfigurationProvider,
    SharedConfiguration,
};
pub use converter::{DefaultValueConverter, ValueConverter};
pub use descriptor::{EditorDescriptor, Manifest};
pub use editor::{EditorDefinition, EditorDefinitionBuilder, ParameterEditor, PropertyEditor};
pub use error::{EditorError, ErrorKind, Result};
pub use instance::Instance;
pub use types::*;

use editors::{PlainTextPropertyEditor, RichTextPropertyEditor};
use markup::MarkupRewriter;

/// The set of property editors known to the host, keyed by alias.
///
/// Filled once at startup and only read afterwards.
#[derive(Default)]
pub struct EditorCollection {
    editors: Vec<Box<dyn PropertyEditor>>,
    index: HashMap<String, usize>,
}

impl EditorCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection holding the built-in editors.
    #[must_use]
    pub fn with_builtins(rewriter: Arc<dyn MarkupRewriter>) -> Self {
        let mut collection = Self::new();
        for editor in Self::create_builtin_list(rewriter) {
            collection.insert(editor);
        }
        collection
    }

    fn create_builtin_list(rewriter: Arc<dyn MarkupRewriter>) -> Vec<Box<dyn PropertyEditor>> {
        vec![
            Box::new(PlainTextPropertyEditor::textbox()),
            Box::new(PlainTextPropertyEditor::textarea()),
            Box::new(RichTextPropertyEditor::new(rewriter)),
        ]
    }

    fn insert(&mut self, editor: Box<dyn PropertyEditor>) {
        self.index.insert(editor.alias().to_string(), self.editors.len());
        self.editors.push(editor);
    }

    /// Add an editor. Fails if its alias is already taken.
    pub fn register(&mut self, editor: Box<dyn PropertyEditor>) -> Result<()> {
        if self.index.contains_key(editor.alias()) {
            return Err(EditorError::DuplicateAlias(editor.alias().to_string()));
        }
        debug!(alias = editor.alias(), "registering property editor");
        self.insert(editor);
        Ok(())
    }

    /// Add every editor declared in a manifest.
    ///
    /// All descriptors are validated before any is added. Returns the number
    /// of editors added.
    pub fn register_manifest(&mut self, json: &str) -> Result<usize> {
        let manifest = Manifest::parse(json)?;
        let definitions = manifest
            .property_editors
            .into_iter()
            .map(EditorDefinition::from_descriptor)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = std::collections::HashSet::new();
        for def in &definitions {
            if self.contains(def.alias()) || !seen.insert(def.alias()) {
                return Err(EditorError::DuplicateAlias(def.alias().to_string()));
            }
        }

        let count = definitions.len();
        for def in definitions {
            self.insert(Box::new(def));
        }
        Ok(count)
    }

    /// Look up an editor by alias.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&dyn PropertyEditor> {
        self.index.get(alias).map(|&i| &*self.editors[i])
    }

    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.index.contains_key(alias)
    }

    /// Editors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn PropertyEditor> {
        self.editors.iter().map(|e| &**e)
    }

    #[must_use]
    pub fn aliases(&self) -> Vec<&str> {
        self.iter().map(|e| e.alias()).collect()
    }

    /// Editors usable as parameter editors, as parameter editors.
    #[must_use]
    pub fn parameter_editors(&self) -> Vec<ParameterEditor<'_>> {
        self.iter()
            .filter(|e| e.definition().is_parameter_editor())
            .map(|e| e.parameter_editor())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

impl std::fmt::Debug for EditorCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCollection")
            .field("aliases", &self.aliases())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::PassthroughRewriter;

    fn builtins() -> EditorCollection {
        EditorCollection::with_builtins(Arc::new(PassthroughRewriter))
    }

    #[test]
    fn test_builtins_registered() {
        let editors = builtins();
        assert_eq!(
            editors.aliases(),
            vec!["Umbraco.TextBox", "Umbraco.TextArea", "Umbraco.TinyMCE"]
        );
        assert!(editors.get("Umbraco.TinyMCE").is_some());
        assert!(editors.get("umbraco.tinymce").is_none());
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut editors = builtins();
        let duplicate = EditorDefinition::builder("Umbraco.TextBox", "Another textbox")
            .build()
            .unwrap();
        let err = editors.register(Box::new(duplicate)).unwrap_err();
        assert!(matches!(err, EditorError::DuplicateAlias(ref a) if a == "Umbraco.TextBox"));
        assert_eq!(editors.len(), 3);
    }

    #[test]
    fn test_manifest_is_all_or_nothing() {
        let mut editors = builtins();
        let json = r#"{"propertyEditors": [
            {"alias": "Acme.One", "name": "One"},
            {"alias": "Umbraco.TextArea", "name": "Clash"}
        ]}"#;
        assert!(editors.register_manifest(json).is_err());
        assert!(!editors.contains("Acme.One"));
    }

    #[test]
    fn test_manifest_rejects_internal_duplicates() {
        let mut editors = EditorCollection::new();
        let json = r#"{"propertyEditors": [
            {"alias": "Acme.One", "name": "One"},
            {"alias": "Acme.One", "name": "Again"}
        ]}"#;
        assert!(matches!(
            editors.register_manifest(json),
            Err(EditorError::DuplicateAlias(_))
        ));
        assert!(editors.is_empty());
    }

    #[test]
    fn test_parameter_editors() {
        let mut editors = builtins();
        editors
            .register(Box::new(
                EditorDefinition::builder("Acme.NotParam", "Not a parameter editor")
                    .build()
                    .unwrap(),
            ))
            .unwrap();

        let params = editors.parameter_editors();
        let aliases: Vec<_> = params.iter().map(|p| p.alias).collect();
        assert_eq!(
            aliases,
            vec!["Umbraco.TextBox", "Umbraco.TextArea", "Umbraco.TinyMCE"]
        );

        let rte = params.iter().find(|p| p.alias == "Umbraco.TinyMCE").unwrap();
        assert!(rte.configuration.contains_key("editor"));
    }

    #[test]
    fn test_collection_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EditorCollection>();
    }
}
