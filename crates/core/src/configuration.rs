//! Editor configuration: typed configuration objects and the providers that
//! produce them.
//!
//! A provider knows the options an editor exposes and their defaults. It
//! turns the stored option map of a data type into the typed configuration
//! object its converter expects, and back.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::instance::CloneBoxed;
use crate::types::ConfigurationMap;

/// A configuration object handed to a value converter.
///
/// Each converter expects one concrete type and rejects any other.
pub trait ConfigurationObject: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Short name of the concrete type, used in error messages.
    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

impl dyn ConfigurationObject {
    /// Downcast to a concrete configuration type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Configuration shared by the converters of one field.
pub type SharedConfiguration = Arc<dyn ConfigurationObject>;

impl ConfigurationObject for ConfigurationMap {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Last path segment of a type name, without generic arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// One option shown by the configuration editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationField {
    pub key: String,
    #[serde(alias = "label")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub view: String,
    #[serde(default)]
    pub hide_label: bool,
}

impl ConfigurationField {
    pub fn new(key: impl Into<String>, name: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
            view: view.into(),
            hide_label: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Supplies configuration options and defaults for an editor.
pub trait ConfigurationProvider: Send + Sync + fmt::Debug {
    /// Options shown by the configuration editor.
    fn fields(&self) -> &[ConfigurationField] {
        &[]
    }

    /// Configuration used when a field has not been configured yet.
    fn default_configuration(&self) -> ConfigurationMap;

    /// Turn a stored option map into the object the converter expects.
    ///
    /// Keys missing from `configuration` take their default value.
    fn to_configuration_object(&self, configuration: &ConfigurationMap) -> Result<SharedConfiguration> {
        let mut merged = self.default_configuration();
        merged.extend(configuration.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Arc::new(merged))
    }

    /// Turn a configuration object back into an option map.
    fn to_editor_configuration(&self, configuration: &dyn ConfigurationObject) -> Result<ConfigurationMap> {
        configuration
            .downcast_ref::<ConfigurationMap>()
            .cloned()
            .ok_or_else(|| EditorError::WrongConfigurationType {
                converter: short_type_name::<Self>(),
                expected: short_type_name::<ConfigurationMap>(),
                actual: configuration.type_name(),
            })
    }

    fn clone_box(&self) -> Box<dyn ConfigurationProvider>;
}

impl CloneBoxed for dyn ConfigurationProvider {
    fn clone_boxed(&self) -> Box<Self> {
        self.clone_box()
    }
}

/// Provider with a fixed set of fields and defaults (empty by default).
#[derive(Debug, Clone, Default)]
pub struct DefaultConfigurationProvider {
    fields: Vec<ConfigurationField>,
    defaults: ConfigurationMap,
}

impl DefaultConfigurationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<ConfigurationField>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: ConfigurationMap) -> Self {
        self.defaults = defaults;
        self
    }
}

impl ConfigurationProvider for DefaultConfigurationProvider {
    fn fields(&self) -> &[ConfigurationField] {
        &self.fields
    }

    fn default_configuration(&self) -> ConfigurationMap {
        self.defaults.clone()
    }

    fn clone_box(&self) -> Box<dyn ConfigurationProvider> {
        Box::new(self.clone())
    }
}
