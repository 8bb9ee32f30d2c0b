//! Data type lookup: how a field's value is typed and configured.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ConfigurationMap, StorageKind, ValueType};

/// Metadata about a data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeInfo {
    pub key: String,
    pub editor_alias: String,
    pub value_type: ValueType,
    #[serde(default)]
    pub configuration: ConfigurationMap,
}

impl DataTypeInfo {
    pub fn new(
        key: impl Into<String>,
        editor_alias: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            key: key.into(),
            editor_alias: editor_alias.into(),
            value_type,
            configuration: ConfigurationMap::new(),
        }
    }

    #[must_use]
    pub fn with_configuration(mut self, configuration: ConfigurationMap) -> Self {
        self.configuration = configuration;
        self
    }

    #[must_use]
    pub fn storage_kind(&self) -> StorageKind {
        self.value_type.storage_kind()
    }
}

/// Resolves data type keys to their metadata.
///
/// Implemented by the host; converters only read through it.
pub trait DataTypeLookup: Send + Sync {
    /// Look up a data type by key.
    fn data_type(&self, key: &str) -> Option<DataTypeInfo>;
}

/// A [`DataTypeLookup`] backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataTypes {
    data_types: HashMap<String, DataTypeInfo>,
}

impl InMemoryDataTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a data type, replacing any previous one with the same key.
    pub fn insert(&mut self, info: DataTypeInfo) {
        self.data_types.insert(info.key.clone(), info);
    }

    #[must_use]
    pub fn with(mut self, info: DataTypeInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn len(&self) -> usize {
        self.data_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_types.is_empty()
    }
}

impl DataTypeLookup for InMemoryDataTypes {
    fn data_type(&self, key: &str) -> Option<DataTypeInfo> {
        self.data_types.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let data_types = InMemoryDataTypes::new()
            .with(DataTypeInfo::new("textstring", "Umbraco.TextBox", ValueType::String))
            .with(DataTypeInfo::new("numeric", "Umbraco.Integer", ValueType::Integer));

        assert_eq!(data_types.len(), 2);
        let numeric = data_types.data_type("numeric").unwrap();
        assert_eq!(numeric.storage_kind(), StorageKind::Integer);
        assert!(data_types.data_type("missing").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut data_types = InMemoryDataTypes::new();
        data_types.insert(DataTypeInfo::new("body", "Umbraco.TextArea", ValueType::Text));
        data_types.insert(DataTypeInfo::new("body", "Umbraco.TextArea", ValueType::String));
        assert_eq!(data_types.len(), 1);
        assert_eq!(
            data_types.data_type("body").unwrap().value_type,
            ValueType::String
        );
    }
}
