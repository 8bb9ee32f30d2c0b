//! Core types shared by editors and converters.
//!
//! Stored values and editor values are both [`serde_json::Value`];
//! `Value::Null` stands for an absent value on either side.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EditorError;

/// Configuration options keyed by name.
pub type ConfigurationMap = BTreeMap<String, Value>;

/// Declared type of a property value.
///
/// Names match the legacy upper-case identifiers used in manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueType {
    #[serde(rename = "DATE")]
    Date,
    #[serde(rename = "DATETIME")]
    DateTime,
    #[serde(rename = "DECIMAL")]
    Decimal,
    #[serde(rename = "INT")]
    Integer,
    #[serde(rename = "BIGINT")]
    BigInt,
    #[serde(rename = "JSON")]
    Json,
    #[default]
    #[serde(rename = "STRING")]
    String,
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "TIME")]
    Time,
    #[serde(rename = "XML")]
    Xml,
}

impl ValueType {
    /// All value types, in declaration order.
    pub const ALL: [ValueType; 10] = [
        Self::Date,
        Self::DateTime,
        Self::Decimal,
        Self::Integer,
        Self::BigInt,
        Self::Json,
        Self::String,
        Self::Text,
        Self::Time,
        Self::Xml,
    ];

    /// Legacy identifier (e.g. "INT").
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Decimal => "DECIMAL",
            Self::Integer => "INT",
            Self::BigInt => "BIGINT",
            Self::Json => "JSON",
            Self::String => "STRING",
            Self::Text => "TEXT",
            Self::Time => "TIME",
            Self::Xml => "XML",
        }
    }

    /// The kind of column a value of this type is persisted in.
    #[must_use]
    pub fn storage_kind(self) -> StorageKind {
        match self {
            Self::Integer => StorageKind::Integer,
            Self::Decimal => StorageKind::Decimal,
            Self::Date | Self::DateTime | Self::Time => StorageKind::Date,
            Self::String | Self::BigInt => StorageKind::Nvarchar,
            Self::Text | Self::Json | Self::Xml => StorageKind::Ntext,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EditorError::UnknownValueType(s.to_string()))
    }
}

/// Underlying persisted shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Integer,
    Decimal,
    Date,
    Nvarchar,
    Ntext,
}

impl StorageKind {
    /// Whether values of this kind are stored as text.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Nvarchar | Self::Ntext)
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Nvarchar => "nvarchar",
            Self::Ntext => "ntext",
        };
        f.write_str(name)
    }
}

/// A declared content field, as seen by a converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyType {
    /// Field alias (e.g. "bodyText").
    pub alias: String,
    /// Key of the data type the field uses, resolved via a
    /// [`DataTypeLookup`](crate::lookup::DataTypeLookup).
    pub data_type_key: String,
}

impl PropertyType {
    pub fn new(alias: impl Into<String>, data_type_key: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            data_type_key: data_type_key.into(),
        }
    }
}

/// A value submitted by an author through an editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorSubmission {
    pub value: Value,
}

impl EditorSubmission {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// A submission without a value.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Value> for EditorSubmission {
    fn from(value: Value) -> Self {
        Self { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kinds() {
        assert_eq!(ValueType::Integer.storage_kind(), StorageKind::Integer);
        assert_eq!(ValueType::Decimal.storage_kind(), StorageKind::Decimal);
        assert_eq!(ValueType::Time.storage_kind(), StorageKind::Date);
        assert_eq!(ValueType::BigInt.storage_kind(), StorageKind::Nvarchar);
        assert_eq!(ValueType::Json.storage_kind(), StorageKind::Ntext);
        assert!(ValueType::Xml.storage_kind().is_text());
        assert!(!ValueType::DateTime.storage_kind().is_text());
    }

    #[test]
    fn test_value_type_from_str() {
        assert_eq!("int".parse::<ValueType>().unwrap(), ValueType::Integer);
        assert_eq!(" DateTime ".parse::<ValueType>().unwrap(), ValueType::DateTime);
        assert!(matches!(
            "varchar".parse::<ValueType>(),
            Err(EditorError::UnknownValueType(_))
        ));
    }

    #[test]
    fn test_value_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&ValueType::Integer).unwrap(),
            "\"INT\""
        );
        let parsed: ValueType = serde_json::from_str("\"DATETIME\"").unwrap();
        assert_eq!(parsed, ValueType::DateTime);
        for t in ValueType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t));
        }
    }
}
