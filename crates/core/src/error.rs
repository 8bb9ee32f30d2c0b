//! Error types for property editors and value converters.

use crate::types::{StorageKind, ValueType};

/// Result type for property editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Broad classification of an [`EditorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The editor or converter is wired to something it cannot handle.
    Wiring,
    /// A definition could not be built.
    Construction,
    /// A submitted or stored value does not fit the storage type.
    Conversion,
    /// A declarative descriptor could not be read.
    Manifest,
}

/// Errors that can occur while building editors or converting values.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Converter used on a field whose storage kind it does not support.
    #[error("{converter} can only be used with text storage, but the field is stored as {kind}")]
    UnsupportedStorageKind {
        converter: &'static str,
        kind: StorageKind,
    },

    /// Configuration object of the wrong concrete type.
    #[error("{converter} expected a {expected} configuration, but got {actual}")]
    WrongConfigurationType {
        converter: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// No configuration given to a converter that requires one.
    #[error("{converter} requires a configuration")]
    MissingConfiguration { converter: &'static str },

    /// Configuration map could not be turned into the typed configuration.
    #[error("invalid configuration for editor '{editor}': {message}")]
    InvalidConfiguration { editor: String, message: String },

    /// A value cannot be represented in the requested value type.
    #[error("cannot convert {value} to a {value_type} value")]
    InvalidValue { value_type: ValueType, value: String },

    /// A required definition field is blank.
    #[error("editor definition is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A required collaborator was not supplied.
    #[error("{editor} requires a {collaborator}")]
    MissingCollaborator {
        editor: &'static str,
        collaborator: &'static str,
    },

    /// Two editors registered under the same alias.
    #[error("duplicate editor alias: {0}")]
    DuplicateAlias(String),

    /// Unrecognized value type name.
    #[error("unknown value type: {0}")]
    UnknownValueType(String),

    /// Descriptor JSON could not be deserialized.
    #[error("invalid editor manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl EditorError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedStorageKind { .. }
            | Self::WrongConfigurationType { .. }
            | Self::MissingConfiguration { .. }
            | Self::InvalidConfiguration { .. } => ErrorKind::Wiring,
            Self::MissingField { .. }
            | Self::MissingCollaborator { .. }
            | Self::DuplicateAlias(_) => ErrorKind::Construction,
            Self::InvalidValue { .. } | Self::UnknownValueType(_) => ErrorKind::Conversion,
            Self::Manifest(_) => ErrorKind::Manifest,
        }
    }
}
