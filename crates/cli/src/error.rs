//! Errors reported by the command line host.

use std::path::PathBuf;

use propedit_core::EditorError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no property editor with alias '{0}'")]
    UnknownEditor(String),

    #[error("failed to read manifest {path}: {source}")]
    ReadManifest {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    InvalidManifest {
        path: PathBuf,
        source: EditorError,
    },

    #[error("--{option} must be a JSON object")]
    NotAnObject { option: &'static str },

    #[error(transparent)]
    Editor(#[from] EditorError),
}
