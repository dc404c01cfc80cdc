//! Errors raised while compiling tables and controlled vocabularies.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Compiler result type
pub type Result<T> = std::result::Result<T, CompileError>;

/// Every failure is fatal for the run that raised it.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unknown column field `{0}`")]
    UnknownField(String),

    #[error("table `{0}` not found in the data request")]
    UnknownTable(String),

    #[error("no frequency token in table name `{0}`")]
    FrequencyInference(String),

    #[error("{} is not a directory", .0.display())]
    MissingDirectory(PathBuf),

    #[error("malformed {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("i/o on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CompileError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CompileError::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Fail with `MissingDirectory` unless `path` is an existing directory.
pub fn ensure_directory(path: &std::path::Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CompileError::MissingDirectory(path.to_path_buf()))
    }
}
