// crates/aiva-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

pub type ProjectResult<T> = Result<T, ProjectError>;

/// Failures at the project-file boundary. Editing operations never fail.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed project file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl ProjectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
