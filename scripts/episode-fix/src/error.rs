use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A catalog line that cannot become a canonical episode.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("line {line_no}: missing or non-numeric episode index in {line:?}")]
    MalformedIndex { line_no: usize, line: String },

    #[error("line {line_no}: missing episode title in {line:?}")]
    MissingTitle { line_no: usize, line: String },
}

impl CatalogError {
    pub fn line_no(&self) -> usize {
        match self {
            CatalogError::MalformedIndex { line_no, .. } | CatalogError::MissingTitle { line_no, .. } => {
                *line_no
            }
        }
    }
}

/// Why a single planned rename did not happen. Never aborts the batch.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("destination already exists: {destination:?}")]
    Collision { destination: PathBuf },

    #[error("destination {destination:?} is already taken by {claimed_by:?} in this batch")]
    BatchCollision { destination: PathBuf, claimed_by: PathBuf },

    #[error("source no longer exists: {source_path:?}")]
    SourceMissing { source_path: PathBuf },

    #[error("permission denied renaming {source_path:?}")]
    PermissionDenied {
        source_path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("rename {source_path:?} -> {destination:?} failed")]
    Filesystem {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        cause: io::Error,
    },
}

impl RenameError {
    /// One-line description including the underlying I/O cause, if any.
    pub fn describe(&self) -> String {
        match self {
            RenameError::PermissionDenied { cause, .. } | RenameError::Filesystem { cause, .. } => {
                format!("{self}: {cause}")
            }
            _ => self.to_string(),
        }
    }
}
