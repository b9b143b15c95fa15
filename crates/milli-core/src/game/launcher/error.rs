/// Errors raised while resolving, preparing or starting a launch
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Bad minecraft root or java location; raised when the core is built
    #[error("Invalid launcher environment: {reason}")]
    InvalidEnvironment { reason: String },

    #[error("Directory not found: {path:?}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Version {version_id} does not exist")]
    UnknownVersion { version_id: String },

    #[error("Native archive not found: {path:?}")]
    ArchiveNotFound { path: PathBuf },

    #[error("Native archive {path:?} could not be read: {reason}")]
    ArchiveCorrupt { path: PathBuf, reason: String },

    #[error("Failed to write natives at {path:?}: {source}")]
    ExtractionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Placeholder in the argument template that has no value
    #[error("Argument template references unknown field ${{{field}}}")]
    TemplateFieldMissing { field: String },

    #[error("Invalid version descriptor {path:?}: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("Failed to start {program:?}: {source}")]
    ProcessSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub(crate) fn extraction_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LaunchError::ExtractionIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LaunchError::ArchiveCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
