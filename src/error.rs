//! Error types for the resource builders

use thiserror::Error;

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for builder operations
#[derive(Debug, Error)]
pub enum Error {
    /// A construction or configuration step failed earlier; replayed on every
    /// later call made through the same builder
    #[error("{0}")]
    BuilderError(String),

    /// A list or cleanup helper received an unusable argument
    #[error("{0}")]
    InvalidArgument(String),

    /// Kubernetes API error, passed through untranslated
    #[error(transparent)]
    KubeError(#[from] kube::Error),

    /// CRD manifest rendering error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),
}

impl Error {
    /// True when the API server answered with 404 Not Found
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::KubeError(err) => crate::client::is_not_found(err),
            _ => false,
        }
    }
}
