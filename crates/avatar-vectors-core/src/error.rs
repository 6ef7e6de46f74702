//! Error taxonomy for the vector pipeline.
//!
//! Two tiers: [`AlgorithmError`] is a per-case failure that gets recorded as
//! data, [`HarnessError`] aborts the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by an avatar algorithm for a single case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    /// The algorithm itself rejected the input or faulted while rendering.
    #[error("{0}")]
    Rejected(String),

    /// The algorithm could not be reached or answered with garbage.
    #[error("invocation failed: {0}")]
    Invocation(String),

    /// An in-process algorithm panicked.
    #[error("algorithm panicked: {0}")]
    Panicked(String),
}

impl AlgorithmError {
    /// Message recorded in the vector file's `error` field.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Fatal pipeline errors. Any of these stops the run before a file is written.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("catalogue is empty")]
    EmptyCatalogue,

    #[error("reference algorithm unavailable: {0}")]
    AlgorithmUnavailable(String),

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed vector file: {0}")]
    MalformedVectorFile(String),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_verbatim() {
        let err = AlgorithmError::Rejected("Invalid theme".to_string());
        assert_eq!(err.message(), "Invalid theme");
    }

    #[test]
    fn test_invocation_message_is_prefixed() {
        let err = AlgorithmError::Invocation("timed out after 5s".to_string());
        assert_eq!(err.message(), "invocation failed: timed out after 5s");
    }

    #[test]
    fn test_io_error_display_names_path() {
        let err = HarnessError::io(
            "/nope/test-vectors.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nope/test-vectors.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_malformed_vector_file_display() {
        let err = HarnessError::MalformedVectorFile("entry 3 has id 4".to_string());
        assert!(err.to_string().contains("malformed vector file"));
    }
}
