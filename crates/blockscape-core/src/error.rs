/// Error taxonomy for scanning, classification, and configuration.
///
/// Fatal errors surface to the caller of [`crate::scanner::Scanner::scan`].
/// Recoverable ones (`ChildReadFailure`, [`ClassifyError`]) are absorbed
/// inside the core and only ever show up as a smaller-than-expected tree or
/// a generically classified file.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`crate::model::FileNode`] tree.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist or could not be stat'ed.
    #[error("invalid scan root {path}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The traversal visited more nodes than `node_count_limit` allows.
    #[error("scan budget of {limit} nodes exceeded")]
    BudgetExceeded { limit: usize },

    /// A single entry could not be read. Recovered by the parent directory,
    /// which omits the entry from its children.
    #[error("failed to read {path}: {source}")]
    ChildReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan was cancelled through its [`crate::scanner::ScanHandle`].
    #[error("scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Fatal errors abort the whole scan; everything else is skipped by the
    /// parent directory.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoot { .. } | Self::BudgetExceeded { .. } | Self::Cancelled
        )
    }
}

/// Content sniffing failed. Never propagates out of the classifier.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification unavailable for {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A configuration value is outside its documented range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_and_cancel_are_fatal() {
        assert!(ScanError::BudgetExceeded { limit: 3 }.is_fatal());
        assert!(ScanError::Cancelled.is_fatal());
    }

    #[test]
    fn child_read_failure_is_recoverable() {
        let err = ScanError::ChildReadFailure {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("/tmp/x"));
    }
}
