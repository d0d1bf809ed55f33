//! Error types for amroute Core

use thiserror::Error;

/// Coarse classification of [`Error`] used by transport layers to pick a
/// status code and by callers to decide whether a retry makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AlreadyExists,
    /// Resource is still referenced elsewhere in the configuration
    InUse,
    /// Optimistic-concurrency token no longer current
    StaleWrite,
    StoreUnavailable,
    Internal,
}

impl ErrorKind {
    /// Whether re-running the whole read-mutate-write cycle may succeed
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::StaleWrite | ErrorKind::StoreUnavailable)
    }

    /// Both in-use and stale-write failures are conflicts from the caller's view
    pub fn is_conflict(self) -> bool {
        matches!(self, ErrorKind::InUse | ErrorKind::StaleWrite)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("In use: {0}")]
    InUse(String),

    #[error("Stale write: expected version {}, found {}", fmt_version(.expected), fmt_version(.actual))]
    StaleWrite {
        expected: Option<u64>,
        actual: Option<u64>,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The configuration was committed but the provenance update that
    /// follows it failed. The stored snapshot is not rolled back.
    #[error("Configuration saved but provenance was not recorded: {0}")]
    ProvenanceNotRecorded(Box<Error>),

    // Organization errors
    #[error("Invalid organization: {0}")]
    InvalidOrg(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_version(version: &Option<u64>) -> String {
    version.map_or_else(|| "<none>".to_string(), |v| v.to_string())
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) | Error::InvalidOrg(_) => ErrorKind::InvalidInput,
            Error::NotFound(_) | Error::ConfigNotFound => ErrorKind::NotFound,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::InUse(_) => ErrorKind::InUse,
            Error::StaleWrite { .. } => ErrorKind::StaleWrite,
            Error::StoreUnavailable(_) | Error::Io(_) => ErrorKind::StoreUnavailable,
            Error::ProvenanceNotRecorded(inner) => inner.kind(),
            // A snapshot that does not decode stays broken on retry
            Error::Serialization(_) | Error::Config(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
