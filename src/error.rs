use thiserror::Error;

/// Failure of a storage backend.
///
/// Only backends produce these; [`crate::storage::PreferenceStore`] logs and
/// swallows them so the engine never observes a storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded while writing '{0}'")]
    QuotaExceeded(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failure to interpret a locale value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unsupported locale code: '{0}'")]
    Unsupported(String),
}

/// Unknown visitor command name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command '{0}' (expected switch, stay, dismiss, accept, decline or cookie-settings)")]
pub struct CommandParseError(pub String);
