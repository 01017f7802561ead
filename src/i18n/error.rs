//! Error types for the localization core.
//!
//! Only load-time and storage failures are represented here. Lookup misses,
//! degraded resolutions and invalid language requests never become errors;
//! they degrade to values and log lines instead.

use thiserror::Error;

/// Errors raised while building languages and translation stores.
#[derive(Error, Debug)]
pub enum I18nError {
    /// The language code is not in the registry
    #[error("Unknown language code: '{0}'")]
    UnknownLanguage(String),

    /// The language exists but is switched off in the registry
    #[error("Language '{0}' is not enabled")]
    LanguageDisabled(String),

    /// Translation source data does not have a mapping at its root
    #[error("Malformed translation source for '{language}': {reason}")]
    MalformedSource {
        /// Language the source was meant for
        language: String,
        /// What was wrong with it
        reason: String,
    },

    /// Translation source is not valid JSON
    #[error("Failed to parse translations for '{language}': {source}")]
    Parse {
        /// Language the source was meant for
        language: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// Translation file could not be read
    #[error("Failed to read translation file {path}: {source}")]
    Io {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by preference storage backends.
///
/// The controller catches every one of these and logs it as a warning.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend refused the operation (e.g. storage disabled)
    #[error("Preference storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed
    #[error("Preference storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing document exists but cannot be decoded
    #[error("Preference storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
