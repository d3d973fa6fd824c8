//! Error types for the calarm engine.

use thiserror::Error;

/// Errors that can occur in calarm operations.
///
/// Malformed external input (event payloads, store failures) is always
/// reported through these variants; only internal contract violations
/// (e.g. handing the time normalizer an unknown timezone identifier)
/// are allowed to panic.
#[derive(Error, Debug)]
pub enum CalarmError {
    #[error("Event payload has no primary instance: {0}")]
    EventParse(String),

    #[error("Recurrence rule error for event '{uid}': {message}")]
    Rule { uid: String, message: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Platform timer registration failed: {0}")]
    PlatformRegistration(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for calarm operations.
pub type CalarmResult<T> = Result<T, CalarmError>;
