//! Error types for agent-settings

use thiserror::Error;

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
///
/// Property writes only ever fail with [`ErrorKind::Type`] (unsupported value
/// type or deletion) or [`ErrorKind::Value`] (value outside its permitted
/// range). The other kinds cover addressing and construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unsupported value type, or an attempt to delete a property
    Type,
    /// Correctly typed value rejected by a range check or validator
    Value,
    /// Unknown property path, or a write to a read-only property
    Attribute,
    /// Invalid configuration or lifecycle misuse
    Config,
}

/// Main error type for agent-settings
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Type Errors
    // -------------------------------------------------------------------------
    #[error("expected {expected} for {key}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("can't delete {key} attribute")]
    CannotDelete { key: String },

    // -------------------------------------------------------------------------
    // Value Errors
    // -------------------------------------------------------------------------
    #[error("{key} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid setting value for {key}: {reason}")]
    InvalidSettingValue { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Attribute Errors
    // -------------------------------------------------------------------------
    #[error("Setting not found: {0}")]
    SettingNotFound(String),

    #[error("attribute '{0}' is not writable")]
    ReadOnly(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings singleton already initialized")]
    AlreadyInitialized,
}

impl Error {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TypeMismatch { .. } | Error::CannotDelete { .. } => ErrorKind::Type,
            Error::OutOfRange { .. } | Error::InvalidSettingValue { .. } => ErrorKind::Value,
            Error::SettingNotFound(_) | Error::ReadOnly(_) => ErrorKind::Attribute,
            Error::Config(_) | Error::AlreadyInitialized => ErrorKind::Config,
        }
    }

    /// Check if this is a type error (bad value type or deletion)
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    /// Check if this is a value error (range or validator rejection)
    #[must_use]
    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }

    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SettingNotFound(_))
    }
}
