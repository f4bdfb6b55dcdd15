//! Settings error types

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings document is not valid JSON for the expected schema.
    #[error("Invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value that cannot be used.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// Description of the problem.
        message: String,
    },
}

impl SettingsError {
    /// Creates a new invalid-value error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
