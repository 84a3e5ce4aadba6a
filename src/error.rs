use thiserror::Error;

/// Errors that can occur while building, validating, or submitting an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JoFotaraError {
    /// A field, section, or cross-section validation rule failed.
    ///
    /// These are always recoverable: fix the input and repeat the call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request to the JoFotara API could not be completed.
    #[error("failed to send invoice: {0}")]
    Network(String),

    /// The JoFotara API answered with a status code the client does not handle.
    #[error("API request failed with status code {0}")]
    UnexpectedStatus(u16),
}

impl JoFotaraError {
    /// Shorthand for a [`JoFotaraError::Validation`] with a formatted message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
