use thiserror::Error;

/// Substring Google puts in the 403 message when the developer key is rejected.
const INVALID_KEY_MARKER: &str = "invalid API key";

/// Error raised by an authenticated search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider answered with a structured error body.
    #[error("HTTP {code}: {message}")]
    Api { code: u16, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SearchError {
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api { code, message: message.into() }
    }

    /// True when the provider rejected the configured API key.
    pub fn is_invalid_api_key(&self) -> bool {
        matches!(self, Self::Api { code: 403, message } if message.contains(INVALID_KEY_MARKER))
    }
}
