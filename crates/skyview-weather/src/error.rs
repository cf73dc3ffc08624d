//! Weather-specific error types.

use thiserror::Error;

/// Weather provider errors
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("City not found: {0}")]
    NotFound(String),

    /// Non-success HTTP status, or a body whose `code` is not "200"
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// Build an `Api` error from a provider status code, using the
    /// provider's documented meaning as the message.
    pub fn from_api_code(code: &str) -> Self {
        let message = match code {
            "204" => "no data for the requested location",
            "400" => "request rejected as invalid",
            "401" => "authentication failed, check the API key",
            "402" => "request quota exceeded",
            "403" => "access denied for this key",
            "404" => "requested data or location does not exist",
            "429" => "too many requests",
            "500" => "provider timeout or internal error",
            _ => "unexpected status",
        };
        Self::Api {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }

    /// Whether this error is worth retrying on the next poll.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { code, .. } => {
                matches!(code.as_str(), "429" | "500" | "502" | "503" | "504")
            }
            Self::NotFound(_) | Self::Malformed(_) => false,
        }
    }
}

/// IP geolocation errors
#[derive(Error, Debug)]
pub enum LocationError {
    #[error("All {providers} IP geolocation providers failed")]
    AllProvidersFailed { providers: usize },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
