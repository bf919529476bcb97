//! Notifier error types.

/// Errors from delivering a chat message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The messaging API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid or missing channel access token
    #[error("unauthorized (invalid channel access token)")]
    Unauthorized,

    /// Rate limited by the messaging API
    #[error("rate limited by messaging API")]
    RateLimited,

    /// The client could not be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NotifyError::Api {
            status: 400,
            message: "The request body has 1 error(s)".into(),
        };
        assert_eq!(err.to_string(), "API error 400: The request body has 1 error(s)");

        assert_eq!(
            NotifyError::Unauthorized.to_string(),
            "unauthorized (invalid channel access token)"
        );
    }
}
