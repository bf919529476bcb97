//! LINE Messaging API push client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use super::Notifier;
use super::error::NotifyError;

/// Default base URL for the LINE Messaging API.
const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// Push endpoint, relative to the base URL.
const PUSH_PATH: &str = "/v2/bot/message/push";

/// LINE rejects text messages longer than this many characters.
const MAX_TEXT_CHARS: usize = 5000;

/// Configuration for the LINE notifier.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Channel access token
    pub access_token: String,
    /// Base URL for the API (defaults to production LINE)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NotifierConfig {
    /// Create a new config with the given channel access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> PushRequest<'a> {
    fn text(to: &'a str, text: &'a str) -> Self {
        Self {
            to,
            messages: [TextMessage { kind: "text", text }],
        }
    }
}

/// Pushes text messages to LINE users.
#[derive(Debug, Clone)]
pub struct LineNotifier {
    http: reqwest::Client,
    push_url: String,
}

impl LineNotifier {
    /// Create a new notifier with the given configuration.
    pub fn new(config: NotifierConfig) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| NotifyError::NotConfigured("invalid access token format".into()))?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            push_url: format!("{}{PUSH_PATH}", config.base_url.trim_end_matches('/')),
        })
    }
}

impl Notifier for LineNotifier {
    async fn deliver(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let text = truncate_chars(text, MAX_TEXT_CHARS);
        let response = self
            .http
            .post(&self.push_url)
            .json(&PushRequest::text(destination, text))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(NotifyError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NotifyError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(destination, chars = text.chars().count(), "message pushed");
        Ok(())
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
