//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::report::FormattedReport;

/// A LINE webhook delivery.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    /// Bot user ID that received the events
    #[serde(default)]
    pub destination: Option<String>,

    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event. Only text messages from users are acted on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event type, e.g. "message" or "follow"
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub source: Option<EventSource>,

    #[serde(default)]
    pub message: Option<EventMessage>,

    #[serde(default)]
    pub reply_token: Option<String>,
}

/// Who sent an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// "user", "group" or "room"
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub user_id: Option<String>,
}

/// Message payload of a message event.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    /// "text", "sticker", "image", ...
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEvent {
    /// The sender's user ID, if this is a text message containing any of
    /// `trigger_words`.
    pub fn triggered_by(&self, trigger_words: &[String]) -> Option<&str> {
        if self.kind != "message" {
            return None;
        }
        let message = self.message.as_ref().filter(|m| m.kind == "text")?;
        let text = message.text.as_deref()?;
        if !trigger_words.iter().any(|w| text.contains(w.as_str())) {
            return None;
        }
        self.source.as_ref()?.user_id.as_deref()
    }
}

/// Response for the on-demand report.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// One entry per target station, in target order
    pub reports: Vec<FormattedReport>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
