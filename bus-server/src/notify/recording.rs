//! In-memory notifier.

use std::sync::{Arc, Mutex};

use super::Notifier;
use super::error::NotifyError;

/// Notifier that records every delivery instead of sending it.
///
/// Clones share the same log. Can be told to reject texts containing a
/// given fragment; rejected texts are not recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    reject: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every text containing `fragment`.
    pub fn rejecting(fragment: impl Into<String>) -> Self {
        Self {
            reject: Some(fragment.into()),
            ..Self::default()
        }
    }

    /// Recorded `(destination, text)` pairs, in delivery order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Recorded texts, in delivery order.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

impl Notifier for RecordingNotifier {
    async fn deliver(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        if self.reject.as_deref().is_some_and(|f| text.contains(f)) {
            return Err(NotifyError::Api {
                status: 400,
                message: "delivery rejected".into(),
            });
        }

        self.sent
            .lock()
            .map_err(|_| NotifyError::NotConfigured("recording log poisoned".into()))?
            .push((destination.to_string(), text.to_string()));
        Ok(())
    }
}
