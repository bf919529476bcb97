//! Outbound chat messages.
//!
//! A [`Notifier`] delivers plain text to one chat destination. The live
//! implementation pushes through the LINE Messaging API; tests record
//! deliveries in memory instead.

mod client;
mod error;
mod recording;

use std::future::Future;

pub use client::{LineNotifier, NotifierConfig};
pub use error::NotifyError;
pub use recording::RecordingNotifier;

/// Sink for text messages addressed to a chat user.
pub trait Notifier: Send + Sync {
    /// Deliver `text` to `destination`.
    fn deliver(
        &self,
        destination: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
