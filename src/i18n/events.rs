//! Language change notifications.
//!
//! The controller publishes on every successful language change; independent
//! parts of the UI subscribe and re-render without sharing mutable state.

use crate::i18n::language::Language;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Name of the change notification.
pub const LANGUAGE_CHANGE_EVENT: &str = "languageChange";

/// Buffered events per subscriber before the slowest one starts lagging
const CHANNEL_CAPACITY: usize = 16;

/// Payload published when the active language changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageChangeEvent {
    /// Language now active
    pub language: Language,
    /// Language active before the change
    pub previous: Language,
}

impl LanguageChangeEvent {
    /// Event name, always [`LANGUAGE_CHANGE_EVENT`].
    pub fn name(&self) -> &'static str {
        LANGUAGE_CHANGE_EVENT
    }
}

/// Publish/subscribe channel owned by a controller.
#[derive(Debug)]
pub struct LanguageEvents {
    sender: broadcast::Sender<LanguageChangeEvent>,
}

impl LanguageEvents {
    /// Channel with no subscribers yet.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Register a listener. Dropping the subscription unregisters it.
    pub fn subscribe(&self) -> LanguageSubscription {
        LanguageSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Deliver an event to every current listener.
    ///
    /// # Returns
    /// The number of listeners that received it (zero when nobody listens).
    pub fn publish(&self, event: LanguageChangeEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                debug!("No listeners for {} to {}", LANGUAGE_CHANGE_EVENT, event.language);
                0
            }
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LanguageEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered listener.
#[derive(Debug)]
pub struct LanguageSubscription {
    receiver: broadcast::Receiver<LanguageChangeEvent>,
}

impl LanguageSubscription {
    /// Wait for the next change.
    ///
    /// Returns `None` once the controller is gone. A listener that fell
    /// behind skips straight to the oldest retained event.
    pub async fn recv(&mut self) -> Option<LanguageChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Language listener lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next pending change without waiting.
    pub fn try_recv(&mut self) -> Option<LanguageChangeEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Unregister explicitly.
    pub fn unsubscribe(self) {
        drop(self.receiver);
    }
}
