//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracker_core::Alert;

use super::types::{LedgerEvent, SustainReminder};

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Economy and undo-correction alerts
    Alert,
    /// Start-of-turn sustain reminders
    Reminder,
    /// Ledger and registry changes
    Ledger,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Alert(Alert),
    Reminder(SustainReminder),
    Ledger(LedgerEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Alert(_) => Topic::Alert,
            Event::Reminder(_) => Topic::Reminder,
            Event::Ledger(_) => Topic::Ledger,
        }
    }
}

/// Topic-based event bus
///
/// Every topic's channel exists from construction on, so publishing and
/// subscribing never need a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// Creates a bus with `capacity` buffered events per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        use strum::IntoEnumIterator;

        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its topic. Best-effort: without subscribers the
    /// event is dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Unreachable while every topic is registered in `with_capacity`.
            None => broadcast::channel(1).1,
        }
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
