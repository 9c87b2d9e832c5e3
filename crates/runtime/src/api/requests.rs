//! Privileged requests forwarded from non-authoritative participants.
//!
//! Only the session authority mutates ledgers. A participant without that
//! role hands its own choices to the authority through a [`RequestRelay`]
//! and the authority replays them with [`TrackerHandle::handle_request`].
//!
//! [`TrackerHandle::handle_request`]: crate::TrackerHandle::handle_request
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracker_core::{ActionSignal, ActorId, ItemId, SourceId, SustainDecision, UserId};

use super::errors::{Result, RuntimeError};

/// A mutation a participant asked the authority to perform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrivilegedRequest {
    SustainChoice {
        actor: ActorId,
        item_id: ItemId,
        item_name: String,
        choice: SustainDecision,
    },
    Reroll {
        actor: ActorId,
        source_id: SourceId,
    },
    Intent {
        actor: ActorId,
        item_id: ItemId,
    },
}

impl PrivilegedRequest {
    /// Signals a participant originates locally rather than observing from the host.
    pub(crate) fn from_signal(signal: &ActionSignal) -> Option<Self> {
        match signal {
            ActionSignal::SustainChoice {
                actor,
                item_id,
                item_name,
                choice,
            } => Some(PrivilegedRequest::SustainChoice {
                actor: actor.clone(),
                item_id: item_id.clone(),
                item_name: item_name.clone(),
                choice: *choice,
            }),
            ActionSignal::RerollRequested { actor, source_id } => Some(PrivilegedRequest::Reroll {
                actor: actor.clone(),
                source_id: source_id.clone(),
            }),
            ActionSignal::IntentDeclared { actor, item_id } => Some(PrivilegedRequest::Intent {
                actor: actor.clone(),
                item_id: item_id.clone(),
            }),
            _ => None,
        }
    }

    pub fn into_signal(self) -> ActionSignal {
        match self {
            PrivilegedRequest::SustainChoice {
                actor,
                item_id,
                item_name,
                choice,
            } => ActionSignal::SustainChoice {
                actor,
                item_id,
                item_name,
                choice,
            },
            PrivilegedRequest::Reroll { actor, source_id } => {
                ActionSignal::RerollRequested { actor, source_id }
            }
            PrivilegedRequest::Intent { actor, item_id } => {
                ActionSignal::IntentDeclared { actor, item_id }
            }
        }
    }
}

/// Transport that carries a request to the session authority.
#[async_trait]
pub trait RequestRelay: Send + Sync {
    async fn forward(&self, from: &UserId, request: PrivilegedRequest) -> Result<()>;
}

/// A request as it arrives on the authority's side of a [`ChannelRelay`].
#[derive(Clone, Debug, PartialEq)]
pub struct RelayedRequest {
    pub from: UserId,
    pub request: PrivilegedRequest,
}

/// In-process relay backed by a bounded channel.
#[derive(Clone)]
pub struct ChannelRelay {
    tx: mpsc::Sender<RelayedRequest>,
}

impl ChannelRelay {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<RelayedRequest>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl RequestRelay for ChannelRelay {
    async fn forward(&self, from: &UserId, request: PrivilegedRequest) -> Result<()> {
        self.tx
            .send(RelayedRequest {
                from: from.clone(),
                request,
            })
            .await
            .map_err(|err| RuntimeError::Relay(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_participant_choices_become_requests() {
        let choice = ActionSignal::SustainChoice {
            actor: ActorId::from("a1"),
            item_id: ItemId::from("bless"),
            item_name: "Bless".into(),
            choice: SustainDecision::Lapse,
        };
        let request = PrivilegedRequest::from_signal(&choice).unwrap();
        assert_eq!(request.clone().into_signal(), choice);

        assert!(PrivilegedRequest::from_signal(&ActionSignal::EncounterEnded).is_none());
    }

    #[tokio::test]
    async fn channel_relay_delivers_in_order() {
        let (relay, mut rx) = ChannelRelay::new(4);
        let from = UserId::from("player");
        for id in ["m1", "m2"] {
            relay
                .forward(
                    &from,
                    PrivilegedRequest::Reroll {
                        actor: ActorId::from("a1"),
                        source_id: SourceId::from(id),
                    },
                )
                .await
                .unwrap();
        }
        let first = rx.recv().await.unwrap();
        assert_eq!(first.from, from);
        assert!(matches!(
            first.request,
            PrivilegedRequest::Reroll { ref source_id, .. } if source_id.as_str() == "m1"
        ));
        assert!(rx.recv().await.is_some());
    }
}
