//! Error types surfaced by the runtime API.
//!
//! Rule-level misses (unknown combatant, absent source id, reroll underrun)
//! are logged no-ops and never reach this type. Only infrastructure failures
//! do: storage, worker channels and the privileged-request relay.
use thiserror::Error;
use tokio::sync::oneshot;
use tracker_core::CombatantId;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("worker for combatant {0} is no longer accepting commands")]
    CommandChannelClosed(CombatantId),

    #[error("combatant worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("combatant worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("tracker state lock was poisoned: {0}")]
    StatePoisoned(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("local participant is not the session authority")]
    NotAuthority,

    #[error("no request relay configured for a non-authoritative participant")]
    RelayUnavailable,

    #[error("privileged request relay failed: {0}")]
    Relay(String),

    #[error("tracker requires oracles to be configured before building")]
    MissingOracles,
}
