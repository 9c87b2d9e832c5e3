//! Single-writer authority gate.
//!
//! Exactly one participant (the session authority) applies ledger and sustain
//! mutations and evaluates economy alerts. Every signal passes through
//! [`AuthorityGate::admit`] once, at the ingest boundary.
use std::sync::Arc;

use tracker_core::{ActionSignal, UserId};

use crate::api::{PrivilegedRequest, Result, RuntimeError};

/// Who the local participant is.
pub trait SessionOracle: Send + Sync {
    fn local_user(&self) -> UserId;

    /// Whether the local participant is the active session authority.
    fn is_authority(&self) -> bool;
}

/// Fixed identity for the lifetime of the tracker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticSession {
    user: UserId,
    authority: bool,
}

impl StaticSession {
    pub fn authority(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            authority: true,
        }
    }

    pub fn participant(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            authority: false,
        }
    }
}

impl SessionOracle for StaticSession {
    fn local_user(&self) -> UserId {
        self.user.clone()
    }

    fn is_authority(&self) -> bool {
        self.authority
    }
}

/// What the local participant does with an incoming signal.
#[derive(Clone, Debug, PartialEq)]
pub enum Admission {
    /// Mutate local state.
    Apply,
    /// Hand to the authority; this participant originated the choice.
    Forward(PrivilegedRequest),
    /// Another participant (the authority) observes the same host event.
    Skip,
}

#[derive(Clone)]
pub struct AuthorityGate {
    session: Arc<dyn SessionOracle>,
}

impl AuthorityGate {
    pub fn new(session: Arc<dyn SessionOracle>) -> Self {
        Self { session }
    }

    pub fn is_authority(&self) -> bool {
        self.session.is_authority()
    }

    pub fn local_user(&self) -> UserId {
        self.session.local_user()
    }

    pub fn admit(&self, signal: &ActionSignal) -> Admission {
        if self.is_authority() {
            return Admission::Apply;
        }
        match PrivilegedRequest::from_signal(signal) {
            Some(request) => Admission::Forward(request),
            None => Admission::Skip,
        }
    }

    /// Fails unless the local participant may mutate.
    pub fn ensure(&self) -> Result<()> {
        if self.is_authority() {
            Ok(())
        } else {
            Err(RuntimeError::NotAuthority)
        }
    }
}
