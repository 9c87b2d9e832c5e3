//! Public runtime API surface.
//!
//! Gathers the types exposed to hosts of the tracker so the rest of the crate
//! can stay focused on services, workers and storage.

pub mod errors;
pub mod handle;
pub mod requests;

pub use errors::{Result, RuntimeError};
pub use handle::TrackerHandle;
pub use requests::{PrivilegedRequest, RequestRelay};
