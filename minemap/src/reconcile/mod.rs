//! Reconciliation of layer descriptors into mounted overlays.
//!
//! Per layer id the state machine is `Unmounted -> Fetching -> Mounted`
//! and `Mounted -> Unmounted`. There is no persistent failed state: a
//! layer whose fetch or mount failed stays unmounted and is tried again by
//! the next pass that still lists it as visible.
//!
//! After a pass completes, the mounted ids are exactly the visible ids
//! whose fetch in that pass (or an earlier one) succeeded.

mod callbacks;
mod config;
mod error;
mod reconciler;
mod report;

pub use callbacks::{ErrorHandler, LayerCallbacks, LoadHandler};
pub use config::{
    ReconcilerConfig, DEFAULT_FETCH_RETRIES, DEFAULT_FETCH_TIMEOUT, DEFAULT_RETRY_BASE_DELAY,
    MAX_RETRY_DELAY,
};
pub use error::LayerError;
pub use reconciler::Reconciler;
pub use report::PassReport;
