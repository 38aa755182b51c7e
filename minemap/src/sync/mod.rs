//! REST polling feeding the reconciler.

mod config;
mod daemon;

pub use config::{SyncConfig, DEFAULT_POLL_INTERVAL_SECS};
pub use daemon::{SyncDaemon, SyncEvent};
