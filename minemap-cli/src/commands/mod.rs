//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`style`] - Offline style resolution
//! - [`sync`] - One catalog refresh and reconciliation pass
//! - [`watch`] - Poll the catalog until interrupted

pub mod common;
pub mod config;
pub mod style;
pub mod sync;
pub mod watch;
