//! Library root for sshsync
pub mod error;
pub mod logging;
pub mod models;
pub mod util;

pub mod config;
pub mod ssh;
pub mod cloud;
pub mod sync;
pub mod commands;

// Convenience re-exports
pub use config::Settings;
pub use error::{Result, SyncError};
pub use sync::Synchronizer;
