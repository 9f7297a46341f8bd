use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("SSH config file not found at {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("SSH host '{0}' not found in SSH config")]
    HostNotFound(String),

    #[error("Could not find HostName entry for host '{0}'")]
    HostNameMissing(String),

    #[error("Failed to create backup of {}: {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{program} timed out after {secs}s")]
    CommandTimeout { program: String, secs: u64 },

    #[error("Public IP lookup failed: {0}")]
    PublicIp(String),

    #[error("No security group found for rule {0}")]
    RuleGroupMissing(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
