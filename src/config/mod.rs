//! Settings layer: paths + TOML loading.
pub mod path;
pub mod io;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use path::{settings_path, default_log_dir, expand_path};
pub use io::{load_settings, load_settings_from, SettingsSource};

/// Everything the synchronizer needs that used to be hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// SSH client config to keep in sync (tilde allowed)
    pub ssh_config_path: String,
    pub ssh_binary: String,
    pub aws_binary: String,
    pub aws_profile: Option<String>,
    pub aws_region: Option<String>,
    /// Upper bound for every cloud CLI call
    pub command_timeout_secs: u64,
    /// Plaintext IP echo service
    pub ip_endpoint: String,
    pub ip_timeout_secs: u64,
    /// Security group rule ids scoped to the operator's IP
    pub security_group_rules: Vec<String>,
    pub rule_description: String,
    pub log_dir: Option<String>,
    pub tunnel: TunnelSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TunnelSettings {
    pub local_port: u16,
    pub remote_port: u16,
    pub remote_host: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ssh_config_path: "~/.ssh/config".to_string(),
            ssh_binary: "ssh".to_string(),
            aws_binary: "aws".to_string(),
            aws_profile: None,
            aws_region: None,
            command_timeout_secs: 30,
            ip_endpoint: "http://checkip.amazonaws.com".to_string(),
            ip_timeout_secs: 10,
            security_group_rules: Vec::new(),
            rule_description: "sshsync".to_string(),
            log_dir: None,
            tunnel: TunnelSettings::default(),
        }
    }
}

impl Default for TunnelSettings {
    fn default() -> Self {
        TunnelSettings {
            local_port: 24180,
            remote_port: 80,
            remote_host: "localhost".to_string(),
        }
    }
}

impl Settings {
    /// Resolved location of the SSH client config.
    pub fn ssh_config_file(&self) -> PathBuf {
        expand_path(&self.ssh_config_path)
    }

    pub fn log_directory(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => expand_path(dir),
            None => default_log_dir(),
        }
    }

    pub fn default_config_content() -> &'static str {
        r#"# sshsync configuration

# SSH client config whose HostName lines get rewritten
ssh_config_path = "~/.ssh/config"
ssh_binary = "ssh"

# AWS CLI invocation
aws_binary = "aws"
# aws_profile = "default"
# aws_region = "eu-west-1"
command_timeout_secs = 30

# Public IP lookup
ip_endpoint = "http://checkip.amazonaws.com"
ip_timeout_secs = 10

# Security group rules kept scoped to <your ip>/32
security_group_rules = []
rule_description = "sshsync"

# log_dir = "~/.local/state/sshsync"

[tunnel]
local_port = 24180
remote_port = 80
remote_host = "localhost"
"#
    }
}
