pub mod client;
pub mod config_file;

pub use client::{run_tunnel, TunnelSpec};
pub use config_file::SshConfigFile;
