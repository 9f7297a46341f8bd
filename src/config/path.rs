use std::path::PathBuf;

const APP_DIR: &str = "sshsync";

/// `SSHSYNC_CONFIG` wins, otherwise `<config_dir>/sshsync/config.toml`.
pub fn settings_path() -> PathBuf {
    if let Ok(p) = std::env::var("SSHSYNC_CONFIG") {
        if !p.trim().is_empty() {
            return expand_path(&p);
        }
    }
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join(APP_DIR).join("config.toml")
}

pub fn default_log_dir() -> PathBuf {
    if let Some(state) = dirs::state_dir() {
        return state.join(APP_DIR);
    }
    dirs::home_dir()
        .map(|h| h.join(".local").join("state").join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}
