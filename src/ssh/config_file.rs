//! Line scanner for `~/.ssh/config`: lists `Host` aliases and rewrites the
//! `HostName` of one block in place. Anything else in the file is opaque.

use std::ffi::OsString;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SyncError};

const HOST_PREFIX: &str = "Host ";
const HOST_NAME_PREFIX: &str = "HostName ";

/// Alias declared by a `Host` line, if the line is one.
fn host_decl(line: &str) -> Option<&str> {
    line.trim().strip_prefix(HOST_PREFIX).map(str::trim)
}

/// `Host *`, with or without negated exclusions (`Host * !bastion`).
fn is_catch_all(decl: &str) -> bool {
    decl.split_whitespace().next() == Some("*")
}

/// Aliases of every `Host` line except catch-all ones, in file order.
pub fn parse_host_aliases(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(host_decl)
        .filter(|alias| !alias.is_empty() && !is_catch_all(alias))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
    Replaced,
}

/// Rewrite the first `HostName` inside `alias`'s block to `addr`.
///
/// Every other byte of `text` (line endings, indentation, comments, other
/// blocks) comes back unchanged.
pub fn replace_host_name(text: &str, alias: &str, addr: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len() + addr.len());
    let mut state = ScanState::Outside;
    let mut seen_alias = false;
    let mut replaced = false;

    for line in text.split_inclusive('\n') {
        if let Some(decl) = host_decl(line) {
            state = if decl == alias {
                seen_alias = true;
                ScanState::Inside
            } else {
                ScanState::Outside
            };
            out.push_str(line);
            continue;
        }

        if state == ScanState::Inside && line.trim_start().starts_with(HOST_NAME_PREFIX) {
            let indent_len = line.len() - line.trim_start().len();
            let ending = line_ending(line);
            out.push_str(&line[..indent_len]);
            out.push_str(HOST_NAME_PREFIX);
            out.push_str(addr);
            out.push_str(ending);
            state = ScanState::Replaced;
            replaced = true;
            continue;
        }

        out.push_str(line);
    }

    if replaced {
        Ok(out)
    } else if seen_alias {
        Err(SyncError::HostNameMissing(alias.to_string()))
    } else {
        Err(SyncError::HostNotFound(alias.to_string()))
    }
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// `<path>.backup.<YYYYMMDD_HHMMSS>`
pub fn backup_path_for(path: &Path, stamp: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!(".backup.{stamp}"));
    PathBuf::from(name)
}

fn now_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Handle on the SSH client config file.
#[derive(Debug, Clone)]
pub struct SshConfigFile {
    path: PathBuf,
}

impl SshConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Host aliases, or an empty list when the file is absent or unreadable.
    pub fn hosts(&self) -> Vec<String> {
        if !self.exists() {
            warn!(path = %self.path.display(), "ssh config not found");
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let hosts = parse_host_aliases(&text);
                debug!(count = hosts.len(), "hosts parsed");
                hosts
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read ssh config");
                Vec::new()
            }
        }
    }

    /// Copy the file next to itself, keeping permissions and timestamps.
    pub fn backup(&self) -> Result<PathBuf> {
        self.backup_stamped(&now_stamp())
    }

    /// Backups are never overwritten: an existing target fails the backup.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn backup_stamped(&self, stamp: &str) -> Result<PathBuf> {
        let target = backup_path_for(&self.path, stamp);
        let wrap = |source: io::Error| SyncError::Backup { path: self.path.clone(), source };

        let meta = fs::metadata(&self.path).map_err(wrap)?;
        let mut src = File::open(&self.path).map_err(wrap)?;
        let mut dst = File::options()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(wrap)?;

        let mut times = FileTimes::new();
        if let Ok(t) = meta.accessed() {
            times = times.set_accessed(t);
        }
        if let Ok(t) = meta.modified() {
            times = times.set_modified(t);
        }
        let copied = io::copy(&mut src, &mut dst)
            .and_then(|_| dst.set_times(times))
            .and_then(|_| dst.set_permissions(meta.permissions()));
        if let Err(e) = copied {
            drop(dst);
            let _ = fs::remove_file(&target);
            return Err(wrap(e));
        }

        info!(backup = %target.display(), "backup created");
        Ok(target)
    }

    /// Point `alias` at `addr`. A backup is taken first; the file is only
    /// rewritten once the in-memory edit succeeded.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn update_host(&self, alias: &str, addr: &str) -> Result<PathBuf> {
        self.update_host_stamped(alias, addr, &now_stamp())
    }

    fn update_host_stamped(&self, alias: &str, addr: &str, stamp: &str) -> Result<PathBuf> {
        if !self.exists() {
            return Err(SyncError::ConfigMissing(self.path.clone()));
        }
        let backup = self.backup_stamped(stamp)?;

        let text = fs::read_to_string(&self.path)?;
        let updated = replace_host_name(&text, alias, addr).inspect_err(|e| {
            warn!(error = %e, "no HostName rewritten, file left untouched");
        })?;
        fs::write(&self.path, updated)?;

        info!(alias, addr, "HostName updated");
        Ok(backup)
    }
}
