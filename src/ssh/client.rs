use std::process::{Child, Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SyncError};
use crate::models::TunnelOutcome;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static HANDLER: Once = Once::new();

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Route Ctrl+C into a flag instead of killing the process. Safe to call
/// more than once; only the first call installs the handler.
pub fn install_interrupt_handler() {
    HANDLER.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| {
            INTERRUPTED.store(true, Ordering::SeqCst);
        }) {
            debug!("could not set Ctrl-C handler: {e}");
        }
    });
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

pub fn reset_interrupt() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Local forward through a configured host alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelSpec {
    pub alias: String,
    pub local_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
}

impl TunnelSpec {
    pub fn args(&self) -> Vec<String> {
        vec![
            "-L".to_string(),
            format!("{}:{}:{}", self.local_port, self.remote_host, self.remote_port),
            self.alias.clone(),
        ]
    }
}

/// Owns the ssh child; whatever path we leave by, the child is gone afterwards.
pub struct TunnelGuard {
    child: Option<Child>,
}

impl TunnelGuard {
    pub fn spawn(cmd: &mut Command) -> Result<Self> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        let child = cmd
            .spawn()
            .map_err(|source| SyncError::Spawn { program, source })?;
        debug!(pid = child.id(), "tunnel process started");
        Ok(Self { child: Some(child) })
    }

    /// Block until the child exits or `cancelled` reports true.
    pub fn wait(mut self, cancelled: impl Fn() -> bool) -> Result<TunnelOutcome> {
        let Some(mut child) = self.child.take() else {
            return Ok(TunnelOutcome::Closed);
        };
        loop {
            if cancelled() {
                stop(&mut child);
                return Ok(TunnelOutcome::Interrupted);
            }
            match child.try_wait() {
                Ok(Some(status)) => {
                    // ssh sees the same SIGINT and may win the race
                    if cancelled() {
                        return Ok(TunnelOutcome::Interrupted);
                    }
                    return Ok(outcome_of(status));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    stop(&mut child);
                    return Err(e.into());
                }
            }
        }
    }
}

impl Drop for TunnelGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            stop(&mut child);
        }
    }
}

fn stop(child: &mut Child) {
    if let Ok(None) = child.try_wait() {
        if let Err(e) = child.kill() {
            warn!("failed to kill tunnel process: {e}");
        }
    }
    let _ = child.wait();
}

fn outcome_of(status: ExitStatus) -> TunnelOutcome {
    if status.success() {
        TunnelOutcome::Closed
    } else {
        TunnelOutcome::Exited(status.code())
    }
}

/// Run `ssh -L local:remote_host:remote alias` until it exits or Ctrl+C.
#[instrument(skip(ssh_binary))]
pub fn run_tunnel(ssh_binary: &str, spec: &TunnelSpec) -> Result<TunnelOutcome> {
    install_interrupt_handler();
    reset_interrupt();

    let mut cmd = Command::new(ssh_binary);
    cmd.args(spec.args());
    let guard = TunnelGuard::spawn(&mut cmd)?;
    let outcome = guard.wait(is_interrupted)?;
    reset_interrupt();

    info!(?outcome, "tunnel finished");
    Ok(outcome)
}
