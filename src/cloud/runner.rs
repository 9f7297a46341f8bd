use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::config::Settings;
use crate::error::{Result, SyncError};

/// Seam for every external CLI call. Returns stdout on success.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

impl<F> CommandRunner for F
where
    F: Fn(&str, &[String]) -> Result<String>,
{
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        self(program, args)
    }
}

/// Runs real processes, killing them once `timeout` elapses.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SyncError::Spawn { program: program.to_string(), source })?;

        // Pipes are drained concurrently so a chatty child never blocks on a full buffer.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                warn!(program, secs = self.timeout.as_secs(), "command timed out");
                return Err(SyncError::CommandTimeout {
                    program: program.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let out = stdout.join().unwrap_or_default();
        let err = stderr.join().unwrap_or_default();
        debug!(program, %status, stdout_len = out.len(), "command finished");

        if !status.success() {
            return Err(SyncError::CommandFailed {
                program: program.to_string(),
                status: status.to_string(),
                stderr: err.trim().to_string(),
            });
        }
        Ok(out)
    }
}

/// The AWS CLI, with profile/region applied to every call.
pub struct AwsCli {
    runner: Box<dyn CommandRunner>,
    binary: String,
    profile: Option<String>,
    region: Option<String>,
}

impl AwsCli {
    pub fn new(runner: Box<dyn CommandRunner>, settings: &Settings) -> Self {
        Self {
            runner,
            binary: settings.aws_binary.clone(),
            profile: settings.aws_profile.clone(),
            region: settings.aws_region.clone(),
        }
    }

    pub fn call(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        if let Some(p) = &self.profile {
            full.push("--profile".to_string());
            full.push(p.clone());
        }
        if let Some(r) = &self.region {
            full.push("--region".to_string());
            full.push(r.clone());
        }
        debug!(binary = %self.binary, args = ?full, "aws call");
        self.runner.run(&self.binary, &full)
    }
}
