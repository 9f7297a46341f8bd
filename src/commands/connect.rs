use inquire::{CustomType, Select};
use crate::commands::rules::sync_rules;
use crate::models::TunnelOutcome;
use crate::sync::Synchronizer;
use crate::util;

/// Choose a host and ports, refresh the security rules, then hold the tunnel
/// open until ssh exits or Ctrl+C.
pub fn open_tunnel(sync: &Synchronizer) {
    let hosts = sync.list_hosts();
    if hosts.is_empty() {
        util::notice("No SSH hosts found in config");
        return;
    }
    let Ok(host) = Select::new("Select SSH host for tunnel:", hosts).prompt() else {
        return;
    };

    let defaults = &sync.settings().tunnel;
    let Ok(local_port) = CustomType::<u16>::new("Local port")
        .with_default(defaults.local_port)
        .with_error_message("Please type a port number (1-65535)")
        .prompt()
    else {
        return;
    };
    let Ok(remote_port) = CustomType::<u16>::new("Remote port")
        .with_default(defaults.remote_port)
        .with_error_message("Please type a port number (1-65535)")
        .prompt()
    else {
        return;
    };

    util::info("Updating security groups first...");
    sync_rules(sync);

    util::info(format!(
        "Creating SSH tunnel: localhost:{local_port} -> {host}:{remote_port}"
    ));
    util::notice(format!(
        "Running: {} -L {local_port}:{}:{remote_port} {host}",
        sync.settings().ssh_binary,
        defaults.remote_host
    ));
    util::info("Press Ctrl+C to close the tunnel");

    match sync.open_tunnel(&host, local_port, remote_port) {
        Ok(TunnelOutcome::Closed) | Ok(TunnelOutcome::Interrupted) => util::success("SSH tunnel closed"),
        Ok(TunnelOutcome::Exited(code)) => util::notice(format!(
            "ssh exited with status {}",
            code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string())
        )),
        Err(e) => util::error(format!("Failed to create SSH tunnel: {e}")),
    }
}
