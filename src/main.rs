use std::fmt;
use inquire::{InquireError, Select};
use tracing::{debug, error, info, warn};

use sshsync::commands::{connect, list, rules, update};
use sshsync::config::{load_settings, settings_path, SettingsSource};
use sshsync::{logging, util, Synchronizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    ListInstances,
    UpdateHost,
    SyncRules,
    OpenTunnel,
    ShowHosts,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 6] = [
        MenuAction::ListInstances,
        MenuAction::UpdateHost,
        MenuAction::SyncRules,
        MenuAction::OpenTunnel,
        MenuAction::ShowHosts,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::ListInstances => "List EC2 Instances",
            MenuAction::UpdateHost => "Update SSH Config with EC2 IP",
            MenuAction::SyncRules => "Update Security Groups with Current IP",
            MenuAction::OpenTunnel => "Create SSH Tunnel",
            MenuAction::ShowHosts => "Show SSH Hosts",
            MenuAction::Exit => "Exit",
        };
        f.write_str(label)
    }
}

fn run(sync: &Synchronizer) {
    loop {
        let action = match Select::new("What would you like to do?", MenuAction::ALL.to_vec()).prompt() {
            Ok(a) => a,
            Err(InquireError::OperationInterrupted) => {
                util::error("Operation cancelled by user.");
                break;
            }
            Err(_) => break,
        };
        info!(%action, "menu action");

        match action {
            MenuAction::ListInstances => list::list_instances(sync),
            MenuAction::UpdateHost => update::update_host_from_instance(sync),
            MenuAction::SyncRules => {
                rules::sync_rules(sync);
            }
            MenuAction::OpenTunnel => connect::open_tunnel(sync),
            MenuAction::ShowHosts => list::list_hosts(sync),
            MenuAction::Exit => break,
        }
        println!();
    }
}

fn main() {
    let (settings, source) = load_settings();
    let _guard = logging::init_logging(&settings.log_directory());

    info!(version = env!("CARGO_PKG_VERSION"), "sshsync started");
    let settings_file = settings_path();
    match source {
        SettingsSource::Defaults => debug!(path = %settings_file.display(), "no settings file, using defaults"),
        SettingsSource::File => debug!(path = %settings_file.display(), "settings loaded"),
        SettingsSource::Invalid(e) => {
            warn!(path = %settings_file.display(), error = %e, "invalid settings file, using defaults");
            util::error(format!("Ignoring invalid settings file {}: {e}", settings_file.display()));
        }
    }
    info!(
        cwd = %std::env::current_dir().map(|d| d.display().to_string()).unwrap_or_default(),
        user = %std::env::var("USER").unwrap_or_else(|_| "unknown".to_string()),
        settings_file = %settings_file.display(),
        "environment"
    );
    info!(
        ssh_config = %settings.ssh_config_file().display(),
        rules = ?settings.security_group_rules,
        "settings"
    );

    let sync = Synchronizer::new(settings);
    util::banner();

    // Panics are the only thing that escapes an action; report them and leave cleanly.
    if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run(&sync))) {
        let msg = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown error".to_string());
        error!(%msg, "unexpected failure");
        util::error(format!("An error occurred: {msg}"));
        return;
    }

    println!("Thank you for using sshsync!");
    info!("sshsync exiting");
}
