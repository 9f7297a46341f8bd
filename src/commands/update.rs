use inquire::Select;
use crate::models::Instance;
use crate::sync::Synchronizer;
use crate::util;

/// Pick a running instance, pick a host, point the host at the instance.
pub fn update_host_from_instance(sync: &Synchronizer) {
    util::notice("Fetching EC2 instances...");
    let instances = sync.list_instances();
    if instances.is_empty() {
        util::notice("No EC2 instances found.");
        return;
    }

    let candidates: Vec<&Instance> = instances.iter().filter(|i| i.is_selectable()).collect();
    if candidates.is_empty() {
        util::notice("No running instances with public IPs found");
        return;
    }

    let labels: Vec<String> = candidates.iter().map(|i| i.label()).collect();
    let Ok(choice) = Select::new("Select an EC2 instance:", labels).raw_prompt() else {
        return;
    };
    let instance = candidates[choice.index];
    let Some(ip) = instance.public_ip.as_deref() else { return; };

    let hosts = sync.list_hosts();
    if hosts.is_empty() {
        util::notice("No SSH hosts found in config");
        return;
    }
    let Ok(host) = Select::new("Select SSH host to update:", hosts).prompt() else {
        return;
    };

    match sync.update_host(&host, ip) {
        Ok(backup) => {
            util::success(format!("Backup created: {}", backup.display()));
            util::success(format!("Successfully updated SSH host '{host}' to IP {ip}"));
        }
        Err(e) => util::error(e.to_string()),
    }
}
