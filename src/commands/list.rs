use prettytable::{row, Cell, Row, Table};
use crate::models::{or_na, Instance};
use crate::sync::Synchronizer;
use crate::util;

pub fn instances_table(instances: &[Instance]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Instance ID", "Name", "Public IP", "State"]);
    for i in instances {
        let state_style = if i.is_running() { "Fg" } else { "Fr" };
        table.add_row(Row::new(vec![
            Cell::new(&i.id).style_spec("Fc"),
            Cell::new(or_na(&i.name)).style_spec("Fg"),
            Cell::new(or_na(&i.public_ip)).style_spec("Fy"),
            Cell::new(&i.state).style_spec(state_style),
        ]));
    }
    table
}

pub fn hosts_table(hosts: &[String]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Host"]);
    for h in hosts {
        table.add_row(row![Fc->h]);
    }
    table
}

pub fn list_instances(sync: &Synchronizer) {
    util::notice("Fetching EC2 instances...");
    let instances = sync.list_instances();
    if instances.is_empty() {
        util::notice("No EC2 instances found.");
        return;
    }
    println!("EC2 Instances");
    instances_table(&instances).printstd();
}

pub fn list_hosts(sync: &Synchronizer) {
    let hosts = sync.list_hosts();
    if hosts.is_empty() {
        util::notice(format!("No SSH hosts found in {}", sync.ssh_config().path().display()));
        return;
    }
    println!("SSH Hosts");
    hosts_table(&hosts).printstd();
}
