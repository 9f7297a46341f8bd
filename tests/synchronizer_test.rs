use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use sshsync::cloud::{CommandRunner, StaticIp};
use sshsync::models::{RuleSyncOutcome, TunnelOutcome};
use sshsync::{Result, Settings, SyncError, Synchronizer};
use tempfile::TempDir;

const CONFIG: &str = "Host *\n    ServerAliveInterval 30\n\nHost web\n    HostName 1.2.3.4\n    User ubuntu\n\nHost db\n    HostName 5.6.7.8\n";

type Calls = Rc<RefCell<Vec<Vec<String>>>>;

/// aws stand-in: every rule belongs to `sg-<rule>`, every modification succeeds.
fn recording_runner() -> (Box<dyn CommandRunner>, Calls) {
    let calls: Calls = Rc::default();
    let sink = Rc::clone(&calls);
    let runner = move |_: &str, args: &[String]| -> Result<String> {
        sink.borrow_mut().push(args.to_vec());
        match args[1].as_str() {
            "describe-security-group-rules" => {
                let rule = args[3].rsplit('=').next().unwrap_or_default();
                Ok(format!("sg-{rule}\n"))
            }
            "describe-instances" => Ok(r#"[[["i-1","3.3.3.3","running","web"]]]"#.to_string()),
            _ => Ok(String::new()),
        }
    };
    (Box::new(runner), calls)
}

fn setup(rules: &[&str]) -> (TempDir, Synchronizer, Calls) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, CONFIG).unwrap();

    let settings = Settings {
        ssh_config_path: path.to_string_lossy().into_owned(),
        ssh_binary: "true".to_string(),
        security_group_rules: rules.iter().map(|r| r.to_string()).collect(),
        ..Settings::default()
    };
    let (runner, calls) = recording_runner();
    let sync = Synchronizer::with_backends(settings, runner, Box::new(StaticIp("203.0.113.7".to_string())));
    (dir, sync, calls)
}

#[test]
fn lists_hosts_without_catch_all() {
    let (_dir, sync, _) = setup(&[]);
    assert_eq!(sync.list_hosts(), vec!["web", "db"]);
}

#[test]
fn lists_instances_through_runner() {
    let (_dir, sync, calls) = setup(&[]);
    let instances = sync.list_instances();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].public_ip.as_deref(), Some("3.3.3.3"));
    assert_eq!(calls.borrow()[0][1], "describe-instances");
}

#[test]
fn update_rewrites_single_line_and_keeps_backup() {
    let (_dir, sync, _) = setup(&[]);
    let backup = sync.update_host("db", "9.9.9.9").unwrap();

    let updated = fs::read_to_string(sync.ssh_config().path()).unwrap();
    assert_eq!(updated, CONFIG.replace("HostName 5.6.7.8", "HostName 9.9.9.9"));
    assert_eq!(fs::read_to_string(backup).unwrap(), CONFIG);
}

#[test]
fn update_unknown_host_changes_nothing() {
    let (_dir, sync, _) = setup(&[]);
    let err = sync.update_host("cache", "9.9.9.9").unwrap_err();
    assert!(matches!(err, SyncError::HostNotFound(_)));
    assert_eq!(fs::read_to_string(sync.ssh_config().path()).unwrap(), CONFIG);
}

#[test]
fn confirmed_sync_touches_each_rule_once() {
    let (_dir, sync, calls) = setup(&["sgr-029", "sgr-0a6"]);

    let mut shown = None;
    let outcome = sync
        .sync_security_rules(None, |plan| {
            shown = Some(plan.clone());
            true
        })
        .unwrap();

    let plan = shown.unwrap();
    assert_eq!(plan.cidr, "203.0.113.7/32");
    assert_eq!(plan.rules, vec!["sgr-029", "sgr-0a6"]);

    let RuleSyncOutcome::Applied(report) = outcome else { panic!("expected rules to be applied") };
    assert_eq!(report.updated, vec!["sgr-029", "sgr-0a6"]);
    assert!(report.failed.is_empty());

    let calls = calls.borrow();
    let lookups: Vec<_> = calls.iter().filter(|c| c[1] == "describe-security-group-rules").collect();
    let modifies: Vec<_> = calls.iter().filter(|c| c[1] == "modify-security-group-rules").collect();
    assert_eq!(lookups.len(), 2);
    assert_eq!(modifies.len(), 2);
    assert_eq!(modifies[0][3], "sg-sgr-029");
    assert!(modifies.iter().all(|c| c[5].contains("\"CidrIpv4\":\"203.0.113.7/32\"")));
}

#[test]
fn declined_sync_makes_no_calls() {
    let (_dir, sync, calls) = setup(&["sgr-029"]);
    let outcome = sync.sync_security_rules(None, |_| false).unwrap();
    assert_eq!(outcome, RuleSyncOutcome::Cancelled);
    assert!(calls.borrow().is_empty());
}

#[test]
fn caller_supplied_ip_skips_lookup() {
    let (_dir, sync, _) = setup(&["sgr-1"]);
    let mut cidr = String::new();
    sync.sync_security_rules(Some("198.51.100.9"), |plan| {
        cidr = plan.cidr.clone();
        false
    })
    .unwrap();
    assert_eq!(cidr, "198.51.100.9/32");
}

#[test]
fn ipv6_address_is_refused_before_confirmation() {
    let (_dir, sync, calls) = setup(&["sgr-1"]);
    let err = sync
        .sync_security_rules(Some("2001:db8::1"), |_| panic!("should not prompt"))
        .unwrap_err();
    assert!(matches!(err, SyncError::PublicIp(_)));
    assert!(calls.borrow().is_empty());
}

#[test]
fn update_twice_keeps_pre_update_backup() {
    let (dir, sync, _) = setup(&[]);
    let first = sync.update_host("db", "1.1.1.1").unwrap();

    match sync.update_host("db", "2.2.2.2") {
        Ok(second) => assert_ne!(first, second),
        Err(e) => assert!(matches!(e, SyncError::Backup { .. })),
    }

    assert_eq!(fs::read_to_string(&first).unwrap(), CONFIG);
    let backups = fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().contains(".backup."))
        .count();
    assert!(backups >= 1);
}

#[test]
fn no_rules_configured_asks_nothing() {
    let (_dir, sync, _) = setup(&[]);
    let outcome = sync
        .sync_security_rules(None, |_| panic!("should not prompt"))
        .unwrap();
    assert_eq!(outcome, RuleSyncOutcome::NothingToDo);
}

#[test]
fn tunnel_requires_known_host() {
    let (_dir, sync, _) = setup(&[]);
    let err = sync.open_tunnel("nowhere", 24180, 80).unwrap_err();
    assert!(matches!(err, SyncError::HostNotFound(ref h) if h == "nowhere"));
}

#[cfg(unix)]
#[test]
fn tunnel_runs_ssh_until_exit() {
    let (_dir, sync, _) = setup(&[]);
    assert_eq!(sync.open_tunnel("web", 24180, 80).unwrap(), TunnelOutcome::Closed);
}
