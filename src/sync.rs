//! The configuration synchronizer: one object owning the settings and the
//! external backends, exposing every operation the menu drives.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};

use crate::cloud::instances::list_instances;
use crate::cloud::public_ip::parse_ip_body;
use crate::cloud::security_groups::{apply_rules, host_cidr};
use crate::cloud::{AwsCli, CommandRunner, HttpIpSource, PublicIpSource, SystemRunner};
use crate::config::Settings;
use crate::error::{Result, SyncError};
use crate::models::{Instance, RuleSyncOutcome, RuleSyncPlan, TunnelOutcome};
use crate::ssh::{run_tunnel, SshConfigFile, TunnelSpec};

pub struct Synchronizer {
    settings: Settings,
    ssh_config: SshConfigFile,
    aws: AwsCli,
    ip_source: Box<dyn PublicIpSource>,
}

impl Synchronizer {
    /// Real processes and the configured IP echo endpoint.
    pub fn new(settings: Settings) -> Self {
        let runner = SystemRunner::new(Duration::from_secs(settings.command_timeout_secs));
        let ip_source = HttpIpSource::new(
            settings.ip_endpoint.clone(),
            Duration::from_secs(settings.ip_timeout_secs),
        );
        Self::with_backends(settings, Box::new(runner), Box::new(ip_source))
    }

    pub fn with_backends(
        settings: Settings,
        runner: Box<dyn CommandRunner>,
        ip_source: Box<dyn PublicIpSource>,
    ) -> Self {
        let ssh_config = SshConfigFile::new(settings.ssh_config_file());
        let aws = AwsCli::new(runner, &settings);
        Self { settings, ssh_config, aws, ip_source }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ssh_config(&self) -> &SshConfigFile {
        &self.ssh_config
    }

    pub fn list_instances(&self) -> Vec<Instance> {
        list_instances(&self.aws)
    }

    pub fn list_hosts(&self) -> Vec<String> {
        self.ssh_config.hosts()
    }

    pub fn backup(&self) -> Result<PathBuf> {
        self.ssh_config.backup()
    }

    /// Returns the backup taken before the rewrite.
    pub fn update_host(&self, alias: &str, addr: &str) -> Result<PathBuf> {
        self.ssh_config.update_host(alias, addr)
    }

    pub fn public_ip(&self) -> Result<String> {
        self.ip_source.public_ip()
    }

    /// Scope every configured rule to `ip` (or the current public IP).
    /// Nothing is modified unless `confirm` approves the plan.
    #[instrument(skip(self, confirm))]
    pub fn sync_security_rules(
        &self,
        ip: Option<&str>,
        confirm: impl FnOnce(&RuleSyncPlan) -> bool,
    ) -> Result<RuleSyncOutcome> {
        let rules = &self.settings.security_group_rules;
        if rules.is_empty() {
            info!("no security group rules configured");
            return Ok(RuleSyncOutcome::NothingToDo);
        }

        let ip = match ip {
            Some(ip) => parse_ip_body(ip)?,
            None => self.public_ip()?,
        };
        let plan = RuleSyncPlan { rules: rules.clone(), cidr: host_cidr(&ip) };

        if !confirm(&plan) {
            info!(cidr = %plan.cidr, "rule sync declined");
            return Ok(RuleSyncOutcome::Cancelled);
        }

        let report = apply_rules(&self.aws, &plan.rules, &plan.cidr, &self.settings.rule_description);
        info!(updated = report.updated.len(), failed = report.failed.len(), "rule sync done");
        Ok(RuleSyncOutcome::Applied(report))
    }

    /// Forward `local_port` to `remote_port` through `alias`, blocking until
    /// ssh exits or the operator interrupts.
    #[instrument(skip(self))]
    pub fn open_tunnel(&self, alias: &str, local_port: u16, remote_port: u16) -> Result<TunnelOutcome> {
        if !self.list_hosts().iter().any(|h| h == alias) {
            return Err(SyncError::HostNotFound(alias.to_string()));
        }
        let spec = TunnelSpec {
            alias: alias.to_string(),
            local_port,
            remote_host: self.settings.tunnel.remote_host.clone(),
            remote_port,
        };
        run_tunnel(&self.settings.ssh_binary, &spec)
    }
}
