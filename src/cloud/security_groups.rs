use serde_json::json;
use tracing::{info, instrument, warn};

use super::runner::AwsCli;
use crate::error::{Result, SyncError};
use crate::models::RuleSyncReport;

pub fn host_cidr(ip: &str) -> String {
    format!("{ip}/32")
}

/// Owning security group of a rule id.
#[instrument(skip(cli))]
pub fn resolve_group_id(cli: &AwsCli, rule_id: &str) -> Result<String> {
    let filter = format!("Name=security-group-rule-id,Values={rule_id}");
    let out = cli.call(&[
        "ec2",
        "describe-security-group-rules",
        "--filters",
        &filter,
        "--query",
        "SecurityGroupRules[0].GroupId",
        "--output",
        "text",
    ])?;
    let group = out.trim();
    if group.is_empty() || group == "None" {
        return Err(SyncError::RuleGroupMissing(rule_id.to_string()));
    }
    Ok(group.to_string())
}

/// JSON payload for `--security-group-rules`.
pub fn rule_payload(rule_id: &str, cidr: &str, description: &str) -> String {
    json!([{
        "SecurityGroupRuleId": rule_id,
        "SecurityGroupRule": {
            "CidrIpv4": cidr,
            "IpProtocol": "-1",
            "Description": description,
        }
    }])
    .to_string()
}

#[instrument(skip(cli, description))]
pub fn modify_rule(cli: &AwsCli, group_id: &str, rule_id: &str, cidr: &str, description: &str) -> Result<()> {
    let payload = rule_payload(rule_id, cidr, description);
    cli.call(&[
        "ec2",
        "modify-security-group-rules",
        "--group-id",
        group_id,
        "--security-group-rules",
        &payload,
    ])?;
    Ok(())
}

/// Point every rule at `cidr`. Each rule stands alone: a failure is recorded
/// and the next rule is still attempted.
pub fn apply_rules(cli: &AwsCli, rules: &[String], cidr: &str, description: &str) -> RuleSyncReport {
    let mut report = RuleSyncReport { cidr: cidr.to_string(), ..Default::default() };
    for rule_id in rules {
        let result = resolve_group_id(cli, rule_id)
            .and_then(|group| modify_rule(cli, &group, rule_id, cidr, description));
        match result {
            Ok(()) => {
                info!(%rule_id, cidr, "rule updated");
                report.updated.push(rule_id.clone());
            }
            Err(e) => {
                warn!(%rule_id, error = %e, "rule update failed");
                report.failed.push((rule_id.clone(), e.to_string()));
            }
        }
    }
    report
}
