use inquire::Confirm;
use crate::models::{RuleSyncOutcome, RuleSyncPlan};
use crate::sync::Synchronizer;
use crate::util;

/// Show the plan and ask; anything but an explicit yes declines.
pub fn confirm_plan(plan: &RuleSyncPlan) -> bool {
    util::notice("This will update the following security group rules:");
    for rule in &plan.rules {
        println!("  - {rule}");
    }
    util::notice(format!("With IP: {}", plan.cidr));
    Confirm::new("Are you sure you want to update these security group rules?")
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

/// Returns true when the rules were applied (even partially).
pub fn sync_rules(sync: &Synchronizer) -> bool {
    let outcome = match sync.sync_security_rules(None, confirm_plan) {
        Ok(o) => o,
        Err(e) => {
            util::error(e.to_string());
            return false;
        }
    };

    match outcome {
        RuleSyncOutcome::NothingToDo => {
            util::notice("No security group rules configured (see security_group_rules in the settings file).");
            false
        }
        RuleSyncOutcome::Cancelled => {
            util::notice("Security group update cancelled.");
            false
        }
        RuleSyncOutcome::Applied(report) => {
            for rule in &report.updated {
                util::success(format!("✓ Updated security group rule {rule}"));
            }
            for (rule, reason) in &report.failed {
                util::error(format!("✗ Failed to update security group rule {rule}: {reason}"));
            }
            true
        }
    }
}
