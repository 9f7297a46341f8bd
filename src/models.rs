use serde::{Deserialize, Serialize};

/// One compute instance as reported by `describe-instances`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    /// Absent for stopped instances or private-only ones
    pub public_ip: Option<String>,
    /// Lifecycle state (`running`, `stopped`, ...)
    pub state: String,
    /// Value of the `Name` tag
    pub name: Option<String>,
}

impl Instance {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }

    /// Running and reachable, i.e. a candidate for a HostName rewrite.
    pub fn is_selectable(&self) -> bool {
        self.is_running() && self.public_ip.is_some()
    }

    pub fn label(&self) -> String {
        format!(
            "{} ({}) - {}",
            self.id,
            or_na(&self.name),
            or_na(&self.public_ip)
        )
    }
}

/// Renders an optional field the way the tables do.
pub fn or_na(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("N/A")
}

/// What a rule sync is about to change, shown before confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSyncPlan {
    pub rules: Vec<String>,
    /// Single-host range, `<ip>/32`
    pub cidr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSyncReport {
    pub cidr: String,
    pub updated: Vec<String>,
    /// (rule id, reason)
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSyncOutcome {
    Cancelled,
    NothingToDo,
    Applied(RuleSyncReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelOutcome {
    /// ssh exited on its own
    Closed,
    /// ssh exited with a non-zero status
    Exited(Option<i32>),
    /// Operator hit Ctrl+C
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(state: &str, ip: Option<&str>, name: Option<&str>) -> Instance {
        Instance {
            id: "i-0abc".to_string(),
            public_ip: ip.map(str::to_string),
            state: state.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn selectable_requires_running_and_ip() {
        assert!(inst("running", Some("1.2.3.4"), None).is_selectable());
        assert!(!inst("running", None, None).is_selectable());
        assert!(!inst("stopped", Some("1.2.3.4"), None).is_selectable());
    }

    #[test]
    fn label_fills_missing_fields() {
        assert_eq!(
            inst("running", Some("1.2.3.4"), Some("web")).label(),
            "i-0abc (web) - 1.2.3.4"
        );
        assert_eq!(inst("stopped", None, None).label(), "i-0abc (N/A) - N/A");
    }
}
