use tracing::{info, instrument, warn};

use super::runner::AwsCli;
use crate::error::Result;
use crate::models::Instance;

const INSTANCE_QUERY: &str =
    "Reservations[*].Instances[*].[InstanceId,PublicIpAddress,State.Name,Tags[?Key==`Name`].Value|[0]]";

/// `[id, public ip, state, name]` as emitted by `INSTANCE_QUERY`
type InstanceRow = (String, Option<String>, String, Option<String>);

/// Flatten the reservation -> instance nesting of the query output.
pub fn parse_instances(json: &str) -> Result<Vec<Instance>> {
    let reservations: Vec<Vec<InstanceRow>> = serde_json::from_str(json)?;
    Ok(reservations
        .into_iter()
        .flatten()
        .map(|(id, public_ip, state, name)| Instance { id, public_ip, state, name })
        .collect())
}

/// Every instance visible to the configured profile. Failures are logged and
/// yield an empty list.
#[instrument(skip(cli))]
pub fn list_instances(cli: &AwsCli) -> Vec<Instance> {
    let out = match cli.call(&[
        "ec2",
        "describe-instances",
        "--query",
        INSTANCE_QUERY,
        "--output",
        "json",
    ]) {
        Ok(out) => out,
        Err(e) => {
            warn!(error = %e, "describe-instances failed");
            return Vec::new();
        }
    };

    match parse_instances(&out) {
        Ok(instances) => {
            info!(count = instances.len(), "instances listed");
            instances
        }
        Err(e) => {
            warn!(error = %e, "failed to parse instance data");
            Vec::new()
        }
    }
}
