//! Everything that talks to AWS or the outside network.
pub mod runner;
pub mod instances;
pub mod security_groups;
pub mod public_ip;

pub use runner::{AwsCli, CommandRunner, SystemRunner};
pub use public_ip::{HttpIpSource, PublicIpSource, StaticIp};
