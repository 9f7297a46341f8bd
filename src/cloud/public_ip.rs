use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::error::{Result, SyncError};

/// Where the operator's current public address comes from.
pub trait PublicIpSource {
    fn public_ip(&self) -> Result<String>;
}

/// Plaintext echo service (`checkip.amazonaws.com` style): the body is the address.
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    url: String,
    timeout: Duration,
}

impl HttpIpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { url: url.into(), timeout }
    }
}

impl PublicIpSource for HttpIpSource {
    #[instrument(skip(self), fields(url = %self.url))]
    fn public_ip(&self) -> Result<String> {
        let fail = |e: reqwest::Error| {
            warn!(error = %e, "public ip lookup failed");
            SyncError::PublicIp(e.to_string())
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(fail)?;
        let body = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(fail)?;
        let ip = parse_ip_body(&body)?;
        info!(%ip, "public ip resolved");
        Ok(ip)
    }
}

/// Fixed address, for when the caller already knows it.
#[derive(Debug, Clone)]
pub struct StaticIp(pub String);

impl PublicIpSource for StaticIp {
    fn public_ip(&self) -> Result<String> {
        parse_ip_body(&self.0)
    }
}

/// Rules are written as `CidrIpv4`, so only an IPv4 address is accepted.
pub fn parse_ip_body(body: &str) -> Result<String> {
    let trimmed = body.trim();
    trimmed
        .parse::<Ipv4Addr>()
        .map(|ip| ip.to_string())
        .map_err(|_| SyncError::PublicIp(format!("unexpected response {trimmed:?}")))
}
