//! Client configuration.
//!
//! [`SyslogOptions`] is the raw, string-typed option surface as it arrives
//! from a configuration file or a deserialised document. Every field is
//! optional; defaults are applied when the options are resolved into a
//! [`SyslogConfig`] by [`SyslogClientBuilder`](crate::SyslogClientBuilder).
//! The resolved config is immutable and typed, so nothing is re-parsed while
//! delivering events.

use std::time::Duration;

use serde::Deserialize;

use crate::{
    error::SyslogError,
    formatter::{DEFAULT_APP_NAME, MessageFormat},
    policy::FailureMode,
    priority::{Facility, Priority, Severity},
    transport::Network,
};

mod file;

pub use file::{DEFAULT_SECTION, load_options, parse_options};

/// Default transport.
pub const DEFAULT_NETWORK: Network = Network::Udp;
/// Default facility name.
pub const DEFAULT_FACILITY: &str = "user";
/// Default severity name.
pub const DEFAULT_SEVERITY: &str = "info";
/// Default connection timeout applied when dialling the collector.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw configuration options.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyslogOptions {
    /// `udp`, `udp4`, `udp6`, `tcp`, `tcp4`, `tcp6`; empty selects the local
    /// `unix` socket.
    pub network: Option<String>,
    /// `host:port` of the collector, or a socket path for `unix`.
    #[serde(alias = "host")]
    pub address: Option<String>,
    pub facility: Option<String>,
    pub severity: Option<String>,
    /// APP-NAME (RFC 5424) or TAG (RFC 3164).
    pub tag: Option<String>,
    /// `rfc3164` or `rfc5424`.
    pub format: Option<String>,
    /// `retry` or `discard`.
    pub on_failure: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub write_timeout_ms: Option<u64>,
    /// Hostname written into messages instead of the resolved one.
    pub hostname: Option<String>,
}

/// Resolved, immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyslogConfig {
    pub network: Network,
    pub address: String,
    pub facility: Facility,
    pub severity: Severity,
    pub tag: String,
    pub format: MessageFormat,
    pub on_failure: FailureMode,
    pub connect_timeout: Duration,
    pub write_timeout: Option<Duration>,
    pub hostname: Option<String>,
}

impl SyslogConfig {
    /// Configuration for `address` with every other option at its default.
    pub fn new(network: Network, address: impl Into<String>) -> Self {
        Self {
            network,
            address: address.into(),
            facility: Facility::parse_or_default(DEFAULT_FACILITY),
            severity: Severity::parse_or_default(DEFAULT_SEVERITY),
            tag: DEFAULT_APP_NAME.to_owned(),
            format: MessageFormat::default(),
            on_failure: FailureMode::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: None,
            hostname: None,
        }
    }

    /// PRI value shared by every message of the client.
    pub fn priority(&self) -> Priority {
        Priority::new(self.facility, self.severity)
    }

    /// Check the settings that cannot be repaired with a default.
    pub fn validate(&self) -> Result<(), SyslogError> {
        if self.connect_timeout.is_zero() {
            return Err(SyslogError::invalid("connect_timeout_ms must be greater than zero"));
        }
        if self.write_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(SyslogError::invalid("write_timeout_ms must be greater than zero"));
        }
        if self.network.is_inet() {
            validate_remote_address(self.network, &self.address)?;
        }
        validate_header_field("tag", &self.tag)?;
        if let Some(hostname) = &self.hostname {
            validate_header_field("hostname", hostname)?;
        }
        Ok(())
    }
}

/// Header fields are single space-delimited tokens on the wire.
fn validate_header_field(field: &str, value: &str) -> Result<(), SyslogError> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SyslogError::invalid(format!(
            "{field} {value:?} must not contain whitespace or control characters"
        )));
    }
    Ok(())
}

/// Remote transports need `host:port` with a numeric port.
fn validate_remote_address(network: Network, address: &str) -> Result<(), SyslogError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(SyslogError::invalid(format!(
            "address is required for the {network} network"
        )));
    }
    let Some((host, port)) = address.rsplit_once(':') else {
        return Err(SyslogError::invalid(format!(
            "address {address:?} must be host:port"
        )));
    };
    if host.trim_matches(['[', ']']).is_empty() {
        return Err(SyslogError::invalid(format!("address {address:?} has no host")));
    }
    port.parse::<u16>()
        .map_err(|_| SyslogError::invalid(format!("address {address:?} has an invalid port")))?;
    Ok(())
}
