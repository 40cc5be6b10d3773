//! Builder for [`FemtoSyslogClient`].
//!
//! The builder collects [`SyslogOptions`] fluently, validates them and
//! resolves defaults. Unknown facility and severity names are not fatal; they
//! are logged and replaced with the encoder fallbacks so a typo never stops
//! delivery. Unknown networks and formats are rejected because guessing them
//! would send messages somewhere unexpected.

use std::time::Duration;

use log::warn;

use crate::{
    client::FemtoSyslogClient,
    config::{
        DEFAULT_CONNECT_TIMEOUT, DEFAULT_FACILITY, DEFAULT_NETWORK, DEFAULT_SEVERITY,
        SyslogConfig, SyslogOptions,
    },
    error::SyslogError,
    formatter::{DEFAULT_APP_NAME, MessageFormat},
    policy::FailureMode,
    priority::{Facility, Severity},
    transport::Network,
};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(SyslogError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.options.$field = Some(value.into());
            self
        }
    };
}

/// Builder for constructing [`FemtoSyslogClient`] instances.
#[derive(Clone, Debug, Default)]
pub struct SyslogClientBuilder {
    options: SyslogOptions,
}

impl SyslogClientBuilder {
    /// Create a builder with every option unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from options read from a file or a deserialised document.
    pub fn from_options(options: SyslogOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SyslogOptions {
        &self.options
    }

    option_setter!(
        /// Transport name. An empty name selects the local socket.
        with_network, network, impl Into<String>
    );
    option_setter!(
        /// Collector `host:port`, or the local socket path.
        with_address, address, impl Into<String>
    );
    option_setter!(with_facility, facility, impl Into<String>);
    option_setter!(with_severity, severity, impl Into<String>);
    option_setter!(
        /// APP-NAME or TAG written into each message.
        with_tag, tag, impl Into<String>
    );
    option_setter!(with_format, format, impl Into<String>);
    option_setter!(
        /// `retry` or `discard`.
        with_on_failure, on_failure, impl Into<String>
    );
    option_setter!(with_connect_timeout_ms, connect_timeout_ms, u64);
    option_setter!(with_write_timeout_ms, write_timeout_ms, u64);
    option_setter!(
        /// Hostname written into messages instead of the resolved one.
        with_hostname, hostname, impl Into<String>
    );

    /// Resolve and validate the options without dialling.
    pub fn build_config(&self) -> Result<SyslogConfig, SyslogError> {
        let options = &self.options;
        let network = match options.network.as_deref() {
            None => DEFAULT_NETWORK,
            Some(name) => name.parse::<Network>().map_err(SyslogError::InvalidConfig)?,
        };
        let format = options
            .format
            .as_deref()
            .unwrap_or_default()
            .parse::<MessageFormat>()
            .map_err(SyslogError::InvalidConfig)?;
        let connect_timeout = match options.connect_timeout_ms {
            Some(ms) => Duration::from_millis(ensure_positive!(ms, "connect_timeout_ms")?),
            None => DEFAULT_CONNECT_TIMEOUT,
        };
        let write_timeout = options
            .write_timeout_ms
            .map(|ms| ensure_positive!(ms, "write_timeout_ms").map(Duration::from_millis))
            .transpose()?;

        let config = SyslogConfig {
            network,
            address: options.address.clone().unwrap_or_default(),
            facility: resolve_facility(options.facility.as_deref()),
            severity: resolve_severity(options.severity.as_deref()),
            tag: options
                .tag
                .clone()
                .filter(|tag| !tag.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_owned()),
            format,
            on_failure: options
                .on_failure
                .as_deref()
                .map(FailureMode::from_config)
                .unwrap_or_default(),
            connect_timeout,
            write_timeout,
            hostname: options
                .hostname
                .clone()
                .filter(|name| !name.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the client. One connection attempt is made immediately.
    pub fn build(&self) -> Result<FemtoSyslogClient, SyslogError> {
        FemtoSyslogClient::new(self.build_config()?)
    }
}

fn resolve_facility(name: Option<&str>) -> Facility {
    let name = name.unwrap_or(DEFAULT_FACILITY);
    name.parse().unwrap_or_else(|err| {
        warn!("FemtoSyslogClient {err}; using facility {}", Facility::FALLBACK);
        Facility::FALLBACK
    })
}

fn resolve_severity(name: Option<&str>) -> Severity {
    let name = name.unwrap_or(DEFAULT_SEVERITY);
    name.parse().unwrap_or_else(|err| {
        warn!("FemtoSyslogClient {err}; using severity {}", Severity::FALLBACK);
        Severity::FALLBACK
    })
}
