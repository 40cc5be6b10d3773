//! Error type returned by the syslog client.

use std::io;

use thiserror::Error;

/// Errors raised while configuring the client or delivering a batch.
///
/// By the time `publish` returns one of the delivery variants the batch has
/// already been acknowledged or handed back for retry; the error is reported
/// for observability only.
#[derive(Debug, Error)]
pub enum SyslogError {
    /// Invalid user supplied configuration.
    #[error("invalid syslog configuration: {0}")]
    InvalidConfig(String),
    /// The configuration file could not be read or parsed.
    #[error("failed to load syslog configuration: {0}")]
    Ini(#[from] ini::Error),
    /// The collector could not be reached.
    #[error("failed to connect to {target}: {source}")]
    Dial {
        target: String,
        #[source]
        source: io::Error,
    },
    /// Writing or flushing a batch failed mid-way.
    #[error("syslog write failed: {0}")]
    Write(#[source] io::Error),
}

impl SyslogError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
