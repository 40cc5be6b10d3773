//! Synchronous syslog delivery for batches of events.
//!
//! Events are rendered as RFC 3164 or RFC 5424 lines, framed for the
//! transport and written over a single lazily dialled connection. Each batch
//! receives exactly one disposition: acknowledged on success, or handled by
//! the configured failure mode when delivery fails.

mod batch;
mod builder;
mod client;
pub mod config;
mod error;
pub mod formatter;
mod framing;
mod policy;
mod priority;
mod rate_limited_warner;
mod stats;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use batch::{Batch, Disposition, Event, MESSAGE_FIELD, SyslogEvent};
pub use builder::SyslogClientBuilder;
pub use client::FemtoSyslogClient;
pub use config::{SyslogConfig, SyslogOptions};
pub use error::SyslogError;
pub use formatter::{MessageFormat, SyslogFormatter};
pub use framing::Framing;
pub use policy::FailureMode;
pub use priority::{Facility, Priority, Severity, UnknownName, priority};
pub use rate_limited_warner::{DEFAULT_WARN_INTERVAL, RateLimitedWarner};
pub use stats::{DeliverySnapshot, DeliveryStats};
pub use transport::{ConnectionState, Network};

/// Installs the process-wide `logtest` logger once and drains stale records.
#[cfg(test)]
pub(crate) fn start_test_logger() -> logtest::Logger {
    static START: std::sync::Once = std::sync::Once::new();
    START.call_once(|| drop(logtest::Logger::start()));
    let mut logger = logtest::Logger;
    while logger.pop().is_some() {}
    logger
}
