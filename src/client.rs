//! Synchronous syslog delivery client.
//!
//! [`FemtoSyslogClient::publish`] writes one batch over the shared
//! connection and reports exactly one disposition to it. Delivery failures
//! are absorbed by the configured [`FailureMode`](crate::FailureMode) before the error is
//! returned; callers only need the error for their own diagnostics.

use std::{fmt, io};

use log::{debug, warn};

use crate::{
    batch::{Batch, Disposition, SyslogEvent},
    config::SyslogConfig,
    error::SyslogError,
    formatter::{MessageIdSource, SyslogFormatter},
    framing::Framing,
    rate_limited_warner::RateLimitedWarner,
    stats::{DeliverySnapshot, DeliveryStats},
    transport::{
        ActiveConnection, ConnectionManager, ConnectionState, DEFAULT_LOCAL_SOCKET, Network,
    },
};

/// Client delivering batches to one syslog collector.
#[derive(Debug)]
pub struct FemtoSyslogClient {
    config: SyslogConfig,
    formatter: SyslogFormatter,
    framing: Framing,
    connection: ConnectionManager,
    warner: RateLimitedWarner,
    stats: DeliveryStats,
}

impl FemtoSyslogClient {
    /// Validate `config` and make one connection attempt.
    ///
    /// A failed attempt is logged and retried lazily by the next
    /// [`publish`](Self::publish).
    pub fn new(config: SyslogConfig) -> Result<Self, SyslogError> {
        let client = Self::disconnected(config)?;
        if let Err(err) = client.connection.connect() {
            warn!(
                "FemtoSyslogClient initial connection to {} failed: {err}",
                client.target()
            );
        }
        Ok(client)
    }

    fn disconnected(config: SyslogConfig) -> Result<Self, SyslogError> {
        config.validate()?;
        let mut formatter = SyslogFormatter::new(config.format, config.priority(), &config.tag);
        if let Some(hostname) = &config.hostname {
            formatter = formatter.with_hostname(Some(hostname.clone()));
        }
        let connection = ConnectionManager::new(
            config.network,
            config.address.trim(),
            config.connect_timeout,
            config.write_timeout,
        );
        Ok(Self {
            framing: Framing::select(config.network, config.format),
            formatter,
            connection,
            warner: RateLimitedWarner::default(),
            stats: DeliveryStats::default(),
            config,
        })
    }

    /// Build a client around an existing connection instead of dialling.
    #[cfg(any(test, feature = "test-util"))]
    pub fn with_connection(
        config: SyslogConfig,
        conn: ActiveConnection,
    ) -> Result<Self, SyslogError> {
        let client = Self::disconnected(config)?;
        client.connection.install(conn);
        Ok(client)
    }

    /// Replace the source of RFC 5424 MSGIDs.
    pub fn with_id_source<S>(mut self, ids: S) -> Self
    where
        S: MessageIdSource + 'static,
    {
        self.formatter = self.formatter.with_id_source(ids);
        self
    }

    pub fn config(&self) -> &SyslogConfig {
        &self.config
    }

    pub fn formatter(&self) -> &SyslogFormatter {
        &self.formatter
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Delivery counters accumulated since construction.
    pub fn stats(&self) -> DeliverySnapshot {
        self.stats.snapshot()
    }

    /// Deliver `batch`, acknowledging it on success.
    ///
    /// On a dial, write or flush failure the failure mode decides between
    /// acknowledging and retrying the batch, and the error is returned.
    /// Events after a failed write are not sent.
    pub fn publish<B: Batch>(&self, batch: B) -> Result<(), SyslogError> {
        self.stats.new_batch();
        let conn = match self.connection.connect() {
            Ok(conn) => conn,
            Err(source) => {
                let target = self.target();
                warn!("FemtoSyslogClient failed to connect to {target}: {source}");
                self.settle_failed(batch);
                return Err(SyslogError::Dial { target, source });
            }
        };

        let written = {
            let mut guard = conn.lock();
            self.write_events(&mut guard, batch.events())
        };

        match written {
            Ok(count) => {
                batch.ack();
                self.stats.acked(count as u64);
                debug!("FemtoSyslogClient delivered {count} events to {}", self.target());
                Ok(())
            }
            Err(err) => {
                self.connection.invalidate(&conn);
                self.stats.write_error();
                warn!(
                    "FemtoSyslogClient write to {} failed: {err}; connection closed",
                    self.target()
                );
                self.settle_failed(batch);
                Err(SyslogError::Write(err))
            }
        }
    }

    /// Close the connection. The next publish dials again.
    pub fn close(&self) {
        self.connection.close();
        self.warner.flush(|dropped| {
            warn!(
                "FemtoSyslogClient discarded {dropped} events for {} after delivery failures",
                self.target()
            );
        });
    }

    fn write_events<E: SyslogEvent>(
        &self,
        conn: &mut ActiveConnection,
        events: &[E],
    ) -> io::Result<usize> {
        for event in events {
            let line = self.formatter.format_now(&event.message());
            let frame = self.framing.frame(&line);
            conn.write_frame(&frame)?;
            self.stats.write_bytes(frame.len() as u64);
        }
        conn.flush()?;
        Ok(events.len())
    }

    fn settle_failed<B: Batch>(&self, batch: B) {
        let count = batch.events().len() as u64;
        if self.config.on_failure.apply(batch) == Disposition::Retried {
            self.stats.retried(count);
        } else if count > 0 {
            self.stats.dropped(count);
            self.warner.record_drops(count);
            self.warner.warn_if_due(|dropped| {
                warn!(
                    "FemtoSyslogClient discarded {dropped} events for {} after delivery failures",
                    self.target()
                );
            });
        }
    }

    fn target(&self) -> String {
        let network = self.connection.network();
        let address = match (network, self.connection.address()) {
            (Network::Unix, "") => DEFAULT_LOCAL_SOCKET,
            (_, address) => address,
        };
        format!("{network}://{address}")
    }
}

impl fmt::Display for FemtoSyslogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syslog({})", self.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formatter::MessageFormat,
        policy::FailureMode,
        test_utils::{RecordingBatch, ScriptedWriter},
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> SyslogConfig {
        SyslogConfig::new(Network::Tcp, "127.0.0.1:514")
    }

    fn client_with(config: SyslogConfig, writer: &ScriptedWriter) -> FemtoSyslogClient {
        FemtoSyslogClient::with_connection(
            config,
            ActiveConnection::Writer(Box::new(writer.clone())),
        )
        .expect("valid config")
        .with_id_source(|| "0badc0de".to_owned())
    }

    #[rstest]
    fn delivers_and_acks(config: SyslogConfig) {
        let writer = ScriptedWriter::new();
        let client = client_with(config, &writer);
        let batch = RecordingBatch::new(vec!["one".to_owned(), "two".to_owned()]);
        let outcomes = batch.outcomes();

        client.publish(batch).expect("delivery succeeds");

        assert_eq!(outcomes.snapshot(), vec![Disposition::Acknowledged]);
        let lines = writer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("<14>") && lines[0].ends_with(": one\n"));
        assert!(lines[1].ends_with(": two\n"));
        assert_eq!(writer.flushes(), 1);
        assert_eq!(client.state(), ConnectionState::Connected);
    }

    #[rstest]
    fn rfc5424_over_tcp_is_octet_counted(mut config: SyslogConfig) {
        config.format = MessageFormat::Rfc5424;
        config.hostname = Some("edge".into());
        let writer = ScriptedWriter::new();
        let client = client_with(config, &writer);

        client
            .publish(RecordingBatch::new(vec!["hello"]))
            .expect("delivery succeeds");

        let frame = writer.lines().remove(0);
        let frame = frame.strip_suffix('\n').expect("frame ends with newline");
        let (count, message) = frame.split_once(' ').expect("octet count prefix");
        assert_eq!(count.parse::<usize>().expect("numeric count"), message.len());
        assert!(message.starts_with("<14>1 "));
        assert!(message.ends_with(" edge beats - 0badc0de - hello"));
    }

    #[rstest]
    fn empty_batch_is_acknowledged(config: SyslogConfig) {
        let writer = ScriptedWriter::new();
        let client = client_with(config, &writer);
        let batch = RecordingBatch::<String>::new(Vec::new());
        let outcomes = batch.outcomes();

        client.publish(batch).expect("nothing to send");
        assert_eq!(outcomes.snapshot(), vec![Disposition::Acknowledged]);
        assert!(writer.frames().is_empty());
    }

    #[rstest]
    fn flush_failure_tears_down_connection(mut config: SyslogConfig) {
        config.on_failure = FailureMode::Retry;
        let writer = ScriptedWriter::failing_flush();
        let client = client_with(config, &writer);
        let batch = RecordingBatch::new(vec!["one"]);
        let outcomes = batch.outcomes();

        let err = client.publish(batch).expect_err("flush fails");
        assert!(matches!(err, SyslogError::Write(_)));
        assert_eq!(outcomes.snapshot(), vec![Disposition::Retried]);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[rstest]
    fn unset_hostname_keeps_resolved_local_name(config: SyslogConfig) {
        let client = client_with(config, &ScriptedWriter::new());
        assert_eq!(
            client.formatter().hostname(),
            crate::formatter::local_hostname()
        );
    }

    #[rstest]
    fn configured_hostname_overrides_local_name(mut config: SyslogConfig) {
        config.hostname = Some("edge-7".into());
        let client = client_with(config, &ScriptedWriter::new());
        assert_eq!(client.formatter().hostname(), Some("edge-7"));
    }

    #[rstest]
    fn stats_track_delivery_and_failures(config: SyslogConfig) {
        let writer = ScriptedWriter::failing_after(2);
        let client = client_with(config, &writer);

        client
            .publish(RecordingBatch::new(vec!["one", "two"]))
            .expect("first batch fits");
        let delivered: u64 = writer.frames().iter().map(|f| f.len() as u64).sum();
        client
            .publish(RecordingBatch::new(vec!["three"]))
            .expect_err("writer is exhausted");

        let stats = client.stats();
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.acked, 2);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.retried, 0);
        assert_eq!(stats.write_errors, 1);
        assert_eq!(stats.write_bytes, delivered);
    }

    #[rstest]
    fn display_names_target(config: SyslogConfig) {
        let client = client_with(config, &ScriptedWriter::new());
        assert_eq!(client.to_string(), "syslog(tcp://127.0.0.1:514)");
    }

    #[test]
    fn display_names_default_local_socket() {
        let client = client_with(SyslogConfig::new(Network::Unix, ""), &ScriptedWriter::new());
        assert_eq!(client.to_string(), "syslog(unix:///dev/log)");
    }

    #[test]
    fn invalid_config_is_rejected_before_dialling() {
        let err = FemtoSyslogClient::new(SyslogConfig::new(Network::Udp, ""))
            .expect_err("udp needs an address");
        assert!(matches!(err, SyslogError::InvalidConfig(_)));
    }

    #[rstest]
    fn close_disconnects(config: SyslogConfig) {
        let client = client_with(config, &ScriptedWriter::new());
        client.close();
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
