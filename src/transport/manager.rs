//! Ownership of the single outbound connection.
//!
//! The handle slot is guarded by its own mutex. Dialling, closing and the
//! presence check happen while holding it; socket writes happen on the
//! shared connection after the slot lock has been released.

use std::{io, sync::Arc, time::Duration};

use log::debug;
use parking_lot::Mutex;

use super::{ActiveConnection, Network, connect_transport};

/// Connection shared between the manager and the caller writing a batch.
pub type SharedConnection = Arc<Mutex<ActiveConnection>>;

/// Observable state of a [`ConnectionManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Lazily dials and tears down the connection to one collector.
pub struct ConnectionManager {
    network: Network,
    address: String,
    connect_timeout: Duration,
    write_timeout: Option<Duration>,
    slot: Mutex<Option<SharedConnection>>,
}

impl ConnectionManager {
    /// Create a manager in the disconnected state.
    pub fn new(
        network: Network,
        address: impl Into<String>,
        connect_timeout: Duration,
        write_timeout: Option<Duration>,
    ) -> Self {
        Self {
            network,
            address: address.into(),
            connect_timeout,
            write_timeout,
            slot: Mutex::new(None),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Return the live connection, dialling first when there is none.
    ///
    /// A failed dial leaves the manager disconnected.
    pub fn connect(&self) -> io::Result<SharedConnection> {
        let mut slot = self.slot.lock();
        if let Some(conn) = slot.as_ref() {
            return Ok(Arc::clone(conn));
        }
        let conn = connect_transport(
            self.network,
            &self.address,
            self.connect_timeout,
            self.write_timeout,
        )?;
        debug!(
            "FemtoSyslogClient connected to {}://{}",
            self.network, self.address
        );
        let shared = Arc::new(Mutex::new(conn));
        *slot = Some(Arc::clone(&shared));
        Ok(shared)
    }

    /// Tear down `failed` if it is still the current connection.
    ///
    /// The next [`connect`](Self::connect) dials afresh. A connection that was
    /// already replaced by another caller is left alone.
    pub fn invalidate(&self, failed: &SharedConnection) {
        let taken = {
            let mut slot = self.slot.lock();
            match slot.as_ref() {
                Some(current) if Arc::ptr_eq(current, failed) => slot.take(),
                _ => None,
            }
        };
        if let Some(conn) = taken {
            conn.lock().shutdown();
            debug!(
                "FemtoSyslogClient dropped connection to {}://{}",
                self.network, self.address
            );
        }
    }

    /// Close the current connection, if any.
    pub fn close(&self) {
        let taken = self.slot.lock().take();
        if let Some(conn) = taken {
            let mut conn = conn.lock();
            let _ = conn.flush();
            conn.shutdown();
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.slot.lock().is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Install `conn` as the current connection, replacing any other.
    #[cfg(any(test, feature = "test-util"))]
    pub fn install(&self, conn: ActiveConnection) -> SharedConnection {
        let shared = Arc::new(Mutex::new(conn));
        *self.slot.lock() = Some(Arc::clone(&shared));
        shared
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("network", &self.network)
            .field("address", &self.address)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    use rstest::{fixture, rstest};

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[fixture]
    fn tcp_listener() -> TcpListener {
        TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
    }

    fn manager_for(listener: &TcpListener) -> ConnectionManager {
        let addr = listener.local_addr().expect("listener has address");
        ConnectionManager::new(Network::Tcp, addr.to_string(), TIMEOUT, None)
    }

    #[rstest]
    fn starts_disconnected(tcp_listener: TcpListener) {
        assert_eq!(manager_for(&tcp_listener).state(), ConnectionState::Disconnected);
    }

    #[rstest]
    fn reuses_live_connection(tcp_listener: TcpListener) {
        let manager = manager_for(&tcp_listener);
        let first = manager.connect().expect("first dial");
        let second = manager.connect().expect("reuse");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.network(), Network::Tcp);
        assert_eq!(
            manager.address(),
            tcp_listener.local_addr().expect("listener has address").to_string()
        );
    }

    #[rstest]
    fn invalidate_forces_redial(tcp_listener: TcpListener) {
        let manager = manager_for(&tcp_listener);
        let first = manager.connect().expect("first dial");
        manager.invalidate(&first);
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        let second = manager.connect().expect("redial");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[rstest]
    fn stale_invalidate_keeps_replacement(tcp_listener: TcpListener) {
        let manager = manager_for(&tcp_listener);
        let stale = manager.connect().expect("first dial");
        manager.invalidate(&stale);
        let fresh = manager.connect().expect("redial");

        manager.invalidate(&stale);
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert!(Arc::ptr_eq(&fresh, &manager.connect().expect("reuse")));
    }

    #[test]
    fn failed_dial_stays_disconnected() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
        let manager = manager_for(&listener);
        drop(listener);

        assert!(manager.connect().is_err());
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[rstest]
    fn close_clears_connection(tcp_listener: TcpListener) {
        let manager = manager_for(&tcp_listener);
        manager.connect().expect("dial");
        manager.close();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }
}
