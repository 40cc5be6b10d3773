//! Local collectors that integration tests deliver to.
//!
//! Each fixture binds an ephemeral loopback port so tests can run in
//! parallel without a real syslog daemon.

use std::{
    io::Read,
    net::{TcpListener, TcpStream, UdpSocket},
    time::Duration,
};

use rstest::fixture;

/// Upper bound for any blocking read in the tests.
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// A bound collector socket.
pub enum Collector {
    Tcp(TcpListener),
    Udp(UdpSocket),
}

impl Collector {
    /// `host:port` clients should dial.
    pub fn address(&self) -> String {
        let addr = match self {
            Collector::Tcp(listener) => listener.local_addr(),
            Collector::Udp(socket) => socket.local_addr(),
        };
        addr.expect("collector has a local address").to_string()
    }

    /// Accept the next TCP client.
    pub fn accept(&self) -> TcpStream {
        let Collector::Tcp(listener) = self else {
            panic!("accept called on a UDP collector");
        };
        let (stream, _) = listener.accept().expect("accept client");
        stream
            .set_read_timeout(Some(TIMEOUT))
            .expect("set read timeout");
        stream
    }

    /// Receive one UDP datagram.
    pub fn recv_datagram(&self) -> Vec<u8> {
        let Collector::Udp(socket) = self else {
            panic!("recv_datagram called on a TCP collector");
        };
        let mut buf = vec![0u8; 64 * 1024];
        let n = socket.recv(&mut buf).expect("receive datagram");
        buf.truncate(n);
        buf
    }
}

/// Read exactly `len` bytes from `stream`.
pub fn read_exact(stream: &mut TcpStream, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).expect("read from client");
    buf
}

#[fixture]
pub fn tcp_collector() -> Collector {
    Collector::Tcp(TcpListener::bind(("127.0.0.1", 0)).expect("bind tcp collector"))
}

#[fixture]
pub fn udp_collector() -> Collector {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("bind udp collector");
    socket
        .set_read_timeout(Some(TIMEOUT))
        .expect("set read timeout");
    Collector::Udp(socket)
}

/// Loopback address with nothing listening on it.
#[fixture]
pub fn closed_tcp_address() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
    listener
        .local_addr()
        .expect("listener has address")
        .to_string()
}
