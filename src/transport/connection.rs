//! Socket primitives for each transport kind.

use std::{
    io::{self, BufWriter, Write},
    net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket},
    time::Duration,
};

#[cfg(unix)]
use std::os::unix::net::UnixDatagram;

use super::{DEFAULT_LOCAL_SOCKET, Network};

/// Live socket held by the connection manager.
pub enum ActiveConnection {
    /// Buffered TCP stream; the buffer is flushed at the end of each batch.
    Tcp(BufWriter<TcpStream>),
    /// Connected UDP socket; each frame is one datagram.
    Udp(UdpSocket),
    /// Connected local datagram socket.
    #[cfg(unix)]
    Unix(UnixDatagram),
    /// Arbitrary writer standing in for a socket.
    #[cfg(any(test, feature = "test-util"))]
    Writer(Box<dyn Write + Send>),
}

impl ActiveConnection {
    /// Apply `timeout` to socket writes. `None` blocks indefinitely.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            ActiveConnection::Tcp(stream) => stream.get_ref().set_write_timeout(timeout),
            ActiveConnection::Udp(socket) => socket.set_write_timeout(timeout),
            #[cfg(unix)]
            ActiveConnection::Unix(socket) => socket.set_write_timeout(timeout),
            #[cfg(any(test, feature = "test-util"))]
            ActiveConnection::Writer(_) => Ok(()),
        }
    }

    /// Write one framed message.
    pub fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        match self {
            ActiveConnection::Tcp(stream) => stream.write_all(frame),
            ActiveConnection::Udp(socket) => check_datagram(socket.send(frame)?, frame),
            #[cfg(unix)]
            ActiveConnection::Unix(socket) => check_datagram(socket.send(frame)?, frame),
            #[cfg(any(test, feature = "test-util"))]
            ActiveConnection::Writer(writer) => writer.write_all(frame),
        }
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            ActiveConnection::Tcp(stream) => stream.flush(),
            ActiveConnection::Udp(_) => Ok(()),
            #[cfg(unix)]
            ActiveConnection::Unix(_) => Ok(()),
            #[cfg(any(test, feature = "test-util"))]
            ActiveConnection::Writer(writer) => writer.flush(),
        }
    }

    /// Close the socket. Errors are ignored; the connection is discarded.
    pub fn shutdown(&mut self) {
        match self {
            ActiveConnection::Tcp(stream) => {
                let _ = stream.get_ref().shutdown(Shutdown::Both);
            }
            ActiveConnection::Udp(_) => {}
            #[cfg(unix)]
            ActiveConnection::Unix(socket) => {
                let _ = socket.shutdown(Shutdown::Both);
            }
            #[cfg(any(test, feature = "test-util"))]
            ActiveConnection::Writer(_) => {}
        }
    }
}

impl std::fmt::Debug for ActiveConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ActiveConnection::Tcp(_) => "Tcp",
            ActiveConnection::Udp(_) => "Udp",
            #[cfg(unix)]
            ActiveConnection::Unix(_) => "Unix",
            #[cfg(any(test, feature = "test-util"))]
            ActiveConnection::Writer(_) => "Writer",
        };
        f.debug_tuple("ActiveConnection").field(&kind).finish()
    }
}

fn check_datagram(sent: usize, frame: &[u8]) -> io::Result<()> {
    if sent == frame.len() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("datagram truncated: sent {sent} of {} bytes", frame.len()),
        ))
    }
}

fn resolve(network: Network, address: &str) -> io::Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = address
        .to_socket_addrs()?
        .filter(|addr| network.accepts(addr))
        .collect();
    if addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no {network} address found for {address}"),
        ));
    }
    Ok(addrs)
}

fn connect_tcp(addrs: &[SocketAddr], timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => {
                stream.set_nonblocking(false)?;
                return Ok(stream);
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::TimedOut, "no address could be dialled")
    }))
}

fn connect_udp(addrs: &[SocketAddr]) -> io::Result<UdpSocket> {
    let mut last_err = None;
    for addr in addrs {
        let local: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        match UdpSocket::bind(local).and_then(|socket| socket.connect(addr).map(|()| socket)) {
            Ok(socket) => return Ok(socket),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no address could be dialled")
    }))
}

#[cfg(unix)]
fn connect_local(path: &str) -> io::Result<UnixDatagram> {
    let socket = UnixDatagram::unbound()?;
    socket.connect(path)?;
    Ok(socket)
}

#[cfg(not(unix))]
fn connect_local(_path: &str) -> io::Result<ActiveConnection> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "local syslog sockets are not supported on this platform",
    ))
}

/// Dial `address` over `network`.
///
/// TCP dials honour `connect_timeout` for each resolved address. For the
/// `unix` transport `address` is a socket path and defaults to
/// [`DEFAULT_LOCAL_SOCKET`] when blank.
pub fn connect_transport(
    network: Network,
    address: &str,
    connect_timeout: Duration,
    write_timeout: Option<Duration>,
) -> io::Result<ActiveConnection> {
    let connection = match network {
        Network::Tcp | Network::Tcp4 | Network::Tcp6 => {
            let addrs = resolve(network, address)?;
            ActiveConnection::Tcp(BufWriter::new(connect_tcp(&addrs, connect_timeout)?))
        }
        Network::Udp | Network::Udp4 | Network::Udp6 => {
            let addrs = resolve(network, address)?;
            ActiveConnection::Udp(connect_udp(&addrs)?)
        }
        Network::Unix => {
            let path = if address.trim().is_empty() {
                DEFAULT_LOCAL_SOCKET
            } else {
                address.trim()
            };
            #[cfg(unix)]
            {
                ActiveConnection::Unix(connect_local(path)?)
            }
            #[cfg(not(unix))]
            {
                connect_local(path)?
            }
        }
    };
    connection.set_write_timeout(write_timeout)?;
    Ok(connection)
}
