//! Outbound socket handling for the syslog client.
//!
//! [`Network`] names the transport kind, [`connect_transport`] dials it and
//! [`ConnectionManager`] owns the single live connection of a client,
//! redialling lazily after a failed write tore the previous one down.

use std::{fmt, net::SocketAddr, str::FromStr};

mod connection;
mod manager;

pub use connection::{ActiveConnection, connect_transport};
pub use manager::{ConnectionManager, ConnectionState, SharedConnection};

/// Socket path used by the `unix` transport when no address is configured.
pub const DEFAULT_LOCAL_SOCKET: &str = "/dev/log";

/// Transport kind used to reach the collector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Network {
    /// UDP over any address family.
    #[default]
    Udp,
    Udp4,
    Udp6,
    /// TCP over any address family.
    Tcp,
    Tcp4,
    Tcp6,
    /// Local datagram socket, e.g. `/dev/log`.
    Unix,
}

impl Network {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Udp4 => "udp4",
            Self::Udp6 => "udp6",
            Self::Tcp => "tcp",
            Self::Tcp4 => "tcp4",
            Self::Tcp6 => "tcp6",
            Self::Unix => "unix",
        }
    }

    /// Whether the transport is a byte stream rather than datagrams.
    pub const fn is_stream(self) -> bool {
        matches!(self, Self::Tcp | Self::Tcp4 | Self::Tcp6)
    }

    /// Whether the transport dials an IP address.
    pub const fn is_inet(self) -> bool {
        !matches!(self, Self::Unix)
    }

    fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Self::Udp4 | Self::Tcp4 => addr.is_ipv4(),
            Self::Udp6 | Self::Tcp6 => addr.is_ipv6(),
            Self::Udp | Self::Tcp | Self::Unix => true,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    /// Parse a transport name; an empty name selects local delivery.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "udp4" => Ok(Self::Udp4),
            "udp6" => Ok(Self::Udp6),
            "tcp" => Ok(Self::Tcp),
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            "" | "unix" | "unixgram" => Ok(Self::Unix),
            other => Err(format!("unsupported syslog network {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("udp", Network::Udp)]
    #[case("TCP", Network::Tcp)]
    #[case(" tcp6 ", Network::Tcp6)]
    #[case("udp4", Network::Udp4)]
    #[case("", Network::Unix)]
    #[case("unixgram", Network::Unix)]
    fn parses_network_names(#[case] raw: &str, #[case] expected: Network) {
        assert_eq!(raw.parse::<Network>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_network() {
        let err = "sctp".parse::<Network>().expect_err("sctp is unsupported");
        assert!(err.contains("sctp"));
    }

    #[rstest]
    #[case(Network::Tcp4, "127.0.0.1:514", true)]
    #[case(Network::Tcp4, "[::1]:514", false)]
    #[case(Network::Udp6, "[::1]:514", true)]
    #[case(Network::Udp6, "10.0.0.1:514", false)]
    #[case(Network::Udp, "[::1]:514", true)]
    fn family_filter(#[case] network: Network, #[case] addr: &str, #[case] expected: bool) {
        let addr: SocketAddr = addr.parse().expect("valid socket address");
        assert_eq!(network.accepts(&addr), expected);
    }
}
