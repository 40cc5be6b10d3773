//! Wire framing for formatted syslog lines.
//!
//! Every frame ends with a single newline. Stream transports carrying RFC 5424
//! messages use octet counting (RFC 6587 section 3.4.1): the decimal byte
//! length of the message, one space, then the message. Everything else is
//! sent as a plain newline-terminated line.

use crate::{formatter::MessageFormat, transport::Network};

/// Framing strategy chosen once per client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
    /// `MSG\n`
    NonTransparent,
    /// `LEN MSG\n`, where `LEN` counts only the bytes of `MSG`.
    OctetCounting,
}

impl Framing {
    /// Pick the framing for a transport and message format.
    pub fn select(network: Network, format: MessageFormat) -> Self {
        match (network.is_stream(), format) {
            (true, MessageFormat::Rfc5424) => Self::OctetCounting,
            _ => Self::NonTransparent,
        }
    }

    /// Produce the exact bytes to write for `message`.
    pub fn frame(self, message: &str) -> Vec<u8> {
        match self {
            Self::NonTransparent => {
                let mut framed = Vec::with_capacity(message.len() + 1);
                framed.extend_from_slice(message.as_bytes());
                framed.push(b'\n');
                framed
            }
            Self::OctetCounting => {
                let prefix = message.len().to_string();
                let mut framed = Vec::with_capacity(prefix.len() + message.len() + 2);
                framed.extend_from_slice(prefix.as_bytes());
                framed.push(b' ');
                framed.extend_from_slice(message.as_bytes());
                framed.push(b'\n');
                framed
            }
        }
    }
}
