//! Syslog facility and severity codes and the PRI value derived from them.
//!
//! Names are matched case-insensitively. Lookups used on the delivery path
//! never fail: an unknown facility resolves to [`Facility::Daemon`] and an
//! unknown severity to [`Severity::Info`] so a typo in configuration cannot
//! block log delivery.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Syslog facility, numbered as in RFC 5424 section 6.2.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facility {
    Kern,
    User,
    Mail,
    Daemon,
    Auth,
    Syslog,
    Lpr,
    News,
    Uucp,
    Cron,
    AuthPriv,
    Ftp,
    Ntp,
    /// Log audit, also known as `security`.
    Audit,
    /// Log alert, also known as `console`.
    Console,
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
}

impl Facility {
    /// Fallback used when a configured name is not recognised.
    pub const FALLBACK: Self = Self::Daemon;

    /// Numeric facility code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Kern => 0,
            Self::User => 1,
            Self::Mail => 2,
            Self::Daemon => 3,
            Self::Auth => 4,
            Self::Syslog => 5,
            Self::Lpr => 6,
            Self::News => 7,
            Self::Uucp => 8,
            Self::Cron => 9,
            Self::AuthPriv => 10,
            Self::Ftp => 11,
            Self::Ntp => 12,
            Self::Audit => 13,
            Self::Console => 14,
            Self::Local0 => 16,
            Self::Local1 => 17,
            Self::Local2 => 18,
            Self::Local3 => 19,
            Self::Local4 => 20,
            Self::Local5 => 21,
            Self::Local6 => 22,
            Self::Local7 => 23,
        }
    }

    /// Canonical lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::AuthPriv => "authpriv",
            Self::Ftp => "ftp",
            Self::Ntp => "ntp",
            Self::Audit => "audit",
            Self::Console => "console",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }

    /// Parse `name`, falling back to [`Facility::FALLBACK`].
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or(Self::FALLBACK)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facility {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kern" => Ok(Self::Kern),
            "user" => Ok(Self::User),
            "mail" => Ok(Self::Mail),
            "daemon" => Ok(Self::Daemon),
            "auth" => Ok(Self::Auth),
            "syslog" => Ok(Self::Syslog),
            "lpr" => Ok(Self::Lpr),
            "news" => Ok(Self::News),
            "uucp" => Ok(Self::Uucp),
            "cron" => Ok(Self::Cron),
            "authpriv" => Ok(Self::AuthPriv),
            "ftp" => Ok(Self::Ftp),
            "ntp" => Ok(Self::Ntp),
            "audit" | "security" => Ok(Self::Audit),
            "console" => Ok(Self::Console),
            "local0" => Ok(Self::Local0),
            "local1" => Ok(Self::Local1),
            "local2" => Ok(Self::Local2),
            "local3" => Ok(Self::Local3),
            "local4" => Ok(Self::Local4),
            "local5" => Ok(Self::Local5),
            "local6" => Ok(Self::Local6),
            "local7" => Ok(Self::Local7),
            _ => Err(UnknownName(s.to_owned())),
        }
    }
}

/// Syslog severity, numbered as in RFC 5424 section 6.2.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    /// Fallback used when a configured name is not recognised.
    pub const FALLBACK: Self = Self::Info;

    /// Numeric severity code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Canonical lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "emerg",
            Self::Alert => "alert",
            Self::Critical => "crit",
            Self::Error => "err",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Parse `name`, falling back to [`Severity::FALLBACK`].
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or(Self::FALLBACK)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emerg" => Ok(Self::Emergency),
            "alert" => Ok(Self::Alert),
            "crit" => Ok(Self::Critical),
            "err" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(UnknownName(s.to_owned())),
        }
    }
}

/// Name that matched no facility or severity.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown syslog name {0:?}")]
pub struct UnknownName(pub String);

/// PRI value placed in angle brackets at the start of every message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Priority(u8);

impl Priority {
    /// Combine a facility and severity into a PRI value.
    pub const fn new(facility: Facility, severity: Severity) -> Self {
        Self(facility.code() * 8 + severity.code())
    }

    /// Numeric PRI value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the PRI for a facility and severity given by name.
///
/// Unknown names silently fall back to `daemon` and `info`.
pub fn priority(facility: &str, severity: &str) -> Priority {
    Priority::new(
        Facility::parse_or_default(facility),
        Severity::parse_or_default(severity),
    )
}
