//! Syslog message formatters.
//!
//! Two wire formats are supported: the BSD format described by RFC 3164 and
//! the structured format of RFC 5424 (without SD-PARAM elements). Both
//! produce exactly one line per message; embedded newlines in the body are
//! escaped as the two characters `\n` because the framing layer relies on
//! that.
//!
//! The free functions [`format_rfc3164`] and [`format_rfc5424`] are pure
//! apart from their inputs. [`SyslogFormatter`] binds the per-client identity
//! (priority, hostname, application name, MSGID source) so callers only
//! supply the message body.

use std::{borrow::Cow, fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, Local, Utc};
use once_cell::sync::Lazy;

use crate::priority::Priority;

mod message_id;
mod rfc3164;
mod rfc5424;

pub use message_id::{MessageIdSource, RandomMessageId};
pub use rfc3164::format_rfc3164;
pub use rfc5424::format_rfc5424;

/// APP-NAME / TAG used when none is configured.
pub const DEFAULT_APP_NAME: &str = "beats";
/// RFC 5424 placeholder for an absent field.
pub const NIL_VALUE: &str = "-";
/// RFC 3164 hostname used when the local name cannot be resolved.
pub const FALLBACK_HOSTNAME: &str = "localhost";

static LOCAL_HOSTNAME: Lazy<Option<String>> = Lazy::new(|| {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
});

/// Hostname of this machine, resolved once per process.
pub fn local_hostname() -> Option<&'static str> {
    LOCAL_HOSTNAME.as_deref()
}

/// Wire format selected for outgoing messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageFormat {
    /// `<PRI>Mmm dd HH:MM:SS HOST TAG: MSG`
    #[default]
    Rfc3164,
    /// `<PRI>1 TIMESTAMP HOST APP-NAME - MSGID - MSG`
    Rfc5424,
}

impl MessageFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rfc3164 => "rfc3164",
            Self::Rfc5424 => "rfc5424",
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageFormat {
    type Err = String;

    /// Parse a format selector; an empty selector means RFC 3164.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "rfc3164" => Ok(Self::Rfc3164),
            "rfc5424" => Ok(Self::Rfc5424),
            other => Err(format!("unsupported syslog format {other:?}")),
        }
    }
}

/// Replace every newline with the two-character escape `\n`.
pub fn escape_newlines(message: &str) -> Cow<'_, str> {
    if message.contains('\n') {
        Cow::Owned(message.replace('\n', "\\n"))
    } else {
        Cow::Borrowed(message)
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}

/// Formats message bodies using a fixed identity.
#[derive(Clone)]
pub struct SyslogFormatter {
    format: MessageFormat,
    priority: Priority,
    hostname: Option<String>,
    app_name: String,
    ids: Arc<dyn MessageIdSource>,
}

impl SyslogFormatter {
    /// Create a formatter for the local host with random MSGIDs.
    ///
    /// An empty `app_name` is replaced by [`DEFAULT_APP_NAME`].
    pub fn new(format: MessageFormat, priority: Priority, app_name: &str) -> Self {
        Self {
            format,
            priority,
            hostname: local_hostname().map(str::to_owned),
            app_name: non_empty(app_name, DEFAULT_APP_NAME).to_owned(),
            ids: Arc::new(RandomMessageId),
        }
    }

    /// Override the hostname written into each message.
    ///
    /// `None` or a blank name marks the hostname as unavailable: RFC 3164
    /// messages then carry [`FALLBACK_HOSTNAME`] and RFC 5424 messages the nil
    /// value.
    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname.filter(|name| !name.trim().is_empty());
        self
    }

    /// Replace the source of RFC 5424 MSGIDs.
    pub fn with_id_source<S>(mut self, ids: S) -> Self
    where
        S: MessageIdSource + 'static,
    {
        self.ids = Arc::new(ids);
        self
    }

    pub fn format(&self) -> MessageFormat {
        self.format
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Format `message` stamped with the current time.
    pub fn format_now(&self, message: &str) -> String {
        self.format_at(message, Utc::now())
    }

    /// Format `message` stamped with `timestamp`.
    pub fn format_at(&self, message: &str, timestamp: DateTime<Utc>) -> String {
        let hostname = self.hostname.as_deref().unwrap_or_default();
        match self.format {
            MessageFormat::Rfc3164 => format_rfc3164(
                self.priority,
                &timestamp.with_timezone(&Local),
                hostname,
                &self.app_name,
                message,
            ),
            MessageFormat::Rfc5424 => format_rfc5424(
                self.priority,
                &timestamp,
                hostname,
                &self.app_name,
                &self.ids.next_id(),
                message,
            ),
        }
    }
}

impl fmt::Debug for SyslogFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogFormatter")
            .field("format", &self.format)
            .field("priority", &self.priority)
            .field("hostname", &self.hostname)
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}
