//! IETF syslog lines (RFC 5424) without structured data.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{DEFAULT_APP_NAME, NIL_VALUE, escape_newlines, non_empty};
use crate::priority::Priority;

/// Build `<PRI>1 TIMESTAMP HOST APP-NAME - MSGID - MSG`.
///
/// PROCID and STRUCTURED-DATA are always the nil value. A blank `hostname`
/// or `msgid` is written as the nil value; a blank `app_name` becomes
/// `beats`.
pub fn format_rfc5424(
    priority: Priority,
    timestamp: &DateTime<Utc>,
    hostname: &str,
    app_name: &str,
    msgid: &str,
    message: &str,
) -> String {
    format!(
        "<{}>1 {} {} {} {} {} {} {}",
        priority,
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        non_empty(hostname, NIL_VALUE),
        non_empty(app_name, DEFAULT_APP_NAME),
        NIL_VALUE,
        non_empty(msgid, NIL_VALUE),
        NIL_VALUE,
        escape_newlines(message),
    )
}
