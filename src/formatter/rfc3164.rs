//! BSD syslog lines (RFC 3164).

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use super::{DEFAULT_APP_NAME, FALLBACK_HOSTNAME, escape_newlines, non_empty};
use crate::priority::Priority;

/// `Mmm dd HH:MM:SS` with the day padded by a space.
const TIMESTAMP_FORMAT: &str = "%b %e %H:%M:%S";

/// Build `<PRI>Mmm dd HH:MM:SS HOST TAG: MSG`.
///
/// The timestamp is rendered in whatever zone `timestamp` carries; the
/// client passes local time. A blank `hostname` becomes `localhost` and a
/// blank `tag` becomes `beats`.
pub fn format_rfc3164<Tz>(
    priority: Priority,
    timestamp: &DateTime<Tz>,
    hostname: &str,
    tag: &str,
    message: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "<{}>{} {} {}: {}",
        priority,
        timestamp.format(TIMESTAMP_FORMAT),
        non_empty(hostname, FALLBACK_HOSTNAME),
        non_empty(tag, DEFAULT_APP_NAME),
        escape_newlines(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::priority;
    use chrono::{FixedOffset, Utc};
    use regex::Regex;
    use rstest::rstest;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 4, 5)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(2, "<30>Jan  2 03:04:05 host mytag: hello world\\nnext")]
    #[case(12, "<30>Jan 12 03:04:05 host mytag: hello world\\nnext")]
    fn renders_exact_line(#[case] day: u32, #[case] expected: &str) {
        let line = format_rfc3164(
            priority("daemon", "info"),
            &at(day, 3),
            "host",
            "mytag",
            "hello world\nnext",
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn renders_in_the_supplied_zone() {
        let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let line = format_rfc3164(
            priority("user", "notice"),
            &at(2, 23).with_timezone(&offset),
            "host",
            "app",
            "x",
        );
        assert!(line.starts_with("<13>Jan  3 01:04:05 "), "unexpected line {line}");
    }

    #[test]
    fn blank_identity_uses_fallbacks() {
        let line = format_rfc3164(priority("daemon", "info"), &at(5, 0), " ", "", "m");
        assert!(line.ends_with(" localhost beats: m"), "unexpected line {line}");
    }

    #[test]
    fn matches_bsd_shape() {
        let shape = Regex::new(r"^<\d{1,3}>[A-Z][a-z]{2} [ \d]\d \d{2}:\d{2}:\d{2} \S+ \S+: .*$")
            .expect("valid regex");
        let line = format_rfc3164(
            priority("local3", "warning"),
            &Utc::now(),
            "collector-01",
            "svc",
            "multi\nline\nbody",
        );
        assert!(shape.is_match(&line), "unexpected line {line}");
        assert!(!line.contains('\n'));
    }
}
