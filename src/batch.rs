//! Events and the batch interface implemented by the calling pipeline.
//!
//! The client only needs one message string per event. [`SyslogEvent`]
//! expresses that, and [`Event`] is a ready-made implementation carrying a
//! JSON field map the way upstream shippers hand events over.

use std::borrow::Cow;

use log::debug;
use serde_json::{Map, Value};

/// Field holding the free-text payload of an [`Event`].
pub const MESSAGE_FIELD: &str = "message";

/// Anything the client can extract a message body from.
pub trait SyslogEvent {
    /// Message text of the event. Absent content yields an empty string.
    fn message(&self) -> Cow<'_, str>;
}

impl SyslogEvent for String {
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl SyslogEvent for &str {
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(*self)
    }
}

/// Structured event with optional JSON fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    fields: Option<Map<String, Value>>,
}

impl Event {
    /// Event carrying `fields`.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields: Some(fields),
        }
    }

    /// Event whose only field is `message`.
    pub fn with_message(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(MESSAGE_FIELD.to_owned(), Value::String(message.into()));
        Self::new(fields)
    }

    /// Decode an event from raw bytes.
    ///
    /// A JSON object becomes the field map. Anything else is kept as the
    /// message text, with invalid UTF-8 replaced rather than rejected.
    pub fn from_bytes(raw: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(fields)) => Self::new(fields),
            _ => Self::with_message(String::from_utf8_lossy(raw).into_owned()),
        }
    }

    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.fields.as_ref()
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

impl SyslogEvent for Event {
    /// The `message` field when present (strings verbatim, other values as
    /// JSON), otherwise every field rendered as JSON.
    fn message(&self) -> Cow<'_, str> {
        let Some(fields) = &self.fields else {
            return Cow::Borrowed("");
        };
        match fields.get(MESSAGE_FIELD) {
            Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
            Some(Value::Null) => Cow::Borrowed(""),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Owned(serde_json::to_string(fields).unwrap_or_else(|err| {
                debug!("FemtoSyslogClient could not render event fields: {err}");
                String::new()
            })),
        }
    }
}

/// Outcome reported to the batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Delivered, or discarded after a failure.
    Acknowledged,
    /// Handed back to the caller for resubmission.
    Retried,
}

/// A group of events delivered as one unit.
///
/// The client reports exactly one disposition per batch. Both disposition
/// methods consume the batch, so a second report cannot be made.
pub trait Batch {
    type Event: SyslogEvent;

    /// Events in delivery order.
    fn events(&self) -> &[Self::Event];

    /// Mark the batch as done, either delivered or discarded.
    fn ack(self);

    /// Ask the caller to resubmit the whole batch later.
    fn retry(self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn event(value: Value) -> Event {
        match value {
            Value::Object(fields) => Event::new(fields),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn empty_event_has_empty_message() {
        assert_eq!(Event::default().message(), "");
    }

    #[rstest]
    #[case(json!({"message": "hello"}), "hello")]
    #[case(json!({"message": 42, "host": "a"}), "42")]
    #[case(json!({"message": null}), "")]
    #[case(json!({"message": {"k": "v"}}), r#"{"k":"v"}"#)]
    #[case(json!({"level": "warn"}), r#"{"level":"warn"}"#)]
    fn extracts_message(#[case] fields: Value, #[case] expected: &str) {
        assert_eq!(event(fields).message(), expected);
    }

    #[test]
    fn raw_json_object_becomes_fields() {
        let parsed = Event::from_bytes(br#"{"message":"from json","n":1}"#);
        assert_eq!(parsed.message(), "from json");
        assert_eq!(parsed.fields().map(Map::len), Some(2));
    }

    #[rstest]
    #[case(b"plain text".as_slice(), "plain text")]
    #[case(b"[1,2]".as_slice(), "[1,2]")]
    #[case(b"bad \xff byte".as_slice(), "bad \u{fffd} byte")]
    fn raw_non_objects_degrade_to_text(#[case] raw: &[u8], #[case] expected: &str) {
        assert_eq!(Event::from_bytes(raw).message(), expected);
    }

    #[test]
    fn strings_are_events() {
        assert_eq!(String::from("owned").message(), "owned");
        assert_eq!("borrowed".message(), "borrowed");
    }
}
