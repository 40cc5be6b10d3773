//! MSGID generation for RFC 5424 messages.

use rand::Rng;

/// Source of RFC 5424 MSGID values.
///
/// The client asks for one identifier per formatted message. Implementations
/// must be thread-safe so a formatter can be shared between callers.
pub trait MessageIdSource: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> String;
}

/// Eight lowercase hex characters drawn from four random bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomMessageId;

impl MessageIdSource for RandomMessageId {
    fn next_id(&self) -> String {
        let bytes: [u8; 4] = rand::thread_rng().r#gen();
        hex::encode(bytes)
    }
}

impl<F> MessageIdSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}
