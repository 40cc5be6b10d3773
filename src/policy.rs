//! What happens to a batch when delivery fails.

use std::fmt;

use crate::batch::{Batch, Disposition};

/// Failure handling selected by the `on_failure` option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Ask the caller to resubmit the whole batch.
    Retry,
    /// Acknowledge the batch, dropping its events.
    #[default]
    Discard,
}

impl FailureMode {
    /// Interpret an `on_failure` value.
    ///
    /// Only `retry` (trimmed, any case) selects [`FailureMode::Retry`]; every
    /// other value, including an empty one, discards. A malformed setting can
    /// therefore never cause an endless retry loop.
    pub fn from_config(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("retry") {
            Self::Retry
        } else {
            Self::Discard
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Discard => "discard",
        }
    }

    /// Report the failure to `batch` and return the disposition taken.
    pub fn apply<B: Batch>(self, batch: B) -> Disposition {
        match self {
            Self::Retry => {
                batch.retry();
                Disposition::Retried
            }
            Self::Discard => {
                batch.ack();
                Disposition::Acknowledged
            }
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
