//! A batch that records the disposition it receives.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::batch::{Batch, Disposition, SyslogEvent};

/// Shared view of the dispositions reported to a [`RecordingBatch`].
#[derive(Clone, Debug, Default)]
pub struct Outcomes {
    reported: Arc<Mutex<Vec<Disposition>>>,
}

impl Outcomes {
    /// Every disposition reported so far, in order.
    pub fn snapshot(&self) -> Vec<Disposition> {
        self.reported.lock().clone()
    }

    /// Number of acknowledgements.
    pub fn acked(&self) -> usize {
        self.count(Disposition::Acknowledged)
    }

    /// Number of retry requests.
    pub fn retried(&self) -> usize {
        self.count(Disposition::Retried)
    }

    fn count(&self, wanted: Disposition) -> usize {
        self.reported.lock().iter().filter(|d| **d == wanted).count()
    }

    fn push(&self, disposition: Disposition) {
        self.reported.lock().push(disposition);
    }
}

/// Batch over owned events that reports into an [`Outcomes`] handle.
#[derive(Debug)]
pub struct RecordingBatch<E> {
    events: Vec<E>,
    outcomes: Outcomes,
}

impl<E> RecordingBatch<E> {
    pub fn new(events: Vec<E>) -> Self {
        Self {
            events,
            outcomes: Outcomes::default(),
        }
    }

    /// Handle that stays readable after the batch is consumed.
    pub fn outcomes(&self) -> Outcomes {
        self.outcomes.clone()
    }
}

impl<E: SyslogEvent> Batch for RecordingBatch<E> {
    type Event = E;

    fn events(&self) -> &[E] {
        &self.events
    }

    fn ack(self) {
        self.outcomes.push(Disposition::Acknowledged);
    }

    fn retry(self) {
        self.outcomes.push(Disposition::Retried);
    }
}
