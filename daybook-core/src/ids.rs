//! Identifier allocation for events and categories.

use chrono::Utc;

use crate::event::{CategoryId, EventId};

/// Hands out time-derived ids that never repeat.
///
/// Ids start from the current Unix time in milliseconds; when several are
/// requested within the same millisecond (a recurrence batch, say) the
/// counter keeps climbing past the clock instead of reusing a value.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids are greater than one already in use.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    fn next(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last = now.max(self.last + 1);
        self.last
    }

    pub fn next_event_id(&mut self) -> EventId {
        EventId(self.next())
    }

    pub fn next_category_id(&mut self) -> CategoryId {
        CategoryId(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase_within_one_millisecond() {
        let mut ids = IdGenerator::new();
        let batch: Vec<EventId> = (0..1000).map(|_| ids.next_event_id()).collect();
        assert!(batch.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = IdGenerator::new();
        let far_future = u64::MAX / 2;
        ids.observe(far_future);
        assert_eq!(ids.next_event_id(), EventId(far_future + 1));
        assert_eq!(ids.next_category_id(), CategoryId(far_future + 2));
    }
}
