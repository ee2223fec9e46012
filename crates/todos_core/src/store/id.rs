//! Item id generation.

use crate::model::item::ItemId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` when the clock reads before the unix epoch; the
/// generator still advances past any previously issued id.
pub fn system_clock_ms() -> ItemId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| ItemId::try_from(elapsed.as_millis()).unwrap_or(ItemId::MAX))
        .unwrap_or(0)
}

/// Timestamp-shaped id source.
///
/// Each id is `max(clock(), last + 1)`, so two adds in the same millisecond
/// (or after a clock step backwards) still get distinct, ordered ids. Once
/// `last` reaches `ItemId::MAX` there is no larger id left and `next_id`
/// returns `None`; the caller picks a free id itself.
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    last: Option<ItemId>,
    clock: fn() -> ItemId,
}

impl IdGenerator {
    pub fn new(clock: fn() -> ItemId) -> Self {
        Self { last: None, clock }
    }

    /// Current clock reading.
    pub fn now(&self) -> ItemId {
        (self.clock)()
    }

    pub fn next_id(&mut self) -> Option<ItemId> {
        let now = self.now();
        let id = match self.last {
            Some(last) if now <= last => last.checked_add(1)?,
            _ => now,
        };
        self.last = Some(id);
        Some(id)
    }

    /// Guarantees future ids are greater than `id`.
    pub fn observe(&mut self, id: ItemId) {
        if self.last.map_or(true, |last| id > last) {
            self.last = Some(id);
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(system_clock_ms)
    }
}
