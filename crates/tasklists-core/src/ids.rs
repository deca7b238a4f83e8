use chrono::Utc;

/// Wall-clock derived id source that never repeats.
///
/// Ids are millisecond timestamps bumped past the last issued id, so two
/// creations in the same millisecond still get distinct, increasing ids.
/// Once `u64::MAX` has been issued the generator is exhausted and yields
/// nothing.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    last: u64,
}

impl IdGen {
    /// Start above `floor` (typically the largest id already persisted).
    pub fn starting_after(floor: u64) -> Self {
        Self { last: floor }
    }

    pub fn next_id(&mut self) -> Option<u64> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now)
    }

    pub(crate) fn next_at(&mut self, now_ms: u64) -> Option<u64> {
        let id = now_ms.max(self.last.checked_add(1)?);
        self.last = id;
        Some(id)
    }
}
