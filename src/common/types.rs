use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since the UNIX epoch.
pub type Timestamp = i64;

/// TimeRange is an inclusive `[min_time, max_time]` window in milliseconds.
/// A range with `min_time > max_time` is empty.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min_time: Timestamp,
    pub max_time: Timestamp,
}

impl TimeRange {
    /// The range a store advertises when it cannot bound the data it holds.
    pub const UNBOUNDED: TimeRange = TimeRange {
        min_time: i64::MIN,
        max_time: i64::MAX,
    };

    pub fn new(min_time: Timestamp, max_time: Timestamp) -> Self {
        Self { min_time, max_time }
    }

    pub fn is_empty(&self) -> bool {
        self.min_time > self.max_time
    }

    /// Both bounds are inclusive, so ranges touching at a single point overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.min_time <= other.max_time && other.min_time <= self.max_time
    }

    /// Extends this range to cover `other`.
    pub fn union(&self, other: &TimeRange) -> TimeRange {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        TimeRange {
            min_time: self.min_time.min(other.min_time),
            max_time: self.max_time.max(other.max_time),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::UNBOUNDED
    }
}
