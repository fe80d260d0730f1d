//! Lamport logical clock.
//!
//! The server owns one authoritative clock and every client owns a local one.
//! All mutations go through a single atomic read-modify-write, so concurrent
//! callers never lose an update.

use std::{
    fmt,
    sync::atomic::{AtomicI64, Ordering},
};

use serde::{Deserialize, Serialize};

/// Initial value of every clock, server and client alike.
pub const INITIAL_CLOCK_VALUE: i64 = 1;

/// A logical timestamp observed on a clock or carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalTimestamp(i64);

impl LogicalTimestamp {
    /// Largest timestamp a peer may send.
    ///
    /// Leaves room for `i64::MAX / 2` further events after the largest
    /// accepted merge, so the clock keeps strictly increasing.
    pub const MAX_ACCEPTED: LogicalTimestamp = LogicalTimestamp(i64::MAX / 2);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `false` for values above [`Self::MAX_ACCEPTED`].
    pub fn is_acceptable(&self) -> bool {
        *self <= Self::MAX_ACCEPTED
    }
}

impl From<i64> for LogicalTimestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LogicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lamport merge law: `incoming + 1` when the incoming timestamp is ahead,
/// `local + 1` otherwise.
///
/// The result is strictly greater than both inputs.
pub fn merge_rule(local: i64, incoming: i64) -> i64 {
    if incoming > local {
        incoming.saturating_add(1)
    } else {
        local.saturating_add(1)
    }
}

/// Thread-safe Lamport clock.
#[derive(Debug)]
pub struct LamportClock {
    value: AtomicI64,
}

impl LamportClock {
    /// Create a clock starting at [`INITIAL_CLOCK_VALUE`].
    pub fn new() -> Self {
        Self::starting_at(INITIAL_CLOCK_VALUE)
    }

    pub fn starting_at(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }

    /// Current value without advancing the clock.
    pub fn current(&self) -> LogicalTimestamp {
        LogicalTimestamp(self.value.load(Ordering::Acquire))
    }

    /// Local event: advance by one and return the new value.
    pub fn tick(&self) -> LogicalTimestamp {
        self.advance(|current| current.saturating_add(1))
    }

    /// Observe a foreign timestamp and return the post-merge value.
    ///
    /// The returned value belongs to this merge only; a concurrent merge
    /// gets its own distinct value.
    pub fn merge(&self, incoming: LogicalTimestamp) -> LogicalTimestamp {
        self.advance(|current| merge_rule(current, incoming.value()))
    }

    fn advance(&self, step: impl Fn(i64) -> i64) -> LogicalTimestamp {
        // The closure never returns None, so both arms carry the previous value.
        let previous = match self
            .value
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(step(current))
            }) {
            Ok(previous) | Err(previous) => previous,
        };
        LogicalTimestamp(step(previous))
    }
}

impl Default for LamportClock {
    fn default() -> Self {
        Self::new()
    }
}
