//! Wall-clock helpers with clock abstraction for testability.
//!
//! Wall-clock time is display-only (e.g. when a participant joined);
//! causal ordering always uses [`crate::clock::LamportClock`].

use chrono::{DateTime, Utc};

/// Wall clock trait for dependency injection and testing
pub trait WallClock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedWallClock {
    fixed_time: i64,
}

impl FixedWallClock {
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl WallClock for FixedWallClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Convert Unix timestamp (milliseconds) to UTC RFC 3339 format.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn millis_to_rfc3339(timestamp_millis: i64) -> String {
    let datetime = match DateTime::<Utc>::from_timestamp_millis(timestamp_millis) {
        Some(datetime) => datetime,
        None => {
            tracing::warn!(
                "Timestamp {} ms is out of range, displaying the Unix epoch instead",
                timestamp_millis
            );
            DateTime::UNIX_EPOCH
        }
    };
    datetime.to_rfc3339()
}
