//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use std::time::Duration;

use crate::error::ClientError;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_INTERVAL_SECS: u64 = 5;

/// How often and how long to retry dialing the Join stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RECONNECT_ATTEMPTS,
            interval: Duration::from_secs(RECONNECT_INTERVAL_SECS),
        }
    }
}

/// Check if the error can never be fixed by retrying.
///
/// # Returns
///
/// `true` for anything other than a connection failure
pub fn should_give_up_immediately(error: &ClientError) -> bool {
    !matches!(error, ClientError::ConnectionError(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of attempts made so far (1-indexed)
/// * `max_attempts` - The maximum number of attempts allowed
pub fn should_attempt_reconnect(error: &ClientError, current_attempt: u32, max_attempts: u32) -> bool {
    if should_give_up_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
