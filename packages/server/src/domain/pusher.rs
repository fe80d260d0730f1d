//! Fan-out seam.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Notification, Participant};

/// Per-call fan-out statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub dropped: usize,
    pub closed: usize,
}

impl FanOutReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.dropped + self.closed
    }
}

/// Hands one notification to many mailboxes.
///
/// Implementations must not block on a slow consumer and must keep going
/// when one mailbox refuses the notification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn broadcast(
        &self,
        targets: Vec<Participant>,
        notification: Arc<Notification>,
    ) -> FanOutReport;
}
