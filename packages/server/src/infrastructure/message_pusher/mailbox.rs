//! メールボックスを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 1 つの通知を対象参加者全員のメールボックスに投入する
//! - ネットワーク I/O は行わない（送信は各参加者の配信ループが担当）
//!
//! ## 満杯時のポリシー
//!
//! drop-newest。満杯のメールボックスには投入せず warn ログを出し、
//! 他の参加者へのファンアウトは継続する。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DeliveryOutcome, FanOutReport, MessagePusher, Notification, Participant};

/// メールボックスを使った MessagePusher 実装
#[derive(Debug, Clone, Copy, Default)]
pub struct MailboxMessagePusher;

impl MailboxMessagePusher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagePusher for MailboxMessagePusher {
    async fn broadcast(
        &self,
        targets: Vec<Participant>,
        notification: Arc<Notification>,
    ) -> FanOutReport {
        let mut report = FanOutReport::default();

        for target in targets {
            match target.mailbox.deliver(notification.clone()) {
                DeliveryOutcome::Delivered => {
                    report.delivered += 1;
                    tracing::debug!(
                        "Enqueued notification (t={}) for '{}'",
                        notification.timestamp(),
                        target.name
                    );
                }
                DeliveryOutcome::DroppedFull => {
                    report.dropped += 1;
                    tracing::warn!(
                        "Mailbox of '{}' is full, dropping notification (t={}): {}",
                        target.name,
                        notification.timestamp(),
                        notification.text()
                    );
                }
                DeliveryOutcome::Closed => {
                    report.closed += 1;
                    tracing::warn!(
                        "Mailbox of '{}' is closed (stream gone without leave), skipping",
                        target.name
                    );
                }
            }
        }

        report
    }
}
