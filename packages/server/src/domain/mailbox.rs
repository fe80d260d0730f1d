//! Bounded per-participant mailbox.
//!
//! Many producers (every event handler) enqueue, one consumer (the
//! participant's delivery loop) dequeues. Enqueueing never blocks: when the
//! mailbox is full the new notification is dropped for that participant.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::entity::Notification;

/// Capacity of every mailbox.
pub const MAILBOX_CAPACITY: usize = 10;

/// Create a mailbox with the given capacity.
pub fn mailbox(capacity: usize) -> (Mailbox, MailboxReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (Mailbox { sender }, MailboxReceiver { receiver })
}

/// Result of enqueueing one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Mailbox full, notification dropped (drop-newest)
    DroppedFull,
    /// Delivery loop gone, nobody will read this mailbox again
    Closed,
}

/// Sending half, held by the registry.
#[derive(Debug, Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Arc<Notification>>,
}

impl Mailbox {
    pub fn deliver(&self, notification: Arc<Notification>) -> DeliveryOutcome {
        match self.sender.try_send(notification) {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(TrySendError::Full(_)) => DeliveryOutcome::DroppedFull,
            Err(TrySendError::Closed(_)) => DeliveryOutcome::Closed,
        }
    }

    /// `false` once the receiving half has been dropped.
    pub fn is_active(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Receiving half, owned by the participant's delivery loop.
#[derive(Debug)]
pub struct MailboxReceiver {
    receiver: mpsc::Receiver<Arc<Notification>>,
}

impl MailboxReceiver {
    /// Wait for the next notification.
    ///
    /// Returns `None` once every sending half is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<Arc<Notification>> {
        self.receiver.recv().await
    }

    /// Take a notification if one is already queued.
    #[cfg(test)]
    pub fn try_recv(&mut self) -> Option<Arc<Notification>> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use chittychat_shared::clock::LogicalTimestamp;

    use super::*;

    fn notification(text: &str) -> Arc<Notification> {
        Arc::new(Notification::new(text, LogicalTimestamp::new(1)))
    }

    #[test]
    fn test_deliver_and_receive_in_order() {
        // テスト項目: 投入した順に通知が取り出される
        // given (前提条件):
        let (mailbox, mut receiver) = mailbox(MAILBOX_CAPACITY);

        // when (操作):
        mailbox.deliver(notification("first"));
        mailbox.deliver(notification("second"));

        // then (期待する結果):
        assert_eq!(receiver.try_recv().unwrap().text(), "first");
        assert_eq!(receiver.try_recv().unwrap().text(), "second");
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_full_mailbox_drops_newest() {
        // テスト項目: 満杯のメールボックスには新しい通知が入らず、古い通知は残る
        // given (前提条件):
        let (mailbox, mut receiver) = mailbox(2);
        mailbox.deliver(notification("one"));
        mailbox.deliver(notification("two"));

        // when (操作):
        let outcome = mailbox.deliver(notification("three"));

        // then (期待する結果):
        assert_eq!(outcome, DeliveryOutcome::DroppedFull);
        assert_eq!(receiver.try_recv().unwrap().text(), "one");
        assert_eq!(receiver.try_recv().unwrap().text(), "two");
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_closed_mailbox_is_inactive() {
        // テスト項目: 受信側が破棄されたメールボックスは非アクティブになる
        // given (前提条件):
        let (mailbox, receiver) = mailbox(MAILBOX_CAPACITY);
        assert!(mailbox.is_active());

        // when (操作):
        drop(receiver);

        // then (期待する結果):
        assert!(!mailbox.is_active());
        assert_eq!(
            mailbox.deliver(notification("lost")),
            DeliveryOutcome::Closed
        );
    }

    #[tokio::test]
    async fn test_recv_returns_none_after_senders_dropped_and_drained() {
        // テスト項目: 送信側が全て破棄されると、残りを読み切った後に None が返る
        // given (前提条件):
        let (mailbox, mut receiver) = mailbox(MAILBOX_CAPACITY);
        mailbox.deliver(notification("last words"));

        // when (操作):
        drop(mailbox);

        // then (期待する結果):
        assert_eq!(receiver.recv().await.unwrap().text(), "last words");
        assert!(receiver.recv().await.is_none());
    }
}
