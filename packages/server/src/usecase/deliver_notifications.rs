//! UseCase: 参加者ごとの配信ループ
//!
//! 参加者 1 人につき 1 つ、参加時に開始され、他の配信ループやレジストリ操作と
//! 並行に動作する。メールボックスから通知を取り出し、参加者のストリームに送る。
//!
//! 終了条件:
//! - ストリームのキャンセル（クライアント切断、プロセス停止）
//! - メールボックスのクローズ（Leave でレジストリから削除され、読み切った後）
//! - 送信失敗
//!
//! 配信ループ自身はレジストリを変更しない。

use std::future::Future;

use crate::domain::{MailboxReceiver, NotificationSink, ParticipantName};

/// 配信ループの終了理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEnd {
    /// ストリームがキャンセルされた
    Cancelled,
    /// メールボックスが閉じられ、全て送信済み
    MailboxClosed,
    /// ストリームへの送信に失敗した
    SendFailed(String),
}

/// 配信ループを実行
///
/// キャンセルは保留中の通知より優先して判定されるため、キャンセル後に
/// 送信が行われることはない。
pub async fn run_delivery_loop<S, C>(
    name: &ParticipantName,
    mailbox: &mut MailboxReceiver,
    sink: &mut S,
    cancelled: C,
) -> DeliveryEnd
where
    S: NotificationSink,
    C: Future<Output = ()>,
{
    tokio::pin!(cancelled);

    loop {
        tokio::select! {
            biased;

            _ = &mut cancelled => {
                tracing::info!("The stream of '{}' has closed", name);
                return DeliveryEnd::Cancelled;
            }
            next = mailbox.recv() => {
                let Some(notification) = next else {
                    tracing::info!("Mailbox of '{}' closed, delivery loop finished", name);
                    return DeliveryEnd::MailboxClosed;
                };
                if let Err(e) = sink.send(&notification).await {
                    tracing::warn!("Failed to deliver to '{}': {}", name, e);
                    return DeliveryEnd::SendFailed(e.to_string());
                }
                tracing::debug!(
                    "Delivered notification (t={}) to '{}'",
                    notification.timestamp(),
                    name
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chittychat_shared::clock::LogicalTimestamp;
    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::domain::{DeliveryError, MAILBOX_CAPACITY, Notification, mailbox};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 通知が投入順にストリームへ送られること
    // - キャンセル、メールボックスのクローズ、送信失敗で終了すること
    //
    // 【なぜこのテストが必要か】
    // - 配信ループはトランスポートと独立しているため、ここで振る舞いを保証する
    // ========================================

    /// 送信した通知を mpsc に流すテスト用 sink
    struct ChannelSink {
        sent: mpsc::UnboundedSender<(String, i64)>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSink for ChannelSink {
        async fn send(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::SendFailed("broken pipe".to_string()));
            }
            self.sent
                .send((
                    notification.text().to_string(),
                    notification.timestamp().value(),
                ))
                .map_err(|e| DeliveryError::SendFailed(e.to_string()))
        }
    }

    fn channel_sink(fail: bool) -> (ChannelSink, mpsc::UnboundedReceiver<(String, i64)>) {
        let (sent, rx) = mpsc::unbounded_channel();
        (ChannelSink { sent, fail }, rx)
    }

    fn name() -> ParticipantName {
        ParticipantName::new("alice").unwrap()
    }

    fn notification(text: &str, ts: i64) -> Arc<Notification> {
        Arc::new(Notification::new(text, LogicalTimestamp::new(ts)))
    }

    #[tokio::test]
    async fn test_delivers_in_order_until_mailbox_closed() {
        // テスト項目: 投入順に送信し、メールボックスが閉じたら終了する
        // given (前提条件):
        let (sender, mut receiver) = mailbox(MAILBOX_CAPACITY);
        let (mut sink, mut sent) = channel_sink(false);
        sender.deliver(notification("alice joined the chat", 2));
        sender.deliver(notification("alice: hi", 3));
        sender.deliver(notification("alice left the chat", 4));
        drop(sender);

        // when (操作):
        let end = run_delivery_loop(
            &name(),
            &mut receiver,
            &mut sink,
            std::future::pending::<()>(),
        )
        .await;

        // then (期待する結果):
        assert_eq!(end, DeliveryEnd::MailboxClosed);
        assert_eq!(sent.recv().await.unwrap(), ("alice joined the chat".to_string(), 2));
        assert_eq!(sent.recv().await.unwrap(), ("alice: hi".to_string(), 3));
        assert_eq!(sent.recv().await.unwrap(), ("alice left the chat".to_string(), 4));
    }

    #[tokio::test]
    async fn test_cancellation_stops_loop() {
        // テスト項目: キャンセルされると配信ループが終了する
        // given (前提条件):
        let (sender, mut receiver) = mailbox(MAILBOX_CAPACITY);
        let (mut sink, mut sent) = channel_sink(false);
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let end = run_delivery_loop(&name(), &mut receiver, &mut sink, async {
                let _ = cancel_rx.await;
            })
            .await;
            (end, receiver)
        });

        sender.deliver(notification("before", 2));
        assert_eq!(sent.recv().await.unwrap().0, "before");

        // when (操作):
        cancel_tx.send(()).unwrap();
        let (end, _receiver) = handle.await.unwrap();

        // then (期待する結果):
        assert_eq!(end, DeliveryEnd::Cancelled);
    }

    #[tokio::test]
    async fn test_cancellation_takes_priority_over_pending_mail() {
        // テスト項目: キャンセル済みなら保留中の通知があっても送信しない
        // given (前提条件):
        let (sender, mut receiver) = mailbox(MAILBOX_CAPACITY);
        let (mut sink, mut sent) = channel_sink(false);
        sender.deliver(notification("never sent", 2));

        // when (操作):
        let end = run_delivery_loop(&name(), &mut receiver, &mut sink, async {}).await;

        // then (期待する結果):
        assert_eq!(end, DeliveryEnd::Cancelled);
        drop(sink);
        assert!(sent.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_send_failure_ends_loop() {
        // テスト項目: ストリームへの送信に失敗すると配信ループは終了する
        // given (前提条件):
        let (sender, mut receiver) = mailbox(MAILBOX_CAPACITY);
        let (mut sink, _sent) = channel_sink(true);
        sender.deliver(notification("doomed", 2));

        // when (操作):
        let end = run_delivery_loop(
            &name(),
            &mut receiver,
            &mut sink,
            std::future::pending::<()>(),
        )
        .await;

        // then (期待する結果):
        assert!(matches!(end, DeliveryEnd::SendFailed(_)));
    }
}
