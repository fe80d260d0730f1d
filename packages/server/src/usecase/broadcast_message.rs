//! UseCase: メッセージ送信処理（Broadcast）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastMessageUseCase::execute() メソッド
//! - クロックのマージと、登録済み全員（送信者含む）へのファンアウト
//!
//! ### なぜこのテストが必要か
//! - 全参加者が同じタイムスタンプの同じ通知を受け取ることを保証する
//! - 未登録の送信者からのメッセージも受け付ける（警告ログのみ）
//!
//! ### どのような状況を想定しているか
//! - 正常系：単独参加者、複数参加者へのブロードキャスト
//! - エッジケース：未登録の送信者、参加者ゼロ

use std::sync::Arc;

use crate::domain::{
    FanOutReport, LamportClock, LogicalTimestamp, MessagePusher, Notification, ParticipantName,
    ParticipantRegistry,
};

/// ブロードキャストの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// マージ後のサーバークロック（通知のタイムスタンプ）
    pub timestamp: LogicalTimestamp,
    pub report: FanOutReport,
    /// 送信者が登録済みだったか
    pub sender_registered: bool,
}

/// メッセージ送信のユースケース
pub struct BroadcastMessageUseCase {
    clock: Arc<LamportClock>,
    registry: Arc<dyn ParticipantRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastMessageUseCase {
    pub fn new(
        clock: Arc<LamportClock>,
        registry: Arc<dyn ParticipantRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            clock,
            registry,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// メッセージ長はサーバー側では検証しない（クライアント側の入力ルール）。
    pub async fn execute(
        &self,
        name: ParticipantName,
        message: String,
        timestamp: LogicalTimestamp,
    ) -> BroadcastOutcome {
        let now = self.clock.merge(timestamp);
        tracing::info!(
            "Client '{}' sends message \"{}\" at lamport time {} (server time {})",
            name,
            message,
            timestamp,
            now
        );

        let sender_registered = self.registry.contains(&name).await;
        if !sender_registered {
            tracing::warn!(
                "Broadcast from '{}' who has not joined the room; delivering anyway",
                name
            );
        }

        let notification = Arc::new(Notification::said(&name, &message, now));
        let targets = self.registry.snapshot().await;
        let report = self.message_pusher.broadcast(targets, notification).await;

        BroadcastOutcome {
            timestamp: now,
            report,
            sender_registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::{
            message_pusher::MailboxMessagePusher, registry::InMemoryParticipantRegistry,
        },
        usecase::{JoinRoomUseCase, JoinedRoom, LeaveRoomUseCase},
    };
    use chittychat_shared::time::FixedWallClock;

    struct Room {
        clock: Arc<LamportClock>,
        join: JoinRoomUseCase,
        broadcast: BroadcastMessageUseCase,
        leave: LeaveRoomUseCase,
    }

    fn create_room() -> Room {
        let clock = Arc::new(LamportClock::new());
        let registry: Arc<dyn ParticipantRegistry> = Arc::new(InMemoryParticipantRegistry::new());
        let pusher: Arc<dyn MessagePusher> = Arc::new(MailboxMessagePusher::new());
        Room {
            clock: clock.clone(),
            join: JoinRoomUseCase::new(
                clock.clone(),
                registry.clone(),
                pusher.clone(),
                Arc::new(FixedWallClock::new(0)),
            ),
            broadcast: BroadcastMessageUseCase::new(clock.clone(), registry.clone(), pusher.clone()),
            leave: LeaveRoomUseCase::new(clock, registry, pusher),
        }
    }

    fn name(value: &str) -> ParticipantName {
        ParticipantName::new(value).unwrap()
    }

    async fn join(room: &Room, value: &str, ts: i64) -> JoinedRoom {
        room.join
            .execute(name(value), LogicalTimestamp::new(ts))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_participant_receives_own_message() {
        // テスト項目: A が参加し "hi" を送ると、A 自身に {"A: hi", 3} が届く
        // given (前提条件):
        let room = create_room();
        let mut a = join(&room, "A", 1).await;
        assert_eq!(room.clock.current().value(), 2);
        a.mailbox.try_recv().unwrap();

        // when (操作):
        let outcome = room
            .broadcast
            .execute(name("A"), "hi".to_string(), LogicalTimestamp::new(2))
            .await;

        // then (期待する結果):
        assert_eq!(room.clock.current().value(), 3);
        assert_eq!(outcome.timestamp.value(), 3);
        let received = a.mailbox.try_recv().unwrap();
        assert_eq!(received.text(), "A: hi");
        assert_eq!(received.timestamp().value(), 3);
    }

    #[tokio::test]
    async fn test_all_participants_receive_same_notification() {
        // テスト項目: A と B の両方に同じタイムスタンプの同じ通知が届く
        // given (前提条件):
        let room = create_room();
        let mut a = join(&room, "A", 1).await;
        let mut b = join(&room, "B", 1).await;
        while a.mailbox.try_recv().is_some() {}
        while b.mailbox.try_recv().is_some() {}

        // when (操作):
        let outcome = room
            .broadcast
            .execute(name("A"), "hello".to_string(), LogicalTimestamp::new(2))
            .await;

        // then (期待する結果):
        let from_a = a.mailbox.try_recv().unwrap();
        let from_b = b.mailbox.try_recv().unwrap();
        assert_eq!(from_a, from_b);
        assert_eq!(from_a.text(), "A: hello");
        assert_eq!(from_a.timestamp(), outcome.timestamp);
        assert_eq!(outcome.report.delivered, 2);
    }

    #[tokio::test]
    async fn test_broadcast_after_leave_reaches_nobody() {
        // テスト項目: A が退出した後の A からのブロードキャストは受理されるが配信先はゼロ
        // given (前提条件):
        let room = create_room();
        let _a = join(&room, "A", 1).await;
        room.leave
            .execute(name("A"), LogicalTimestamp::new(2))
            .await;

        // when (操作):
        let outcome = room
            .broadcast
            .execute(name("A"), "anyone?".to_string(), LogicalTimestamp::new(3))
            .await;

        // then (期待する結果):
        assert!(!outcome.sender_registered);
        assert_eq!(outcome.report.attempted(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_sender_is_accepted() {
        // テスト項目: 未登録の送信者からのメッセージも登録済み参加者に配信される
        // given (前提条件):
        let room = create_room();
        let mut a = join(&room, "A", 1).await;
        a.mailbox.try_recv().unwrap();

        // when (操作):
        let outcome = room
            .broadcast
            .execute(name("mallory"), "boo".to_string(), LogicalTimestamp::new(1))
            .await;

        // then (期待する結果):
        assert!(!outcome.sender_registered);
        assert_eq!(a.mailbox.try_recv().unwrap().text(), "mallory: boo");
    }

    #[tokio::test]
    async fn test_long_message_is_not_rejected_by_server() {
        // テスト項目: サーバーはメッセージ長を検証しない
        // given (前提条件):
        let room = create_room();
        let mut a = join(&room, "A", 1).await;
        a.mailbox.try_recv().unwrap();
        let long = "x".repeat(1000);

        // when (操作):
        room.broadcast
            .execute(name("A"), long.clone(), LogicalTimestamp::new(2))
            .await;

        // then (期待する結果):
        assert_eq!(a.mailbox.try_recv().unwrap().text(), format!("A: {}", long));
    }
}
