//! UseCase: 参加処理（Join）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - クロックのマージ、メールボックス作成、参加通知のファンアウト
//!
//! ### なぜこのテストが必要か
//! - 参加通知はサーバーのマージ後クロックで刻印されなければならない
//! - 同名で二つのアクティブなメールボックスが存在してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加（自分自身にも参加通知が届く）
//! - 異常系：アクティブな同名参加者がいる状態での参加
//! - エッジケース：配信ループ終了済み（stale）の同名エントリ

use std::sync::Arc;

use chittychat_shared::time::WallClock;

use crate::domain::{
    FanOutReport, LamportClock, LogicalTimestamp, MAILBOX_CAPACITY, MailboxReceiver,
    MessagePusher, Notification, Participant, ParticipantName, ParticipantRegistry,
    RegistryError, mailbox,
};

use super::error::JoinError;

/// 参加成功時の結果
#[derive(Debug)]
pub struct JoinedRoom {
    /// 新しい参加者のメールボックス（配信ループが所有する）
    pub mailbox: MailboxReceiver,
    /// ファンアウトした参加通知
    pub notification: Arc<Notification>,
    pub report: FanOutReport,
}

/// 参加のユースケース
pub struct JoinRoomUseCase {
    clock: Arc<LamportClock>,
    registry: Arc<dyn ParticipantRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    wall_clock: Arc<dyn WallClock>,
}

impl JoinRoomUseCase {
    pub fn new(
        clock: Arc<LamportClock>,
        registry: Arc<dyn ParticipantRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        wall_clock: Arc<dyn WallClock>,
    ) -> Self {
        Self {
            clock,
            registry,
            message_pusher,
            wall_clock,
        }
    }

    /// 参加を実行
    ///
    /// 1. クロックをマージ（拒否される場合もイベントは観測済みなのでマージする）
    /// 2. メールボックスを作成して登録
    /// 3. マージ後のクロックで参加通知を作成し、登録済み全員（本人含む）に投入
    pub async fn execute(
        &self,
        name: ParticipantName,
        timestamp: LogicalTimestamp,
    ) -> Result<JoinedRoom, JoinError> {
        let now = self.clock.merge(timestamp);
        tracing::info!(
            "Client '{}' requested to join at lamport time {} (server time {})",
            name,
            timestamp,
            now
        );

        let (mailbox, receiver) = mailbox(MAILBOX_CAPACITY);
        let participant = Participant::new(name.clone(), self.wall_clock.now_millis(), mailbox);
        match self.registry.register(participant).await {
            Ok(()) => {}
            Err(RegistryError::AlreadyActive(existing)) => {
                tracing::warn!("Client '{}' is already joined. Rejecting join.", existing);
                return Err(JoinError::DuplicateName(existing));
            }
        }

        let notification = Arc::new(Notification::joined(&name, now));
        let targets = self.registry.snapshot().await;
        let report = self
            .message_pusher
            .broadcast(targets, notification.clone())
            .await;
        tracing::info!(
            "Broadcasted join of '{}' to {} mailbox(es)",
            name,
            report.delivered
        );

        Ok(JoinedRoom {
            mailbox: receiver,
            notification,
            report,
        })
    }
}
