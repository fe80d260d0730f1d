//! UseCase: 退出処理（Leave）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 退出通知のファンアウト後にレジストリから削除されること
//!
//! ### なぜこのテストが必要か
//! - 退出者本人の配信ループが自分の退出通知を受け取れる順序を保証する
//! - 退出後のブロードキャストが退出者に届かないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出（本人と他の参加者に通知）
//! - エッジケース：未参加の名前での退出

use std::sync::Arc;

use crate::domain::{
    FanOutReport, LamportClock, LogicalTimestamp, MessagePusher, Notification, ParticipantName,
    ParticipantRegistry,
};

/// 退出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// マージ後のサーバークロック（退出通知のタイムスタンプ）
    pub timestamp: LogicalTimestamp,
    pub report: FanOutReport,
    /// レジストリにエントリが存在したか
    pub was_registered: bool,
}

/// 退出のユースケース
pub struct LeaveRoomUseCase {
    clock: Arc<LamportClock>,
    registry: Arc<dyn ParticipantRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
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

    /// 退出を実行
    ///
    /// 退出通知は本人を含む全員に投入してからエントリを削除する。
    /// 削除でメールボックスの送信側が解放されるため、本人の配信ループは
    /// 退出通知を送り切った後に終了する。
    pub async fn execute(&self, name: ParticipantName, timestamp: LogicalTimestamp) -> LeaveOutcome {
        let now = self.clock.merge(timestamp);
        tracing::info!(
            "Client '{}' requested leaving at lamport time {} (server time {})",
            name,
            timestamp,
            now
        );

        let notification = Arc::new(Notification::left(&name, now));
        let targets = self.registry.snapshot().await;
        let report = self.message_pusher.broadcast(targets, notification).await;

        let was_registered = self.registry.unregister(&name).await.is_some();
        if was_registered {
            tracing::info!("Client '{}' removed from registry", name);
        } else {
            tracing::warn!("Leave from '{}' who was not in the registry", name);
        }

        LeaveOutcome {
            timestamp: now,
            report,
            was_registered,
        }
    }
}
