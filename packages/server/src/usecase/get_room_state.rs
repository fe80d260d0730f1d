//! UseCase: ルーム状態取得

use std::sync::Arc;

use crate::domain::{LamportClock, ParticipantRegistry, RoomState};

/// ルーム状態取得のユースケース
pub struct GetRoomStateUseCase {
    clock: Arc<LamportClock>,
    registry: Arc<dyn ParticipantRegistry>,
}

impl GetRoomStateUseCase {
    pub fn new(clock: Arc<LamportClock>, registry: Arc<dyn ParticipantRegistry>) -> Self {
        Self { clock, registry }
    }

    /// 現在のクロックと参加者一覧（名前順）を返す。クロックは進めない。
    pub async fn execute(&self) -> RoomState {
        RoomState {
            clock: self.clock.current(),
            participants: self.registry.summaries().await,
        }
    }
}
