//! Registry trait 定義
//!
//! ドメイン層が必要とする参加者レジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Participant, ParticipantName, ParticipantSummary, RegistryError};

/// Participant Registry trait
///
/// name → Participant のマップ。挿入・削除・スナップショット取得は
/// 実装側で相互排他される。
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// 参加者を登録
    ///
    /// 同名の参加者のメールボックスがまだアクティブなら `AlreadyActive`。
    /// 配信ループが終了済み（stale）のエントリは置き換える。
    async fn register(&self, participant: Participant) -> Result<(), RegistryError>;

    /// 参加者を削除し、削除したエントリを返す
    async fn unregister(&self, name: &ParticipantName) -> Option<Participant>;

    /// 現在の参加者のスナップショット（順序は不定）
    async fn snapshot(&self) -> Vec<Participant>;

    /// 参加者一覧（名前順）
    async fn summaries(&self) -> Vec<ParticipantSummary>;

    /// 名前が登録済みか
    async fn contains(&self, name: &ParticipantName) -> bool;

    /// 登録中の参加者数
    async fn count(&self) -> usize;
}
