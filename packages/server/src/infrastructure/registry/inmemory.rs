//! InMemory Participant Registry 実装
//!
//! ドメイン層が定義する ParticipantRegistry trait の具体的な実装。
//! 単一の Mutex で保護された HashMap を使用し、挿入・削除・走査を直列化します。
//! ロックを保持したまま await することはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Participant, ParticipantName, ParticipantRegistry, ParticipantSummary, RegistryError,
};

/// インメモリ Participant Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryParticipantRegistry {
    /// name → Participant
    participants: Mutex<HashMap<ParticipantName, Participant>>,
}

impl InMemoryParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryParticipantRegistry {
    async fn register(&self, participant: Participant) -> Result<(), RegistryError> {
        let mut participants = self.participants.lock().await;

        if let Some(existing) = participants.get(&participant.name) {
            if existing.mailbox.is_active() {
                return Err(RegistryError::AlreadyActive(
                    participant.name.as_str().to_string(),
                ));
            }
            tracing::debug!(
                "Replacing stale registry entry for '{}' (delivery loop already ended)",
                participant.name
            );
        }

        participants.insert(participant.name.clone(), participant);
        Ok(())
    }

    async fn unregister(&self, name: &ParticipantName) -> Option<Participant> {
        let mut participants = self.participants.lock().await;
        participants.remove(name)
    }

    async fn snapshot(&self) -> Vec<Participant> {
        let participants = self.participants.lock().await;
        participants.values().cloned().collect()
    }

    async fn summaries(&self) -> Vec<ParticipantSummary> {
        let mut summaries: Vec<ParticipantSummary> = {
            let participants = self.participants.lock().await;
            participants.values().map(Participant::summary).collect()
        };
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    async fn contains(&self, name: &ParticipantName) -> bool {
        let participants = self.participants.lock().await;
        participants.contains_key(name)
    }

    async fn count(&self) -> usize {
        let participants = self.participants.lock().await;
        participants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MAILBOX_CAPACITY, MailboxReceiver, mailbox};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryParticipantRegistry の登録・削除・スナップショット
    // - 同名参加者の扱い（アクティブなら拒否、stale なら置き換え）
    //
    // 【なぜこのテストが必要か】
    // - レジストリは全てのイベント処理と配信ループから共有される状態
    // - 同名で二つのメールボックスが並存しないことを保証する必要がある
    // ========================================

    fn name(value: &str) -> ParticipantName {
        ParticipantName::new(value).unwrap()
    }

    fn participant(value: &str, joined_at: i64) -> (Participant, MailboxReceiver) {
        let (mailbox, receiver) = mailbox(MAILBOX_CAPACITY);
        (Participant::new(name(value), joined_at, mailbox), receiver)
    }

    #[tokio::test]
    async fn test_register_participant_success() {
        // テスト項目: 参加者を登録するとレジストリに反映される
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let (alice, _rx) = participant("alice", 1000);

        // when (操作):
        let result = registry.register(alice).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.count().await, 1);
        assert!(registry.contains(&name("alice")).await);
    }

    #[tokio::test]
    async fn test_register_duplicate_active_name_is_rejected() {
        // テスト項目: アクティブなメールボックスを持つ名前での再登録は拒否される
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let (first, _rx1) = participant("alice", 1000);
        registry.register(first).await.unwrap();

        // when (操作):
        let (second, _rx2) = participant("alice", 2000);
        let result = registry.register(second).await;

        // then (期待する結果): 元のエントリが残り、エントリは 1 つだけ
        assert_eq!(
            result,
            Err(RegistryError::AlreadyActive("alice".to_string()))
        );
        assert_eq!(registry.count().await, 1);
        assert_eq!(registry.summaries().await[0].joined_at, 1000);
    }

    #[tokio::test]
    async fn test_register_replaces_stale_entry() {
        // テスト項目: 配信ループが終了した（stale）エントリは再登録で置き換えられる
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let (first, rx1) = participant("alice", 1000);
        registry.register(first).await.unwrap();
        drop(rx1);

        // when (操作):
        let (second, _rx2) = participant("alice", 2000);
        let result = registry.register(second).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.count().await, 1);
        assert_eq!(registry.summaries().await[0].joined_at, 2000);
    }

    #[tokio::test]
    async fn test_unregister_removes_exactly_one_entry() {
        // テスト項目: 削除すると指定した参加者だけが消える
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let (alice, _rx1) = participant("alice", 1000);
        let (bob, _rx2) = participant("bob", 1000);
        registry.register(alice).await.unwrap();
        registry.register(bob).await.unwrap();

        // when (操作):
        let removed = registry.unregister(&name("alice")).await;

        // then (期待する結果):
        assert_eq!(removed.unwrap().name.as_str(), "alice");
        assert!(!registry.contains(&name("alice")).await);
        assert!(registry.contains(&name("bob")).await);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_unregister_nonexistent_participant() {
        // テスト項目: 存在しない参加者の削除は None を返す（冪等）
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();

        // when (操作):
        let removed = registry.unregister(&name("ghost")).await;

        // then (期待する結果):
        assert!(removed.is_none());
    }

    #[tokio::test]
    async fn test_summaries_are_sorted_by_name() {
        // テスト項目: 参加者一覧は名前順にソートされる
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let mut receivers = Vec::new();
        for value in ["charlie", "alice", "bob"] {
            let (p, rx) = participant(value, 1000);
            receivers.push(rx);
            registry.register(p).await.unwrap();
        }

        // when (操作):
        let summaries = registry.summaries().await;

        // then (期待する結果):
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_independent_of_later_changes() {
        // テスト項目: スナップショット取得後の削除はスナップショットに影響しない
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let (alice, _rx) = participant("alice", 1000);
        registry.register(alice).await.unwrap();

        // when (操作):
        let snapshot = registry.snapshot().await;
        registry.unregister(&name("alice")).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_unregister_and_fan_out() {
        // テスト項目: 登録・削除・スナップショットとファンアウトが並行しても状態が壊れない
        // given (前提条件): 全期間参加し続ける "stayer"（十分な容量のメールボックス）
        use std::sync::Arc;

        use chittychat_shared::clock::LogicalTimestamp;

        use crate::{
            domain::{MessagePusher, Notification},
            infrastructure::message_pusher::MailboxMessagePusher,
        };

        let tasks = 8;
        let rounds = 25;
        let registry = Arc::new(InMemoryParticipantRegistry::new());
        let pusher = Arc::new(MailboxMessagePusher::new());
        let (stayer_mailbox, mut stayer_rx) = mailbox(tasks * rounds);
        registry
            .register(Participant::new(name("stayer"), 0, stayer_mailbox))
            .await
            .unwrap();

        // when (操作): 各タスクが 参加 → スナップショットへ配信 → 退出 を繰り返す
        let handles: Vec<_> = (0..tasks)
            .map(|task| {
                let registry = registry.clone();
                let pusher = pusher.clone();
                tokio::spawn(async move {
                    let mut min_delivered = usize::MAX;
                    for round in 0..rounds {
                        let user = format!("user{}-{}", task, round);
                        let (user_mailbox, _user_rx) = mailbox(tasks * rounds);
                        registry
                            .register(Participant::new(name(&user), 0, user_mailbox))
                            .await
                            .unwrap();

                        let targets = registry.snapshot().await;
                        let notification = Arc::new(Notification::new(
                            format!("{}: hi", user),
                            LogicalTimestamp::new(1),
                        ));
                        let report = pusher.broadcast(targets, notification).await;
                        min_delivered = min_delivered.min(report.delivered);

                        assert!(registry.unregister(&name(&user)).await.is_some());
                    }
                    min_delivered
                })
            })
            .collect();

        let mut min_delivered = usize::MAX;
        for handle in handles {
            min_delivered = min_delivered.min(handle.await.unwrap());
        }

        // then (期待する結果): 自分と stayer には必ず届き、最後は stayer だけが残る
        assert!(min_delivered >= 2);
        let mut received = 0;
        while stayer_rx.try_recv().is_some() {
            received += 1;
        }
        assert_eq!(received, tasks * rounds);
        let summaries = registry.summaries().await;
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["stayer"]);
    }
}
