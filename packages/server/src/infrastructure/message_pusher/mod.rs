//! メッセージ送信（通知）の実装
//!
//! - `mailbox`: 参加者ごとの有界メールボックスへのファンアウト

pub mod mailbox;

pub use mailbox::MailboxMessagePusher;
