//! UseCase error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The name is held by a participant whose mailbox is still active
    #[error("participant '{0}' is already joined")]
    DuplicateName(String),
}
