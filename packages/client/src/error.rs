//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Name is already held by an active participant
    #[error("Name '{0}' is already joined to the chat room")]
    DuplicateName(String),

    /// Could not reach the server or the stream broke
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Server answered with an error status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server sent something that is not a valid protocol message
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Input longer than the allowed bound
    #[error("Your message is too long ({length} characters), try again with at most {max} characters")]
    MessageTooLong { length: usize, max: usize },

    #[error("Chat room is not joined, use /join to join the chat room")]
    NotJoined,

    #[error("Already joined the chat room")]
    AlreadyJoined,
}
