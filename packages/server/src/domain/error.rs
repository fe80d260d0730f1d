//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("participant name must not be empty")]
    EmptyName,

    #[error("participant name is too long ({actual} characters, max {max})")]
    NameTooLong { max: usize, actual: usize },
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A participant with an active mailbox already uses this name
    #[error("participant '{0}' is already joined")]
    AlreadyActive(String),
}
