//! Value objects.

use std::fmt;

use super::error::ValueObjectError;

/// Participant name, the unique key of the room registry.
///
/// Surrounding whitespace is trimmed; the remainder must be non-empty and at
/// most [`ParticipantName::MAX_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyName);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ValueObjectError::NameTooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
