//! Prompt input parsing and validation.

use chittychat_shared::protocol::MAX_MESSAGE_LENGTH;

use crate::error::ClientError;

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join,
    Leave,
    Quit,
    Message(String),
}

/// Reject input longer than [`MAX_MESSAGE_LENGTH`] characters.
///
/// Applied to every line before it is interpreted; rejected input never
/// reaches the server.
pub fn validate_input(line: &str) -> Result<(), ClientError> {
    let length = line.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(ClientError::MessageTooLong {
            length,
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(())
}

pub fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/join" => Command::Join,
        "/leave" => Command::Leave,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Message(line.to_string()),
    }
}
