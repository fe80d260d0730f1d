//! Message formatting utilities for client display.

use chittychat_shared::protocol::{BroadcastAck, LeaveAck};

use crate::{agent::ReceivedNotification, error::ClientError};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Greeting printed once at startup
    pub fn format_welcome(name: &str) -> String {
        format!(
            "\nYou are '{}'. Use /join to join the chat room, /leave to leave it and /quit to exit.\n",
            name
        )
    }

    /// Format a received room notification
    ///
    /// # Arguments
    ///
    /// * `notification` - The notification after the local clock merge
    ///
    /// # Returns
    ///
    /// `[<timestamp>] <text> (local clock <n>)`
    pub fn format_notification(notification: &ReceivedNotification) -> String {
        format!(
            "\n[{}] {} (local clock {})\n",
            notification.timestamp, notification.text, notification.local_clock
        )
    }

    pub fn format_joined(name: &str) -> String {
        format!("Joined the chat room as '{}'\n", name)
    }

    /// Format the acknowledgement of a sent message
    pub fn format_sent_confirmation(ack: &BroadcastAck) -> String {
        format!(
            "sent at server time {} to {} participant(s)\n",
            ack.timestamp, ack.recipients
        )
    }

    pub fn format_left(ack: &LeaveAck) -> String {
        format!("Left the chat room at server time {}\n", ack.timestamp)
    }

    pub fn format_stream_ended() -> String {
        "\nThe server has closed the stream, use /join to join again\n".to_string()
    }

    pub fn format_stream_failed(reason: &str) -> String {
        format!("\nLost connection to the server: {}\n", reason)
    }

    pub fn format_error(error: &ClientError) -> String {
        format!("{}\n", error)
    }
}
