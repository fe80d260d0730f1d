//! Shared library for the ChittyChat server and client.
//!
//! - `clock`: Lamport logical clock used by both sides
//! - `protocol`: JSON wire shapes exchanged over HTTP and WebSocket
//! - `logger`: tracing subscriber setup
//! - `time`: wall-clock helpers (display only)

pub mod clock;
pub mod logger;
pub mod protocol;
pub mod time;
