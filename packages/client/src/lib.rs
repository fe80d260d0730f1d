//! ChittyChat CLI client library.
//!
//! The client agent keeps a local Lamport clock, sends Join / Broadcast /
//! Leave events to the room server and consumes the pushed notification
//! stream.

pub mod agent;
pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod transport;
pub mod ui;

pub use runner::{ClientConfig, run_client};
