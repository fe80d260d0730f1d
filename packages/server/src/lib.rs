//! ChittyChat room server library.
//!
//! A single shared room where every inbound event is merged into one
//! authoritative Lamport clock and fanned out to per-participant mailboxes.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
