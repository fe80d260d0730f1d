//! Conversion between domain entities and the wire DTOs of
//! `chittychat_shared::protocol`.

pub mod conversion;
