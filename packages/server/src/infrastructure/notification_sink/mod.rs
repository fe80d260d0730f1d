//! Outbound stream implementations for the delivery loop.

pub mod websocket;

pub use websocket::WebSocketNotificationSink;
