//! Domain layer: value objects, entities and the seams the use cases depend on.

pub mod entity;
pub mod error;
pub mod mailbox;
pub mod pusher;
pub mod repository;
pub mod sink;
pub mod value_object;

pub use chittychat_shared::clock::{LamportClock, LogicalTimestamp};
pub use entity::{Notification, Participant, ParticipantSummary, RoomState};
pub use error::{RegistryError, ValueObjectError};
pub use mailbox::{DeliveryOutcome, MAILBOX_CAPACITY, Mailbox, MailboxReceiver, mailbox};
pub use pusher::{FanOutReport, MessagePusher};
pub use repository::ParticipantRegistry;
pub use sink::{DeliveryError, NotificationSink};
pub use value_object::ParticipantName;
