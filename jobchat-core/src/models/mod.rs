pub mod message;
pub mod room;

/// Backend ids are plain integers.
pub type RoomId = i64;
pub type MessageId = i64;
pub type UserId = i64;
pub type JobId = i64;

pub use message::{MessageKind, MessageRecord};
pub use room::LastMessage;
