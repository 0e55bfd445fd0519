//! jobchat-core: wire types shared by the job-board chat client (models, HTTP DTOs,
//! socket events, errors) and the pure message time formatter.
//! No I/O here.

pub mod error;
pub mod models;
pub mod protocol;
pub mod utils;

// Re-exports to keep client paths short
pub use error::Error;
pub use models::{JobId, LastMessage, MessageId, MessageKind, MessageRecord, RoomId, UserId};
pub use protocol::http::{
    ActionResponse, ApplyResponse, BookmarkResponse, ListMessagesQuery, ListMessagesResponse,
    SendMessageRequest, SendMessageResponse,
};
pub use protocol::socket::{
    ClientEvent, Connected, MessagesRead, RoomCount, RoomRef, SendMessage, ServerEvent, UnreadTotal,
};
pub use utils::{format_message_time, now_timestamp, parse_timestamp, TimeLocale};
