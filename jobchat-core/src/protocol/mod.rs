pub mod http;
pub mod socket;

// Handy re-exports
pub use http::{
    ActionResponse, ApplyResponse, BookmarkResponse, ListMessagesQuery, ListMessagesResponse,
    SendMessageRequest, SendMessageResponse,
};
pub use socket::{ClientEvent, RoomRef, SendMessage, ServerEvent};
