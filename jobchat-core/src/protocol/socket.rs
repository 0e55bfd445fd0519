/* Events travelling on the chat socket.
    Every frame is a JSON envelope { event, data }:
    ClientEvent -> frames emitted by this client (join, leave, read receipts, send)
    ServerEvent -> frames broadcast by the backend (new messages, read state, badges, errors)
    Transport level state (connect, connect_error, disconnect) is not a frame
    and lives in the client crate.
*/
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    models::{LastMessage, MessageKind, MessageRecord, RoomId, UserId},
};

/// Client → Server frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Subscribe to a room's broadcasts.
    Join(RoomRef),
    /// Unsubscribe from a room.
    Leave(RoomRef),
    /// Mark every message from the other party as read.
    ReadMessages(RoomRef),
    /// Fire-and-forget send; the `new_message` broadcast is the only confirmation.
    SendMessage(SendMessage),
}

/// Server → Client frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected(Connected),
    Joined(RoomRef),
    Left(RoomRef),
    NewMessage(MessageRecord),
    MessagesRead(MessagesRead),
    LastMessageUpdated(LastMessage),
    UnreadTotal(UnreadTotal),
    RoomUnreadCount(RoomCount),
    Error(Error),
}

impl ServerEvent {
    /// Room the event is scoped to, if any.
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            ServerEvent::Joined(r) | ServerEvent::Left(r) => Some(r.room_id),
            ServerEvent::NewMessage(m) => m.room_id,
            ServerEvent::MessagesRead(r) => Some(r.room_id),
            ServerEvent::LastMessageUpdated(l) => Some(l.room_id),
            ServerEvent::RoomUnreadCount(c) => Some(c.room_id),
            ServerEvent::Connected(_) | ServerEvent::UnreadTotal(_) | ServerEvent::Error(_) => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomRef {
    pub room_id: RoomId,
}

/// Payload of the `send_message` intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    pub room_id: RoomId,
    pub message: String,
    pub message_type: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connected {
    #[serde(default)]
    pub sid: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesRead {
    pub room_id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reader_id: Option<UserId>,
}

/// Unread messages across every room of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadTotal {
    pub count: u64,
}

/// Unread messages in one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCount {
    pub room_id: RoomId,
    pub count: u64,
}
