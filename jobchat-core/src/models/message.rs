use serde::{Deserialize, Serialize};

use super::{MessageId, RoomId, UserId};

/// Kind of a chat message. The backend only ever sends `text` or `system`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    System,
}

/// Message as the backend sends it, both on the socket (`new_message`) and in
/// the REST message listing. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Backend-assigned id. `None` only for local echoes not yet confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    /// Present on socket events, absent in REST listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// Body text. A missing body renders as an empty bubble.
    #[serde(default)]
    pub message: String,
    pub sender_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS` as stored by the backend
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub message_type: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}

impl MessageRecord {
    pub fn is_system(&self) -> bool {
        self.message_type == MessageKind::System
    }
}
