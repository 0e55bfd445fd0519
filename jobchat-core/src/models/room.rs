use serde::{Deserialize, Serialize};

use super::{MessageKind, RoomId};

/// Summary of the newest message in a room, pushed to each participant's
/// personal channel so room lists can refresh (`last_message_updated`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessage {
    pub room_id: RoomId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub message_type: MessageKind,
    #[serde(default)]
    pub created_at: String,
}
