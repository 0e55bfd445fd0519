use serde::{Deserialize, Serialize};

use crate::models::{JobId, MessageKind, MessageRecord, RoomId};
/*
    DTOs for the job-board REST endpoints the chat page talks to.
    Every response carries a `success` flag; a false flag comes with a
    human readable `message`.
*/

/// Request paths, exactly as the backend routes them.
pub mod paths {
    use super::{JobId, RoomId};

    pub fn send_message(room_id: RoomId) -> String {
        format!("/chat/{room_id}/send")
    }

    pub fn room(room_id: RoomId) -> String {
        format!("/chat/{room_id}")
    }

    pub fn leave_room(room_id: RoomId) -> String {
        format!("/chat/{room_id}/leave")
    }

    pub fn messages(room_id: RoomId) -> String {
        format!("/chat/{room_id}/messages")
    }

    pub fn apply(job_id: JobId) -> String {
        format!("/jobs/{job_id}/apply")
    }

    pub fn bookmark(job_id: JobId) -> String {
        format!("/jobs/{job_id}/bookmark")
    }

    pub fn job(job_id: JobId) -> String {
        format!("/jobs/{job_id}")
    }

    pub const CHAT_LIST: &str = "/chat";
    pub const JOB_LIST: &str = "/jobs";
}

// POST /chat/<room>/send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub message_type: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    /// The stored message, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_data: Option<MessageRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// GET /chat/<room>/messages?page=&per_page=
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessagesQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListMessagesQuery {
    /// Most recent page, as polled by the chat view.
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}

/// One page of messages, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Generic `{success, message?}` body (leave, delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// POST /jobs/<id>/apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Chat room opened with the employer, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_room_id: Option<RoomId>,
}

// POST /jobs/<id>/bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkResponse {
    pub success: bool,
    /// Bookmark state after the toggle
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
