//! Fakes shared by the unit tests.

use std::sync::Mutex;

use jobchat_core::*;

use crate::api::JobBoardApi;
use crate::error::{ClientError, Result};
use crate::ui::Interaction;

/// Records every call; each endpoint answers with its canned response or a 500.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub send: Mutex<Option<SendMessageResponse>>,
    pub page: Mutex<Vec<MessageRecord>>,
    pub apply: Mutex<Option<ApplyResponse>>,
    pub bookmark: Mutex<Option<BookmarkResponse>>,
    pub delete: Mutex<Option<ActionResponse>>,
    /// Landing path of a leave; `None` fails it.
    pub leave_to: Mutex<Option<String>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn canned<T: Clone>(slot: &Mutex<Option<T>>) -> Result<T> {
        slot.lock().unwrap().clone().ok_or(ClientError::Status(500))
    }
}

impl JobBoardApi for FakeApi {
    async fn send_message(&self, room_id: RoomId, request: &SendMessageRequest) -> Result<SendMessageResponse> {
        self.record(format!("send {room_id} {}", request.message));
        Self::canned(&self.send)
    }

    async fn leave_room(&self, room_id: RoomId) -> Result<String> {
        self.record(format!("leave {room_id}"));
        self.leave_to.lock().unwrap().clone().ok_or(ClientError::Status(502))
    }

    async fn list_messages(&self, room_id: RoomId, query: ListMessagesQuery) -> Result<ListMessagesResponse> {
        self.record(format!("list {room_id} {} {}", query.page, query.per_page));
        Ok(ListMessagesResponse {
            success: true,
            messages: self.page.lock().unwrap().clone(),
            has_more: false,
            message: None,
        })
    }

    async fn apply(&self, job_id: JobId) -> Result<ApplyResponse> {
        self.record(format!("apply {job_id}"));
        Self::canned(&self.apply)
    }

    async fn toggle_bookmark(&self, job_id: JobId) -> Result<BookmarkResponse> {
        self.record(format!("bookmark {job_id}"));
        Self::canned(&self.bookmark)
    }

    async fn delete_job(&self, job_id: JobId) -> Result<ActionResponse> {
        self.record(format!("delete {job_id}"));
        Self::canned(&self.delete)
    }
}

/// Answers confirmations with a fixed choice and keeps what it was told.
pub struct RecordingUi {
    pub answer: bool,
    pub notes: Mutex<Vec<String>>,
    pub visited: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn new(answer: bool) -> Self {
        Self { answer, notes: Mutex::new(vec![]), visited: Mutex::new(vec![]) }
    }

    pub fn notes(&self) -> Vec<String> {
        self.notes.lock().unwrap().clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Interaction for RecordingUi {
    fn confirm(&self, _prompt: &str) -> bool {
        self.answer
    }

    fn notify(&self, message: &str) {
        self.notes.lock().unwrap().push(message.to_string());
    }

    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

pub fn record(id: Option<MessageId>, sender_id: UserId, body: &str) -> MessageRecord {
    MessageRecord {
        id,
        room_id: None,
        message: body.to_string(),
        sender_id,
        sender_name: None,
        created_at: "2025-03-14 15:04:05".to_string(),
        message_type: MessageKind::Text,
        is_read: None,
    }
}
