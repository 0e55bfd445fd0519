use std::sync::Arc;

use jobchat_core::protocol::http::paths;
use jobchat_core::{
    now_timestamp, ClientEvent, JobId, MessageKind, MessageRecord, SendMessage, SendMessageRequest,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::api::JobBoardApi;
use crate::config::ChatConfig;
use crate::error::{ClientError, Result};
use crate::reconcile::Reconciler;
use crate::ui::Interaction;
use crate::view::{lock_view, Button, JobListing, ListingKind, SharedView};

/// User-facing texts.
pub mod text {
    pub const SEND_FAILED: &str = "메시지 전송 중 오류가 발생했습니다.";
    pub const LEAVE_CONFIRM: &str = "정말로 이 채팅방을 나가시겠습니까?";
    pub const LEAVE_FAILED: &str = "채팅방 나가기 중 오류가 발생했습니다.";
    pub const APPLY_CONFIRM: &str = "이 공고에 지원하시겠습니까?";
    pub const APPLY_DONE: &str = "지원이 완료되었습니다!";
    pub const APPLY_FAILED: &str = "지원 중 오류가 발생했습니다.";
    pub const BOOKMARK_FAILED: &str = "오류가 발생했습니다.";
    pub const DELETE_CONFIRM: &str = "정말로 이 공고를 삭제하시겠습니까?";
    pub const DELETE_DONE: &str = "공고가 삭제되었습니다.";
    pub const DELETE_FAILED: &str = "삭제 중 오류가 발생했습니다.";
}

/// How a typed message leaves the client.
#[derive(Debug, Clone)]
pub enum SendRoute {
    /// `send_message` frame; the room broadcast is the only confirmation.
    Socket(UnboundedSender<ClientEvent>),
    /// `POST /chat/<room>/send`; the stored message comes back and is shown right away.
    Http,
}

/// How an action ended. Failures have already been shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined the confirmation.
    Cancelled,
    /// Nothing to do (empty message, unknown card).
    Skipped,
    Failed,
}

/// User-triggered operations. Each one disables its control while the request
/// is in flight and turns every failure into a single notification.
pub struct ActionController<A> {
    api: Arc<A>,
    ui: Arc<dyn Interaction>,
    config: Arc<ChatConfig>,
    view: SharedView,
    reconciler: Reconciler,
    route: SendRoute,
}

impl<A: JobBoardApi> ActionController<A> {
    pub fn new(
        api: Arc<A>,
        ui: Arc<dyn Interaction>,
        config: Arc<ChatConfig>,
        view: SharedView,
        reconciler: Reconciler,
        route: SendRoute,
    ) -> Self {
        Self { api, ui, config, view, reconciler, route }
    }

    /// Sends the compose box content. Blank input is dropped without any request.
    pub async fn send(&self) -> Outcome {
        let (body, label) = {
            let mut view = lock_view(&self.view);
            let Some(body) = view.input.trimmed().map(str::to_string) else {
                return Outcome::Skipped;
            };
            (body, view.send_button.begin_loading())
        };

        if self.config.optimistic_echo {
            let echo = self.local_echo(&body);
            let mut view = lock_view(&self.view);
            self.reconciler.apply(&mut view.messages, &[echo]);
        }

        let result = self.deliver(&body).await;

        let failure = {
            let mut view = lock_view(&self.view);
            view.send_button.end_loading(label);
            match result {
                Ok(confirmed) => {
                    view.input.clear();
                    if let Some(record) = confirmed {
                        self.reconciler.apply(&mut view.messages, &[record]);
                    }
                    view.messages.scroll_to_bottom();
                    None
                }
                Err(e) => Some(e),
            }
        };

        match failure {
            None => Outcome::Done,
            Some(e) => {
                warn!(room_id = self.config.room_id, error = %e, "send failed");
                self.ui.notify(e.user_message(text::SEND_FAILED));
                Outcome::Failed
            }
        }
    }

    async fn deliver(&self, body: &str) -> Result<Option<MessageRecord>> {
        match &self.route {
            SendRoute::Socket(outbound) => {
                let event = ClientEvent::SendMessage(SendMessage {
                    room_id: self.config.room_id,
                    message: body.to_string(),
                    message_type: MessageKind::Text,
                });
                outbound.send(event).map_err(|_| ClientError::ChannelClosed)?;
                Ok(None)
            }
            SendRoute::Http => {
                let request = SendMessageRequest { message: body.to_string(), message_type: MessageKind::Text };
                let response = self.api.send_message(self.config.room_id, &request).await?;
                if !response.success {
                    return Err(ClientError::Rejected(response.message.unwrap_or_default()));
                }
                Ok(response.message_data)
            }
        }
    }

    // Never merged with the confirmed copy: it has no id to match on.
    fn local_echo(&self, body: &str) -> MessageRecord {
        MessageRecord {
            id: None,
            room_id: Some(self.config.room_id),
            message: body.to_string(),
            sender_id: self.config.user_id,
            sender_name: Some(self.config.user_name.clone()),
            created_at: now_timestamp(),
            message_type: MessageKind::Text,
            is_read: None,
        }
    }

    /// Leaves the room after confirmation, then follows the backend to the page
    /// it redirected to (normally the room list).
    pub async fn leave(&self, button: &mut Button) -> Outcome {
        if !self.ui.confirm(text::LEAVE_CONFIRM) {
            return Outcome::Cancelled;
        }
        let result = {
            let _loading = button.loading();
            self.api.leave_room(self.config.room_id).await
        };
        // a refused leave redirects back to the room itself
        let result = result.and_then(|landing| {
            if landing == paths::room(self.config.room_id) {
                Err(ClientError::Rejected(String::new()))
            } else {
                Ok(landing)
            }
        });
        match result {
            Ok(landing) => {
                info!(room_id = self.config.room_id, %landing, "left chat room");
                self.ui.navigate(&landing);
                Outcome::Done
            }
            Err(e) => {
                warn!(room_id = self.config.room_id, error = %e, "leave failed");
                self.ui.notify(e.user_message(text::LEAVE_FAILED));
                Outcome::Failed
            }
        }
    }

    pub async fn apply(&self, job_id: JobId, button: &mut Button) -> Outcome {
        if !self.ui.confirm(text::APPLY_CONFIRM) {
            return Outcome::Cancelled;
        }
        let result = {
            let _loading = button.loading();
            self.api.apply(job_id).await
        };
        match result {
            Ok(r) if r.success => {
                info!(job_id, chat_room_id = ?r.chat_room_id, "applied to job");
                self.ui.notify(text::APPLY_DONE);
                Outcome::Done
            }
            Ok(r) => {
                self.ui.notify(r.message.as_deref().unwrap_or(text::APPLY_FAILED));
                Outcome::Failed
            }
            Err(e) => {
                warn!(job_id, error = %e, "apply failed");
                self.ui.notify(text::APPLY_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Flips the bookmark on the job's card. In a bookmark-only listing an
    /// un-bookmarked card fades out, and the empty state replaces the last one.
    pub async fn toggle_bookmark(&self, job_id: JobId, listing: &mut JobListing) -> Outcome {
        let result = {
            let Some(card) = listing.card_mut(job_id) else {
                warn!(job_id, "bookmark toggled for a job without card");
                return Outcome::Skipped;
            };
            let _loading = card.bookmark.loading();
            self.api.toggle_bookmark(job_id).await
        };
        match result {
            Ok(r) if r.success => {
                if let Some(card) = listing.card_mut(job_id) {
                    card.set_bookmarked(r.is_bookmarked);
                }
                if !r.is_bookmarked && listing.kind == ListingKind::BookmarksOnly {
                    listing.remove_card(job_id).await;
                }
                Outcome::Done
            }
            Ok(r) => {
                self.ui.notify(r.message.as_deref().unwrap_or(text::BOOKMARK_FAILED));
                Outcome::Failed
            }
            Err(e) => {
                warn!(job_id, error = %e, "bookmark toggle failed");
                self.ui.notify(text::BOOKMARK_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Deletes the job after confirmation, then goes to the job list.
    pub async fn delete_job(&self, job_id: JobId, button: &mut Button) -> Outcome {
        if !self.ui.confirm(text::DELETE_CONFIRM) {
            return Outcome::Cancelled;
        }
        let result = {
            let _loading = button.loading();
            self.api.delete_job(job_id).await
        };
        match result {
            Ok(r) if r.success => {
                self.ui.notify(text::DELETE_DONE);
                self.ui.navigate(paths::JOB_LIST);
                Outcome::Done
            }
            Ok(r) => {
                self.ui.notify(r.message.as_deref().unwrap_or(text::DELETE_FAILED));
                Outcome::Failed
            }
            Err(e) => {
                warn!(job_id, error = %e, "delete failed");
                self.ui.notify(text::DELETE_FAILED);
                Outcome::Failed
            }
        }
    }
}
