use jobchat_core::{LastMessage, RoomId, UserId};

/// What the action controller needs from the page: modal confirmation,
/// user notifications and navigation.
pub trait Interaction: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;

    fn notify(&self, message: &str);

    fn navigate(&self, path: &str);
}

/// Optional refresh hooks for pieces of the page outside the message list
/// (read badges, room list). Every method defaults to doing nothing.
pub trait ViewHooks: Send + Sync {
    fn read_state_changed(&self, _room_id: RoomId, _reader_id: Option<UserId>) {}

    fn unread_total_changed(&self, _count: u64) {}

    fn room_unread_changed(&self, _room_id: RoomId, _count: u64) {}

    fn last_message_changed(&self, _last: &LastMessage) {}
}

/// Page without any of the optional widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ViewHooks for NoHooks {}
