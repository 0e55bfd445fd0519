/* In-memory view model of the chat page.
    store    -> rendered message units, append-only, unique by message id
    controls -> buttons and the message input
    listing  -> job cards with bookmark buttons (bookmark-only listing can empty out)
*/
pub mod controls;
pub mod listing;
pub mod store;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use controls::{Button, InputBox, Loading, LOADING_LABEL};
pub use listing::{CardPhase, JobCard, JobListing, ListingKind, REMOVE_ANIMATION};
pub use store::{MessageStore, RenderedMessage, Side};

/// The chat room view: message list plus the compose box.
#[derive(Debug)]
pub struct ChatView {
    pub messages: MessageStore,
    pub input: InputBox,
    pub send_button: Button,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            messages: MessageStore::default(),
            input: InputBox::default(),
            send_button: Button::new("전송"),
        }
    }
}

/// Shared between the delivery channel task and the action controller.
/// The lock is never held across an `.await`.
pub type SharedView = Arc<Mutex<ChatView>>;

pub fn shared_view() -> SharedView {
    Arc::new(Mutex::new(ChatView::default()))
}

/// Locks the view; a panic elsewhere must not take the UI down with it.
pub fn lock_view(view: &SharedView) -> MutexGuard<'_, ChatView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}
