//! jobchat-client: the chat side of the job board. Renders a room's messages,
//! keeps them free of duplicates whether they arrive by socket push or by
//! polling, and runs the page actions (send, leave, apply, bookmark, delete).

pub mod actions;
pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod render;
pub mod session;
pub mod terminal;
pub mod ui;
pub mod view;

#[cfg(test)]
mod testing;

pub use actions::{ActionController, Outcome, SendRoute};
pub use api::{HttpApi, JobBoardApi};
pub use channel::{ChannelState, PollSession, PushChannel, TransportEvent, WsTransport};
pub use config::{ChatConfig, DeliveryMode};
pub use error::{ClientError, Result};
pub use reconcile::{Reconciled, Reconciler};
pub use render::Renderer;
pub use session::ChatSession;
pub use ui::{Interaction, NoHooks, ViewHooks};
pub use view::{ChatView, MessageStore, RenderedMessage, SharedView};
