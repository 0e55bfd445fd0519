/* Delivery channels: how new messages reach the view. A session runs exactly one.
    push -> socket events drive the reconciler; join + read receipts go back out
    poll -> a timer fetches the newest page and reconciles it
    ws   -> WebSocket transport feeding the push channel
*/
pub mod poll;
pub mod push;
pub mod ws;

use jobchat_core::ServerEvent;

pub use poll::PollSession;
pub use push::PushChannel;
pub use ws::{WsHandle, WsTransport};

/// Connection lifecycle of the push channel. Reconnects are the transport's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// What the transport reports to the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connecting,
    Connected,
    ConnectError(String),
    Disconnected,
    Frame(ServerEvent),
}
