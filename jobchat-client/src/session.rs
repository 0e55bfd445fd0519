use std::sync::Arc;

use jobchat_core::{ClientEvent, ListMessagesQuery, RoomRef};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::actions::{ActionController, SendRoute};
use crate::api::JobBoardApi;
use crate::channel::poll::poll_once;
use crate::channel::{ChannelState, PollSession, PushChannel, TransportEvent, WsHandle, WsTransport};
use crate::config::{ChatConfig, DeliveryMode};
use crate::error::Result;
use crate::reconcile::{Reconciled, Reconciler};
use crate::render::Renderer;
use crate::ui::{Interaction, ViewHooks};
use crate::view::{lock_view, shared_view, RenderedMessage, SharedView};

/// Messages loaded when the room opens.
pub const HISTORY_PAGE_SIZE: u32 = 50;

enum Delivery {
    Push {
        outbound: UnboundedSender<ClientEvent>,
        state: watch::Receiver<ChannelState>,
        channel: JoinHandle<()>,
        transport: Option<WsHandle>,
    },
    Poll(PollSession),
}

/// One open chat room: its view, its delivery channel and the config they share.
pub struct ChatSession<A: JobBoardApi> {
    config: Arc<ChatConfig>,
    api: Arc<A>,
    view: SharedView,
    reconciler: Reconciler,
    delivery: Delivery,
}

impl<A: JobBoardApi> ChatSession<A> {
    /// Opens the room with the delivery mode from the config. Push connects a
    /// WebSocket to `config.socket_url`.
    pub fn open(config: ChatConfig, api: Arc<A>, hooks: Arc<dyn ViewHooks>) -> Self {
        match config.delivery {
            DeliveryMode::Push => {
                let (handle, events) =
                    WsTransport::new(config.socket_url.clone(), config.session_cookie.clone()).spawn();
                let outbound = handle.outbound.clone();
                Self::push(config, api, hooks, outbound, events, Some(handle))
            }
            DeliveryMode::Poll => Self::poll(config, api),
        }
    }

    /// Push session over a caller-provided transport.
    pub fn with_transport(
        config: ChatConfig,
        api: Arc<A>,
        hooks: Arc<dyn ViewHooks>,
        outbound: UnboundedSender<ClientEvent>,
        events: UnboundedReceiver<TransportEvent>,
    ) -> Self {
        Self::push(config, api, hooks, outbound, events, None)
    }

    fn push(
        config: ChatConfig,
        api: Arc<A>,
        hooks: Arc<dyn ViewHooks>,
        outbound: UnboundedSender<ClientEvent>,
        events: UnboundedReceiver<TransportEvent>,
        transport: Option<WsHandle>,
    ) -> Self {
        let config = Arc::new(config);
        let view = shared_view();
        let reconciler = Reconciler::new(Renderer::from_config(&config), config.user_id);
        let channel = PushChannel::new(config.room_id, view.clone(), reconciler.clone(), outbound.clone(), hooks);
        let state = channel.state();
        let channel = tokio::spawn(channel.run(events));
        info!(room_id = config.room_id, "chat session opened (push)");
        Self {
            config,
            api,
            view,
            reconciler,
            delivery: Delivery::Push { outbound, state, channel, transport },
        }
    }

    fn poll(config: ChatConfig, api: Arc<A>) -> Self {
        let config = Arc::new(config);
        let view = shared_view();
        let reconciler = Reconciler::new(Renderer::from_config(&config), config.user_id);
        let mut poll = PollSession::new(config.room_id, config.poll_interval, config.poll_query());
        poll.start(api.clone(), view.clone(), reconciler.clone());
        info!(room_id = config.room_id, "chat session opened (poll)");
        Self { config, api, view, reconciler, delivery: Delivery::Poll(poll) }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    /// Units appended to the room view from now on.
    pub fn subscribe(&self) -> UnboundedReceiver<RenderedMessage> {
        lock_view(&self.view).messages.subscribe()
    }

    /// Connection state of the push channel; `None` for polling sessions.
    pub fn push_state(&self) -> Option<ChannelState> {
        match &self.delivery {
            Delivery::Push { state, .. } => Some(*state.borrow()),
            Delivery::Poll(_) => None,
        }
    }

    /// Loads the latest page of history into the view.
    pub async fn load_history(&self) -> Result<Reconciled> {
        let query = ListMessagesQuery { page: 1, per_page: HISTORY_PAGE_SIZE };
        poll_once(self.api.as_ref(), self.config.room_id, query, &self.view, &self.reconciler).await
    }

    /// Action controller bound to this room; sends go out the way messages come in.
    pub fn actions(&self, ui: Arc<dyn Interaction>) -> ActionController<A> {
        let route = match &self.delivery {
            Delivery::Push { outbound, .. } => SendRoute::Socket(outbound.clone()),
            Delivery::Poll(_) => SendRoute::Http,
        };
        ActionController::new(
            self.api.clone(),
            ui,
            self.config.clone(),
            self.view.clone(),
            self.reconciler.clone(),
            route,
        )
    }

    /// Tears the room view down: stops delivery, leaves the socket room, drops the messages.
    pub async fn close(self) {
        let room_id = self.config.room_id;
        match self.delivery {
            Delivery::Push { outbound, state, channel, transport } => {
                if *state.borrow() == ChannelState::Connected {
                    let _ = outbound.send(ClientEvent::Leave(RoomRef { room_id }));
                }
                channel.abort();
                if let Some(transport) = transport {
                    transport.shutdown().await;
                }
            }
            Delivery::Poll(mut poll) => poll.stop(),
        }
        lock_view(&self.view).messages.clear();
        info!(room_id, "chat session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use jobchat_core::ServerEvent;
    use tokio::sync::mpsc::unbounded_channel;

    use crate::testing::{record, FakeApi, RecordingUi};
    use crate::ui::NoHooks;

    fn config(delivery: DeliveryMode) -> ChatConfig {
        let mut cfg = ChatConfig::new(7, 1);
        cfg.delivery = delivery;
        cfg
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn push_session_renders_broadcasts_and_leaves_on_close() {
        let api = Arc::new(FakeApi::default());
        let (out_tx, mut out_rx) = unbounded_channel();
        let (ev_tx, ev_rx) = unbounded_channel();
        let session = ChatSession::with_transport(config(DeliveryMode::Push), api, Arc::new(NoHooks), out_tx, ev_rx);
        let mut painted = session.subscribe();

        ev_tx.send(TransportEvent::Connected).unwrap();
        let mut msg = record(Some(5), 2, "hello");
        msg.room_id = Some(7);
        ev_tx.send(TransportEvent::Frame(ServerEvent::NewMessage(msg))).unwrap();
        settle().await;

        assert_eq!(session.push_state(), Some(ChannelState::Connected));
        assert_eq!(painted.recv().await.unwrap().message_id, Some(5));
        assert_eq!(out_rx.recv().await.unwrap(), ClientEvent::Join(RoomRef { room_id: 7 }));

        let view = session.view();
        session.close().await;
        let rest: Vec<_> = std::iter::from_fn(|| out_rx.try_recv().ok()).collect();
        assert_eq!(rest.last(), Some(&ClientEvent::Leave(RoomRef { room_id: 7 })));
        assert!(lock_view(&view).messages.is_empty());
    }

    #[tokio::test]
    async fn push_session_sends_over_socket() {
        let api = Arc::new(FakeApi::default());
        let (out_tx, mut out_rx) = unbounded_channel();
        let (_ev_tx, ev_rx) = unbounded_channel();
        let session = ChatSession::with_transport(config(DeliveryMode::Push), api.clone(), Arc::new(NoHooks), out_tx, ev_rx);
        let actions = session.actions(Arc::new(RecordingUi::new(true)));

        lock_view(&session.view()).input.set("hi");
        actions.send().await;
        assert!(matches!(out_rx.recv().await, Some(ClientEvent::SendMessage(_))));
        assert!(api.calls().is_empty());
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn poll_session_polls_until_closed() {
        let api = Arc::new(FakeApi::default());
        *api.page.lock().unwrap() = vec![record(Some(2), 2, "b"), record(Some(1), 1, "a")];
        let session = ChatSession::open(config(DeliveryMode::Poll), api.clone(), Arc::new(NoHooks));
        assert_eq!(session.push_state(), None);

        let loaded = session.load_history().await.unwrap();
        assert_eq!(loaded.appended, 2);
        let ids: Vec<_> = lock_view(&session.view()).messages.iter().map(|u| u.message_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);

        tokio::time::sleep(Duration::from_millis(5100)).await;
        session.close().await;
        tokio::time::sleep(Duration::from_millis(20_000)).await;

        assert_eq!(api.calls(), vec!["list 7 1 50", "list 7 1 10"]);
    }
}
