use std::sync::Arc;

use jobchat_core::{ClientEvent, RoomId, RoomRef, ServerEvent};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{ChannelState, TransportEvent};
use crate::reconcile::Reconciler;
use crate::ui::ViewHooks;
use crate::view::{lock_view, SharedView};

/// Push variant of the delivery channel: turns transport events into view
/// updates and answers with join / read receipts.
pub struct PushChannel {
    room_id: RoomId,
    view: SharedView,
    reconciler: Reconciler,
    outbound: UnboundedSender<ClientEvent>,
    hooks: Arc<dyn ViewHooks>,
    state: watch::Sender<ChannelState>,
}

impl PushChannel {
    pub fn new(
        room_id: RoomId,
        view: SharedView,
        reconciler: Reconciler,
        outbound: UnboundedSender<ClientEvent>,
        hooks: Arc<dyn ViewHooks>,
    ) -> Self {
        let (state, _) = watch::channel(ChannelState::Disconnected);
        Self { room_id, view, reconciler, outbound, hooks, state }
    }

    /// Follows the connection state.
    pub fn state(&self) -> watch::Receiver<ChannelState> {
        self.state.subscribe()
    }

    /// Handles transport events until the transport goes away.
    pub async fn run(mut self, mut events: UnboundedReceiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        self.set_state(ChannelState::Disconnected);
        info!(room_id = self.room_id, "push channel stopped");
    }

    pub fn handle(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connecting => self.set_state(ChannelState::Connecting),
            TransportEvent::Connected => {
                self.set_state(ChannelState::Connected);
                // joining again on every reconnect
                self.emit(ClientEvent::Join(RoomRef { room_id: self.room_id }));
                self.read_receipt();
            }
            TransportEvent::ConnectError(reason) => {
                warn!(room_id = self.room_id, %reason, "socket connect_error");
                self.set_state(ChannelState::Disconnected);
            }
            TransportEvent::Disconnected => {
                info!(room_id = self.room_id, "socket disconnected");
                self.set_state(ChannelState::Disconnected);
            }
            TransportEvent::Frame(frame) => self.on_frame(frame),
        }
    }

    // Badge events (unread counts, last message) describe the whole room list
    // and arrive for any room; only the events of this room's view are filtered.
    // A new_message without room id cannot be placed and is dropped as well.
    fn is_for_other_room(&self, frame: &ServerEvent) -> bool {
        match frame {
            ServerEvent::NewMessage(_)
            | ServerEvent::MessagesRead(_)
            | ServerEvent::Joined(_)
            | ServerEvent::Left(_) => frame.room_id() != Some(self.room_id),
            _ => false,
        }
    }

    fn on_frame(&mut self, frame: ServerEvent) {
        if self.is_for_other_room(&frame) {
            debug!(room_id = ?frame.room_id(), "ignoring event for another room");
            return;
        }
        match frame {
            ServerEvent::NewMessage(record) => {
                let outcome = {
                    let mut view = lock_view(&self.view);
                    self.reconciler.apply(&mut view.messages, std::slice::from_ref(&record))
                };
                if outcome.appended_from_others > 0 {
                    self.read_receipt();
                }
            }
            ServerEvent::MessagesRead(read) => self.hooks.read_state_changed(read.room_id, read.reader_id),
            ServerEvent::UnreadTotal(total) => self.hooks.unread_total_changed(total.count),
            ServerEvent::RoomUnreadCount(room) => self.hooks.room_unread_changed(room.room_id, room.count),
            ServerEvent::LastMessageUpdated(last) => self.hooks.last_message_changed(&last),
            ServerEvent::Error(e) => warn!(room_id = self.room_id, error = %e, "socket error"),
            ServerEvent::Connected(c) => debug!(user_id = c.user_id, "socket session ready"),
            ServerEvent::Joined(_) => debug!(room_id = self.room_id, "joined room"),
            ServerEvent::Left(_) => debug!(room_id = self.room_id, "left room"),
        }
    }

    fn read_receipt(&self) {
        self.emit(ClientEvent::ReadMessages(RoomRef { room_id: self.room_id }));
    }

    fn emit(&self, event: ClientEvent) {
        if self.outbound.send(event).is_err() {
            warn!(room_id = self.room_id, "push transport is gone, dropping outbound event");
        }
    }

    fn set_state(&self, state: ChannelState) {
        self.state.send_replace(state);
    }
}
