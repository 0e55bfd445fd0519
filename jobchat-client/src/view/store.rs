use std::collections::HashSet;
use std::fmt;

use jobchat_core::MessageId;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Which side of the conversation a unit is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Own,
    Other,
    System,
}

/// One message as drawn in the room view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Set iff the record had a backend id.
    pub message_id: Option<MessageId>,
    pub side: Side,
    /// First character of the sender's name; none for system messages.
    pub avatar: Option<char>,
    /// Literal text, never interpreted as markup.
    pub body: String,
    pub time_label: String,
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let avatar = self.avatar.unwrap_or(' ');
        match self.side {
            Side::System => write!(f, "  ── {} ({}) ──", self.body, self.time_label),
            Side::Own => write!(f, "{:>40} [{}] {}", self.body, avatar, self.time_label),
            Side::Other => write!(f, "[{}] {} {}", avatar, self.body, self.time_label),
        }
    }
}

/// Ordered, append-only list of rendered units keyed by message id.
/// Two units never share the same id; units without id are always accepted.
#[derive(Debug, Default)]
pub struct MessageStore {
    units: Vec<RenderedMessage>,
    ids: HashSet<MessageId>,
    /// Number of units scrolled past; equal to `len()` when at the bottom.
    scroll: usize,
    watchers: Vec<UnboundedSender<RenderedMessage>>,
}

impl MessageStore {
    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    /// Appends a unit. Returns false (and drops it) when its id is already shown.
    pub fn append(&mut self, unit: RenderedMessage) -> bool {
        if let Some(id) = unit.message_id {
            if !self.ids.insert(id) {
                return false;
            }
        }
        self.watchers.retain(|w| w.send(unit.clone()).is_ok());
        self.units.push(unit);
        true
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.units.iter()
    }

    pub fn last(&self) -> Option<&RenderedMessage> {
        self.units.last()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.units.len();
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll == self.units.len()
    }

    /// Every unit appended from now on is also sent to the returned receiver.
    pub fn subscribe(&mut self) -> UnboundedReceiver<RenderedMessage> {
        let (tx, rx) = unbounded_channel();
        self.watchers.push(tx);
        rx
    }

    /// Drops every unit; only done when the room view is torn down.
    pub fn clear(&mut self) {
        self.units.clear();
        self.ids.clear();
        self.scroll = 0;
        self.watchers.clear();
    }
}
