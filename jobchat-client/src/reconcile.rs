use jobchat_core::{MessageRecord, UserId};
use time::OffsetDateTime;
use tracing::debug;

use crate::render::{local_now, Renderer};
use crate::view::MessageStore;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub appended: usize,
    pub skipped: usize,
    /// Appended records authored by someone else (they warrant a read receipt).
    pub appended_from_others: usize,
}

/// Merges inbound batches into the message store without duplicating ids.
#[derive(Debug, Clone)]
pub struct Reconciler {
    renderer: Renderer,
    current_user: UserId,
}

impl Reconciler {
    pub fn new(renderer: Renderer, current_user: UserId) -> Self {
        Self { renderer, current_user }
    }

    pub fn current_user(&self) -> UserId {
        self.current_user
    }

    /// Appends, in batch order, every record whose id is not rendered yet, then
    /// scrolls to the newest message. Records without id are never deduplicated.
    pub fn apply(&self, store: &mut MessageStore, batch: &[MessageRecord]) -> Reconciled {
        self.apply_at(store, batch, local_now())
    }

    pub fn apply_at(&self, store: &mut MessageStore, batch: &[MessageRecord], now: OffsetDateTime) -> Reconciled {
        let mut out = Reconciled::default();
        for record in batch {
            if record.id.is_some_and(|id| store.contains(id)) {
                out.skipped += 1;
                continue;
            }
            let is_own = record.sender_id == self.current_user;
            if store.append(self.renderer.render_at(record, is_own, now)) {
                out.appended += 1;
                if !is_own {
                    out.appended_from_others += 1;
                }
            } else {
                out.skipped += 1;
            }
        }
        store.scroll_to_bottom();
        if out.appended > 0 {
            debug!(appended = out.appended, skipped = out.skipped, "reconciled message batch");
        }
        out
    }
}
