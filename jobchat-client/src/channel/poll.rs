use std::sync::Arc;
use std::time::Duration;

use jobchat_core::{ListMessagesQuery, RoomId};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::JobBoardApi;
use crate::error::{ClientError, Result};
use crate::reconcile::{Reconciled, Reconciler};
use crate::view::{lock_view, SharedView};

/// Poll variant of the delivery channel. Owns the room's timer: at most one
/// is active, starting again replaces it and stopping is always safe.
#[derive(Debug)]
pub struct PollSession {
    room_id: RoomId,
    period: Duration,
    query: ListMessagesQuery,
    timer: Option<JoinHandle<()>>,
}

impl PollSession {
    pub fn new(room_id: RoomId, period: Duration, query: ListMessagesQuery) -> Self {
        Self { room_id, period, query, timer: None }
    }

    pub fn is_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Starts the timer; the first fetch happens one period from now.
    pub fn start<A: JobBoardApi>(&mut self, api: Arc<A>, view: SharedView, reconciler: Reconciler) {
        self.stop();

        let (room_id, period, query) = (self.room_id, self.period, self.query);
        let timer = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // a failed tick is simply retried on the next one
                if let Err(e) = poll_once(api.as_ref(), room_id, query, &view, &reconciler).await {
                    warn!(room_id, error = %e, "message poll failed");
                }
            }
        });
        info!(room_id, period_ms = period.as_millis() as u64, "message polling started");
        self.timer = Some(timer);
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!(room_id = self.room_id, "message polling stopped");
        }
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fetches one page and reconciles it. The backend lists newest first, the
/// view wants them oldest first.
pub async fn poll_once<A: JobBoardApi>(
    api: &A,
    room_id: RoomId,
    query: ListMessagesQuery,
    view: &SharedView,
    reconciler: &Reconciler,
) -> Result<Reconciled> {
    let page = api.list_messages(room_id, query).await?;
    if !page.success {
        return Err(ClientError::Rejected(page.message.unwrap_or_default()));
    }
    // page 1 is the newest slice; reversed it continues the view chronologically,
    // and ids already shown by an earlier tick (or by a push) are skipped
    let mut batch = page.messages;
    batch.reverse();

    // one lock for the whole batch: no other reconciliation interleaves with it
    let mut view = lock_view(view);
    Ok(reconciler.apply(&mut view.messages, &batch))
}
