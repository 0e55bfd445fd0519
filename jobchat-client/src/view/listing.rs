use std::time::Duration;

use jobchat_core::JobId;

use super::Button;

/// How long a removed card fades out before it leaves the list.
pub const REMOVE_ANIMATION: Duration = Duration::from_millis(300);

pub const BOOKMARKED_LABEL: &str = "♥";
pub const NOT_BOOKMARKED_LABEL: &str = "♡";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// Regular job list or a job detail page.
    All,
    /// The user's bookmarks; un-bookmarking removes the card.
    BookmarksOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Visible,
    /// Fading out, about to be removed.
    Removing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub job_id: JobId,
    pub title: String,
    pub bookmark: Button,
    pub phase: CardPhase,
}

impl JobCard {
    pub fn new(job_id: JobId, title: impl Into<String>, bookmarked: bool) -> Self {
        let mut bookmark = Button::new(NOT_BOOKMARKED_LABEL);
        set_bookmarked(&mut bookmark, bookmarked);
        Self { job_id, title: title.into(), bookmark, phase: CardPhase::Visible }
    }

    pub fn set_bookmarked(&mut self, bookmarked: bool) {
        set_bookmarked(&mut self.bookmark, bookmarked);
    }
}

fn set_bookmarked(button: &mut Button, bookmarked: bool) {
    button.active = bookmarked;
    button.label = if bookmarked { BOOKMARKED_LABEL } else { NOT_BOOKMARKED_LABEL }.to_string();
}

/// A list of job cards. A bookmark-only listing shows an empty state once its
/// last card is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub kind: ListingKind,
    pub cards: Vec<JobCard>,
    pub empty_state: bool,
}

impl JobListing {
    pub fn new(kind: ListingKind, cards: Vec<JobCard>) -> Self {
        let empty_state = kind == ListingKind::BookmarksOnly && cards.is_empty();
        Self { kind, cards, empty_state }
    }

    pub fn card(&self, job_id: JobId) -> Option<&JobCard> {
        self.cards.iter().find(|c| c.job_id == job_id)
    }

    pub fn card_mut(&mut self, job_id: JobId) -> Option<&mut JobCard> {
        self.cards.iter_mut().find(|c| c.job_id == job_id)
    }

    /// Fades the card out, removes it, then swaps in the empty state if nothing is left.
    pub async fn remove_card(&mut self, job_id: JobId) {
        let Some(card) = self.card_mut(job_id) else {
            return;
        };
        card.phase = CardPhase::Removing;
        tokio::time::sleep(REMOVE_ANIMATION).await;

        self.cards.retain(|c| c.job_id != job_id);
        if self.cards.is_empty() {
            self.empty_state = true;
        }
    }
}
