use jobchat_core::{format_message_time, MessageRecord, TimeLocale};
use time::OffsetDateTime;

use crate::config::{ChatConfig, UNKNOWN_NAME};
use crate::view::{RenderedMessage, Side};

/// Turns message records into view units.
#[derive(Debug, Clone)]
pub struct Renderer {
    locale: TimeLocale,
    own_name: String,
    other_name: String,
}

impl Renderer {
    pub fn new(locale: TimeLocale, own_name: impl Into<String>, other_name: impl Into<String>) -> Self {
        Self { locale, own_name: own_name.into(), other_name: other_name.into() }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.locale, &config.user_name, &config.other_user_name)
    }

    pub fn render(&self, record: &MessageRecord, is_own: bool) -> RenderedMessage {
        self.render_at(record, is_own, local_now())
    }

    /// Same as [`render`](Self::render) with an explicit "now" for the time label.
    pub fn render_at(&self, record: &MessageRecord, is_own: bool, now: OffsetDateTime) -> RenderedMessage {
        let side = if record.is_system() {
            Side::System
        } else if is_own {
            Side::Own
        } else {
            Side::Other
        };

        // socket broadcasts carry no sender name
        let avatar = match side {
            Side::System => None,
            _ => {
                let fallback = if is_own { self.own_name.as_str() } else { self.other_name.as_str() };
                let name = record.sender_name.as_deref().unwrap_or(fallback);
                Some(name.chars().next().unwrap_or('?'))
            }
        };

        RenderedMessage {
            message_id: record.id,
            side,
            avatar,
            body: record.message.clone(),
            time_label: format_message_time(&record.created_at, now, self.locale),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(TimeLocale::default(), UNKNOWN_NAME, UNKNOWN_NAME)
    }
}

pub(crate) fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
