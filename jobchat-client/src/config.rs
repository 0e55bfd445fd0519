use std::time::Duration;

use anyhow::{anyhow, Context};
use jobchat_core::{ListMessagesQuery, RoomId, TimeLocale, UserId};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_POLL_PAGE_SIZE: u32 = 10;
/// Shown when a participant has no display name.
pub const UNKNOWN_NAME: &str = "?";

/// How new messages reach the view. One per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Persistent socket, server pushes `new_message`.
    #[default]
    Push,
    /// Fixed-interval fetch of the newest page.
    Poll,
}

impl std::str::FromStr for DeliveryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" | "socket" => Ok(DeliveryMode::Push),
            "poll" => Ok(DeliveryMode::Poll),
            other => Err(anyhow!("unknown delivery mode {other:?} (expected push or poll)")),
        }
    }
}

/// Everything the chat view needs to know about its page, built once when the
/// view starts and shared by every component.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub socket_url: String,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub user_name: String,
    pub other_user_name: String,
    pub delivery: DeliveryMode,
    pub poll_interval: Duration,
    pub poll_page_size: u32,
    /// Render the sender's own message before the server confirms it.
    pub optimistic_echo: bool,
    pub locale: TimeLocale,
    /// Raw `Cookie` header value carrying the backend session.
    pub session_cookie: Option<String>,
}

impl ChatConfig {
    pub fn new(room_id: RoomId, user_id: UserId) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            socket_url: socket_url_for(DEFAULT_BASE_URL),
            room_id,
            user_id,
            user_name: UNKNOWN_NAME.to_string(),
            other_user_name: UNKNOWN_NAME.to_string(),
            delivery: DeliveryMode::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_page_size: DEFAULT_POLL_PAGE_SIZE,
            optimistic_echo: false,
            locale: TimeLocale::default(),
            session_cookie: None,
        }
    }

    /// Reads `JOBCHAT_*` variables from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; room and user ids are required,
    /// everything else falls back to a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let room_id: RoomId = get("JOBCHAT_ROOM_ID")
            .context("JOBCHAT_ROOM_ID is not set")?
            .trim()
            .parse()
            .context("parse JOBCHAT_ROOM_ID")?;
        let user_id: UserId = get("JOBCHAT_USER_ID")
            .context("JOBCHAT_USER_ID is not set")?
            .trim()
            .parse()
            .context("parse JOBCHAT_USER_ID")?;

        let mut cfg = Self::new(room_id, user_id);
        if let Some(base) = get("JOBCHAT_BASE_URL") {
            cfg.base_url = base.trim_end_matches('/').to_string();
        }
        cfg.socket_url = get("JOBCHAT_SOCKET_URL").unwrap_or_else(|| socket_url_for(&cfg.base_url));
        if let Some(name) = get("JOBCHAT_USER_NAME") {
            cfg.user_name = name;
        }
        if let Some(name) = get("JOBCHAT_OTHER_NAME") {
            cfg.other_user_name = name;
        }
        if let Some(mode) = get("JOBCHAT_DELIVERY") {
            cfg.delivery = mode.parse()?;
        }
        if let Some(ms) = get("JOBCHAT_POLL_INTERVAL_MS") {
            let ms: u64 = ms.trim().parse().context("parse JOBCHAT_POLL_INTERVAL_MS")?;
            if ms == 0 {
                return Err(anyhow!("JOBCHAT_POLL_INTERVAL_MS must be positive"));
            }
            cfg.poll_interval = Duration::from_millis(ms);
        }
        if let Some(size) = get("JOBCHAT_POLL_PAGE_SIZE") {
            cfg.poll_page_size = size.trim().parse().context("parse JOBCHAT_POLL_PAGE_SIZE")?;
        }
        if let Some(flag) = get("JOBCHAT_OPTIMISTIC_ECHO") {
            cfg.optimistic_echo = matches!(flag.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(locale) = get("JOBCHAT_LOCALE") {
            cfg.locale = locale.parse::<TimeLocale>().map_err(|e: String| anyhow!(e))?;
        }
        cfg.session_cookie = get("JOBCHAT_SESSION_COOKIE");
        Ok(cfg)
    }

    /// Page requested by each poll tick.
    pub fn poll_query(&self) -> ListMessagesQuery {
        ListMessagesQuery { page: 1, per_page: self.poll_page_size }
    }

    pub fn is_own(&self, sender_id: UserId) -> bool {
        sender_id == self.user_id
    }
}

/// `http://host:port` -> `ws://host:port/ws`
fn socket_url_for(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws}/ws")
}
