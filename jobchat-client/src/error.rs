use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("socket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("push channel closed")]
    ChannelClosed,
}

impl ClientError {
    /// Text to show the user: the backend's own reason when it gave one.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ClientError::Rejected(reason) if !reason.is_empty() => reason,
            _ => fallback,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
