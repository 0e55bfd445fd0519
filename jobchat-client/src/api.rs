use std::future::Future;

use jobchat_core::protocol::http::paths;
use jobchat_core::{
    ActionResponse, ApplyResponse, BookmarkResponse, JobId, ListMessagesQuery, ListMessagesResponse,
    RoomId, SendMessageRequest, SendMessageResponse,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Request/response side of the backend, one method per endpoint the chat and
/// job pages call.
pub trait JobBoardApi: Send + Sync + 'static {
    fn send_message(
        &self,
        room_id: RoomId,
        request: &SendMessageRequest,
    ) -> impl Future<Output = Result<SendMessageResponse>> + Send;

    /// Leaves the room and returns the path the backend sent the user to.
    /// A refused leave lands back on the room page.
    fn leave_room(&self, room_id: RoomId) -> impl Future<Output = Result<String>> + Send;

    fn list_messages(
        &self,
        room_id: RoomId,
        query: ListMessagesQuery,
    ) -> impl Future<Output = Result<ListMessagesResponse>> + Send;

    fn apply(&self, job_id: JobId) -> impl Future<Output = Result<ApplyResponse>> + Send;

    fn toggle_bookmark(&self, job_id: JobId) -> impl Future<Output = Result<BookmarkResponse>> + Send;

    fn delete_job(&self, job_id: JobId) -> impl Future<Output = Result<ActionResponse>> + Send;
}

/// [`JobBoardApi`] over HTTP with the user's session cookie.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // The job endpoints only answer with JSON when the request says it is JSON.
    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Decodes the body even on error statuses, since the backend puts its
/// `{success: false, message}` there; only an undecodable error body becomes
/// a status error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    match serde_json::from_slice::<T>(&bytes) {
        Ok(body) => Ok(body),
        Err(_) if !status.is_success() => Err(ClientError::Status(status.as_u16())),
        Err(e) => Err(e.into()),
    }
}

impl JobBoardApi for HttpApi {
    async fn send_message(&self, room_id: RoomId, request: &SendMessageRequest) -> Result<SendMessageResponse> {
        let response = self.client.post(self.url(&paths::send_message(room_id))).json(request).send().await?;
        decode(response).await
    }

    async fn leave_room(&self, room_id: RoomId) -> Result<String> {
        let leave_path = paths::leave_room(room_id);
        let response = self.client.post(self.url(&leave_path)).send().await?;
        let status = response.status();
        // redirects are followed, so this is where the page would end up
        let landing = response.url().path().to_string();
        debug!(%status, room_id, %landing, "leave room answered");
        if !(status.is_success() || status.is_redirection()) {
            return Err(ClientError::Status(status.as_u16()));
        }
        if landing != leave_path {
            return Ok(landing);
        }
        // answered in place: a JSON {success, message?} body, or nothing useful
        match serde_json::from_slice::<ActionResponse>(&response.bytes().await?) {
            Ok(body) if !body.success => Err(ClientError::Rejected(body.message.unwrap_or_default())),
            _ => Ok(paths::CHAT_LIST.to_string()),
        }
    }

    async fn list_messages(&self, room_id: RoomId, query: ListMessagesQuery) -> Result<ListMessagesResponse> {
        let response = self.client.get(self.url(&paths::messages(room_id))).query(&query).send().await?;
        decode(response).await
    }

    async fn apply(&self, job_id: JobId) -> Result<ApplyResponse> {
        let response = self
            .client
            .post(self.url(&paths::apply(job_id)))
            .headers(Self::json_headers())
            .body("{}")
            .send()
            .await?;
        decode(response).await
    }

    async fn toggle_bookmark(&self, job_id: JobId) -> Result<BookmarkResponse> {
        let response = self
            .client
            .post(self.url(&paths::bookmark(job_id)))
            .headers(Self::json_headers())
            .body("{}")
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_job(&self, job_id: JobId) -> Result<ActionResponse> {
        let response = self.client.delete(self.url(&paths::job(job_id))).headers(Self::json_headers()).send().await?;
        decode(response).await
    }
}
