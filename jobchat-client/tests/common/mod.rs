//! In-process fake of the job-board backend: the REST endpoints the client
//! calls plus a WebSocket speaking `{event, data}` frames.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Extension, Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Id the fake session authenticates every request as.
pub const USER_ID: i64 = 1;
pub const COOKIE: &str = "session=abc";

#[derive(Default)]
pub struct Backend {
    /// Raw text frames received on the socket, in order.
    pub frames: Mutex<Vec<String>>,
    pub connections: AtomicUsize,
    /// Hang up on the first socket connection.
    pub drop_first: AtomicBool,
    next_id: AtomicI64,
}

impl Backend {
    pub fn events(&self) -> Vec<String> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter_map(|f| serde_json::from_str::<Value>(f).ok())
            .filter_map(|v| v["event"].as_str().map(str::to_string))
            .collect()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 100
    }
}

pub async fn spawn_backend() -> (SocketAddr, Arc<Backend>) {
    let state = Arc::new(Backend::default());
    let app = Router::new()
        .route("/chat", get(|| async { "chat list" }))
        .route("/chat/:room/send", post(send_message))
        .route("/chat/:room/messages", get(list_messages))
        .route("/chat/:room", get(|| async { "room page" }))
        .route("/chat/:room/leave", post(leave_room))
        .route("/jobs/:id/apply", post(apply))
        .route("/jobs/:id/bookmark", post(bookmark))
        .route("/jobs/:id", delete(delete_job))
        .route("/ws", get(ws_handler))
        .layer(Extension(state.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.expect("fake backend");
    });
    (addr, state)
}

fn stored_message(id: i64, room: i64, body: &str) -> Value {
    json!({
        "id": id, "room_id": room, "message": body, "message_type": "text",
        "sender_id": USER_ID, "created_at": "2025-03-14 15:04:05", "is_read": false
    })
}

async fn send_message(
    Extension(state): Extension<Arc<Backend>>,
    Path(room): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) != Some(COOKIE) {
        return (StatusCode::UNAUTHORIZED, "login required").into_response();
    }
    let text = body["message"].as_str().unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"success": false, "message": "메시지 내용을 입력해주세요."})))
            .into_response();
    }
    let mut data = stored_message(state.next_id(), room, &text);
    data["sender_name"] = json!("민수");
    Json(json!({"success": true, "message": "메시지가 전송되었습니다.", "message_data": data})).into_response()
}

async fn list_messages(Path(room): Path<i64>, Query(q): Query<std::collections::HashMap<String, u32>>) -> Json<Value> {
    let per_page = q.get("per_page").copied().unwrap_or(50);
    // newest first, like the real listing
    let messages: Vec<Value> =
        (1..=per_page as i64).rev().map(|id| stored_message(id, room, &format!("m{id}"))).collect();
    Json(json!({"success": true, "messages": messages, "has_more": q.get("page") == Some(&1)}))
}

/// Room the backend refuses to let the user leave.
pub const STUCK_ROOM: i64 = 9;

async fn leave_room(Path(room): Path<i64>) -> Redirect {
    // a refused leave flashes an error and goes back to the room
    if room == STUCK_ROOM {
        Redirect::to(&format!("/chat/{room}"))
    } else {
        Redirect::to("/chat")
    }
}

async fn apply(Path(id): Path<i64>) -> Response {
    match id {
        500 => (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>").into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({"success": false, "message": "이미 지원한 공고입니다."})))
            .into_response(),
    }
}

async fn bookmark(Path(_id): Path<i64>, headers: HeaderMap) -> Response {
    // the backend answers JSON only to JSON requests
    if headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) != Some("application/json") {
        return Redirect::to("/jobs").into_response();
    }
    Json(json!({"success": true, "is_bookmarked": true, "bookmark_count": 4, "message": "찜 목록에 추가했습니다."}))
        .into_response()
}

async fn delete_job(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({"success": true, "message": "공고가 삭제되었습니다."}))
}

async fn ws_handler(Extension(state): Extension<Arc<Backend>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<Backend>) {
    let n = state.connections.fetch_add(1, Ordering::SeqCst);
    if n == 0 && state.drop_first.load(Ordering::SeqCst) {
        return;
    }
    while let Some(Ok(msg)) = socket.recv().await {
        let Message::Text(text) = msg else { continue };
        state.frames.lock().unwrap().push(text.clone());
        let Ok(frame) = serde_json::from_str::<Value>(&text) else { continue };
        let room = frame["data"]["room_id"].clone();
        let replies = match frame["event"].as_str() {
            Some("join") => vec![
                json!({"event": "typing", "data": {"room_id": room}}),
                json!({"event": "joined", "data": {"room_id": room}}),
            ],
            Some("send_message") => {
                let body = frame["data"]["message"].as_str().unwrap_or_default();
                let msg = json!({"event": "new_message",
                    "data": stored_message(state.next_id(), room.as_i64().unwrap_or_default(), body)});
                // broadcast reaches this client twice (room + personal channel)
                vec![msg.clone(), msg]
            }
            Some("read_messages") => vec![json!({"event": "messages_read", "data": {"room_id": room, "reader_id": USER_ID}})],
            _ => vec![],
        };
        for reply in replies {
            if socket.send(Message::Text(reply.to_string())).await.is_err() {
                return;
            }
        }
    }
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
