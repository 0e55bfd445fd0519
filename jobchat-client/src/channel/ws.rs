use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use jobchat_core::{ClientEvent, ServerEvent};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::COOKIE, HeaderValue};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::TransportEvent;
use crate::error::Result;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Running transport: queue outbound frames on `outbound`, stop with `shutdown`.
pub struct WsHandle {
    pub outbound: UnboundedSender<ClientEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl WsHandle {
    /// Flushes queued frames, closes the socket and waits for the task.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if tokio::time::timeout(Duration::from_secs(2), &mut self.task).await.is_err() {
            warn!("socket transport did not stop in time, aborting");
            self.task.abort();
        }
    }
}

/// WebSocket transport with JSON `{event, data}` frames. Keeps reconnecting
/// with a capped backoff; frames emitted while offline wait in the queue.
pub struct WsTransport {
    url: String,
    cookie: Option<String>,
}

enum Session {
    /// Socket dropped, try again.
    Lost,
    /// Shutdown requested or nobody listens any more.
    Finished,
}

impl WsTransport {
    pub fn new(url: impl Into<String>, cookie: Option<String>) -> Self {
        Self { url: url.into(), cookie }
    }

    /// Spawns the connection loop. Transport events come out of the returned receiver.
    pub fn spawn(self) -> (WsHandle, UnboundedReceiver<TransportEvent>) {
        let (out_tx, out_rx) = unbounded_channel();
        let (ev_tx, ev_rx) = unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(out_rx, ev_tx, stop_rx));
        let handle = WsHandle { outbound: out_tx, shutdown: Some(stop_tx), task };
        (handle, ev_rx)
    }

    async fn run(
        self,
        mut outbound: UnboundedReceiver<ClientEvent>,
        events: UnboundedSender<TransportEvent>,
        mut stop: oneshot::Receiver<()>,
    ) {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            let _ = events.send(TransportEvent::Connecting);
            let connected = tokio::select! {
                res = self.connect() => res,
                _ = &mut stop => return,
            };
            match connected {
                Ok(socket) => {
                    info!(url = %self.url, "socket connected");
                    backoff = INITIAL_BACKOFF;
                    let _ = events.send(TransportEvent::Connected);
                    let session = pump(socket, &mut outbound, &events, &mut stop).await;
                    let _ = events.send(TransportEvent::Disconnected);
                    if let Session::Finished = session {
                        return;
                    }
                }
                Err(e) => {
                    let _ = events.send(TransportEvent::ConnectError(e.to_string()));
                }
            }
            if events.is_closed() {
                return;
            }
            debug!(delay_ms = backoff.as_millis() as u64, "socket reconnect scheduled");
            tokio::select! {
                _ = tokio::time::sleep(backoff) => {}
                _ = &mut stop => return,
            }
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    async fn connect(&self) -> Result<Socket> {
        let mut request = self.url.as_str().into_client_request()?;
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        let (socket, _response) = connect_async(request).await?;
        Ok(socket)
    }
}

/// Moves frames both ways until the socket drops or we are told to stop.
async fn pump(
    socket: Socket,
    outbound: &mut UnboundedReceiver<ClientEvent>,
    events: &UnboundedSender<TransportEvent>,
    stop: &mut oneshot::Receiver<()>,
) -> Session {
    // split so a slow read never holds up an outbound frame and vice versa
    let (mut sink, mut source) = socket.split();
    loop {
        // whichever side is ready first wins; the others are polled again next turn
        tokio::select! {
            out = outbound.recv() => {
                // every sender dropped: the session is gone, close politely
                let Some(event) = out else {
                    let _ = sink.close().await;
                    return Session::Finished;
                };
                // the frame is lost with the socket; the channel re-joins on reconnect
                if send_event(&mut sink, &event).await.is_err() {
                    return Session::Lost;
                }
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => {
                        if events.send(TransportEvent::Frame(event)).is_err() {
                            let _ = sink.close().await;
                            return Session::Finished;
                        }
                    }
                    Err(e) => debug!(error = %e, "ignoring unknown socket frame"),
                },
                Some(Ok(Message::Close(_))) | None => return Session::Lost,
                // ping/pong are answered by tungstenite itself; binary is not used
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "socket read failed");
                    return Session::Lost;
                }
            },
            _ = &mut *stop => {
                // The session queues its `leave` right before asking us to stop.
                // select! may have picked the stop first, so drain what is already
                // queued (without waiting for more) before the close frame.
                while let Ok(event) = outbound.try_recv() {
                    if send_event(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
                let _ = sink.close().await;
                return Session::Finished;
            }
        }
    }
}

async fn send_event<S>(sink: &mut S, event: &ClientEvent) -> Result<()>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let text = serde_json::to_string(event)?;
    sink.send(Message::Text(text)).await?;
    Ok(())
}
