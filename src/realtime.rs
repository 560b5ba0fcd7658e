// Realtime client module: owns the persistent websocket connection to the
// backend. The interactive shell stays synchronous, so all websocket I/O
// runs on a dedicated worker thread with its own single-threaded tokio
// runtime. Shell and worker share only the connection flag and the
// received-notification log; everything else flows over channels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use url::Url;

use crate::notification::{field_or_na, Outbound};

/// Upper bound for the websocket handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// The single event name recognized in both directions.
pub const NOTIFICATION_EVENT: &str = "notification";
/// Event name carrying the optional auth token after the handshake.
const AUTH_EVENT: &str = "auth";

/// Errors surfaced by the transport layer. These never propagate out of
/// the wrapper entry points; they are printed at the point of the
/// user-triggered action.
#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("connection attempt timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("websocket connection failed: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid websocket URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("websocket worker is gone")]
    WorkerGone,
}

/// Wire envelope for every text frame on the channel. The payload shape
/// inside `data` is not enforced.
#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope {
    pub event: String,
    pub data: Value,
}

enum Command {
    Emit(String),
    Close,
}

/// State shared between the shell thread and the worker thread.
#[derive(Default)]
struct Shared {
    connected: AtomicBool,
    received: Mutex<Vec<Value>>,
}

struct Worker {
    commands: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

/// Synchronous facade over the websocket worker. Constructed once at
/// startup and owned by the shell; a fresh worker is spawned per connect.
#[derive(Default)]
pub struct RealtimeClient {
    shared: Arc<Shared>,
    worker: Option<Worker>,
}

impl RealtimeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to establish the websocket connection, waiting up to the
    /// fixed handshake timeout. Failures of any kind (timeout, refused,
    /// handshake error) are printed and reported as `false`.
    pub fn connect(&mut self, url: &str, token: Option<&str>) -> bool {
        if self.is_connected() {
            println!("ℹ️  Already connected");
            return true;
        }
        // A previous worker may linger after a server-side drop.
        self.reap_worker();

        let target = match Url::parse(url) {
            Ok(target) => target,
            Err(e) => {
                println!("❌ Connection error: {}", RealtimeError::from(e));
                return false;
            }
        };

        println!("🔄 Connecting to {}...", target);
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let shared = Arc::clone(&self.shared);
        let token = token.map(str::to_string);
        let spawned = std::thread::Builder::new()
            .name("realtime-worker".into())
            .spawn(move || worker_main(target, token, shared, ready_tx, cmd_rx));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                println!("❌ Connection error: {}", e);
                return false;
            }
        };

        // Small margin over the handshake timeout so the worker always
        // reports its own outcome first.
        match ready_rx.recv_timeout(CONNECT_TIMEOUT + Duration::from_secs(2)) {
            Ok(Ok(())) => {
                println!("✅ Connected to the websocket server");
                log_line("Connection established");
                self.worker = Some(Worker { commands: cmd_tx, handle });
                true
            }
            Ok(Err(e)) => {
                println!("❌ Connection error: {}", e);
                let _ = handle.join();
                false
            }
            Err(_) => {
                // Dropping cmd_tx makes the worker shut down once the
                // handshake resolves either way.
                println!("❌ Connection error: {}", RealtimeError::WorkerGone);
                false
            }
        }
    }

    /// Tear down the connection. The flag is cleared synchronously; the
    /// worker sends a Close frame and is joined. No-op when already
    /// disconnected.
    pub fn disconnect(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.shared.connected.store(false, Ordering::SeqCst);
        let _ = worker.commands.blocking_send(Command::Close);
        let _ = worker.handle.join();
        println!("✅ Disconnected");
        log_line("Disconnected");
    }

    /// Emit one `notification` event on the open channel. Refused
    /// outright when disconnected; no transport action happens then.
    pub fn send(&self, titre: &str, message: &str, kind: &str) -> bool {
        let worker = match &self.worker {
            Some(worker) if self.is_connected() => worker,
            _ => {
                println!("❌ Not connected to the server");
                return false;
            }
        };
        let record = Outbound::new(titre, message, kind);
        let envelope = match serde_json::to_value(&record) {
            Ok(data) => Envelope { event: NOTIFICATION_EVENT.to_string(), data },
            Err(e) => {
                println!("❌ Emit error: {}", e);
                return false;
            }
        };
        let text = match serde_json::to_string(&envelope) {
            Ok(text) => text,
            Err(e) => {
                println!("❌ Emit error: {}", e);
                return false;
            }
        };
        println!("📤 Sending over the websocket...");
        match worker.commands.blocking_send(Command::Emit(text)) {
            Ok(()) => {
                println!("✅ Notification emitted");
                true
            }
            Err(_) => {
                println!("❌ Emit error: {}", RealtimeError::WorkerGone);
                false
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Snapshot of the received-notification log, arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.shared.received.lock().unwrap().clone()
    }

    pub fn received_count(&self) -> usize {
        self.shared.received.lock().unwrap().len()
    }

    pub fn clear_received(&self) {
        self.shared.received.lock().unwrap().clear();
    }

    /// Join a worker whose connection already ended on the remote side.
    fn reap_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            drop(worker.commands);
            let _ = worker.handle.join();
        }
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.disconnect();
        }
    }
}

/// Worker thread entry point: runs the handshake and, on success, the
/// select loop over the outbound command channel and the inbound stream.
fn worker_main(
    url: Url,
    token: Option<String>,
    shared: Arc<Shared>,
    ready_tx: std_mpsc::Sender<Result<(), RealtimeError>>,
    mut commands: mpsc::Receiver<Command>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            let _ = ready_tx.send(Err(e.into()));
            return;
        }
    };

    runtime.block_on(async move {
        let stream = match tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url)).await {
            Err(_) => {
                let _ = ready_tx.send(Err(RealtimeError::Timeout(CONNECT_TIMEOUT)));
                return;
            }
            Ok(Err(e)) => {
                let _ = ready_tx.send(Err(e.into()));
                return;
            }
            Ok(Ok((stream, _response))) => stream,
        };
        info!("websocket handshake successful");

        let (mut sink, mut stream) = stream.split();

        // The auth payload, when supplied, rides a dedicated first frame.
        if let Some(token) = token {
            let auth = Envelope {
                event: AUTH_EVENT.to_string(),
                data: serde_json::json!({ "token": token }),
            };
            match serde_json::to_string(&auth) {
                Ok(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        let _ = ready_tx.send(Err(e.into()));
                        return;
                    }
                }
                Err(e) => warn!("could not serialize auth payload: {}", e),
            }
        }

        shared.connected.store(true, Ordering::SeqCst);
        if ready_tx.send(Ok(())).is_err() {
            // The caller gave up waiting on the handshake.
            let _ = sink.send(close_frame()).await;
            shared.connected.store(false, Ordering::SeqCst);
            return;
        }

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(Command::Emit(text)) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            error!("websocket write failed: {}", e);
                            break;
                        }
                    }
                    Some(Command::Close) | None => {
                        let _ = sink.send(close_frame()).await;
                        break;
                    }
                },
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => handle_frame(&shared, &text),
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(frame))) => {
                        info!("server closed the connection: {:?}", frame);
                        break;
                    }
                    Some(Ok(other)) => warn!("ignoring non-text websocket message: {}", other),
                    Some(Err(e)) => {
                        error!("websocket read error: {}", e);
                        break;
                    }
                    None => {
                        info!("websocket stream ended");
                        break;
                    }
                },
            }
        }

        shared.connected.store(false, Ordering::SeqCst);
    });
}

/// Inbound frame dispatch: `notification` events land in the received
/// log verbatim and in arrival order; everything else is ignored.
fn handle_frame(shared: &Shared, text: &str) {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("unparseable websocket frame: {}", e);
            return;
        }
    };
    if envelope.event != NOTIFICATION_EVENT {
        return;
    }
    println!("\n📬 Notification received: {}", field_or_na(&envelope.data, "titre"));
    log_line(&format!("Notification: {}", field_or_na(&envelope.data, "titre")));
    shared.received.lock().unwrap().push(envelope.data);
}

fn close_frame() -> Message {
    Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: "client shut down".into(),
    }))
}

/// Timestamped event line, mirrored on stdout alongside the menu output.
fn log_line(message: &str) {
    println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
}
