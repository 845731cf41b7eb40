#![allow(dead_code)]

use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, WebSocketStream};
use wisit_streamer::{ConnectionObserver, StreamPayload, TransportListener};

pub(crate) const WAIT: Duration = Duration::from_secs(5);

pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ListenerEvent {
    Opened,
    Message(StreamPayload),
    Closed,
}

/// Listener forwarding every callback to a channel the test can await.
pub(crate) struct ChannelListener {
    events: mpsc::UnboundedSender<ListenerEvent>,
}

impl ChannelListener {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<ListenerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { events }, receiver)
    }
}

#[async_trait]
impl TransportListener for ChannelListener {
    async fn on_opened(&self) {
        let _ = self.events.send(ListenerEvent::Opened);
    }

    async fn on_message(&self, payload: StreamPayload) {
        let _ = self.events.send(ListenerEvent::Message(payload));
    }

    async fn on_closed(&self) {
        let _ = self.events.send(ListenerEvent::Closed);
    }
}

#[async_trait]
impl ConnectionObserver for ChannelListener {
    async fn on_opened(&self) {
        let _ = self.events.send(ListenerEvent::Opened);
    }

    async fn on_closed(&self) {
        let _ = self.events.send(ListenerEvent::Closed);
    }
}

pub(crate) async fn next_event(events: &mut mpsc::UnboundedReceiver<ListenerEvent>) -> ListenerEvent {
    tokio::time::timeout(WAIT, events.recv())
        .await
        .expect("listener event should arrive in time")
        .expect("listener channel should stay open")
}

pub(crate) type ServerSocket = WebSocketStream<tokio::net::TcpStream>;

/// Accepts one websocket client and hands it to `script`.
pub(crate) async fn serve_once<F, Fut>(script: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test server should bind");
    let addr = listener.local_addr().expect("bound address");

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("client should connect");
        let socket = accept_async(stream)
            .await
            .expect("websocket handshake should succeed");
        script(socket).await;
    });

    (addr, server)
}

/// Address nothing listens on.
pub(crate) async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("probe should bind");
    listener.local_addr().expect("bound address")
}
