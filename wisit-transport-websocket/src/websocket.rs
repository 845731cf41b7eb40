/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wisit_streamer::observability::{events, fields};
use wisit_streamer::{
    StreamPayload, TransportConnection, TransportError, TransportFactory, TransportListener,
    TransportRegistry, PRIMARY_TRANSPORT,
};

const COMPONENT: &str = "websocket_transport";

/// Registry offering [`WebSocketTransport`] under [`PRIMARY_TRANSPORT`].
pub fn websocket_registry() -> TransportRegistry {
    TransportRegistry::new().with_factory(PRIMARY_TRANSPORT, Arc::new(WebSocketTransport::new()))
}

/// [`TransportFactory`] opening `ws://` and `wss://` connections.
///
/// `connect` must be called from within a Tokio runtime; the connection task is
/// spawned on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

impl TransportFactory for WebSocketTransport {
    fn connect(
        &self,
        target: &str,
        listener: Arc<dyn TransportListener>,
    ) -> Result<Box<dyn TransportConnection>, TransportError> {
        if !is_websocket_url(target) {
            return Err(TransportError::InvalidTarget(target.to_string()));
        }
        let runtime = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;

        let socket_id = Uuid::new_v4().to_string();
        debug!(
            event = events::WS_CONNECT_START,
            component = COMPONENT,
            socket_id = socket_id.as_str(),
            stream_target = target,
            "starting websocket handshake"
        );

        let (close_tx, close_rx) = oneshot::channel();
        runtime.spawn(run_connection(
            socket_id,
            target.to_string(),
            listener,
            close_rx,
        ));

        Ok(Box::new(WebSocketConnection { close_tx }))
    }
}

/// Handle of one websocket connection task.
///
/// Closing, or dropping the handle, makes the task send a close frame and stop.
#[derive(Debug)]
pub struct WebSocketConnection {
    close_tx: oneshot::Sender<()>,
}

impl TransportConnection for WebSocketConnection {
    fn close(self: Box<Self>) {
        // The task may already be gone when the peer closed first.
        let _ = self.close_tx.send(());
    }
}

fn is_websocket_url(target: &str) -> bool {
    ["ws://", "wss://"]
        .iter()
        .any(|scheme| target.len() > scheme.len() && target.starts_with(scheme))
}

fn frame_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}

async fn run_connection(
    socket_id: String,
    target: String,
    listener: Arc<dyn TransportListener>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let reason = drive_connection(&socket_id, &target, listener.as_ref(), &mut close_rx).await;

    debug!(
        event = events::WS_CONNECTION_ENDED,
        component = COMPONENT,
        socket_id = socket_id.as_str(),
        reason,
        "websocket connection ended"
    );
    listener.on_closed().await;
}

/// Runs the connection until it ends and returns why it ended.
async fn drive_connection(
    socket_id: &str,
    target: &str,
    listener: &dyn TransportListener,
    close_rx: &mut oneshot::Receiver<()>,
) -> &'static str {
    let connected = tokio::select! {
        result = connect_async(target) => result,
        _ = &mut *close_rx => return fields::REASON_LOCAL_CLOSE,
    };

    let stream = match connected {
        Ok((stream, _response)) => stream,
        Err(err) => {
            warn!(
                event = events::WS_CONNECT_FAILED,
                component = COMPONENT,
                socket_id,
                stream_target = target,
                err = %err,
                "websocket handshake failed"
            );
            return fields::REASON_HANDSHAKE_FAILED;
        }
    };

    info!(
        event = events::WS_CONNECT_OK,
        component = COMPONENT,
        socket_id,
        stream_target = target,
        "websocket connected"
    );
    listener.on_opened().await;

    let (mut sink, mut frames) = stream.split();
    let mut peer_closed = false;

    loop {
        tokio::select! {
            _ = &mut *close_rx => {
                if !peer_closed {
                    if let Err(err) = sink.send(Message::Close(None)).await {
                        debug!(
                            event = events::WS_CLOSE_SEND_FAILED,
                            component = COMPONENT,
                            socket_id,
                            err = %err,
                            "unable to send close frame"
                        );
                    }
                }
                return fields::REASON_LOCAL_CLOSE;
            }
            frame = frames.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        listener.on_message(StreamPayload::Text(text.to_string())).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        listener.on_message(StreamPayload::Binary(bytes.to_vec())).await;
                    }
                    // Keep reading so the close handshake completes.
                    Some(Ok(Message::Close(_))) => peer_closed = true,
                    Some(Ok(other)) => {
                        debug!(
                            event = events::WS_FRAME_IGNORED,
                            component = COMPONENT,
                            socket_id,
                            frame_kind = frame_kind(&other),
                            "ignoring control frame"
                        );
                    }
                    Some(Err(err)) => {
                        if peer_closed {
                            return fields::REASON_PEER_CLOSE;
                        }
                        warn!(
                            event = events::WS_CONNECTION_ENDED,
                            component = COMPONENT,
                            socket_id,
                            err = %err,
                            "websocket stream failed"
                        );
                        return fields::REASON_STREAM_ERROR;
                    }
                    None if peer_closed => return fields::REASON_PEER_CLOSE,
                    None => return fields::REASON_STREAM_ENDED,
                }
            }
        }
    }
}
