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

mod support;

use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use support::{closed_port, init_logging, next_event, serve_once, ChannelListener, ListenerEvent, WAIT};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use wisit_streamer::{
    ConnectionState, LocalHub, StreamComponent, StreamConfig, StreamPayload, TransportFactory,
};
use wisit_transport_websocket::{websocket_registry, WebSocketTransport};

#[tokio::test(flavor = "multi_thread")]
async fn frames_are_forwarded_in_order_then_closed() {
    init_logging();
    let (addr, server) = serve_once(|mut socket| async move {
        socket.send(Message::text("42")).await.expect("send text");
        socket
            .send(Message::binary(vec![1u8, 2, 3]))
            .await
            .expect("send binary");
        socket.send(Message::Ping(Vec::new().into())).await.expect("send ping");
        socket.close(None).await.expect("close");
        while socket.next().await.is_some() {}
    })
    .await;

    let (listener, mut events) = ChannelListener::new();
    let _connection = WebSocketTransport::new()
        .connect(&format!("ws://{addr}/wisit/stream"), Arc::new(listener))
        .expect("connect should start");

    assert_eq!(next_event(&mut events).await, ListenerEvent::Opened);
    assert_eq!(
        next_event(&mut events).await,
        ListenerEvent::Message(StreamPayload::Text("42".to_string()))
    );
    assert_eq!(
        next_event(&mut events).await,
        ListenerEvent::Message(StreamPayload::Binary(vec![1, 2, 3]))
    );
    assert_eq!(next_event(&mut events).await, ListenerEvent::Closed);

    server.await.expect("server task");
}

#[tokio::test(flavor = "multi_thread")]
async fn local_close_sends_close_frame_and_reports_closed() {
    init_logging();
    let (seen_tx, seen_rx) = oneshot::channel();
    let (addr, server) = serve_once(|mut socket| async move {
        let mut saw_close = false;
        while let Some(Ok(message)) = socket.next().await {
            if message.is_close() {
                saw_close = true;
            }
        }
        let _ = seen_tx.send(saw_close);
    })
    .await;

    let (listener, mut events) = ChannelListener::new();
    let connection = WebSocketTransport::new()
        .connect(&format!("ws://{addr}/wisit/stream"), Arc::new(listener))
        .expect("connect should start");
    assert_eq!(next_event(&mut events).await, ListenerEvent::Opened);

    connection.close();

    assert_eq!(next_event(&mut events).await, ListenerEvent::Closed);
    let saw_close = tokio::time::timeout(WAIT, seen_rx)
        .await
        .expect("server should finish")
        .expect("server result");
    assert!(saw_close);
    server.await.expect("server task");
}

#[tokio::test(flavor = "multi_thread")]
async fn refused_connection_reports_closed_without_opened() {
    init_logging();
    let addr = closed_port().await;

    let (listener, mut events) = ChannelListener::new();
    let _connection = WebSocketTransport::new()
        .connect(&format!("ws://{addr}/wisit/stream"), Arc::new(listener))
        .expect("connect should start");

    assert_eq!(next_event(&mut events).await, ListenerEvent::Closed);
    assert!(
        tokio::time::timeout(std::time::Duration::from_millis(200), events.recv())
            .await
            .map_or(true, |event| event.is_none()),
        "closed must be the only notification"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stream_component_publishes_server_frames_on_the_hub() {
    init_logging();
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let (addr, server) = serve_once(|mut socket| async move {
        socket.send(Message::text("42")).await.expect("send text");
        let _ = release_rx.await;
        socket.close(None).await.expect("close");
        while socket.next().await.is_some() {}
    })
    .await;

    let hub = Arc::new(LocalHub::default());
    let config = StreamConfig::new()
        .with_host(addr.to_string())
        .with_resource_path("/wisit")
        .with_channel("/wisit/stream");
    let component = StreamComponent::configure(hub.clone(), &websocket_registry(), Some(&config))
        .await
        .expect("configure");
    let mut messages = hub.receiver("/wisit/stream").await;

    let (observer, mut events) = ChannelListener::new();
    component.open(Arc::new(observer)).expect("open");
    assert_eq!(next_event(&mut events).await, ListenerEvent::Opened);

    let published = tokio::time::timeout(WAIT, messages.recv())
        .await
        .expect("message should be published in time")
        .expect("broadcast should stay open");
    assert_eq!(published.source, "wisit-stream");
    assert_eq!(published.message.data.as_text(), Some("42"));
    assert_eq!(component.state(), ConnectionState::Active);

    let _ = release_tx.send(());
    assert_eq!(next_event(&mut events).await, ListenerEvent::Closed);
    assert_eq!(component.state(), ConnectionState::Idle);

    server.await.expect("server task");
}
