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

//! Connection state machine owning the single stream connection of a component.

use crate::error::OpenError;
use crate::hub::{Hub, StreamMessage, StreamPayload};
use crate::observability::{events, fields};
use crate::transport::{TransportConnection, TransportFactory, TransportListener};
use async_trait::async_trait;
use futures::FutureExt;
use std::fmt::{Display, Formatter};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn, Level};
use uuid::Uuid;

const COMPONENT: &str = "stream_bridge";

/// Observable state of the connection slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConnectionState {
    /// No connection; `open` is allowed.
    Idle,
    /// Connection requested, handshake not confirmed yet.
    OpenPending,
    /// Handshake confirmed, messages may flow.
    Active,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::OpenPending => write!(f, "open pending"),
            ConnectionState::Active => write!(f, "active"),
        }
    }
}

/// Host callbacks for the lifecycle of one opened connection.
#[async_trait]
pub trait ConnectionObserver: Send + Sync {
    async fn on_opened(&self) {}

    async fn on_closed(&self) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl ConnectionObserver for NoopObserver {}

struct Connection {
    generation: u64,
    connection_id: String,
    state: ConnectionState,
    handle: Box<dyn TransportConnection>,
}

#[derive(Default)]
struct ConnectionSlot {
    last_generation: u64,
    connection: Option<Connection>,
}

/// State shared between the bridge and the listeners it hands to the transport.
struct BridgeShared {
    source: String,
    channel: String,
    hub: Arc<dyn Hub>,
    slot: Mutex<ConnectionSlot>,
}

impl BridgeShared {
    // Never held across an `.await`.
    fn lock_slot(&self) -> MutexGuard<'_, ConnectionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock_slot()
            .connection
            .as_ref()
            .is_some_and(|connection| connection.generation == generation)
    }

    /// Moves the connection of `generation` from `OpenPending` to `Active`.
    fn promote(&self, generation: u64) -> bool {
        let mut slot = self.lock_slot();
        match slot.connection.as_mut() {
            Some(connection)
                if connection.generation == generation
                    && connection.state == ConnectionState::OpenPending =>
            {
                connection.state = ConnectionState::Active;
                true
            }
            _ => false,
        }
    }

    /// Empties the slot if it still holds the connection of `generation`.
    fn release(&self, generation: u64) -> bool {
        let released = {
            let mut slot = self.lock_slot();
            let is_current = slot
                .connection
                .as_ref()
                .is_some_and(|connection| connection.generation == generation);
            if is_current {
                slot.connection.take()
            } else {
                None
            }
        };

        // The transport already closed; dropping the handle is enough.
        released.is_some()
    }

    async fn publish(&self, connection_id: &str, payload: StreamPayload) {
        let payload_fields =
            tracing::enabled!(Level::DEBUG).then(|| fields::PayloadFields::from_payload(&payload));

        if let Some(payload_fields) = payload_fields.as_ref() {
            debug!(
                event = events::STREAM_MESSAGE_RECEIVE,
                component = COMPONENT,
                connection_id,
                channel = self.channel.as_str(),
                payload_kind = payload_fields.kind,
                payload_len = payload_fields.len,
                "received stream message"
            );
        }

        let message = StreamMessage::new(payload);
        let outcome = AssertUnwindSafe(self.hub.publish(&self.source, &self.channel, message))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {
                if payload_fields.is_some() {
                    debug!(
                        event = events::STREAM_PUBLISH_OK,
                        component = COMPONENT,
                        connection_id,
                        channel = self.channel.as_str(),
                        "published stream message"
                    );
                }
            }
            Ok(Err(err)) => {
                warn!(
                    event = events::STREAM_PUBLISH_FAILED,
                    component = COMPONENT,
                    connection_id,
                    channel = self.channel.as_str(),
                    err = %err,
                    "unable to publish stream message"
                );
            }
            Err(panic) => {
                let reason = fields::format_panic(panic.as_ref());
                error!(
                    event = events::STREAM_PUBLISH_PANICKED,
                    component = COMPONENT,
                    connection_id,
                    channel = self.channel.as_str(),
                    reason = reason.as_str(),
                    "stream message publication panicked"
                );
            }
        }
    }
}

/// Listener handed to the transport for one connection generation.
struct BridgeListener {
    generation: u64,
    connection_id: String,
    shared: Arc<BridgeShared>,
    observer: Arc<dyn ConnectionObserver>,
}

impl BridgeListener {
    fn stale(&self, callback: &'static str) {
        debug!(
            event = events::CONNECTION_STALE_CALLBACK,
            component = COMPONENT,
            connection_id = self.connection_id.as_str(),
            callback,
            "ignoring callback for a connection that is no longer current"
        );
    }
}

#[async_trait]
impl TransportListener for BridgeListener {
    async fn on_opened(&self) {
        if !self.shared.promote(self.generation) {
            self.stale("opened");
            return;
        }

        info!(
            event = events::CONNECTION_OPENED,
            component = COMPONENT,
            connection_id = self.connection_id.as_str(),
            "stream connection opened"
        );
        self.observer.on_opened().await;
    }

    async fn on_message(&self, payload: StreamPayload) {
        if !self.shared.is_current(self.generation) {
            self.stale("message");
            return;
        }

        self.shared.publish(&self.connection_id, payload).await;
    }

    async fn on_closed(&self) {
        if self.shared.release(self.generation) {
            info!(
                event = events::CONNECTION_CLOSED,
                component = COMPONENT,
                connection_id = self.connection_id.as_str(),
                reason = fields::REASON_PEER_CLOSE,
                "stream connection closed by transport"
            );
        } else {
            debug!(
                event = events::CONNECTION_CLOSED,
                component = COMPONENT,
                connection_id = self.connection_id.as_str(),
                reason = fields::REASON_LOCAL_CLOSE,
                "transport confirmed close of a released connection"
            );
        }

        self.observer.on_closed().await;
    }
}

/// Owns at most one transport connection and republishes its messages on a hub channel.
pub(crate) struct StreamBridge {
    shared: Arc<BridgeShared>,
    target: String,
    transport: Arc<dyn TransportFactory>,
}

impl StreamBridge {
    pub(crate) fn new(
        source: &str,
        channel: &str,
        target: String,
        hub: Arc<dyn Hub>,
        transport: Arc<dyn TransportFactory>,
    ) -> Self {
        Self {
            shared: Arc::new(BridgeShared {
                source: source.to_string(),
                channel: channel.to_string(),
                hub,
                slot: Mutex::new(ConnectionSlot::default()),
            }),
            target,
            transport,
        }
    }

    pub(crate) fn channel(&self) -> &str {
        &self.shared.channel
    }

    pub(crate) fn target(&self) -> &str {
        &self.target
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.shared
            .lock_slot()
            .connection
            .as_ref()
            .map_or(ConnectionState::Idle, |connection| connection.state)
    }

    /// Requests a new connection. Fails without touching the transport unless idle.
    pub(crate) fn open(&self, observer: Arc<dyn ConnectionObserver>) -> Result<(), OpenError> {
        // The slot stays locked until the handle is stored so that callbacks fired
        // by an eager transport always find their connection.
        let mut slot = self.shared.lock_slot();

        if let Some(existing) = slot.connection.as_ref() {
            warn!(
                event = events::CONNECTION_OPEN_REJECTED,
                component = COMPONENT,
                connection_id = existing.connection_id.as_str(),
                state = %existing.state,
                "a stream connection has already been opened"
            );
            return Err(OpenError::AlreadyOpen {
                state: existing.state,
            });
        }

        let generation = slot.last_generation.wrapping_add(1);
        slot.last_generation = generation;
        let connection_id = Uuid::new_v4().to_string();

        info!(
            event = events::CONNECTION_OPEN_REQUESTED,
            component = COMPONENT,
            connection_id = connection_id.as_str(),
            stream_target = self.target.as_str(),
            "opening stream connection"
        );

        let listener = Arc::new(BridgeListener {
            generation,
            connection_id: connection_id.clone(),
            shared: self.shared.clone(),
            observer,
        });

        let handle = self
            .transport
            .connect(&self.target, listener)
            .map_err(|err| {
                warn!(
                    event = events::CONNECTION_OPEN_FAILED,
                    component = COMPONENT,
                    connection_id = connection_id.as_str(),
                    stream_target = self.target.as_str(),
                    err = %err,
                    "transport refused stream connection"
                );
                OpenError::Transport(err)
            })?;

        slot.connection = Some(Connection {
            generation,
            connection_id,
            state: ConnectionState::OpenPending,
            handle,
        });

        Ok(())
    }

    /// Empties the slot and asks the transport to terminate. No-op when idle.
    pub(crate) fn close(&self) {
        let connection = self.shared.lock_slot().connection.take();

        let Some(connection) = connection else {
            debug!(
                event = events::CONNECTION_CLOSE_NOOP,
                component = COMPONENT,
                "no stream connection to close"
            );
            return;
        };

        info!(
            event = events::CONNECTION_CLOSE_REQUESTED,
            component = COMPONENT,
            connection_id = connection.connection_id.as_str(),
            state = %connection.state,
            "closing stream connection"
        );
        connection.handle.close();
    }
}
