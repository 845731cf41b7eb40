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

//! Transport seam: connection factories, connection handles and lifecycle listeners.

use crate::error::{ConfigurationError, TransportError};
use crate::hub::StreamPayload;
use crate::observability::events;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name under which the preferred stream transport is registered.
pub const PRIMARY_TRANSPORT: &str = "websocket";
/// Name probed when no transport is registered under [`PRIMARY_TRANSPORT`].
pub const ALTERNATE_TRANSPORT: &str = "websocket-legacy";

const COMPONENT: &str = "transport_registry";

/// Receives lifecycle notifications for one connection.
///
/// A transport delivers notifications for a given connection in order
/// (`on_opened`, any number of `on_message`, then `on_closed`) and never
/// concurrently with each other. `on_closed` also fires when the handshake
/// never succeeded.
#[async_trait]
pub trait TransportListener: Send + Sync {
    async fn on_opened(&self);

    async fn on_message(&self, payload: StreamPayload);

    async fn on_closed(&self);
}

/// Handle to one live connection.
pub trait TransportConnection: Send {
    /// Requests termination. Returns immediately; the listener's `on_closed`
    /// may still fire afterwards.
    fn close(self: Box<Self>);
}

/// Creates connections for a target URL.
///
/// `connect` must return without waiting for the handshake: the outcome is
/// reported later through the listener.
pub trait TransportFactory: Send + Sync {
    fn connect(
        &self,
        target: &str,
        listener: Arc<dyn TransportListener>,
    ) -> Result<Box<dyn TransportConnection>, TransportError>;
}

/// Named transport factories available to stream components.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    factories: HashMap<String, Arc<dyn TransportFactory>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(mut self, name: &str, factory: Arc<dyn TransportFactory>) -> Self {
        self.register(name, factory);
        self
    }

    /// Registers `factory` under `name`, returning the factory it replaced.
    pub fn register(
        &mut self,
        name: &str,
        factory: Arc<dyn TransportFactory>,
    ) -> Option<Arc<dyn TransportFactory>> {
        self.factories.insert(name.to_string(), factory)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TransportFactory>> {
        self.factories.get(name).cloned()
    }

    /// Probes [`PRIMARY_TRANSPORT`] then [`ALTERNATE_TRANSPORT`].
    pub fn resolve_stream_transport(&self) -> Result<Arc<dyn TransportFactory>, ConfigurationError> {
        if let Some(factory) = self.get(PRIMARY_TRANSPORT) {
            return Ok(factory);
        }

        if let Some(factory) = self.get(ALTERNATE_TRANSPORT) {
            debug!(
                event = events::TRANSPORT_PROBE_FALLBACK,
                component = COMPONENT,
                primary = PRIMARY_TRANSPORT,
                alternate = ALTERNATE_TRANSPORT,
                "primary stream transport missing; using alternate"
            );
            return Ok(factory);
        }

        warn!(
            event = events::TRANSPORT_PROBE_FAILED,
            component = COMPONENT,
            primary = PRIMARY_TRANSPORT,
            alternate = ALTERNATE_TRANSPORT,
            "no stream transport registered"
        );
        Err(ConfigurationError::UnsupportedTransport {
            primary: PRIMARY_TRANSPORT,
            alternate: ALTERNATE_TRANSPORT,
        })
    }
}
