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

//! WebSocket transport for `wisit-streamer`, built on `tokio-tungstenite`.
//!
//! [`WebSocketTransport`] spawns one task per connection on the current Tokio
//! runtime. The task performs the handshake, forwards text and binary frames to
//! the listener and reports `on_closed` exactly once, whichever side ends the
//! connection.
//!
//! Use [`websocket_registry`] to get a [`wisit_streamer::TransportRegistry`] with
//! the transport registered under the primary name.

mod websocket;
pub use websocket::{websocket_registry, WebSocketConnection, WebSocketTransport};
