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

//! Canonical structured field keys and value-format helpers.

use crate::hub::StreamPayload;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const CONNECTION_ID: &str = "connection_id";
pub const STREAM_TARGET: &str = "stream_target";
pub const COMPONENT_NAME: &str = "component_name";
pub const CHANNEL: &str = "channel";
pub const SOURCE: &str = "source";
pub const CONTRACT: &str = "contract";
pub const STATE: &str = "state";
pub const CALLBACK: &str = "callback";

pub const PAYLOAD_KIND: &str = "payload_kind";
pub const PAYLOAD_LEN: &str = "payload_len";

pub const SUBSCRIBER: &str = "subscriber";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const PAYLOAD_KIND_TEXT: &str = "text";
pub const PAYLOAD_KIND_BINARY: &str = "binary";
pub const REASON_LOCAL_CLOSE: &str = "local_close";
pub const REASON_PEER_CLOSE: &str = "peer_close";
pub const REASON_STREAM_ENDED: &str = "stream_ended";
pub const REASON_STREAM_ERROR: &str = "stream_error";
pub const REASON_HANDSHAKE_FAILED: &str = "handshake_failed";
pub const UNKNOWN_PANIC: &str = "non-string panic payload";

/// Payload fields that are only worth formatting when debug logging is on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayloadFields {
    pub kind: &'static str,
    pub len: usize,
}

impl PayloadFields {
    pub fn from_payload(payload: &StreamPayload) -> Self {
        Self {
            kind: format_payload_kind(payload),
            len: payload.len(),
        }
    }
}

pub fn format_payload_kind(payload: &StreamPayload) -> &'static str {
    match payload {
        StreamPayload::Text(_) => PAYLOAD_KIND_TEXT,
        StreamPayload::Binary(_) => PAYLOAD_KIND_BINARY,
    }
}

/// Extracts a readable message from a caught panic payload.
pub fn format_panic(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_PANIC.to_string()
    }
}
