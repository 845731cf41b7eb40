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

//! Hub interface: capability registration and channel publication.

use crate::error::{DeliveryError, HubError};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Contract under which a stream component registers itself.
pub const STREAM_SERVICE_CONTRACT: &str = "wisit.stream.StreamService";
/// Registration property carrying the resolved resource path.
pub const ROOT_PROPERTY: &str = "root";

/// Raw payload of one inbound stream frame, passed through unmodified.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Text(String),
    Binary(Vec<u8>),
}

impl StreamPayload {
    pub fn len(&self) -> usize {
        match self {
            StreamPayload::Text(text) => text.len(),
            StreamPayload::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StreamPayload::Text(text) => Some(text),
            StreamPayload::Binary(_) => None,
        }
    }
}

impl From<&str> for StreamPayload {
    fn from(text: &str) -> Self {
        StreamPayload::Text(text.to_string())
    }
}

impl From<String> for StreamPayload {
    fn from(text: String) -> Self {
        StreamPayload::Text(text)
    }
}

impl From<Vec<u8>> for StreamPayload {
    fn from(bytes: Vec<u8>) -> Self {
        StreamPayload::Binary(bytes)
    }
}

/// Envelope published on the stream channel for every inbound frame.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StreamMessage {
    pub data: StreamPayload,
}

impl StreamMessage {
    pub fn new(data: impl Into<StreamPayload>) -> Self {
        Self { data: data.into() }
    }
}

/// Record associating a component with a contract it provides.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceRegistration {
    pub component: String,
    pub contract: String,
    pub properties: BTreeMap<String, String>,
}

impl ServiceRegistration {
    pub fn new(component: &str, contract: &str) -> Self {
        Self {
            component: component.to_string(),
            contract: contract.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// The registry and pub/sub bus a stream component registers with and publishes through.
///
/// Implementations arbitrate their own concurrent publishers. A failing subscriber
/// surfaces as a [`DeliveryError`]; callers decide whether to propagate it.
#[async_trait]
pub trait Hub: Send + Sync {
    async fn provide_service(&self, registration: ServiceRegistration) -> Result<(), HubError>;

    async fn publish(
        &self,
        source: &str,
        channel: &str,
        message: StreamMessage,
    ) -> Result<(), DeliveryError>;
}
