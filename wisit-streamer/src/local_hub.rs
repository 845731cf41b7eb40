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

//! In-process hub: service registry plus per-channel subscriber fan-out.

use crate::error::{DeliveryError, HubError, SubscriberError, SubscriberFailure};
use crate::hub::{Hub, ServiceRegistration, StreamMessage};
use crate::observability::{events, fields};
use async_trait::async_trait;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

const COMPONENT: &str = "local_hub";

/// Receives every message published on the channels it is subscribed to.
#[async_trait]
pub trait ChannelSubscriber: Send + Sync {
    /// Label used when reporting this subscriber's failures.
    fn name(&self) -> &str;

    async fn on_message(&self, source: &str, message: &StreamMessage)
        -> Result<(), SubscriberError>;
}

/// A message as seen by broadcast receivers of a channel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelMessage {
    pub source: String,
    pub message: StreamMessage,
}

/// Hub implementation living inside the process.
///
/// Publication calls every subscriber of the channel in subscription order, even
/// when an earlier one fails, then reports all failures at once.
pub struct LocalHub {
    services: Mutex<Vec<ServiceRegistration>>,
    subscribers: Mutex<HashMap<String, Vec<Arc<dyn ChannelSubscriber>>>>,
    broadcasts: Mutex<HashMap<String, broadcast::Sender<Arc<ChannelMessage>>>>,
    broadcast_capacity: usize,
}

impl LocalHub {
    /// `broadcast_capacity` bounds how far a [`LocalHub::receiver`] may lag before
    /// it starts skipping messages.
    pub fn new(broadcast_capacity: usize) -> Self {
        Self {
            services: Mutex::new(Vec::new()),
            subscribers: Mutex::new(HashMap::new()),
            broadcasts: Mutex::new(HashMap::new()),
            broadcast_capacity: broadcast_capacity.max(1),
        }
    }

    pub async fn subscribe(&self, channel: &str, subscriber: Arc<dyn ChannelSubscriber>) {
        debug!(
            event = events::HUB_SUBSCRIBE,
            component = COMPONENT,
            channel,
            subscriber = subscriber.name(),
            "subscriber added"
        );
        let mut subscribers = self.subscribers.lock().await;
        subscribers
            .entry(channel.to_string())
            .or_default()
            .push(subscriber);
    }

    /// Removes `subscriber` from `channel`. Returns `true` only when it was subscribed.
    pub async fn unsubscribe(&self, channel: &str, subscriber: &Arc<dyn ChannelSubscriber>) -> bool {
        let mut subscribers = self.subscribers.lock().await;
        let Some(channel_subscribers) = subscribers.get_mut(channel) else {
            return false;
        };

        let before = channel_subscribers.len();
        channel_subscribers.retain(|existing| !Arc::ptr_eq(existing, subscriber));
        let removed = channel_subscribers.len() != before;
        if channel_subscribers.is_empty() {
            subscribers.remove(channel);
        }

        if removed {
            debug!(
                event = events::HUB_UNSUBSCRIBE,
                component = COMPONENT,
                channel,
                subscriber = subscriber.name(),
                "subscriber removed"
            );
        }
        removed
    }

    /// Returns a receiver of every message published on `channel` from now on.
    pub async fn receiver(&self, channel: &str) -> broadcast::Receiver<Arc<ChannelMessage>> {
        let mut broadcasts = self.broadcasts.lock().await;
        broadcasts
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.broadcast_capacity).0)
            .subscribe()
    }

    /// Registrations recorded for `contract`, in registration order.
    pub async fn providers(&self, contract: &str) -> Vec<ServiceRegistration> {
        self.services
            .lock()
            .await
            .iter()
            .filter(|registration| registration.contract == contract)
            .cloned()
            .collect()
    }

    /// First registration recorded for `contract`.
    pub async fn provider(&self, contract: &str) -> Option<ServiceRegistration> {
        self.providers(contract).await.into_iter().next()
    }
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new(16)
    }
}

#[async_trait]
impl Hub for LocalHub {
    async fn provide_service(&self, registration: ServiceRegistration) -> Result<(), HubError> {
        let mut services = self.services.lock().await;
        let duplicate = services.iter().any(|existing| {
            existing.component == registration.component
                && existing.contract == registration.contract
        });

        if duplicate {
            warn!(
                event = events::HUB_SERVICE_REJECTED,
                component = COMPONENT,
                component_name = registration.component.as_str(),
                contract = registration.contract.as_str(),
                "service already provided"
            );
            return Err(HubError::AlreadyProvided {
                component: registration.component,
                contract: registration.contract,
            });
        }

        info!(
            event = events::HUB_SERVICE_PROVIDED,
            component = COMPONENT,
            component_name = registration.component.as_str(),
            contract = registration.contract.as_str(),
            "service provided"
        );
        services.push(registration);
        Ok(())
    }

    async fn publish(
        &self,
        source: &str,
        channel: &str,
        message: StreamMessage,
    ) -> Result<(), DeliveryError> {
        let subscribers = self
            .subscribers
            .lock()
            .await
            .get(channel)
            .cloned()
            .unwrap_or_default();
        let sender = self.broadcasts.lock().await.get(channel).cloned();

        if subscribers.is_empty() && sender.is_none() {
            debug!(
                event = events::HUB_PUBLISH_NO_SUBSCRIBERS,
                component = COMPONENT,
                channel,
                "nobody listens on channel"
            );
            return Ok(());
        }

        let mut failures = Vec::new();
        for subscriber in subscribers {
            let outcome = AssertUnwindSafe(subscriber.on_message(source, &message))
                .catch_unwind()
                .await;

            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => {
                    warn!(
                        event = events::HUB_SUBSCRIBER_FAILED,
                        component = COMPONENT,
                        channel,
                        subscriber = subscriber.name(),
                        err = %error,
                        "subscriber failed to handle message"
                    );
                    error
                }
                Err(panic) => {
                    let reason = fields::format_panic(panic.as_ref());
                    error!(
                        event = events::HUB_SUBSCRIBER_PANICKED,
                        component = COMPONENT,
                        channel,
                        subscriber = subscriber.name(),
                        reason = reason.as_str(),
                        "subscriber panicked while handling message"
                    );
                    SubscriberError::new(format!("panicked: {reason}"))
                }
            };

            failures.push(SubscriberFailure {
                subscriber: subscriber.name().to_string(),
                error,
            });
        }

        if let Some(sender) = sender {
            // Having no live receiver is not a delivery failure.
            let _ = sender.send(Arc::new(ChannelMessage {
                source: source.to_string(),
                message,
            }));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DeliveryError::SubscribersFailed {
                channel: channel.to_string(),
                failures,
            })
        }
    }
}
