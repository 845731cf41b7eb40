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

use crate::config::{self, ResolvedConfig, StreamConfig};
use crate::error::{ConfigurationError, OpenError};
use crate::hub::{Hub, ServiceRegistration, ROOT_PROPERTY, STREAM_SERVICE_CONTRACT};
use crate::observability::events;
use crate::stream_bridge::{ConnectionObserver, ConnectionState, StreamBridge};
use crate::transport::TransportRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name used as publish source and registration component when none is given.
pub const DEFAULT_COMPONENT_NAME: &str = "wisit-stream";

const COMPONENT: &str = "stream_component";

/// [`StreamComponent`] is the provider of the stream service: it registers itself with a
/// [`Hub`] and bridges one transport connection onto a hub channel.
///
/// Construction and configuration happen together in [`StreamComponent::configure`];
/// the resolved configuration cannot change afterwards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use wisit_streamer::{
///     ConnectionState, DeliveryError, Hub, HubError, NoopObserver, ServiceRegistration,
///     StreamComponent, StreamConfig, StreamMessage, TransportConnection, TransportError,
///     TransportFactory, TransportListener, TransportRegistry, PRIMARY_TRANSPORT,
/// };
///
/// # struct QuietHub;
/// #
/// # #[async_trait]
/// # impl Hub for QuietHub {
/// #     async fn provide_service(&self, _registration: ServiceRegistration) -> Result<(), HubError> {
/// #         Ok(())
/// #     }
/// #
/// #     async fn publish(
/// #         &self,
/// #         _source: &str,
/// #         _channel: &str,
/// #         _message: StreamMessage,
/// #     ) -> Result<(), DeliveryError> {
/// #         Ok(())
/// #     }
/// # }
/// #
/// # struct IdleConnection;
/// #
/// # impl TransportConnection for IdleConnection {
/// #     fn close(self: Box<Self>) {}
/// # }
/// #
/// # struct IdleTransport;
/// #
/// # impl TransportFactory for IdleTransport {
/// #     fn connect(
/// #         &self,
/// #         _target: &str,
/// #         _listener: Arc<dyn TransportListener>,
/// #     ) -> Result<Box<dyn TransportConnection>, TransportError> {
/// #         Ok(Box::new(IdleConnection))
/// #     }
/// # }
/// #
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let transports = TransportRegistry::new().with_factory(PRIMARY_TRANSPORT, Arc::new(IdleTransport));
/// let config = StreamConfig::new().with_channel("/shell/stream");
///
/// let component = StreamComponent::configure(Arc::new(QuietHub), &transports, Some(&config))
///     .await
///     .unwrap();
/// assert_eq!(component.channel(), "/shell/stream");
/// assert_eq!(component.stream_target(), "ws://localhost:8080/wisit/stream");
///
/// component.open(Arc::new(NoopObserver)).unwrap();
/// assert!(component.open(Arc::new(NoopObserver)).is_err());
///
/// component.stop();
/// assert_eq!(component.state(), ConnectionState::Idle);
/// # });
/// ```
pub struct StreamComponent {
    name: String,
    config: ResolvedConfig,
    bridge: StreamBridge,
}

impl StreamComponent {
    /// Configures a component named [`DEFAULT_COMPONENT_NAME`].
    pub async fn configure(
        hub: Arc<dyn Hub>,
        transports: &TransportRegistry,
        config: Option<&StreamConfig>,
    ) -> Result<Self, ConfigurationError> {
        Self::configure_named(DEFAULT_COMPONENT_NAME, hub, transports, config).await
    }

    /// Validates `config`, resolves the stream transport and registers the component
    /// with `hub` as provider of the stream service.
    ///
    /// Nothing is registered when validation or transport resolution fails.
    pub async fn configure_named(
        name: &str,
        hub: Arc<dyn Hub>,
        transports: &TransportRegistry,
        config: Option<&StreamConfig>,
    ) -> Result<Self, ConfigurationError> {
        debug!(
            event = events::CONFIGURE_START,
            component = COMPONENT,
            component_name = name,
            "configuring stream component"
        );

        let resolved = config::validate(config)
            .and_then(|resolved| {
                transports
                    .resolve_stream_transport()
                    .map(|transport| (resolved, transport))
            })
            .map_err(|err| {
                warn!(
                    event = events::CONFIGURE_FAILED,
                    component = COMPONENT,
                    component_name = name,
                    err = %err,
                    "invalid stream configuration"
                );
                err
            });
        let (resolved, transport) = resolved?;

        let registration = ServiceRegistration::new(name, STREAM_SERVICE_CONTRACT)
            .with_property(ROOT_PROPERTY, resolved.resource_path());

        if let Err(err) = hub.provide_service(registration).await {
            warn!(
                event = events::CONFIGURE_FAILED,
                component = COMPONENT,
                component_name = name,
                err = %err,
                "hub refused stream service registration"
            );
            return Err(ConfigurationError::RegistrationFailed(err));
        }

        info!(
            event = events::SERVICE_REGISTERED,
            component = COMPONENT,
            component_name = name,
            contract = STREAM_SERVICE_CONTRACT,
            root = resolved.resource_path(),
            channel = resolved.channel(),
            "stream service registered"
        );

        let bridge = StreamBridge::new(
            name,
            resolved.channel(),
            resolved.stream_target(),
            hub,
            transport,
        );

        debug!(
            event = events::CONFIGURE_OK,
            component = COMPONENT,
            component_name = name,
            stream_target = bridge.target(),
            "stream component configured"
        );

        Ok(Self {
            name: name.to_string(),
            config: resolved,
            bridge,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifecycle hook. Connections are opened on demand through [`StreamComponent::open`].
    pub fn start(&self) {
        debug!(
            event = events::COMPONENT_START,
            component = COMPONENT,
            component_name = self.name.as_str(),
            "stream component started"
        );
    }

    /// Lifecycle hook. Closes the connection if one is open; safe to call repeatedly.
    pub fn stop(&self) {
        debug!(
            event = events::COMPONENT_STOP,
            component = COMPONENT,
            component_name = self.name.as_str(),
            "stream component stopping"
        );
        self.bridge.close();
    }

    /// Opens the stream connection.
    ///
    /// Returns immediately; `observer` is notified once the handshake completes and
    /// again when the connection closes, whoever closed it.
    ///
    /// # Errors
    ///
    /// [`OpenError::AlreadyOpen`] while a connection exists (pending or active), or
    /// [`OpenError::Transport`] when the transport refuses to create one.
    pub fn open(&self, observer: Arc<dyn ConnectionObserver>) -> Result<(), OpenError> {
        self.bridge.open(observer)
    }

    /// Closes the stream connection if any.
    pub fn close(&self) {
        self.bridge.close();
    }

    pub fn channel(&self) -> &str {
        self.bridge.channel()
    }

    pub fn resource_path(&self) -> &str {
        self.config.resource_path()
    }

    pub fn stream_target(&self) -> &str {
        self.bridge.target()
    }

    pub fn state(&self) -> ConnectionState {
        self.bridge.state()
    }
}

impl Drop for StreamComponent {
    fn drop(&mut self) {
        self.bridge.close();
    }
}
