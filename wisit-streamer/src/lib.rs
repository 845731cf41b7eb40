/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
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

//! # wisit-streamer
//!
//! `wisit-streamer` owns one long-lived stream connection to a server endpoint and
//! republishes every inbound message on a channel of a process-wide hub, so other
//! parts of an application can observe server-pushed events without holding the
//! connection themselves.
//!
//! Typical usage is centered on [`StreamComponent`]: configure it against a [`Hub`]
//! and a [`TransportRegistry`], then open and close its connection on demand.
//!
//! ```
//! use std::sync::Arc;
//! use wisit_streamer::{
//!     ConnectionState, LocalHub, NoopObserver, StreamComponent, StreamConfig,
//!     StreamPayload, TransportListener, TransportRegistry, PRIMARY_TRANSPORT,
//!     STREAM_SERVICE_CONTRACT,
//! };
//!
//! # pub mod mock_transport {
//! #     use std::sync::{Arc, Mutex};
//! #     use wisit_streamer::{
//! #         TransportConnection, TransportError, TransportFactory, TransportListener,
//! #     };
//! #
//! #     pub struct MockConnection;
//! #
//! #     impl TransportConnection for MockConnection {
//! #         fn close(self: Box<Self>) {}
//! #     }
//! #
//! #     #[derive(Default)]
//! #     pub struct MockTransport {
//! #         pub listener: Mutex<Option<Arc<dyn TransportListener>>>,
//! #     }
//! #
//! #     impl TransportFactory for MockTransport {
//! #         fn connect(
//! #             &self,
//! #             _target: &str,
//! #             listener: Arc<dyn TransportListener>,
//! #         ) -> Result<Box<dyn TransportConnection>, TransportError> {
//! #             *self.listener.lock().unwrap() = Some(listener);
//! #             Ok(Box::new(MockConnection))
//! #         }
//! #     }
//! # }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let hub = Arc::new(LocalHub::default());
//! let transport = Arc::new(mock_transport::MockTransport::default());
//! let transports = TransportRegistry::new().with_factory(PRIMARY_TRANSPORT, transport.clone());
//!
//! let config = StreamConfig::new()
//!     .with_resource_path("/wisit")
//!     .with_channel("/wisit/stream");
//! let component = StreamComponent::configure(hub.clone(), &transports, Some(&config))
//!     .await
//!     .unwrap();
//!
//! let registration = hub.provider(STREAM_SERVICE_CONTRACT).await.unwrap();
//! assert_eq!(registration.property("root"), Some("/wisit"));
//!
//! let mut messages = hub.receiver(component.channel()).await;
//! component.open(Arc::new(NoopObserver)).unwrap();
//!
//! // The transport reports its lifecycle through the listener it was given.
//! let listener = transport.listener.lock().unwrap().clone().unwrap();
//! listener.on_opened().await;
//! assert_eq!(component.state(), ConnectionState::Active);
//!
//! listener.on_message(StreamPayload::from("42")).await;
//! let published = messages.recv().await.unwrap();
//! assert_eq!(published.message.data.as_text(), Some("42"));
//!
//! listener.on_closed().await;
//! assert_eq!(component.state(), ConnectionState::Idle);
//! # });
//! ```
//!
//! ## Connection contract
//!
//! A component holds at most one connection. Opening while a connection is pending
//! or active fails with [`OpenError::AlreadyOpen`]; closing an idle component is a
//! no-op. A failing or panicking subscriber never reaches the transport and never
//! closes the connection.
//!
//! ## Internal architecture map
//!
//! - Configuration: defaults, the segment grammar and the resolved stream target
//! - Component facade: capability registration and the `start`/`stop` hooks
//! - Stream bridge: connection slot state machine and message republication
//! - Seams: [`Hub`] and [`TransportFactory`] traits, with [`LocalHub`] as the
//!   in-process hub
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod component;
pub use component::{StreamComponent, DEFAULT_COMPONENT_NAME};

mod config;
pub use config::{
    is_segment_path, validate, ResolvedConfig, StreamConfig, DEFAULT_CHANNEL, DEFAULT_HOST,
    DEFAULT_RESOURCE_PATH,
};

mod error;
pub use error::{
    ConfigurationError, DeliveryError, HubError, OpenError, SubscriberError, SubscriberFailure,
    TransportError,
};

mod hub;
pub use hub::{
    Hub, ServiceRegistration, StreamMessage, StreamPayload, ROOT_PROPERTY,
    STREAM_SERVICE_CONTRACT,
};

mod local_hub;
pub use local_hub::{ChannelMessage, ChannelSubscriber, LocalHub};

#[doc(hidden)]
pub mod observability;

mod stream_bridge;
pub use stream_bridge::{ConnectionObserver, ConnectionState, NoopObserver};

mod transport;
pub use transport::{
    TransportConnection, TransportFactory, TransportListener, TransportRegistry,
    ALTERNATE_TRANSPORT, PRIMARY_TRANSPORT,
};
