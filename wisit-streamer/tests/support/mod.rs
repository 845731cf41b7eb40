#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wisit_streamer::{
    ConnectionObserver, DeliveryError, Hub, HubError, ServiceRegistration, StreamComponent,
    StreamConfig, StreamMessage, SubscriberError, SubscriberFailure, TransportConnection,
    TransportError, TransportFactory, TransportListener, TransportRegistry, PRIMARY_TRANSPORT,
};

pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What [`RecordingHub`] does with the next published message.
#[derive(Clone, Copy, Debug)]
pub(crate) enum PublishBehavior {
    Deliver,
    Fail,
    Panic,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PublishedMessage {
    pub(crate) source: String,
    pub(crate) channel: String,
    pub(crate) message: StreamMessage,
}

/// Hub double recording registrations and publish calls.
#[derive(Default)]
pub(crate) struct RecordingHub {
    registrations: Mutex<Vec<ServiceRegistration>>,
    published: Mutex<Vec<PublishedMessage>>,
    behaviors: Mutex<VecDeque<PublishBehavior>>,
    refuse_registration: AtomicBool,
}

impl RecordingHub {
    pub(crate) fn refusing_registration() -> Self {
        let hub = Self::default();
        hub.refuse_registration.store(true, Ordering::Relaxed);
        hub
    }

    /// Queues behaviors for the next publish calls; afterwards messages are delivered.
    pub(crate) fn script(&self, behaviors: &[PublishBehavior]) {
        self.behaviors.lock().unwrap().extend(behaviors.iter().copied());
    }

    pub(crate) fn registrations(&self) -> Vec<ServiceRegistration> {
        self.registrations.lock().unwrap().clone()
    }

    pub(crate) fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Hub for RecordingHub {
    async fn provide_service(&self, registration: ServiceRegistration) -> Result<(), HubError> {
        if self.refuse_registration.load(Ordering::Relaxed) {
            return Err(HubError::Unavailable("refusing registrations".to_string()));
        }
        self.registrations.lock().unwrap().push(registration);
        Ok(())
    }

    async fn publish(
        &self,
        source: &str,
        channel: &str,
        message: StreamMessage,
    ) -> Result<(), DeliveryError> {
        self.published.lock().unwrap().push(PublishedMessage {
            source: source.to_string(),
            channel: channel.to_string(),
            message,
        });

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PublishBehavior::Deliver);

        match behavior {
            PublishBehavior::Deliver => Ok(()),
            PublishBehavior::Fail => Err(DeliveryError::SubscribersFailed {
                channel: channel.to_string(),
                failures: vec![SubscriberFailure {
                    subscriber: "flaky".to_string(),
                    error: SubscriberError::new("cannot render"),
                }],
            }),
            PublishBehavior::Panic => panic!("subscriber blew up"),
        }
    }
}

struct ScriptedConnection {
    closed: Arc<AtomicBool>,
}

impl TransportConnection for ScriptedConnection {
    fn close(self: Box<Self>) {
        self.closed.store(true, Ordering::Relaxed);
    }
}

struct ConnectRecord {
    target: String,
    listener: Arc<dyn TransportListener>,
    closed: Arc<AtomicBool>,
}

/// Transport double: records every connect call and lets the test fire callbacks.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    connects: Mutex<Vec<ConnectRecord>>,
    refuse: AtomicBool,
}

impl ScriptedTransport {
    pub(crate) fn refusing() -> Self {
        let transport = Self::default();
        transport.refuse.store(true, Ordering::Relaxed);
        transport
    }

    pub(crate) fn connect_count(&self) -> usize {
        self.connects.lock().unwrap().len()
    }

    pub(crate) fn target(&self, index: usize) -> String {
        self.connects.lock().unwrap()[index].target.clone()
    }

    pub(crate) fn listener(&self, index: usize) -> Arc<dyn TransportListener> {
        self.connects.lock().unwrap()[index].listener.clone()
    }

    pub(crate) fn was_closed(&self, index: usize) -> bool {
        self.connects.lock().unwrap()[index]
            .closed
            .load(Ordering::Relaxed)
    }
}

impl TransportFactory for ScriptedTransport {
    fn connect(
        &self,
        target: &str,
        listener: Arc<dyn TransportListener>,
    ) -> Result<Box<dyn TransportConnection>, TransportError> {
        if self.refuse.load(Ordering::Relaxed) {
            return Err(TransportError::ConnectFailed("refused".to_string()));
        }

        let closed = Arc::new(AtomicBool::new(false));
        self.connects.lock().unwrap().push(ConnectRecord {
            target: target.to_string(),
            listener,
            closed: closed.clone(),
        });
        Ok(Box::new(ScriptedConnection { closed }))
    }
}

#[derive(Default)]
pub(crate) struct CountingObserver {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl CountingObserver {
    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ConnectionObserver for CountingObserver {
    async fn on_opened(&self) {
        self.opened.fetch_add(1, Ordering::Relaxed);
    }

    async fn on_closed(&self) {
        self.closed.fetch_add(1, Ordering::Relaxed);
    }
}

pub(crate) fn registry_with(transport: Arc<ScriptedTransport>) -> TransportRegistry {
    TransportRegistry::new().with_factory(PRIMARY_TRANSPORT, transport)
}

pub(crate) async fn make_component(
    hub: Arc<RecordingHub>,
    transport: Arc<ScriptedTransport>,
    config: Option<&StreamConfig>,
) -> StreamComponent {
    StreamComponent::configure(hub, &registry_with(transport), config)
        .await
        .expect("component configuration should succeed")
}
