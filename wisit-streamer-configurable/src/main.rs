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

mod config;

use crate::config::Config;
use async_trait::async_trait;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};
use wisit_streamer::{
    ChannelSubscriber, ConnectionObserver, LocalHub, StreamComponent, StreamMessage,
    StreamPayload, SubscriberError,
};
use wisit_transport_websocket::websocket_registry;

#[derive(Parser)]
#[command()]
struct StreamerArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

/// Logs every message published on the stream channel.
struct LoggingSubscriber;

#[async_trait]
impl ChannelSubscriber for LoggingSubscriber {
    fn name(&self) -> &str {
        "stream-logger"
    }

    async fn on_message(
        &self,
        source: &str,
        message: &StreamMessage,
    ) -> Result<(), SubscriberError> {
        match &message.data {
            StreamPayload::Text(text) => info!(source, text = text.as_str(), "stream message"),
            StreamPayload::Binary(bytes) => info!(source, len = bytes.len(), "binary stream message"),
        }
        Ok(())
    }
}

/// Wakes `main` once the connection is gone.
struct ShutdownObserver {
    closed: Arc<Notify>,
}

#[async_trait]
impl ConnectionObserver for ShutdownObserver {
    async fn on_opened(&self) {
        info!("Stream connection opened");
    }

    async fn on_closed(&self) {
        self.closed.notify_one();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started wisit-streamer-configurable");

    let args = StreamerArgs::parse();
    let config = Config::from_file(&args.config)
        .map_err(|e| format!("Unable to load config file {}: {e}", args.config))?;

    let hub = Arc::new(LocalHub::new(config.hub.subscriber_queue_size));
    let component = StreamComponent::configure_named(
        config.component_name(),
        hub.clone(),
        &websocket_registry(),
        config.stream.as_ref(),
    )
    .await?;
    component.start();

    hub.subscribe(component.channel(), Arc::new(LoggingSubscriber))
        .await;

    let closed = Arc::new(Notify::new());
    component.open(Arc::new(ShutdownObserver {
        closed: closed.clone(),
    }))?;
    info!(
        target_url = component.stream_target(),
        channel = component.channel(),
        "Streaming"
    );

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Interrupted, stopping stream component");
        }
        _ = closed.notified() => {
            warn!("Stream connection closed by the server");
        }
    }

    component.stop();

    Ok(())
}
