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

use serde::{Deserialize, Serialize};
use wisit_streamer::{StreamConfig, DEFAULT_COMPONENT_NAME};

const DEFAULT_SUBSCRIBER_QUEUE_SIZE: usize = 16;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub(crate) component_name: Option<String>,
    #[serde(default)]
    pub(crate) stream: Option<StreamConfig>,
    #[serde(default)]
    pub(crate) hub: HubConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    #[serde(default = "default_subscriber_queue_size")]
    pub(crate) subscriber_queue_size: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_queue_size: DEFAULT_SUBSCRIBER_QUEUE_SIZE,
        }
    }
}

fn default_subscriber_queue_size() -> usize {
    DEFAULT_SUBSCRIBER_QUEUE_SIZE
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        Ok(json5::from_str(&contents)?)
    }

    pub fn component_name(&self) -> &str {
        self.component_name
            .as_deref()
            .unwrap_or(DEFAULT_COMPONENT_NAME)
    }
}
