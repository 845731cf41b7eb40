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

//! Stream configuration and its validation into a resolved, immutable form.

use crate::error::ConfigurationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_RESOURCE_PATH: &str = "/wisit";
pub const DEFAULT_CHANNEL: &str = "/wisit/stream";
pub const DEFAULT_HOST: &str = "localhost:8080";

pub const RESOURCE_PATH_FIELD: &str = "resource_path";
pub const CHANNEL_FIELD: &str = "channel";
pub const HOST_FIELD: &str = "host";
pub const SECURE_FIELD: &str = "secure";

const STREAM_SUFFIX: &str = "/stream";

lazy_static! {
    // `\w` is restricted to ASCII word characters.
    static ref SEGMENT_PATH: Regex =
        Regex::new(r"^/(?-u:\w)+(/(?-u:\w)+)*$").expect("segment grammar must compile");
}

/// Returns `true` when `value` is a root-relative path of `/`-separated word segments.
pub fn is_segment_path(value: &str) -> bool {
    SEGMENT_PATH.is_match(value)
}

/// Unvalidated stream configuration as handed over by the host.
///
/// Every field is optional; absent fields resolve to their defaults in [`validate`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource_path(mut self, resource_path: impl Into<String>) -> Self {
        self.resource_path = Some(resource_path.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Builds a configuration from an untyped JSON value.
    ///
    /// `null` means "no configuration". Unknown keys are ignored, while a known key
    /// holding a value of the wrong type is reported by name. Explicit `null`
    /// values count as absent.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            _ => return Err(ConfigurationError::NotAnObject),
        };

        Ok(Self {
            resource_path: string_field(object, RESOURCE_PATH_FIELD)?,
            channel: string_field(object, CHANNEL_FIELD)?,
            host: string_field(object, HOST_FIELD)?,
            secure: bool_field(object, SECURE_FIELD)?,
        })
    }
}

fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ConfigurationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ConfigurationError::NotAString { field }),
    }
}

fn bool_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, ConfigurationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(ConfigurationError::NotABoolean { field }),
    }
}

/// Configuration after validation. Immutable for the lifetime of a component.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedConfig {
    resource_path: String,
    channel: String,
    host: String,
    secure: bool,
}

impl ResolvedConfig {
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The URL the stream connection targets: `<scheme>://<host><resource_path>/stream`.
    pub fn stream_target(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!(
            "{scheme}://{}{}{STREAM_SUFFIX}",
            self.host, self.resource_path
        )
    }
}

/// Validates `config`, falling back to defaults for absent fields.
///
/// Has no side effects, so it can run before any hub or transport interaction.
pub fn validate(config: Option<&StreamConfig>) -> Result<ResolvedConfig, ConfigurationError> {
    let resource_path = resolve_path(
        RESOURCE_PATH_FIELD,
        config.and_then(|c| c.resource_path.as_deref()),
        DEFAULT_RESOURCE_PATH,
    )?;
    let channel = resolve_path(
        CHANNEL_FIELD,
        config.and_then(|c| c.channel.as_deref()),
        DEFAULT_CHANNEL,
    )?;
    let host = resolve_host(config.and_then(|c| c.host.as_deref()))?;
    let secure = config.and_then(|c| c.secure).unwrap_or(false);

    Ok(ResolvedConfig {
        resource_path,
        channel,
        host,
        secure,
    })
}

fn resolve_path(
    field: &'static str,
    value: Option<&str>,
    default: &str,
) -> Result<String, ConfigurationError> {
    match value {
        None => Ok(default.to_string()),
        Some(value) if is_segment_path(value) => Ok(value.to_string()),
        Some(value) => Err(ConfigurationError::InvalidPath {
            field,
            value: value.to_string(),
        }),
    }
}

fn resolve_host(value: Option<&str>) -> Result<String, ConfigurationError> {
    let Some(host) = value else {
        return Ok(DEFAULT_HOST.to_string());
    };

    let malformed = host.is_empty()
        || host
            .chars()
            .any(|ch| ch == '/' || ch == '?' || ch == '#' || ch.is_whitespace());
    if malformed {
        return Err(ConfigurationError::InvalidHost {
            value: host.to_string(),
        });
    }

    Ok(host.to_string())
}
