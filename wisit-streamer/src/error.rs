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

//! Error kinds surfaced by configuration, connection control and delivery.

use crate::stream_bridge::ConnectionState;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures raised while configuring a [`StreamComponent`][crate::StreamComponent].
///
/// A configuration error always leaves the hub without a registration for the
/// component.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigurationError {
    NotAnObject,
    NotAString { field: &'static str },
    NotABoolean { field: &'static str },
    InvalidPath { field: &'static str, value: String },
    InvalidHost { value: String },
    UnsupportedTransport {
        primary: &'static str,
        alternate: &'static str,
    },
    RegistrationFailed(HubError),
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::NotAnObject => {
                write!(f, "the stream configuration must be an object")
            }
            ConfigurationError::NotAString { field } => {
                write!(f, "the property {field} must be a string")
            }
            ConfigurationError::NotABoolean { field } => {
                write!(f, "the property {field} must be a boolean")
            }
            ConfigurationError::InvalidPath { field, value } => write!(
                f,
                "the property {field} must be a valid path string, got {value:?}"
            ),
            ConfigurationError::InvalidHost { value } => {
                write!(f, "the host {value:?} is not a valid authority")
            }
            ConfigurationError::UnsupportedTransport { primary, alternate } => write!(
                f,
                "no stream transport registered as {primary:?} or {alternate:?}"
            ),
            ConfigurationError::RegistrationFailed(err) => {
                write!(f, "unable to register the stream service: {err}")
            }
        }
    }
}

impl Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigurationError::RegistrationFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Failures raised by [`StreamComponent::open`][crate::StreamComponent::open].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OpenError {
    AlreadyOpen { state: ConnectionState },
    Transport(TransportError),
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenError::AlreadyOpen { state } => {
                write!(f, "a stream connection has already been opened ({state})")
            }
            OpenError::Transport(err) => write!(f, "unable to open stream connection: {err}"),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OpenError::Transport(err) => Some(err),
            OpenError::AlreadyOpen { .. } => None,
        }
    }
}

/// Failures a transport factory reports when asked for a connection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportError {
    NoRuntime,
    InvalidTarget(String),
    ConnectFailed(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::NoRuntime => write!(f, "no async runtime available"),
            TransportError::InvalidTarget(target) => {
                write!(f, "invalid connection target {target:?}")
            }
            TransportError::ConnectFailed(reason) => write!(f, "connect failed: {reason}"),
        }
    }
}

impl Error for TransportError {}

/// Failures reported by a hub when registering a service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HubError {
    AlreadyProvided { component: String, contract: String },
    Unavailable(String),
}

impl Display for HubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HubError::AlreadyProvided {
                component,
                contract,
            } => write!(f, "{component} already provides {contract}"),
            HubError::Unavailable(reason) => write!(f, "hub unavailable: {reason}"),
        }
    }
}

impl Error for HubError {}

/// A single subscriber's refusal of a published message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriberError {
    reason: String,
}

impl SubscriberError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for SubscriberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl Error for SubscriberError {}

/// One failed delivery inside a publish call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriberFailure {
    pub subscriber: String,
    pub error: SubscriberError,
}

/// Failures raised by a hub while delivering a published message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeliveryError {
    SubscribersFailed {
        channel: String,
        failures: Vec<SubscriberFailure>,
    },
    Unavailable(String),
}

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::SubscribersFailed { channel, failures } => {
                write!(f, "{} subscriber(s) of {channel} failed", failures.len())?;
                for failure in failures {
                    write!(f, "; {}: {}", failure.subscriber, failure.error)?;
                }
                Ok(())
            }
            DeliveryError::Unavailable(reason) => write!(f, "hub unavailable: {reason}"),
        }
    }
}

impl Error for DeliveryError {}
