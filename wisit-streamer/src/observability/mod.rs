//! Structured logging vocabulary shared by the streamer and its transports.
//!
//! Every event emitted by the workspace carries an `event` field taken from
//! [`events`] and a `component` field naming the emitting module.

pub mod events;
pub mod fields;
