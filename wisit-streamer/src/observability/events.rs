//! Canonical structured event names used across `wisit-streamer`.

// Configuration and capability registration events.
pub const CONFIGURE_START: &str = "configure_start";
pub const CONFIGURE_OK: &str = "configure_ok";
pub const CONFIGURE_FAILED: &str = "configure_failed";
pub const TRANSPORT_PROBE_FALLBACK: &str = "transport_probe_fallback";
pub const TRANSPORT_PROBE_FAILED: &str = "transport_probe_failed";
pub const SERVICE_REGISTERED: &str = "service_registered";
pub const COMPONENT_START: &str = "component_start";
pub const COMPONENT_STOP: &str = "component_stop";

// Connection lifecycle events.
pub const CONNECTION_OPEN_REQUESTED: &str = "connection_open_requested";
pub const CONNECTION_OPEN_REJECTED: &str = "connection_open_rejected";
pub const CONNECTION_OPEN_FAILED: &str = "connection_open_failed";
pub const CONNECTION_OPENED: &str = "connection_opened";
pub const CONNECTION_CLOSE_REQUESTED: &str = "connection_close_requested";
pub const CONNECTION_CLOSE_NOOP: &str = "connection_close_noop";
pub const CONNECTION_CLOSED: &str = "connection_closed";
pub const CONNECTION_STALE_CALLBACK: &str = "connection_stale_callback";

// Stream message events.
pub const STREAM_MESSAGE_RECEIVE: &str = "stream_message_receive";
pub const STREAM_PUBLISH_OK: &str = "stream_publish_ok";
pub const STREAM_PUBLISH_FAILED: &str = "stream_publish_failed";
pub const STREAM_PUBLISH_PANICKED: &str = "stream_publish_panicked";

// Local hub events.
pub const HUB_SERVICE_PROVIDED: &str = "hub_service_provided";
pub const HUB_SERVICE_REJECTED: &str = "hub_service_rejected";
pub const HUB_SUBSCRIBE: &str = "hub_subscribe";
pub const HUB_UNSUBSCRIBE: &str = "hub_unsubscribe";
pub const HUB_SUBSCRIBER_FAILED: &str = "hub_subscriber_failed";
pub const HUB_SUBSCRIBER_PANICKED: &str = "hub_subscriber_panicked";
pub const HUB_PUBLISH_NO_SUBSCRIBERS: &str = "hub_publish_no_subscribers";

// WebSocket transport events.
pub const WS_CONNECT_START: &str = "ws_connect_start";
pub const WS_CONNECT_OK: &str = "ws_connect_ok";
pub const WS_CONNECT_FAILED: &str = "ws_connect_failed";
pub const WS_FRAME_IGNORED: &str = "ws_frame_ignored";
pub const WS_CLOSE_SEND_FAILED: &str = "ws_close_send_failed";
pub const WS_CONNECTION_ENDED: &str = "ws_connection_ended";
