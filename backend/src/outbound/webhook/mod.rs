//! Outbound notification delivery over HTTP webhooks.

mod http_gateway;

pub use http_gateway::WebhookNotificationGateway;
