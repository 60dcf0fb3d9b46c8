//! Port for delivering walk notifications to an external sink.

use async_trait::async_trait;

use crate::domain::walk_events::NotificationEnvelope;

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a notification.
    pub enum NotificationError {
        /// The request could not be sent.
        Transport { message: String } =>
            "notification transport failed: {message}",
        /// The sink answered with a non-success status.
        Rejected { status: u16 } =>
            "notification rejected with status {status}",
        /// Delivery exceeded the configured timeout.
        Timeout { millis: u64 } =>
            "notification timed out after {millis} ms",
    }
}

/// Fire-and-forget delivery of walk notifications.
///
/// Callers treat failures as advisory; nothing is rolled back when delivery
/// fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Deliver one envelope.
    async fn send(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError>;
}

/// Gateway used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationGateway;

#[async_trait]
impl NotificationGateway for NoOpNotificationGateway {
    async fn send(&self, _envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        Ok(())
    }
}
