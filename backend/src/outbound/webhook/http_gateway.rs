//! Reqwest-backed notification gateway.
//!
//! Posts each envelope as JSON to one configured webhook. Only transport and
//! status mapping live here; delivery policy (timeouts around the whole call,
//! swallowing failures) belongs to the join engine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{NotificationError, NotificationGateway};
use crate::domain::walk_events::NotificationEnvelope;

const USER_AGENT: &str = concat!("walktalk/", env!("CARGO_PKG_VERSION"));

/// Gateway that POSTs envelopes to a webhook URL.
pub struct WebhookNotificationGateway {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl WebhookNotificationGateway {
    /// Build a gateway whose client enforces `timeout` per request.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> NotificationError {
        if error.is_timeout() {
            NotificationError::timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            NotificationError::transport(error.to_string())
        }
    }
}

fn map_status(status: StatusCode) -> Result<(), NotificationError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(NotificationError::rejected(status.as_u16()))
    }
}

#[async_trait]
impl NotificationGateway for WebhookNotificationGateway {
    async fn send(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(envelope)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;
        let status = response.status();
        debug!(event = envelope.event, status = status.as_u16(), "webhook answered");
        map_status(status)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::walk_events::WalkEvent;
    use crate::domain::walks::{ParticipantCounts, WalkStatus};
    use crate::test_support::clock::fixture_now;
    use crate::test_support::walks::{walk, walker};

    #[rstest]
    #[case(StatusCode::OK)]
    #[case(StatusCode::ACCEPTED)]
    #[case(StatusCode::NO_CONTENT)]
    fn success_statuses_are_accepted(#[case] status: StatusCode) {
        assert!(map_status(status).is_ok());
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, 400)]
    #[case(StatusCode::NOT_FOUND, 404)]
    #[case(StatusCode::BAD_GATEWAY, 502)]
    fn other_statuses_are_rejections(#[case] status: StatusCode, #[case] code: u16) {
        let error = map_status(status).expect_err("rejected");

        assert_eq!(error, NotificationError::rejected(code));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_endpoint_reports_transport_failure() {
        let endpoint = Url::parse("http://127.0.0.1:9/hooks/walktalk").expect("url");
        let gateway =
            WebhookNotificationGateway::new(endpoint, Duration::from_millis(500)).expect("client");
        let stored = walk(3, WalkStatus::Scheduled, fixture_now());
        let event = WalkEvent::joined(&stored, &walker(1), ParticipantCounts::new(1, 3));
        let envelope = NotificationEnvelope::new(event, fixture_now());

        let error = gateway.send(&envelope).await.expect_err("nothing listens");

        assert!(matches!(
            error,
            NotificationError::Transport { .. } | NotificationError::Timeout { .. }
        ));
    }
}
