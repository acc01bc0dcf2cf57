use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::RealtimePort;
use crate::error::ApiError;

/// HTTP client for the realtime gateway's internal broadcast endpoint.
#[derive(Clone)]
pub struct HttpRealtimeClient {
    base_url: String,
    internal_secret: String,
    http: reqwest::Client,
}

impl HttpRealtimeClient {
    pub fn new(base_url: &str, internal_secret: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            internal_secret: internal_secret.to_owned(),
            http: reqwest::Client::new(),
        }
    }

    async fn broadcast(&self, body: serde_json::Value) -> Result<(), ApiError> {
        let url = format!("{}/internal/broadcast", self.base_url);
        self.http
            .post(&url)
            .header("x-internal-secret", &self.internal_secret)
            .json(&body)
            .send()
            .await
            .context("publish realtime event")?
            .error_for_status()
            .context("publish realtime event status")?;
        Ok(())
    }
}

impl RealtimePort for HttpRealtimeClient {
    async fn publish_user(
        &self,
        user_id: Uuid,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), ApiError> {
        self.broadcast(serde_json::json!({
            "scope": { "user": user_id },
            "event": event,
            "payload": payload,
        }))
        .await
    }

    async fn publish_public(
        &self,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), ApiError> {
        self.broadcast(serde_json::json!({
            "scope": "public",
            "event": event,
            "payload": payload,
        }))
        .await
    }
}
