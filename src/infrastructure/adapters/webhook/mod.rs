//! Webhook REST client
//!
//! Executing a webhook needs only its id and token. Creating one needs bot
//! authorization.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::DispatchError;
use crate::domain::entities::{SentMessage, Webhook};
use crate::domain::traits::WebhookApi;

/// Discord REST API base URL
pub const API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    id: String,
    token: Option<String>,
    channel_id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
    channel_id: String,
    #[serde(default)]
    content: String,
}

/// reqwest-based client for the webhook endpoints
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    base_url: String,
    authorization: Option<String>,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: None,
        }
    }

    /// Attach a `Bot ...` authorization header value, needed for creating webhooks
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookApi for WebhookClient {
    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError> {
        #[derive(Serialize)]
        struct CreateWebhookRequest<'a> {
            name: &'a str,
        }

        let fail = |reason: String| DispatchError::WebhookCreate {
            channel_id: channel_id.to_string(),
            reason,
        };

        let authorization = self
            .authorization
            .as_deref()
            .ok_or_else(|| fail("bot authorization required".to_string()))?;

        let url = format!("{}/channels/{}/webhooks", self.base_url, channel_id);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&CreateWebhookRequest { name })
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(fail(format!("Discord API error {}: {}", status, body)));
        }

        let data: WebhookResponse = response.json().await.map_err(|e| fail(e.to_string()))?;

        Ok(Webhook {
            id: data.id,
            token: data.token,
            channel_id: data.channel_id.unwrap_or_else(|| channel_id.to_string()),
            name: data.name,
        })
    }

    async fn execute_webhook(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError> {
        #[derive(Serialize)]
        struct ExecuteWebhookRequest<'a> {
            content: &'a str,
        }

        if token.is_empty() {
            return Err(DispatchError::MissingWebhookToken);
        }

        let fail = |reason: String| DispatchError::WebhookExecute {
            webhook_id: webhook_id.to_string(),
            reason,
        };

        // wait=true makes the API return the created message
        let url = format!("{}/webhooks/{}/{}", self.base_url, webhook_id, token);
        let response = self
            .client
            .post(&url)
            .query(&[("wait", "true")])
            .json(&ExecuteWebhookRequest { content })
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(format!("Discord API error: {}", response.status())));
        }

        let data: MessageResponse = response.json().await.map_err(|e| fail(e.to_string()))?;

        Ok(SentMessage {
            id: data.id,
            channel_id: data.channel_id,
            content: data.content,
        })
    }
}
