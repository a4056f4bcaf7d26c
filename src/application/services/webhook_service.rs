use crate::application::errors::DispatchError;
use crate::domain::entities::{SentMessage, Webhook};
use crate::domain::traits::WebhookApi;

/// Creates channel webhooks and posts through them
pub struct WebhookPublisher<'a> {
    api: &'a dyn WebhookApi,
}

impl<'a> WebhookPublisher<'a> {
    pub fn new(api: &'a dyn WebhookApi) -> Self {
        Self { api }
    }

    /// Create a webhook named `name` on `channel_id`.
    ///
    /// Not idempotent: each call creates another webhook, even with the same name.
    pub async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError> {
        let hook = self.api.create_webhook(channel_id, name).await?;
        tracing::info!(
            webhook_id = %hook.id,
            channel_id = %hook.channel_id,
            has_token = hook.token().is_some(),
            "Created webhook {}",
            name
        );
        Ok(hook)
    }

    /// Post `content` through the webhook identified by `webhook_id` and `token`
    pub async fn publish(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError> {
        if token.is_empty() {
            return Err(DispatchError::MissingWebhookToken);
        }
        let sent = self.api.execute_webhook(webhook_id, token, content).await?;
        tracing::info!(channel_id = %sent.channel_id, message_id = %sent.id, "Published via webhook");
        Ok(sent)
    }

    /// Post through a webhook returned by `create_webhook`
    pub async fn publish_with(&self, hook: &Webhook, content: &str) -> Result<SentMessage, DispatchError> {
        let token = hook.token().ok_or(DispatchError::MissingWebhookToken)?;
        self.publish(&hook.id, token, content).await
    }
}
