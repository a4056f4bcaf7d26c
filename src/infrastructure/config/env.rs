//! Environment used by the webhook commands
//!
//! `USERID` names the channel a webhook is created on, `CHANNELID` the webhook
//! that is executed, `WEBHOOKTOKEN` its token and `BOTTOKEN` the bot token.

use crate::domain::entities::parse_webhook_url;

/// Webhook-related environment, read once at process start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEnv {
    pub user_id: Option<String>,
    pub channel_id: Option<String>,
    pub bot_token: Option<String>,
    pub webhook_token: Option<String>,
}

impl WebhookEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            user_id: get("USERID"),
            channel_id: get("CHANNELID"),
            bot_token: get("BOTTOKEN"),
            webhook_token: get("WEBHOOKTOKEN"),
        }
    }

    /// Channel a new webhook is created on: `channel`, then `USERID`
    pub fn create_channel(&self, channel: Option<String>) -> Option<String> {
        channel.or_else(|| self.user_id.clone())
    }

    /// Bot token: `token`, then `BOTTOKEN`, then whatever `config_token` yields.
    ///
    /// `config_token` only runs when the first two are unset.
    pub fn bot_token_or(
        &self,
        token: Option<String>,
        config_token: impl FnOnce() -> Option<String>,
    ) -> String {
        token
            .or_else(|| self.bot_token.clone())
            .or_else(config_token)
            .unwrap_or_default()
    }

    /// Webhook id and token to publish through.
    ///
    /// A `url` wins outright. Otherwise the id is `webhook_id`, then
    /// `CHANNELID`, and the token is `token`, then `WEBHOOKTOKEN`.
    pub fn publish_target(
        &self,
        webhook_id: Option<String>,
        token: Option<String>,
        url: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(url) = url {
            return parse_webhook_url(url);
        }
        webhook_id
            .or_else(|| self.channel_id.clone())
            .zip(token.or_else(|| self.webhook_token.clone()))
    }
}
