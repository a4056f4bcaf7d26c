//! Discord adapter
//!
//! REST calls go through serenity's `Http`, except webhooks, which use
//! [`WebhookClient`]. The gateway connection is a serenity `Client` that is
//! spawned on `open` and shut down on `close`.

mod gateway;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::GatewayIntents;
use serenity::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::id::{ChannelId, UserId};
use serenity::Client;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::application::errors::{AuthError, ConnectionError, DispatchError};
use crate::domain::entities::{BotIdentity, SentMessage, Webhook};
use crate::domain::traits::{MessageHandler, Messenger, Session, SessionFactory, WebhookApi};
use crate::infrastructure::adapters::webhook::WebhookClient;
use gateway::GatewayBridge;

/// Scheme marker the platform expects in front of bot tokens
pub const BOT_SCHEME: &str = "Bot ";

/// Authorization value for a bot token. Applies the scheme exactly once.
pub fn bot_authorization(token: &str) -> String {
    let token = token.trim();
    if token.starts_with(BOT_SCHEME) {
        token.to_string()
    } else {
        format!("{}{}", BOT_SCHEME, token)
    }
}

/// Events the bot subscribes to. Message content is privileged and must be
/// enabled for the application in the developer portal.
pub fn default_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

fn parse_id(kind: &'static str, value: &str) -> Result<u64, DispatchError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| DispatchError::InvalidId { kind, value: value.to_string() })
}

/// Outbound Discord calls, shared by the session and the gateway bridge
#[derive(Clone)]
pub struct DiscordRest {
    http: Arc<Http>,
    webhooks: WebhookClient,
}

impl DiscordRest {
    pub fn new(authorization: &str) -> Self {
        Self {
            http: Arc::new(Http::new(authorization)),
            webhooks: WebhookClient::new().with_authorization(authorization),
        }
    }
}

#[async_trait]
impl Messenger for DiscordRest {
    async fn current_user(&self) -> Result<BotIdentity, AuthError> {
        let user = self
            .http
            .get_current_user()
            .await
            .map_err(|e| AuthError::Identity(e.to_string()))?;
        Ok(BotIdentity::new(user.id.to_string(), user.name.clone()))
    }

    async fn create_dm_channel(&self, user_id: &str) -> Result<String, DispatchError> {
        let id = UserId::new(parse_id("user", user_id)?);
        let channel = id
            .create_dm_channel(&*self.http)
            .await
            .map_err(|e| DispatchError::ChannelCreate {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(channel.id.to_string())
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<SentMessage, DispatchError> {
        let id = ChannelId::new(parse_id("channel", channel_id)?);
        let msg = id
            .say(&*self.http, content)
            .await
            .map_err(|e| DispatchError::Send {
                channel_id: channel_id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(SentMessage {
            id: msg.id.to_string(),
            channel_id: msg.channel_id.to_string(),
            content: msg.content,
        })
    }
}

#[async_trait]
impl WebhookApi for DiscordRest {
    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError> {
        parse_id("channel", channel_id)?;
        self.webhooks.create_webhook(channel_id, name).await
    }

    async fn execute_webhook(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError> {
        parse_id("webhook", webhook_id)?;
        self.webhooks.execute_webhook(webhook_id, token, content).await
    }
}

struct Gateway {
    shard_manager: Arc<ShardManager>,
    task: JoinHandle<Result<(), serenity::Error>>,
}

/// Authenticated Discord session. Not connected until `open`.
pub struct DiscordSession {
    authorization: String,
    intents: GatewayIntents,
    rest: DiscordRest,
    handler: Option<Arc<dyn MessageHandler>>,
    gateway: Option<Gateway>,
}

impl DiscordSession {
    /// True once the gateway client has been started, including while the
    /// handshake is still in flight
    pub fn is_open(&self) -> bool {
        self.gateway.is_some()
    }
}

#[async_trait]
impl Messenger for DiscordSession {
    async fn current_user(&self) -> Result<BotIdentity, AuthError> {
        self.rest.current_user().await
    }

    async fn create_dm_channel(&self, user_id: &str) -> Result<String, DispatchError> {
        self.rest.create_dm_channel(user_id).await
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<SentMessage, DispatchError> {
        self.rest.send_message(channel_id, content).await
    }
}

#[async_trait]
impl WebhookApi for DiscordSession {
    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError> {
        self.rest.create_webhook(channel_id, name).await
    }

    async fn execute_webhook(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError> {
        self.rest.execute_webhook(webhook_id, token, content).await
    }
}

#[async_trait]
impl Session for DiscordSession {
    fn on_message_create(&mut self, handler: Arc<dyn MessageHandler>) {
        self.handler = Some(handler);
    }

    async fn open(&mut self) -> Result<(), ConnectionError> {
        if self.gateway.is_some() {
            return Ok(());
        }
        let handler = self.handler.clone().ok_or(ConnectionError::NoHandler)?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let bridge = GatewayBridge::new(handler, self.rest.clone(), ready_tx);

        let mut client = Client::builder(&self.authorization, self.intents)
            .event_handler(bridge)
            .await
            .map_err(|e| ConnectionError::Handshake(e.to_string()))?;
        let shard_manager = client.shard_manager.clone();

        tracing::info!("Opening gateway connection");
        let task = tokio::spawn(async move { client.start().await });

        // Stored before waiting so `close` can stop a handshake that is dropped midway
        let gateway = self.gateway.insert(Gateway { shard_manager, task });
        let outcome = tokio::select! {
            ready = ready_rx => ready.map_err(|_| ConnectionError::Closed),
            joined = &mut gateway.task => Err(match joined {
                Ok(Ok(())) => ConnectionError::Closed,
                Ok(Err(e)) => ConnectionError::Handshake(e.to_string()),
                Err(e) => ConnectionError::Handshake(e.to_string()),
            }),
        };

        if outcome.is_err() {
            if let Some(gateway) = self.gateway.take() {
                gateway.task.abort();
            }
        }
        outcome
    }

    async fn close(&mut self) {
        let Some(gateway) = self.gateway.take() else {
            return;
        };
        gateway.shard_manager.shutdown_all().await;
        match gateway.task.await {
            Ok(Ok(())) => tracing::info!("Gateway closed"),
            Ok(Err(e)) => tracing::warn!("Gateway exited with error: {}", e),
            Err(e) => tracing::warn!("Gateway task failed: {}", e),
        }
    }
}

/// Builds [`DiscordSession`]s
#[derive(Debug, Clone)]
pub struct DiscordSessionFactory {
    intents: GatewayIntents,
}

impl DiscordSessionFactory {
    pub fn new() -> Self {
        Self { intents: default_intents() }
    }
}

impl Default for DiscordSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for DiscordSessionFactory {
    type Session = DiscordSession;

    fn create(&self, token: &str) -> Result<DiscordSession, AuthError> {
        let token = token.trim();
        let raw = match token.strip_prefix(BOT_SCHEME.trim_end()) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => token,
        };
        if raw.is_empty() {
            return Err(AuthError::MissingToken);
        }
        serenity::utils::validate_token(raw).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let authorization = bot_authorization(raw);
        let shown: String = raw.chars().take(8).collect();
        tracing::debug!("Created session (token: {}...)", shown);
        Ok(DiscordSession {
            rest: DiscordRest::new(&authorization),
            authorization,
            intents: self.intents,
            handler: None,
            gateway: None,
        })
    }
}
