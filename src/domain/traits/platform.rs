use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{AuthError, ConnectionError, DispatchError};
use crate::domain::entities::{BotIdentity, InboundMessage, SentMessage, Webhook};

/// Webhook endpoints. Executing needs only the webhook's own token.
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Create a named webhook on a channel
    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError>;

    /// Post a message through a webhook
    async fn execute_webhook(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError>;
}

/// Messenger trait - outbound capabilities of an authenticated bot
#[async_trait]
pub trait Messenger: WebhookApi {
    /// Fetch the account the session is authenticated as
    async fn current_user(&self) -> Result<BotIdentity, AuthError>;

    /// Open (or reuse) a one-to-one channel with a user, returning its channel id
    async fn create_dm_channel(&self, user_id: &str) -> Result<String, DispatchError>;

    /// Send a text message to a channel
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<SentMessage, DispatchError>;
}

/// Handler invoked for every inbound message the session observes.
///
/// May be called concurrently from several gateway tasks.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, messenger: &dyn Messenger, message: InboundMessage);
}

/// Session trait - an authenticated connection that delivers events
#[async_trait]
pub trait Session: Messenger {
    /// Register the message-create handler. Must happen before `open`.
    fn on_message_create(&mut self, handler: Arc<dyn MessageHandler>);

    /// Connect to the gateway and wait until it reports ready
    async fn open(&mut self) -> Result<(), ConnectionError>;

    /// Shut down the gateway connection, if open
    async fn close(&mut self);
}

/// Builds sessions from a bearer token
pub trait SessionFactory: Send + Sync {
    type Session: Session;

    fn create(&self, token: &str) -> Result<Self::Session, AuthError>;
}
