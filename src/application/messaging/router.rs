//! Event router - Turns inbound messages into relayed direct messages

use async_trait::async_trait;

use crate::application::errors::DispatchError;
use crate::domain::entities::{BotIdentity, InboundMessage, OutboundAction, SentMessage};
use crate::domain::traits::{MessageHandler, Messenger};
use crate::infrastructure::config::Config;

/// Matching and reply rules for the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterRules {
    pub trigger: String,
    pub target_user_id: String,
    pub reply_prefix: String,
}

impl RouterRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            trigger: config.trigger.clone(),
            target_user_id: config.target_user_id.clone(),
            reply_prefix: config.reply_prefix.clone(),
        }
    }

    pub fn reply_for(&self, content: &str) -> String {
        format!("{}{}", self.reply_prefix, content)
    }
}

/// Result of handling one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ignored,
    Relayed(Vec<SentMessage>),
}

/// Routes message-create events. Holds only immutable state.
#[derive(Debug, Clone)]
pub struct EventRouter {
    identity: BotIdentity,
    rules: RouterRules,
}

impl EventRouter {
    pub fn new(identity: BotIdentity, rules: RouterRules) -> Self {
        Self { identity, rules }
    }

    /// Decide what to do with a message without touching the network
    pub fn plan(&self, message: &InboundMessage) -> Vec<OutboundAction> {
        if self.identity.is_self(&message.author_id) {
            return Vec::new();
        }
        // An empty trigger would match everything
        if self.rules.trigger.is_empty() || !message.content.contains(&self.rules.trigger) {
            return Vec::new();
        }

        vec![OutboundAction::DirectMessage {
            user_id: self.rules.target_user_id.clone(),
            content: self.rules.reply_for(&message.content),
        }]
    }

    /// Execute the plan for one message, stopping at the first failure
    pub async fn dispatch(
        &self,
        messenger: &dyn Messenger,
        message: &InboundMessage,
    ) -> Result<DispatchOutcome, DispatchError> {
        let actions = self.plan(message);
        if actions.is_empty() {
            return Ok(DispatchOutcome::Ignored);
        }

        let mut sent = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                OutboundAction::DirectMessage { user_id, content } => {
                    let channel_id = messenger.create_dm_channel(&user_id).await?;
                    tracing::debug!(user_id = %user_id, channel_id = %channel_id, "opened DM channel");
                    sent.push(messenger.send_message(&channel_id, &content).await?);
                }
            }
        }
        Ok(DispatchOutcome::Relayed(sent))
    }
}

#[async_trait]
impl MessageHandler for EventRouter {
    async fn on_message(&self, messenger: &dyn Messenger, message: InboundMessage) {
        match self.dispatch(messenger, &message).await {
            Ok(DispatchOutcome::Ignored) => {}
            Ok(DispatchOutcome::Relayed(sent)) => {
                for msg in sent {
                    tracing::info!(
                        message_id = %message.id,
                        author_id = %message.author_id,
                        author_is_bot = message.author_is_bot,
                        relayed_id = %msg.id,
                        "Relayed message to {}",
                        self.rules.target_user_id
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    message_id = %message.id,
                    channel_id = %message.channel_id,
                    "Failed to relay message: {}",
                    e
                );
            }
        }
    }
}
