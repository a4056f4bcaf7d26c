//! Bridges serenity's gateway events to our `MessageHandler`

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::Timestamp;
use tokio::sync::{oneshot, Mutex};

use crate::domain::entities::InboundMessage;
use crate::domain::traits::MessageHandler;
use super::DiscordRest;

/// serenity event handler that forwards message-create events
pub(super) struct GatewayBridge {
    handler: Arc<dyn MessageHandler>,
    rest: DiscordRest,
    ready_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl GatewayBridge {
    pub(super) fn new(
        handler: Arc<dyn MessageHandler>,
        rest: DiscordRest,
        ready_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            handler,
            rest,
            ready_tx: Mutex::new(Some(ready_tx)),
        }
    }
}

/// Keeps sub-second precision; serenity stores a chrono value with the `chrono` feature
fn to_utc(timestamp: Timestamp) -> DateTime<Utc> {
    *timestamp
}

pub(super) fn to_inbound(msg: &Message) -> InboundMessage {
    InboundMessage::new(msg.author.id.to_string(), msg.channel_id.to_string(), msg.content.clone())
        .with_id(msg.id.to_string())
        .with_bot_author(msg.author.bot)
        .with_timestamp(to_utc(msg.timestamp))
}

#[async_trait]
impl EventHandler for GatewayBridge {
    async fn message(&self, _ctx: Context, new_message: Message) {
        let inbound = to_inbound(&new_message);
        tracing::trace!(message_id = %inbound.id, channel_id = %inbound.channel_id, "message create");
        self.handler.on_message(&self.rest, inbound).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            shard = ?ready.shard,
            guilds = ready.guilds.len(),
            "Gateway ready as {}",
            ready.user.name
        );
        // Reconnects fire ready again; only the first one is reported
        if let Some(tx) = self.ready_tx.lock().await.take() {
            let _ = tx.send(());
        }
    }
}
