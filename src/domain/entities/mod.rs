//! Domain entities - Core business objects with no external dependencies

pub mod identity;
pub mod message;
pub mod webhook;

pub use identity::BotIdentity;
pub use message::{InboundMessage, OutboundAction, SentMessage};
pub use webhook::{parse_webhook_url, Webhook};
