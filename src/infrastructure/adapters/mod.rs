//! Platform adapters

pub mod discord;
pub mod webhook;

pub use discord::{bot_authorization, DiscordRest, DiscordSession, DiscordSessionFactory};
pub use webhook::WebhookClient;
