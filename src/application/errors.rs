//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Refusing to overwrite existing config: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Session construction and identity errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Bot token is missing")]
    MissingToken,

    #[error("Bot token is malformed: {0}")]
    InvalidToken(String),

    #[error("Failed to fetch bot identity: {0}")]
    Identity(String),
}

/// Gateway connection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("No message handler attached before open")]
    NoHandler,

    #[error("Gateway handshake failed: {0}")]
    Handshake(String),

    #[error("Gateway closed before becoming ready")]
    Closed,
}

/// Per-event and webhook failures. Never fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },

    #[error("Failed to create DM channel with {user_id}: {reason}")]
    ChannelCreate { user_id: String, reason: String },

    #[error("Failed to send message to {channel_id}: {reason}")]
    Send { channel_id: String, reason: String },

    #[error("Failed to create webhook on {channel_id}: {reason}")]
    WebhookCreate { channel_id: String, reason: String },

    #[error("Failed to execute webhook {webhook_id}: {reason}")]
    WebhookExecute { webhook_id: String, reason: String },

    #[error("Webhook token is missing")]
    MissingWebhookToken,
}
