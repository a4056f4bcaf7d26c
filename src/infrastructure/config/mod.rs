//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;

mod env;

pub use env::WebhookEnv;

/// Default trigger substring
pub const DEFAULT_TRIGGER: &str = "okan";

/// Default user that triggered messages are relayed to
pub const DEFAULT_TARGET_USER_ID: &str = "927509052014092318";

/// Default text placed in front of the relayed content
pub const DEFAULT_REPLY_PREFIX: &str = "this task for you =>";

/// Bot configuration, read once from `config.json`.
///
/// Keys are written in PascalCase; the lower and camel case spellings that
/// older configs use are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "Token", alias = "token", default)]
    pub token: String,

    #[serde(rename = "BotPrefix", alias = "botPrefix", alias = "botprefix", default)]
    pub bot_prefix: String,

    #[serde(rename = "Trigger", alias = "trigger", default = "default_trigger")]
    pub trigger: String,

    #[serde(
        rename = "TargetUserID",
        alias = "targetUserID",
        alias = "targetUserId",
        alias = "targetuserid",
        default = "default_target_user_id"
    )]
    pub target_user_id: String,

    #[serde(rename = "ReplyPrefix", alias = "replyPrefix", alias = "replyprefix", default = "default_reply_prefix")]
    pub reply_prefix: String,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_string()
}

fn default_target_user_id() -> String {
    DEFAULT_TARGET_USER_ID.to_string()
}

fn default_reply_prefix() -> String {
    DEFAULT_REPLY_PREFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            bot_prefix: String::new(),
            trigger: default_trigger(),
            target_user_id: default_target_user_id(),
            reply_prefix: default_reply_prefix(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Reading config file {}", path.display());

        let content = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io { path: path.to_path_buf(), source }
            }
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "read config file");

        Self::from_slice(&content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Config with placeholder values, as printed by `init-config`
    pub fn template() -> Self {
        Self {
            token: "YOUR_BOT_TOKEN".to_string(),
            bot_prefix: "!".to_string(),
            ..Self::default()
        }
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain strings only, serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write the template to `path`, refusing to clobber an existing file
    pub fn write_template(path: impl Into<PathBuf>) -> Result<PathBuf, ConfigError> {
        let path = path.into();
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path));
        }
        std::fs::write(&path, Self::template().to_json_pretty())
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        Ok(path)
    }

    /// `BotPrefix` is loaded but the router matches on `Trigger`.
    /// Returns both when they disagree so the caller can warn about it.
    pub fn trigger_mismatch(&self) -> Option<(&str, &str)> {
        if !self.bot_prefix.is_empty() && self.bot_prefix != self.trigger {
            Some((&self.bot_prefix, &self.trigger))
        } else {
            None
        }
    }
}
