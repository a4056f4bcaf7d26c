use chrono::{DateTime, Utc};

/// A message delivered by the platform's message-create event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: String,
    pub author_id: String,
    pub author_is_bot: bool,
    pub content: String,
    pub channel_id: String,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            author_id: author_id.into(),
            author_is_bot: false,
            content: content.into(),
            channel_id: channel_id.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_bot_author(mut self, is_bot: bool) -> Self {
        self.author_is_bot = is_bot;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Confirmation returned by a channel send or webhook execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    pub channel_id: String,
    pub content: String,
}

/// Something the router wants done on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    /// Open a DM with `user_id` and post `content` there
    DirectMessage { user_id: String, content: String },
}
