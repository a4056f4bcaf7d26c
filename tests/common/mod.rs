//! Recording fakes for the platform traits

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use taskrelay_bot::application::errors::{AuthError, ConnectionError, DispatchError};
use taskrelay_bot::domain::entities::{BotIdentity, InboundMessage, SentMessage, Webhook};
use taskrelay_bot::domain::traits::{MessageHandler, Messenger, Session, SessionFactory, WebhookApi};

static INIT: Once = Once::new();

/// Route library logs to the test output. Filter with RUST_LOG.
pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    CreateDm(String),
    Send { channel_id: String, content: String },
    CreateWebhook { channel_id: String, name: String },
    ExecuteWebhook { webhook_id: String, token: String, content: String },
    OnMessageCreate,
    Open,
    Close,
}

/// Messenger that records calls and returns scripted results
#[derive(Default)]
pub struct RecordingMessenger {
    pub calls: Mutex<Vec<Call>>,
    pub identity: Option<BotIdentity>,
    pub fail_identity: bool,
    pub fail_dm: bool,
    pub fail_send: bool,
    pub webhook_count: Mutex<u32>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            identity: Some(BotIdentity::new("99", "relay")),
            ..Self::default()
        }
    }

    pub fn failing_dm() -> Self {
        Self { fail_dm: true, ..Self::new() }
    }

    pub fn failing_send() -> Self {
        Self { fail_send: true, ..Self::new() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WebhookApi for RecordingMessenger {
    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError> {
        self.record(Call::CreateWebhook {
            channel_id: channel_id.to_string(),
            name: name.to_string(),
        });
        let mut count = self.webhook_count.lock().unwrap();
        *count += 1;
        Ok(Webhook {
            id: format!("hook-{}", count),
            token: Some(format!("token-{}", count)),
            channel_id: channel_id.to_string(),
            name: Some(name.to_string()),
        })
    }

    async fn execute_webhook(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError> {
        self.record(Call::ExecuteWebhook {
            webhook_id: webhook_id.to_string(),
            token: token.to_string(),
            content: content.to_string(),
        });
        Ok(SentMessage {
            id: "m-1".to_string(),
            channel_id: "webhook-channel".to_string(),
            content: content.to_string(),
        })
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn current_user(&self) -> Result<BotIdentity, AuthError> {
        self.record(Call::CurrentUser);
        if self.fail_identity {
            return Err(AuthError::Identity("401 Unauthorized".to_string()));
        }
        self.identity
            .clone()
            .ok_or_else(|| AuthError::Identity("no identity".to_string()))
    }

    async fn create_dm_channel(&self, user_id: &str) -> Result<String, DispatchError> {
        self.record(Call::CreateDm(user_id.to_string()));
        if self.fail_dm {
            return Err(DispatchError::ChannelCreate {
                user_id: user_id.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(format!("dm-{}", user_id))
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<SentMessage, DispatchError> {
        self.record(Call::Send {
            channel_id: channel_id.to_string(),
            content: content.to_string(),
        });
        if self.fail_send {
            return Err(DispatchError::Send {
                channel_id: channel_id.to_string(),
                reason: "missing access".to_string(),
            });
        }
        Ok(SentMessage {
            id: "sent-1".to_string(),
            channel_id: channel_id.to_string(),
            content: content.to_string(),
        })
    }
}

/// Session built on the recording messenger. Delivers `inbox` on open.
pub struct FakeSession {
    pub messenger: Arc<RecordingMessenger>,
    pub handler: Option<Arc<dyn MessageHandler>>,
    pub open_result: Result<(), ConnectionError>,
    pub hang_open: bool,
    pub inbox: VecDeque<InboundMessage>,
}

#[async_trait]
impl WebhookApi for FakeSession {
    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook, DispatchError> {
        self.messenger.create_webhook(channel_id, name).await
    }

    async fn execute_webhook(
        &self,
        webhook_id: &str,
        token: &str,
        content: &str,
    ) -> Result<SentMessage, DispatchError> {
        self.messenger.execute_webhook(webhook_id, token, content).await
    }
}

#[async_trait]
impl Messenger for FakeSession {
    async fn current_user(&self) -> Result<BotIdentity, AuthError> {
        self.messenger.current_user().await
    }

    async fn create_dm_channel(&self, user_id: &str) -> Result<String, DispatchError> {
        self.messenger.create_dm_channel(user_id).await
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<SentMessage, DispatchError> {
        self.messenger.send_message(channel_id, content).await
    }
}

#[async_trait]
impl Session for FakeSession {
    fn on_message_create(&mut self, handler: Arc<dyn MessageHandler>) {
        self.messenger.record(Call::OnMessageCreate);
        self.handler = Some(handler);
    }

    async fn open(&mut self) -> Result<(), ConnectionError> {
        self.messenger.record(Call::Open);
        if self.hang_open {
            // Handshake that never completes
            std::future::pending::<()>().await;
        }
        self.open_result.clone()?;
        let handler = self.handler.clone().ok_or(ConnectionError::NoHandler)?;
        while let Some(msg) = self.inbox.pop_front() {
            handler.on_message(self.messenger.as_ref(), msg).await;
        }
        Ok(())
    }

    async fn close(&mut self) {
        self.messenger.record(Call::Close);
    }
}

/// Factory handing out one scripted session
pub struct FakeFactory {
    pub messenger: Arc<RecordingMessenger>,
    pub open_result: Result<(), ConnectionError>,
    pub hang_open: bool,
    pub inbox: Mutex<VecDeque<InboundMessage>>,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeFactory {
    pub fn new(messenger: RecordingMessenger) -> Self {
        Self {
            messenger: Arc::new(messenger),
            open_result: Ok(()),
            hang_open: false,
            inbox: Mutex::new(VecDeque::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_inbox(self, messages: Vec<InboundMessage>) -> Self {
        *self.inbox.lock().unwrap() = messages.into();
        self
    }

    pub fn with_open_result(mut self, result: Result<(), ConnectionError>) -> Self {
        self.open_result = result;
        self
    }

    pub fn with_hanging_open(mut self) -> Self {
        self.hang_open = true;
        self
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    fn create(&self, token: &str) -> Result<FakeSession, AuthError> {
        self.tokens.lock().unwrap().push(token.to_string());
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(FakeSession {
            messenger: self.messenger.clone(),
            handler: None,
            open_result: self.open_result.clone(),
            hang_open: self.hang_open,
            inbox: std::mem::take(&mut *self.inbox.lock().unwrap()),
        })
    }
}
