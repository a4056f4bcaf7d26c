//! Domain traits - Abstractions for infrastructure implementations

pub mod platform;

pub use platform::{MessageHandler, Messenger, Session, SessionFactory, WebhookApi};
