//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (BotIdentity, InboundMessage, Webhook)
//! - Traits: Abstractions for the messaging platform (Messenger, Session)

pub mod entities;
pub mod traits;
