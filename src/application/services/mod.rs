//! Application services - Business logic orchestration

pub mod bootstrap;
pub mod webhook_service;

pub use bootstrap::Bootstrap;
pub use webhook_service::WebhookPublisher;
