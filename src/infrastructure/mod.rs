//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Discord gateway and REST, webhooks)

pub mod config;
pub mod adapters;
