//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Bootstrap and webhook publishing
//! - Errors: Domain-specific errors
//! - Messaging: The message-create router

pub mod errors;
pub mod services;
pub mod messaging;
