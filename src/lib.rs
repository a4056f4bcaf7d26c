//! taskrelay-bot - a small Discord bot that relays keyword-tagged messages
//! to one user by DM, with optional webhook publishing.

pub mod domain;
pub mod application;
pub mod infrastructure;
