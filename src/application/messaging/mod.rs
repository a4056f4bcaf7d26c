//! Message handling - Event-driven message processing

pub mod router;

pub use router::{DispatchOutcome, EventRouter, RouterRules};
