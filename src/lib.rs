//! # Subscription Registry
//!
//! Bookkeeping for the event subscriptions an owner object makes against
//! external event sources.
//!
//! ## Core Concepts
//!
//! - **Event sources**: anything implementing [`EventSource`]; hands out a
//!   [`SourceHandle`] per subscription and takes it back to release it
//! - **Owner**: the receiver bound into every handler, held weakly
//! - **Handlers**: compared by identity, so the same [`Handler`] can be used
//!   to find and release its subscriptions later
//! - **Registry**: groups subscriptions by event name and releases them by
//!   name, source, handler, or all at once
//!
//! The registry does not deliver events. Emission stays with the sources.

pub mod error;
pub mod source;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{RegistryError, Result, SourceError};
pub use source::{Binder, EventSource, WeakBinder};
pub use subscriptions::{RegistryConfig, SubscriptionRegistry};
pub use types::*;
