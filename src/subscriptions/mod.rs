//! Subscription bookkeeping for one owner.
//!
//! The registry records which handlers an owner has subscribed to which
//! events on which sources, so they can later be released:
//! - selectively, by event name plus optional source and handler filters
//! - all at once, when the owner is torn down
//!
//! # Example
//!
//! ```ignore
//! struct Panel {
//!     signals: SubscriptionRegistry<Panel, Setting>,
//! }
//!
//! let panel = Arc::new_cyclic(|me| Panel {
//!     signals: SubscriptionRegistry::new(me.clone()),
//! });
//!
//! let on_foo = Handler::new(|panel: &Panel, setting: &Setting| panel.refresh(setting));
//! panel.signals.subscribe(&settings, "changed::foo", &on_foo, false)?;
//! panel.signals.subscribe(&settings, "changed::foo", &on_foo, false)?; // no-op
//!
//! panel.signals.unsubscribe("changed::foo", Some(SourceId::of(&settings)), None)?;
//! panel.signals.clear()?;
//! ```

mod manager;
mod types;

pub use manager::SubscriptionRegistry;
pub use types::RegistryConfig;
