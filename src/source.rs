//! Capabilities the registry consumes: event sources and handler binding.
//!
//! Neither is implemented here beyond the default [`WeakBinder`]. Anything
//! that can hand out a [`SourceHandle`] for a named event and later release
//! it can be registered against.

use crate::error::SourceError;
use crate::types::{BoundHandler, Handler, SourceHandle};
use std::sync::{Arc, Weak};

/// An object that accepts subscriptions to named events.
pub trait EventSource<A>: Send + Sync {
    /// Start delivering `name` events to `handler`.
    fn subscribe(&self, name: &str, handler: BoundHandler<A>) -> Result<SourceHandle, SourceError>;

    /// Stop delivering to the subscription identified by `handle`.
    fn unsubscribe(&self, handle: SourceHandle) -> Result<(), SourceError>;

    /// Whether this source can emit `name` at all.
    fn supports(&self, _name: &str) -> bool {
        true
    }
}

/// Fixes an owner as the receiver of a handler.
pub trait Binder<O, A>: Send + Sync {
    fn bind(&self, owner: &Weak<O>, handler: &Handler<O, A>) -> BoundHandler<A>;
}

/// Binds through a weak owner reference.
///
/// The bound closure upgrades the owner on every call and does nothing once
/// the owner has been dropped, so a subscription never keeps its owner alive.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeakBinder;

impl<O, A> Binder<O, A> for WeakBinder
where
    O: Send + Sync + 'static,
    A: 'static,
{
    fn bind(&self, owner: &Weak<O>, handler: &Handler<O, A>) -> BoundHandler<A> {
        let owner = owner.clone();
        let handler = handler.clone();
        Arc::new(move |args: &A| {
            if let Some(owner) = owner.upgrade() {
                handler.call(&owner, args);
            }
        })
    }
}

impl<O, A, F> Binder<O, A> for F
where
    F: Fn(&Weak<O>, &Handler<O, A>) -> BoundHandler<A> + Send + Sync,
{
    fn bind(&self, owner: &Weak<O>, handler: &Handler<O, A>) -> BoundHandler<A> {
        self(owner, handler)
    }
}
