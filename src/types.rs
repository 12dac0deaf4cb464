//! Core types shared by the registry and its event sources.

use std::fmt;
use std::sync::{Arc, Weak};

/// Opaque token minted by an event source at subscribe time.
///
/// The registry never inspects it; it only hands it back to the same source
/// to release the subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub u64);

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceHandle({})", self.0)
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an event source, used to filter subscriptions by source.
///
/// Two ids are equal iff they point at the same allocation. While the
/// registry holds a `Weak` to a source the allocation stays reserved, so an
/// address cannot be recycled by an unrelated source in the meantime.
///
/// That guarantee ends once the registry has released every subscription to
/// the source and the source itself is gone. An id kept past that point may
/// match a new source that happens to be allocated at the same address, so
/// take ids from live sources rather than storing them long term.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

impl SourceId {
    /// Identity of a shared source.
    pub fn of<S: ?Sized>(source: &Arc<S>) -> Self {
        SourceId(Arc::as_ptr(source) as *const () as usize)
    }

    pub(crate) fn of_weak<S: ?Sized>(source: &Weak<S>) -> Self {
        SourceId(Weak::as_ptr(source) as *const () as usize)
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({:#x})", self.0)
    }
}

/// A handler after the owner has been bound into it: what the source calls.
pub type BoundHandler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// A caller-supplied handler, invoked with the owner as its receiver.
///
/// Identity is the handler allocation: clones compare equal, two handlers
/// built from identical closures do not.
pub struct Handler<O: ?Sized, A: ?Sized> {
    func: Arc<dyn Fn(&O, &A) + Send + Sync>,
}

impl<O: ?Sized, A: ?Sized> Handler<O, A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&O, &A) + Send + Sync + 'static,
    {
        Self { func: Arc::new(f) }
    }

    /// Invoke the handler with an explicit receiver.
    pub fn call(&self, owner: &O, args: &A) {
        (self.func)(owner, args)
    }

    /// Whether both values are the same handler.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.func) as *const () as usize
    }
}

impl<O: ?Sized, A: ?Sized> Clone for Handler<O, A> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<O: ?Sized, A: ?Sized> PartialEq for Handler<O, A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<O: ?Sized, A: ?Sized> Eq for Handler<O, A> {}

impl<O: ?Sized, A: ?Sized> fmt::Debug for Handler<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:#x})", self.addr())
    }
}
