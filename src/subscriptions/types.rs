//! Subscription types for the registry.

use crate::source::EventSource;
use crate::types::{Handler, SourceHandle, SourceId};
use std::sync::Weak;

/// Configuration for a subscription registry.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Release every subscription when the registry is dropped.
    /// Default: true
    pub clear_on_drop: bool,

    /// Treat every subscribe as forced, allowing duplicate entries for the
    /// same (name, source, handler).
    /// Default: false
    pub allow_duplicates: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            clear_on_drop: true,
            allow_duplicates: false,
        }
    }
}

/// One live registration of a handler against a named event on a source.
pub(crate) struct Subscription<O: 'static, A: 'static> {
    /// The source, held weakly; the registry never keeps it alive.
    pub source: Weak<dyn EventSource<A>>,
    /// Token the source handed out, consumed on release.
    pub handle: SourceHandle,
    /// The handler as supplied, before owner binding.
    pub handler: Handler<O, A>,
}

impl<O: 'static, A: 'static> Subscription<O, A> {
    pub fn source_id(&self) -> SourceId {
        SourceId::of_weak(&self.source)
    }

    /// Whether this entry passes both filters; an absent filter matches all.
    pub fn matches(&self, source: Option<SourceId>, handler: Option<&Handler<O, A>>) -> bool {
        source.map_or(true, |id| self.source_id() == id)
            && handler.map_or(true, |h| self.handler.ptr_eq(h))
    }
}
