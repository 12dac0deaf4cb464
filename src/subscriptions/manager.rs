//! Subscription registry: bookkeeping for one owner's event subscriptions.

use crate::error::{RegistryError, Result};
use crate::source::{Binder, EventSource, WeakBinder};
use crate::types::{Handler, SourceId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use super::types::{RegistryConfig, Subscription};

/// Tracks the subscriptions one owner makes against any number of sources.
///
/// Subscriptions are grouped by event name. A name is only present while it
/// holds at least one subscription. Sources and the owner are referenced
/// weakly; the registry owns nothing but the handles it must give back.
///
/// All operations lock the registry for their bookkeeping only. The lock is
/// never held while a source or binder runs, so handlers fired synchronously
/// from a source's subscribe or unsubscribe may call back into the registry.
pub struct SubscriptionRegistry<O: 'static, A: 'static> {
    /// Receiver bound into every handler.
    owner: Weak<O>,
    /// How handlers get their receiver.
    binder: Box<dyn Binder<O, A>>,
    /// Live subscriptions by event name, in insertion order.
    subscriptions: Mutex<HashMap<String, Vec<Subscription<O, A>>>>,
    config: RegistryConfig,
}

impl<O, A> SubscriptionRegistry<O, A>
where
    O: Send + Sync + 'static,
    A: 'static,
{
    /// Create a registry for `owner`, binding handlers with [`WeakBinder`].
    pub fn new(owner: Weak<O>) -> Self {
        Self::with_config(owner, RegistryConfig::default())
    }

    /// Create a registry with a custom configuration.
    pub fn with_config(owner: Weak<O>, config: RegistryConfig) -> Self {
        Self::with_binder(owner, WeakBinder, config)
    }
}

impl<O: 'static, A: 'static> SubscriptionRegistry<O, A> {
    /// Create a registry that binds handlers through `binder`.
    pub fn with_binder<B>(owner: Weak<O>, binder: B, config: RegistryConfig) -> Self
    where
        B: Binder<O, A> + 'static,
    {
        Self {
            owner,
            binder: Box::new(binder),
            subscriptions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Subscribe `handler` to `name` events on `source`.
    ///
    /// Unless `force` is set, an existing subscription for the same
    /// (name, source, handler) makes this a no-op. Returns whether a new
    /// subscription was created. If the source refuses the subscription its
    /// error is returned and nothing is recorded.
    pub fn subscribe<S>(
        &self,
        source: &Arc<S>,
        name: &str,
        handler: &Handler<O, A>,
        force: bool,
    ) -> Result<bool>
    where
        S: EventSource<A> + 'static,
    {
        let source: Arc<dyn EventSource<A>> = source.clone();
        self.subscribe_dyn(&source, name, handler, force)
    }

    /// [`subscribe`](Self::subscribe) for a type-erased source.
    ///
    /// The registry lock is not held while the binder and the source run, so
    /// a source may invoke the new handler right away and that handler may
    /// use this registry. A duplicate that lands in the meantime wins and the
    /// freshly created subscription is handed back to the source.
    pub fn subscribe_dyn(
        &self,
        source: &Arc<dyn EventSource<A>>,
        name: &str,
        handler: &Handler<O, A>,
        force: bool,
    ) -> Result<bool> {
        if name.is_empty() {
            return Err(RegistryError::InvalidName);
        }
        if !source.supports(name) {
            return Err(RegistryError::UnsupportedEvent(name.to_string()));
        }

        let source_id = SourceId::of(source);
        let force = force || self.config.allow_duplicates;
        if !force && self.is_subscribed(name, Some(source_id), Some(handler)) {
            tracing::debug!(event = name, source = ?source_id, "Already subscribed, skipping");
            return Ok(false);
        }

        let bound = self.binder.bind(&self.owner, handler);
        let handle = source.subscribe(name, bound)?;

        {
            let mut subs = self.subscriptions.lock();
            let raced = !force
                && subs.get(name).is_some_and(|entries| {
                    entries.iter().any(|s| s.matches(Some(source_id), Some(handler)))
                });

            if !raced {
                subs.entry(name.to_string()).or_default().push(Subscription {
                    source: Arc::downgrade(source),
                    handle,
                    handler: handler.clone(),
                });
                tracing::debug!(event = name, source = ?source_id, handle = %handle, "Subscribed");
                return Ok(true);
            }
        }

        tracing::debug!(
            event = name,
            handle = %handle,
            "Subscribed concurrently, releasing duplicate"
        );
        source.unsubscribe(handle)?;
        Ok(false)
    }

    /// Whether any subscription under `name` matches the given filters.
    ///
    /// An absent filter matches anything; an unknown name is simply `false`.
    pub fn is_subscribed(
        &self,
        name: &str,
        source: Option<SourceId>,
        handler: Option<&Handler<O, A>>,
    ) -> bool {
        self.subscriptions
            .lock()
            .get(name)
            .is_some_and(|entries| entries.iter().any(|s| s.matches(source, handler)))
    }

    /// Release every subscription under `name` matching the given filters.
    ///
    /// Safe to call for names that were never subscribed. Matching entries
    /// leave the registry even if their source fails to release them; the
    /// first such failure is returned once every release has been attempted.
    /// Returns the number of subscriptions removed.
    pub fn unsubscribe(
        &self,
        name: &str,
        source: Option<SourceId>,
        handler: Option<&Handler<O, A>>,
    ) -> Result<usize> {
        let removed = {
            let mut subs = self.subscriptions.lock();
            let Some(entries) = subs.get_mut(name) else {
                return Ok(0);
            };

            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(entries)
                .into_iter()
                .partition(|s| s.matches(source, handler));
            *entries = kept;

            if entries.is_empty() {
                subs.remove(name);
            }
            removed
        };

        let count = removed.len();
        let mut first_error = None;
        Self::release(name, removed, &mut first_error);

        if count > 0 {
            tracing::debug!(event = name, removed = count, "Unsubscribed");
        }
        first_error.map_or(Ok(count), Err)
    }

    /// Release every subscription under every name.
    ///
    /// Leaves the registry empty even when sources fail; the first failure is
    /// returned. Calling it on an empty registry does nothing.
    pub fn clear(&self) -> Result<usize> {
        let drained = std::mem::take(&mut *self.subscriptions.lock());
        if drained.is_empty() {
            return Ok(0);
        }

        let mut count = 0;
        let mut first_error = None;
        for (name, entries) in drained {
            count += entries.len();
            Self::release(&name, entries, &mut first_error);
        }

        tracing::debug!(removed = count, "Cleared subscriptions");
        first_error.map_or(Ok(count), Err)
    }

    /// Hand each handle back to its source. Called without the lock held.
    fn release(
        name: &str,
        entries: Vec<Subscription<O, A>>,
        first_error: &mut Option<RegistryError>,
    ) {
        for sub in entries {
            let result = match sub.source.upgrade() {
                Some(source) => source.unsubscribe(sub.handle).map_err(RegistryError::Source),
                None => Err(RegistryError::SourceGone),
            };

            if let Err(e) = result {
                tracing::warn!(
                    event = name,
                    handle = %sub.handle,
                    error = %e,
                    "Failed to release subscription"
                );
                if first_error.is_none() {
                    *first_error = Some(e);
                }
            }
        }
    }

    // --- Inspection ---

    /// Total number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }

    /// Number of live subscriptions under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.subscriptions.lock().get(name).map_or(0, Vec::len)
    }

    /// Whether `name` currently holds any subscription.
    pub fn contains_name(&self, name: &str) -> bool {
        self.subscriptions.lock().contains_key(name)
    }

    /// Names holding subscriptions, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.subscriptions.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// The owner, if it is still alive.
    pub fn owner(&self) -> Option<Arc<O>> {
        self.owner.upgrade()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl<O: 'static, A: 'static> Drop for SubscriptionRegistry<O, A> {
    fn drop(&mut self) {
        if !self.config.clear_on_drop {
            return;
        }
        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "Failed to release subscriptions on drop");
        }
    }
}
