//! Test event source shared by the integration suites.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use subscription_registry::{BoundHandler, EventSource, SourceError, SourceHandle};

/// Error the test source raises when told to fail.
#[derive(Debug)]
pub struct Refused(pub &'static str);

impl fmt::Display for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source refused: {}", self.0)
    }
}

impl std::error::Error for Refused {}

/// An in-memory emitter that records every call the registry makes.
pub struct SignalSource<A> {
    next_handle: AtomicU64,
    connections: Mutex<Vec<(SourceHandle, String, BoundHandler<A>)>>,
    /// Names this source emits; `None` means any name.
    pub signals: Option<Vec<String>>,
    pub subscribe_calls: AtomicUsize,
    pub unsubscribe_calls: AtomicUsize,
    pub fail_subscribe: AtomicBool,
    pub fail_unsubscribe: AtomicBool,
}

impl<A> SignalSource<A> {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            connections: Mutex::new(Vec::new()),
            signals: None,
            subscribe_calls: AtomicUsize::new(0),
            unsubscribe_calls: AtomicUsize::new(0),
            fail_subscribe: AtomicBool::new(false),
            fail_unsubscribe: AtomicBool::new(false),
        }
    }

    pub fn with_signals(signals: &[&str]) -> Self {
        Self {
            signals: Some(signals.iter().map(|s| s.to_string()).collect()),
            ..Self::new()
        }
    }

    /// Deliver `args` to every handler connected to `name`.
    pub fn emit(&self, name: &str, args: &A) {
        let handlers: Vec<BoundHandler<A>> = self
            .connections
            .lock()
            .iter()
            .filter(|(_, n, _)| n == name)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(args);
        }
    }

    /// Number of live connections on the source side.
    pub fn connected(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn connected_to(&self, name: &str) -> usize {
        self.connections
            .lock()
            .iter()
            .filter(|(_, n, _)| n == name)
            .count()
    }

    pub fn unsubscribes(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    pub fn subscribes(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }
}

impl<A: 'static> EventSource<A> for SignalSource<A> {
    fn subscribe(&self, name: &str, handler: BoundHandler<A>) -> Result<SourceHandle, SourceError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(Box::new(Refused("subscribe")));
        }

        let handle = SourceHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.connections
            .lock()
            .push((handle, name.to_string(), handler));
        Ok(handle)
    }

    fn unsubscribe(&self, handle: SourceHandle) -> Result<(), SourceError> {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unsubscribe.load(Ordering::SeqCst) {
            return Err(Box::new(Refused("unsubscribe")));
        }

        let mut connections = self.connections.lock();
        let before = connections.len();
        connections.retain(|(h, _, _)| *h != handle);
        if connections.len() == before {
            return Err(Box::new(Refused("unknown handle")));
        }
        Ok(())
    }

    fn supports(&self, name: &str) -> bool {
        self.signals
            .as_ref()
            .map_or(true, |signals| signals.iter().any(|s| s == name))
    }
}

/// Install a test-writer subscriber so registry logs show up on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
