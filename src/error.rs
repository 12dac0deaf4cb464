//! Error types for the subscription registry.

use thiserror::Error;

/// Error raised by an event source's own subscribe/unsubscribe primitives.
///
/// The registry hands these back to the caller untouched.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Subscription name must not be empty")]
    InvalidName,

    #[error("Event source does not emit: {0}")]
    UnsupportedEvent(String),

    #[error("Event source was dropped while still subscribed")]
    SourceGone,

    #[error(transparent)]
    Source(SourceError),
}

impl RegistryError {
    /// True for errors that came from the event source rather than the registry.
    pub fn is_source_error(&self) -> bool {
        matches!(self, RegistryError::Source(_) | RegistryError::SourceGone)
    }
}

impl From<SourceError> for RegistryError {
    fn from(e: SourceError) -> Self {
        RegistryError::Source(e)
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
