//! Error types for rolelist core.

use crate::gc::RootId;

/// Failure of a call into the storage runtime.
///
/// Getters, setters, constructors and update callbacks all live in the
/// storage runtime. When one of them throws, the bridge reports it as a
/// `CallError` carrying the runtime's own description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("foreign call failed: {message}")]
pub struct CallError {
    message: String,
}

impl CallError {
    /// Create a call error with the runtime's message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message reported by the storage runtime.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for calls into the storage runtime.
pub type CallResult<T> = std::result::Result<T, CallError>;

/// Pin bookkeeping errors, reported by [`RootTracker`](crate::gc::RootTracker).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinError {
    /// A root was released more times than it was protected.
    #[error("root {0:?} released while not pinned")]
    NotPinned(RootId),
}
