//! Cancellation signals for asynchronous factories.
//!
//! The resolver never cancels an in-flight factory invocation itself;
//! cancellation originates inside the factory (or its underlying operation)
//! and is merely *observed* as a terminal state of the computation. The token
//! here gives factories a way to produce such outcomes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token that can be used to signal cancellation to async factories.
///
/// # Examples
///
/// ```rust
/// use defer_di::{CancellationToken, DiError};
///
/// let token = CancellationToken::new();
/// assert!(token.err_if_cancelled().is_ok());
///
/// token.cancel();
/// let err = token.err_if_cancelled().unwrap_err();
/// assert!(DiError::Canceled(err).is_canceled());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new, un-cancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancels the token, signaling that associated operations should stop.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Returns a cancellation error if the token is cancelled.
    pub fn err_if_cancelled(&self) -> Result<(), CancellationError> {
        if self.is_cancelled() {
            Err(CancellationError::new("Operation was cancelled"))
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Error produced when an operation completes in a canceled state.
#[derive(Debug, Clone)]
pub struct CancellationError {
    message: String,
}

impl CancellationError {
    /// Creates a cancellation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The cancellation message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CancellationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CancellationError {}
