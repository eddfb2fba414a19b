//! Error types for the dependency injection container.

use std::fmt;
use std::sync::Arc;

use crate::cancellation::CancellationError;

/// Dependency injection errors.
///
/// Covers both container-level failures (service not registered, downcast
/// failed, invalid lifetime) and the terminal error states of a deferred
/// asynchronous computation (faulted, canceled).
///
/// The error is `Clone` so that a settled outcome can be observed by every
/// caller sharing the same cached computation.
///
/// # Examples
///
/// ```rust
/// use defer_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Service not registered
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Invalid lifetime resolution (e.g., scoped from root)
    WrongLifetime(&'static str),
    /// An asynchronous factory completed with an application-level error
    Faulted(Arc<dyn std::error::Error + Send + Sync>),
    /// An asynchronous factory completed in a canceled state
    Canceled(CancellationError),
}

impl DiError {
    /// Wraps an arbitrary application error as a factory fault.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use defer_di::DiError;
    ///
    /// let err = DiError::fault("connection refused");
    /// assert!(!err.is_canceled());
    /// assert_eq!(err.to_string(), "Async resolution faulted: connection refused");
    /// ```
    pub fn fault(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        DiError::Faulted(Arc::from(err.into()))
    }

    /// Returns true if this error is a cancellation signal.
    pub fn is_canceled(&self) -> bool {
        matches!(self, DiError::Canceled(_))
    }

    /// Returns true if this error counts as a fault for cache regeneration.
    ///
    /// Any settled error outcome other than a cancellation is treated as a
    /// fault, including container errors raised while the factory resolved
    /// its own dependencies.
    pub fn is_faulted(&self) -> bool {
        !self.is_canceled()
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
            DiError::Faulted(err) => write!(f, "Async resolution faulted: {}", err),
            DiError::Canceled(err) => write!(f, "Async resolution canceled: {}", err),
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Faulted(err) => Some(&**err),
            DiError::Canceled(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for DI operations.
pub type DiResult<T> = Result<T, DiError>;
