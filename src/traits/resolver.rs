//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;

/// Core resolver trait for object-safe service resolution.
///
/// This is the low-level resolution mechanism shared by the root provider,
/// scopes, and the context handed to factories. Most users should use the
/// [`Resolver`] trait instead, which provides type-safe generic methods on
/// top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service, type-erased.
    ///
    /// Returns the service wrapped in an `Arc<dyn Any>` for thread-safe
    /// sharing, or the resolution error (not found, wrong lifetime, etc.).
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>>;
}

/// High-level resolver interface with generic methods for type-safe
/// service resolution.
///
/// Implemented by `ServiceProvider`, `Scope`, and `ResolverContext`, making
/// them interchangeable for service resolution within their respective
/// contexts.
///
/// # Examples
///
/// ```rust
/// use defer_di::{ServiceCollection, Resolver};
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
///
/// let provider = collection.build();
/// let number = provider.get_required::<usize>();
/// assert_eq!(*number, 42);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use defer_di::{ServiceCollection, Resolver};
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_singleton("configuration".to_string());
    ///
    /// let provider = collection.build();
    /// let config = provider.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&Key::of::<T>())?;
        any.downcast::<T>()
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    ///
    /// Use this when you're certain the service is registered and want to
    /// fail fast on configuration errors.
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be resolved.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_else(|e| {
            panic!(
                "Failed to resolve {}: {:?}",
                std::any::type_name::<T>(),
                e
            )
        })
    }
}
