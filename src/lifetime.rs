//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior.
///
/// Defines how service instances are created, cached, and shared within the
/// dependency injection container. For async resolvers the lifetime governs
/// how the *resolver instance* (and therefore its cache slot) is shared: a
/// singleton resolver memoizes one value for the whole application, a scoped
/// resolver memoizes per scope, and a transient resolver is rebuilt on every
/// lookup, so its cache never outlives a single resolution.
///
/// # Examples
///
/// ```rust
/// use defer_di::{ServiceCollection, Resolver, Lifetime};
///
/// struct Config { port: u16 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { port: 8080 });
///
/// let provider = services.build();
/// let a = provider.get_required::<Config>();
/// let b = provider.get_required::<Config>();
/// assert!(std::ptr::eq(&*a, &*b)); // Same instance
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime.
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}
