//! Service collection for registering services and building providers.

use std::sync::Arc;

use tracing::debug;

use crate::async_factories::AsyncFactory;
use crate::async_resolver::AsyncResolver;
use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{AnyArc, Registration, Registry};

/// Collects service registrations and builds a [`ServiceProvider`].
///
/// # Examples
///
/// ```rust
/// use defer_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = services.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceCollection {
    registry: Registry,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Registers a singleton instance shared across the entire application.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            Key::of::<T>(),
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Registers a singleton factory; the instance is created on first
    /// request, then cached and shared.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory creating one instance per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory creating a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry
            .insert(Key::of::<T>(), Registration::new(lifetime, Arc::new(ctor)));
        self
    }

    /// Registers an [`AsyncResolver`] for `T` if one has not been registered.
    ///
    /// The resolver is stored under the `AsyncResolver<T>` key with
    /// add-if-absent semantics: an existing registration for that key is
    /// never overwritten. The chosen lifetime controls how resolver
    /// instances (and therefore their memoized values) are shared: one per
    /// application (`Singleton`), one per scope (`Scoped`), or one per
    /// lookup (`Transient`, which makes the cache effectively useless across
    /// calls).
    ///
    /// This registration does not make `T` itself resolvable synchronously.
    /// Request the value either by resolving `AsyncResolver<T>` directly or
    /// through [`ServiceProvider::get_async`] /
    /// [`ServiceProvider::get_required_async`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use defer_di::{Lifetime, ServiceCollection, ServiceProvider};
    /// use std::sync::Arc;
    ///
    /// struct RemoteConfig { endpoint: String }
    ///
    /// # async fn demo() -> defer_di::DiResult<()> {
    /// let mut services = ServiceCollection::new();
    /// services.try_add_async_resolver::<RemoteConfig, _>(
    ///     |_provider: ServiceProvider| async move {
    ///         // e.g. fetched from a network source during startup
    ///         Ok(Arc::new(RemoteConfig { endpoint: "https://config.internal".into() }))
    ///     },
    ///     Lifetime::Singleton,
    /// );
    ///
    /// let provider = services.build();
    /// let config = provider.get_required_async::<RemoteConfig>().await?;
    /// assert_eq!(config.endpoint, "https://config.internal");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`ServiceProvider::get_async`]: crate::ServiceProvider::get_async
    /// [`ServiceProvider::get_required_async`]: crate::ServiceProvider::get_required_async
    pub fn try_add_async_resolver<T, F>(&mut self, factory: F, lifetime: Lifetime) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: AsyncFactory<T> + 'static,
    {
        let factory: Arc<dyn AsyncFactory<T>> = Arc::new(factory);
        let ctor = move |r: &ResolverContext<'_>| -> DiResult<AnyArc> {
            Ok(Arc::new(AsyncResolver::from_shared(
                r.provider(),
                Arc::clone(&factory),
            )))
        };
        let added = self.registry.try_insert(
            Key::of::<AsyncResolver<T>>(),
            Registration::new(lifetime, Arc::new(ctor)),
        );
        if added {
            debug!(
                service = %std::any::type_name::<T>(),
                ?lifetime,
                "registered async resolver"
            );
        }
        self
    }

    /// Builds the service provider from the registered services.
    pub fn build(self) -> ServiceProvider {
        debug!(registrations = self.registry.len(), "building service provider");
        ServiceProvider::new(self.registry)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
