//! Service provider for resolving registered services.

use std::sync::Arc;

use crate::async_resolver::AsyncResolver;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::Scope;

/// Service provider resolving dependencies from the container.
///
/// Resolves services according to their registered lifetimes and carries the
/// singleton cache. The provider is cheap to clone (`Arc` internally) and
/// fully thread-safe; async factories capture an owned clone as their
/// dependency context.
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
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner { registry }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// Scoped services are cached per scope; singletons remain shared with
    /// the root provider. Ideal for request-scoped dependencies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use defer_di::{ServiceCollection, Resolver};
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct RequestId(String);
    ///
    /// let mut collection = ServiceCollection::new();
    /// let counter = Arc::new(Mutex::new(0));
    /// let counter_clone = counter.clone();
    /// collection.add_scoped_factory::<RequestId, _>(move |_| {
    ///     let mut c = counter_clone.lock().unwrap();
    ///     *c += 1;
    ///     RequestId(format!("req-{}", *c))
    /// });
    ///
    /// let provider = collection.build();
    /// let scope1 = provider.create_scope();
    /// let scope2 = provider.create_scope();
    ///
    /// let a = scope1.get_required::<RequestId>();
    /// let b = scope1.get_required::<RequestId>();
    /// let c = scope2.get_required::<RequestId>();
    /// assert!(Arc::ptr_eq(&a, &b));  // Same scope, same instance
    /// assert!(!Arc::ptr_eq(&a, &c)); // Different scopes, different instances
    /// ```
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Gets a service of type `T`, resolving asynchronously when an
    /// [`AsyncResolver`] for `T` is registered.
    ///
    /// If an async resolver is registered it is resolved and its value
    /// awaited with default flags (regenerate on fault and on cancel, use
    /// the cache); faults and cancellations propagate as `Err`. Otherwise
    /// the call falls back to the ordinary synchronous registration.
    /// `Ok(None)` means neither exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use defer_di::{Lifetime, ServiceCollection, ServiceProvider};
    /// use std::sync::Arc;
    ///
    /// # async fn demo() -> defer_di::DiResult<()> {
    /// let mut services = ServiceCollection::new();
    /// services.try_add_async_resolver::<u64, _>(
    ///     |_: ServiceProvider| async { Ok(Arc::new(7u64)) },
    ///     Lifetime::Singleton,
    /// );
    /// let provider = services.build();
    ///
    /// assert_eq!(provider.get_async::<u64>().await?.map(|v| *v), Some(7));
    /// assert!(provider.get_async::<String>().await?.is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_async<T: Send + Sync + 'static>(&self) -> DiResult<Option<Arc<T>>> {
        lookup_async(self).await
    }

    /// Gets a service of type `T` like [`get_async`](Self::get_async), but a
    /// missing service is an error.
    pub async fn get_required_async<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        require_async(self).await
    }

    /// Singleton resolution through the registration's embedded cache cell.
    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        if let Some(cell) = &reg.single {
            if let Some(value) = cell.get() {
                return Ok(value.clone());
            }
            // Construct without holding any lock; the cell keeps the first
            // stored value if another thread won the race.
            let value = (reg.ctor)(&ResolverContext::root(self))?;
            Ok(cell.get_or_init(|| value.clone()).clone())
        } else {
            (reg.ctor)(&ResolverContext::root(self))
        }
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;
        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Scoped => Err(DiError::WrongLifetime(
                "Cannot resolve scoped service from root provider",
            )),
            Lifetime::Transient => (reg.ctor)(&ResolverContext::root(self)),
        }
    }
}

impl Resolver for ServiceProvider {}

/// The shared lookup path behind `get_async` on providers and scopes:
/// prefer a registered `AsyncResolver<T>`, fall back to the synchronous
/// registration, report absence as `None`.
pub(crate) async fn lookup_async<T, R>(resolver: &R) -> DiResult<Option<Arc<T>>>
where
    T: Send + Sync + 'static,
    R: Resolver,
{
    match resolver.get::<AsyncResolver<T>>() {
        Ok(async_resolver) => async_resolver.get_value().await.map(Some),
        Err(DiError::NotFound(_)) => match resolver.get::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(DiError::NotFound(_)) => Ok(None),
            Err(other) => Err(other),
        },
        Err(other) => Err(other),
    }
}

pub(crate) async fn require_async<T, R>(resolver: &R) -> DiResult<Arc<T>>
where
    T: Send + Sync + 'static,
    R: Resolver,
{
    lookup_async(resolver)
        .await?
        .ok_or(DiError::NotFound(std::any::type_name::<T>()))
}
