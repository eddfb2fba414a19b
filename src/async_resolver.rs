//! The memoizing, retry-aware async value resolver.
//!
//! An [`AsyncResolver`] bridges asynchronous construction into a
//! synchronously-resolved dependency graph: the first request lazily triggers
//! the async factory, the in-flight or settled computation is cached, and
//! caller-supplied flags decide whether a cached failure is served again or
//! transparently regenerated.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::trace;

use crate::async_factories::AsyncFactory;
use crate::deferred::{DeferredCell, DeferredFuture};
use crate::error::DiResult;
use crate::provider::ServiceProvider;

/// Policy flags for [`AsyncResolver::get_value_with`].
///
/// The defaults regenerate settled failures and cancellations and use the
/// cache, matching [`AsyncResolver::get_value`].
///
/// # Examples
///
/// ```rust
/// use defer_di::GetValueOptions;
///
/// // Serve cached faults instead of retrying them:
/// let sticky = GetValueOptions {
///     regenerate_if_faulted: false,
///     ..GetValueOptions::default()
/// };
/// assert!(sticky.regenerate_if_canceled);
/// assert!(!sticky.ignore_cache);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GetValueOptions {
    /// Discard a cached computation that settled in a faulted state and
    /// reattempt the asynchronous resolution.
    pub regenerate_if_faulted: bool,
    /// Discard a cached computation that settled in a canceled state and
    /// reattempt the asynchronous resolution.
    pub regenerate_if_canceled: bool,
    /// Perform a fresh factory invocation without reading or writing the
    /// cache slot. The regenerate flags are irrelevant on this path.
    pub ignore_cache: bool,
}

impl Default for GetValueOptions {
    fn default() -> Self {
        Self {
            regenerate_if_faulted: true,
            regenerate_if_canceled: true,
            ignore_cache: false,
        }
    }
}

/// A memoizing resolver for a value of type `T` produced by an asynchronous
/// factory.
///
/// The resolver owns one cache slot for its entire lifetime. The slot's
/// contents (a lazily-started, shareable computation) may be replaced many
/// times, but the resolver itself is never recreated internally. Concurrent
/// callers requesting the value while a computation is pending all receive
/// the same computation; the factory runs at most once per cache generation.
///
/// Resolver instances are usually created by the container through
/// [`ServiceCollection::try_add_async_resolver`], which selects how instances
/// (and therefore caches) are shared via the registration's
/// [`Lifetime`](crate::Lifetime).
///
/// # Examples
///
/// ```rust
/// use defer_di::{AsyncResolver, ServiceCollection, ServiceProvider};
/// use std::sync::Arc;
///
/// # async fn demo() -> defer_di::DiResult<()> {
/// let provider = ServiceCollection::new().build();
/// let resolver = AsyncResolver::new(provider, |_provider: ServiceProvider| async move {
///     Ok(Arc::new(42usize))
/// });
///
/// let value = resolver.get_value().await?;
/// assert_eq!(*value, 42);
/// # Ok(())
/// # }
/// ```
///
/// [`ServiceCollection::try_add_async_resolver`]: crate::ServiceCollection::try_add_async_resolver
pub struct AsyncResolver<T: Send + Sync + 'static> {
    provider: ServiceProvider,
    factory: Arc<dyn AsyncFactory<T>>,
    cell: DeferredCell<T>,
}

impl<T: Send + Sync + 'static> AsyncResolver<T> {
    /// Creates a resolver binding the factory to its dependency context.
    ///
    /// No factory code runs until the first returned computation is awaited.
    pub fn new(provider: ServiceProvider, factory: impl AsyncFactory<T> + 'static) -> Self {
        Self::from_shared(provider, Arc::new(factory))
    }

    pub(crate) fn from_shared(provider: ServiceProvider, factory: Arc<dyn AsyncFactory<T>>) -> Self {
        Self {
            provider,
            factory,
            cell: DeferredCell::new(),
        }
    }

    /// Gets the asynchronous value with the default policy: regenerate
    /// settled faults and cancellations, use the cache.
    pub fn get_value(&self) -> Resolution<T> {
        self.get_value_with(GetValueOptions::default())
    }

    /// Gets the asynchronous value under the given policy flags.
    ///
    /// The decision is evaluated synchronously, before any awaiting:
    ///
    /// 1. With `ignore_cache`, the factory is invoked fresh and the cache
    ///    slot is neither consulted nor mutated.
    /// 2. Otherwise the cached computation is used (created lazily if
    ///    absent). A computation that *already settled* in an error state is
    ///    first replaced when the matching regenerate flag is set; a
    ///    still-pending computation is never preempted, even if it will
    ///    eventually fault.
    ///
    /// Faults and cancellations are never suppressed or retried internally;
    /// they propagate unchanged to the awaiting caller, and
    /// retry-by-regeneration only happens on a later explicit call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use defer_di::{AsyncResolver, GetValueOptions, ServiceCollection, ServiceProvider};
    /// use std::sync::Arc;
    ///
    /// # async fn demo() -> defer_di::DiResult<()> {
    /// let provider = ServiceCollection::new().build();
    /// let resolver =
    ///     AsyncResolver::new(provider, |_: ServiceProvider| async { Ok(Arc::new(1u32)) });
    ///
    /// // Bypass the cache for a one-off fresh value:
    /// let fresh = resolver
    ///     .get_value_with(GetValueOptions {
    ///         ignore_cache: true,
    ///         ..GetValueOptions::default()
    ///     })
    ///     .await?;
    /// assert_eq!(*fresh, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_value_with(&self, options: GetValueOptions) -> Resolution<T> {
        if options.ignore_cache {
            trace!(value = %std::any::type_name::<T>(), "bypassing cache for fresh resolution");
            return Resolution {
                inner: ResolutionKind::Fresh(self.invoke()),
            };
        }

        let deferred = self.cell.get_or_regenerate(
            || self.deferred(),
            |outcome| {
                if outcome.is_canceled() {
                    options.regenerate_if_canceled
                } else {
                    options.regenerate_if_faulted
                }
            },
        );
        Resolution {
            inner: ResolutionKind::Cached(deferred),
        }
    }

    /// One not-yet-running factory invocation. The factory is only entered
    /// when the returned future is first polled.
    fn invoke(&self) -> BoxFuture<'static, DiResult<Arc<T>>> {
        let factory = Arc::clone(&self.factory);
        let provider = self.provider.clone();
        async move { factory.create(provider).await }.boxed()
    }

    fn deferred(&self) -> DeferredFuture<T> {
        self.invoke().shared()
    }
}

/// The outcome of a [`AsyncResolver::get_value`] call: a future yielding the
/// resolved value or the computation's settled error.
///
/// Either a handle to the shared cached computation or a one-shot bypass
/// invocation. Awaiting it is the caller's business; dropping it without
/// awaiting leaves a cached computation pending for the next caller.
pub struct Resolution<T: Send + Sync + 'static> {
    inner: ResolutionKind<T>,
}

enum ResolutionKind<T: Send + Sync + 'static> {
    Cached(DeferredFuture<T>),
    Fresh(BoxFuture<'static, DiResult<Arc<T>>>),
}

impl<T: Send + Sync + 'static> Future for Resolution<T> {
    type Output = DiResult<Arc<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Both variants are Unpin, so no projection is needed.
        match &mut self.get_mut().inner {
            ResolutionKind::Cached(shared) => Pin::new(shared).poll(cx),
            ResolutionKind::Fresh(fut) => fut.as_mut().poll(cx),
        }
    }
}
