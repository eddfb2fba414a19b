//! Async factory support for dependency injection.
//!
//! This module provides the factory abstraction for services that require
//! asynchronous initialization such as database connections, network
//! handshakes, or configuration fetched from a remote source.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DiResult;
use crate::provider::ServiceProvider;

/// Trait for factories that create service values asynchronously.
///
/// The factory receives an owned handle to the service provider so it can
/// resolve the dependencies it needs during initialization. It is invoked
/// lazily: registering a factory (or constructing a resolver around it) runs
/// no factory code, and a resolver invokes it at most once per cache
/// generation.
///
/// A blanket implementation covers plain closures, so most callers never
/// implement this trait by hand:
///
/// ```rust
/// use defer_di::{Lifetime, ServiceCollection, ServiceProvider};
/// use std::sync::Arc;
///
/// struct ApiClient { base_url: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton("https://api.example.com".to_string());
/// services.try_add_async_resolver::<ApiClient, _>(
///     |provider: ServiceProvider| async move {
///         use defer_di::Resolver;
///         let base_url = provider.get::<String>()?;
///         Ok(Arc::new(ApiClient { base_url: (*base_url).clone() }))
///     },
///     Lifetime::Singleton,
/// );
/// ```
#[async_trait]
pub trait AsyncFactory<T: Send + Sync + 'static>: Send + Sync {
    /// Creates a new value of the service asynchronously.
    ///
    /// Completing with `Err` marks the computation as faulted, or canceled
    /// when the error is a cancellation signal. The resolver never inspects
    /// the error beyond that classification; it propagates unchanged to the
    /// awaiting caller.
    async fn create(&self, provider: ServiceProvider) -> DiResult<Arc<T>>;
}

#[async_trait]
impl<T, F, Fut> AsyncFactory<T> for F
where
    T: Send + Sync + 'static,
    F: Fn(ServiceProvider) -> Fut + Send + Sync,
    Fut: Future<Output = DiResult<Arc<T>>> + Send,
{
    async fn create(&self, provider: ServiceProvider) -> DiResult<Arc<T>> {
        self(provider).await
    }
}
