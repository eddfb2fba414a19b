//! # defer-di
//!
//! Memoizing, retry-aware asynchronous value resolution for dependency
//! injection, inspired by Microsoft.Extensions.DependencyInjection's async
//! resolver pattern.
//!
//! Some services cannot be constructed synchronously (a configuration
//! object fetched from a network source during startup, a client that needs
//! an async handshake), yet the surrounding dependency graph is resolved
//! synchronously. An [`AsyncResolver`] bridges that gap: it lazily triggers
//! an asynchronous factory on first request, caches the in-flight or settled
//! computation, and, depending on caller-supplied flags, either serves the
//! cached outcome (including cached failures) or transparently regenerates
//! it.
//!
//! ## Features
//!
//! - **Lazy single-flight resolution**: the factory runs at most once per
//!   cache generation, no matter how many callers await concurrently
//! - **Retry by regeneration**: settled faults and cancellations can be
//!   discarded and reattempted on the next call, under caller control
//! - **Cache bypass**: one-off fresh resolutions that never touch the cache
//! - **Container integration**: add-if-absent registration under the usual
//!   Singleton/Scoped/Transient lifetimes, with async lookup accessors that
//!   fall back to synchronous registrations
//! - **Runtime-agnostic**: no executor dependency; laziness and sharing come
//!   from the future itself
//!
//! ## Quick Start
//!
//! ```rust
//! use defer_di::{Lifetime, ServiceCollection, ServiceProvider};
//! use std::sync::Arc;
//!
//! struct RemoteConfig {
//!     endpoint: String,
//! }
//!
//! # async fn demo() -> defer_di::DiResult<()> {
//! let mut services = ServiceCollection::new();
//! services.try_add_async_resolver::<RemoteConfig, _>(
//!     |_provider: ServiceProvider| async move {
//!         // e.g. fetched from a configuration service at startup
//!         Ok(Arc::new(RemoteConfig {
//!             endpoint: "https://config.internal".to_string(),
//!         }))
//!     },
//!     Lifetime::Singleton,
//! );
//!
//! let provider = services.build();
//!
//! // First call triggers the factory; later calls share the cached value.
//! let config = provider.get_required_async::<RemoteConfig>().await?;
//! assert_eq!(config.endpoint, "https://config.internal");
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure caching
//!
//! A cached computation that settled in a faulted or canceled state is, by
//! default, discarded and reattempted on the next call, so an intermittently
//! failing factory keeps getting fresh attempts until one succeeds, and the
//! success is then cached indefinitely. Set the corresponding
//! [`GetValueOptions`] flag to `false` to serve the cached failure instead
//! ("sticky" failures), or set `ignore_cache` for a fresh invocation that
//! leaves the cache untouched.
//!
//! Faults and cancellations are never suppressed, logged, or wrapped by the
//! resolver; they propagate unchanged to the awaiting caller.

// Module declarations
pub mod async_factories;
pub mod async_resolver;
pub mod cancellation;
pub mod collection;
pub mod deferred;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod traits;

// Internal modules
mod registration;

// Re-export core types
pub use async_factories::AsyncFactory;
pub use async_resolver::{AsyncResolver, GetValueOptions, Resolution};
pub use cancellation::{CancellationError, CancellationToken};
pub use collection::ServiceCollection;
pub use deferred::{DeferredCell, DeferredFuture};
pub use error::{DiError, DiResult};
pub use key::Key;
pub use lifetime::Lifetime;
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use traits::{Resolver, ResolverCore};
