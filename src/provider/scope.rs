//! Scoped service resolution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};

use super::{lookup_async, require_async, ResolverContext, ServiceProvider};

/// Scoped service container for request-scoped dependency resolution.
///
/// A scope resolves scoped services into its own cache while delegating
/// singletons to the root provider. Transients are created fresh on every
/// resolution, as always.
///
/// An async resolver registered with [`Lifetime::Scoped`] yields one
/// resolver instance, and therefore one memoized value, per scope.
pub struct Scope {
    root: ServiceProvider,
    scoped: Mutex<HashMap<Key, AnyArc>>,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        Self {
            root,
            scoped: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn root_provider(&self) -> &ServiceProvider {
        &self.root
    }

    /// Gets a service of type `T`, resolving asynchronously when an
    /// async resolver for `T` is registered.
    ///
    /// See [`ServiceProvider::get_async`] for the lookup policy; the only
    /// difference is that scoped registrations resolve into this scope's
    /// cache.
    pub async fn get_async<T: Send + Sync + 'static>(&self) -> DiResult<Option<Arc<T>>> {
        lookup_async(self).await
    }

    /// Gets a service of type `T` like [`get_async`](Self::get_async), but a
    /// missing service is an error.
    pub async fn get_required_async<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        require_async(self).await
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .root
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;
        match reg.lifetime {
            Lifetime::Singleton => self.root.resolve_singleton(reg),
            Lifetime::Transient => (reg.ctor)(&ResolverContext::scoped(self)),
            Lifetime::Scoped => {
                {
                    let cache = self.scoped.lock().unwrap();
                    if let Some(value) = cache.get(key) {
                        return Ok(value.clone());
                    }
                } // Lock released: never hold it across a factory invocation.

                let value = (reg.ctor)(&ResolverContext::scoped(self))?;

                // Double-checked insert; a racing thread's instance wins.
                let mut cache = self.scoped.lock().unwrap();
                Ok(cache.entry(key.clone()).or_insert(value).clone())
            }
        }
    }
}

impl Resolver for Scope {}
