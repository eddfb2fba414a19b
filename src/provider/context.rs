//! Resolver context passed to factory functions.

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};

use super::{Scope, ServiceProvider};

/// Context passed to factory functions for resolving dependencies.
///
/// Wraps the resolving provider or scope so factory functions stay
/// independent of which one invoked them.
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
///     // resolver is a ResolverContext with access to other services
///     UserService { db: resolver.get_required::<Database>() }
/// });
/// ```
pub struct ResolverContext<'a> {
    root: &'a ServiceProvider,
    scope: Option<&'a Scope>,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn root(provider: &'a ServiceProvider) -> Self {
        Self {
            root: provider,
            scope: None,
        }
    }

    pub(crate) fn scoped(scope: &'a Scope) -> Self {
        Self {
            root: scope.root_provider(),
            scope: Some(scope),
        }
    }

    /// An owned handle to the root provider.
    ///
    /// Async resolvers capture this as their dependency context; a `'static`
    /// shareable computation cannot borrow the resolving scope.
    pub fn provider(&self) -> ServiceProvider {
        self.root.clone()
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        match self.scope {
            Some(scope) => scope.resolve_any(key),
            None => self.root.resolve_any(key),
        }
    }
}

impl Resolver for ResolverContext<'_> {}
