//! Service registration types.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

// Type-erased constructor invoked at resolution time
pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and constructor.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Singleton cache, lock-free after initialization. `None` for other lifetimes.
    pub(crate) single: Option<OnceCell<AnyArc>>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let single = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };
        Self {
            lifetime,
            ctor,
            single,
        }
    }
}

/// Service registry holding all registrations.
pub(crate) struct Registry {
    entries: HashMap<Key, Registration>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts a registration, replacing any existing one for the same key.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        self.entries.insert(key, registration);
    }

    /// Inserts a registration only if the key is not already registered.
    ///
    /// Returns whether the registration was added. An existing registration
    /// is never overwritten.
    pub(crate) fn try_insert(&mut self, key: Key, registration: Registration) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(registration);
                true
            }
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
