//! The deferred cache cell backing async resolvers.
//!
//! A cell owns at most one pending-or-completed asynchronous computation at a
//! time, exposes it for reuse, and supports atomic replacement. Computations
//! are lazily-started shared futures: constructing and storing one runs no
//! factory code, and every clone handed out observes the same in-flight or
//! settled outcome. The factory body executes at most once per cache
//! generation, no matter how many callers await it (single-flight).

use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, Shared};
use tracing::trace;

use crate::error::{DiError, DiResult};

/// A lazily-started, shareable asynchronous computation producing an
/// `Arc<T>` or a settled error.
///
/// Nothing runs until the first poll; all clones observe the same outcome.
pub type DeferredFuture<T> = Shared<BoxFuture<'static, DiResult<Arc<T>>>>;

/// Holds at most one deferred computation, created on demand and replaceable
/// as a whole.
///
/// All operations are synchronous and complete in O(1) without yielding: the
/// check-and-store step happens under a single lock acquisition, which is
/// what makes the single-flight guarantee hold: there is no window in which
/// two callers can race to install two different computations for the same
/// generation. Awaiting the outcome is the caller's responsibility once they
/// hold a computation handle.
pub struct DeferredCell<T: Send + Sync + 'static> {
    slot: Mutex<Option<DeferredFuture<T>>>,
}

impl<T: Send + Sync + 'static> DeferredCell<T> {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the current computation, constructing and storing one via
    /// `make` if the cell is empty.
    ///
    /// Construction does not run the computation; only the first poll of the
    /// returned handle triggers the underlying factory.
    pub fn get_or_create<F>(&self, make: F) -> DeferredFuture<T>
    where
        F: FnOnce() -> DeferredFuture<T>,
    {
        self.get_or_regenerate(make, |_| false)
    }

    /// Atomically discards the current computation and installs a brand-new,
    /// not-yet-started one.
    ///
    /// Callers already awaiting the prior computation keep observing its own
    /// outcome; the replacement is seen by all subsequent readers.
    pub fn replace<F>(&self, make: F) -> DeferredFuture<T>
    where
        F: FnOnce() -> DeferredFuture<T>,
    {
        let fresh = make();
        let mut slot = self.slot.lock().unwrap();
        trace!(value = %std::any::type_name::<T>(), "replacing deferred computation");
        *slot = Some(fresh.clone());
        fresh
    }

    /// The atomic check-and-store step of the regeneration decision.
    ///
    /// Returns the current computation (creating it if absent). Only when
    /// the computation has already settled in an error state and
    /// `regenerate` accepts that error, the cell is replaced first and the
    /// fresh computation is returned instead. A still-pending computation is
    /// never preempted or discarded, and a settled success is always reused.
    ///
    /// The whole sequence runs under one lock acquisition, so two racing
    /// callers cannot both trigger a replacement for the same observed
    /// generation: whichever settled-check happens first decides, and the
    /// other caller receives the generation it installed.
    pub fn get_or_regenerate<F, P>(&self, make: F, regenerate: P) -> DeferredFuture<T>
    where
        F: FnOnce() -> DeferredFuture<T>,
        P: FnOnce(&DiError) -> bool,
    {
        let mut slot = self.slot.lock().unwrap();
        let needs_fresh = match slot.as_ref() {
            None => true,
            Some(current) => match current.peek() {
                Some(Err(err)) => {
                    let discard = regenerate(err);
                    if discard {
                        trace!(
                            value = %std::any::type_name::<T>(),
                            canceled = err.is_canceled(),
                            "discarding settled computation for regeneration"
                        );
                    }
                    discard
                }
                _ => false,
            },
        };

        if needs_fresh {
            let fresh = make();
            *slot = Some(fresh.clone());
            fresh
        } else {
            slot.as_ref().expect("cell holds a computation").clone()
        }
    }
}

impl<T: Send + Sync + 'static> Default for DeferredCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
