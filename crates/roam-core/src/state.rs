//! The opaque [`State`] container.

use crate::{ManifoldError, ManifoldInstanceId};
use std::any::Any;
use std::fmt;

/// A single point in a topology.
///
/// The concrete value layout is owned by the manifold that allocated the
/// state; consumers treat it as opaque and route every operation through
/// that manifold. Each state carries the [`ManifoldInstanceId`] of its
/// originating space, and the typed accessors reject states that belong to
/// a different instance — using a state with the wrong space is a lifecycle
/// violation, not undefined behavior.
///
/// # Lifecycle
///
/// States are created by `Manifold::alloc_state` and released by
/// `Manifold::free_state`, which takes the state by value. Double free is
/// therefore unrepresentable: once freed (or dropped), the state is gone.
///
/// # Thread safety
///
/// The payload is `Send + Sync` so that `&State` can be shared across
/// threads for read-only operations (`distance`, `satisfies_bounds`).
/// Mutating the *same* state from multiple threads must be serialized by
/// the caller; `&mut State` in the mutating signatures enforces this for
/// safe code.
pub struct State {
    origin: ManifoldInstanceId,
    value: Box<dyn Any + Send + Sync>,
}

impl State {
    /// Wrap a concrete representation, tagging it with the allocating
    /// manifold's instance ID.
    ///
    /// Intended for `Manifold::alloc_state` implementations; states built
    /// with a mismatched tag will be rejected by every operation on the
    /// real manifold.
    pub fn new<T: Any + Send + Sync>(origin: ManifoldInstanceId, value: T) -> Self {
        Self {
            origin,
            value: Box::new(value),
        }
    }

    /// Instance ID of the manifold that allocated this state.
    pub fn origin(&self) -> ManifoldInstanceId {
        self.origin
    }

    /// Check that this state was allocated by the manifold with the given
    /// instance ID.
    ///
    /// Returns `Err(ManifoldError::ForeignState)` otherwise.
    pub fn ensure_origin(&self, expected: ManifoldInstanceId) -> Result<(), ManifoldError> {
        if self.origin == expected {
            Ok(())
        } else {
            Err(ManifoldError::ForeignState {
                expected,
                found: self.origin,
            })
        }
    }

    /// Borrow the concrete representation, checking origin and type.
    pub fn value<T: Any>(&self, expected: ManifoldInstanceId) -> Result<&T, ManifoldError> {
        self.ensure_origin(expected)?;
        self.value
            .downcast_ref::<T>()
            .ok_or(ManifoldError::StateTypeMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    /// Mutably borrow the concrete representation, checking origin and type.
    pub fn value_mut<T: Any>(
        &mut self,
        expected: ManifoldInstanceId,
    ) -> Result<&mut T, ManifoldError> {
        self.ensure_origin(expected)?;
        self.value
            .downcast_mut::<T>()
            .ok_or(ManifoldError::StateTypeMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    /// Consume the state and recover the concrete representation, checking
    /// origin and type.
    ///
    /// Used by `free_state` implementations that need to release nested
    /// resources (e.g., a compound freeing its sub-states in order).
    pub fn into_value<T: Any>(self, expected: ManifoldInstanceId) -> Result<T, ManifoldError> {
        self.ensure_origin(expected)?;
        match self.value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => Err(ManifoldError::StateTypeMismatch {
                expected: std::any::type_name::<T>(),
            }),
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
