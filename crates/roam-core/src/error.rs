//! Error types for the roam motion-planning framework.
//!
//! One enum covers the three contract-violation families: configuration
//! (bounds misuse), lifecycle (state/space pairing), and assembly
//! (compound phase machine). Contract violations are programmer defects:
//! they fail the offending call and are never retried or silently
//! recovered. Numeric degeneracies (NaN or infinite coordinates, all-zero
//! weight vectors) are deliberately *not* errors — they propagate through
//! `distance`/`interpolate` results untouched.

use crate::ManifoldInstanceId;
use std::error::Error;
use std::fmt;

/// Errors from manifold configuration, state lifecycle, or compound assembly.
#[derive(Clone, Debug, PartialEq)]
pub enum ManifoldError {
    // ── Configuration ───────────────────────────────────────────
    /// `set_bounds` called on a topology that reports `requires_bounds() == false`.
    BoundsNotSupported,
    /// Bounds are structurally incompatible with the space (wrong
    /// dimensionality, lower above upper, or non-compound bound states
    /// passed to a compound space).
    BoundsMismatch {
        /// What went wrong.
        reason: String,
    },
    /// A sampler was requested from a bounds-requiring manifold before any
    /// bounds were configured.
    BoundsNotSet,

    // ── Lifecycle ───────────────────────────────────────────────
    /// A state allocated by one manifold instance was passed to another.
    ForeignState {
        /// Instance ID of the manifold performing the operation.
        expected: ManifoldInstanceId,
        /// Instance ID recorded in the offending state.
        found: ManifoldInstanceId,
    },
    /// A state's value representation does not match what the manifold
    /// allocates. Reaching this with a correct origin tag means the state
    /// was constructed by hand rather than through `alloc_state`.
    StateTypeMismatch {
        /// Type name the manifold expected to find in the state.
        expected: &'static str,
    },
    /// A compound state's sub-state count disagrees with the component
    /// list of the manifold operating on it. Like [`StateTypeMismatch`],
    /// this indicates a hand-built state.
    ///
    /// [`StateTypeMismatch`]: Self::StateTypeMismatch
    ComponentCountMismatch {
        /// Number of components in the compound manifold.
        expected: usize,
        /// Number of sub-states found in the state.
        found: usize,
    },

    // ── Assembly ────────────────────────────────────────────────
    /// `add_component` called after the compound space left the assembly
    /// phase (it has already allocated or operated on a state).
    ComponentsLocked,
    /// A non-assembly operation was invoked on a compound space with zero
    /// components (degenerate dimension-0 space).
    EmptyCompound {
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// A component weight was negative or non-finite.
    InvalidWeight {
        /// The offending weight.
        weight: f64,
    },
}

impl fmt::Display for ManifoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundsNotSupported => {
                write!(f, "topology does not support bounds")
            }
            Self::BoundsMismatch { reason } => {
                write!(f, "bounds mismatch: {reason}")
            }
            Self::BoundsNotSet => {
                write!(f, "manifold requires bounds but none are set")
            }
            Self::ForeignState { expected, found } => {
                write!(
                    f,
                    "state belongs to manifold instance {found}, \
                     not instance {expected}"
                )
            }
            Self::StateTypeMismatch { expected } => {
                write!(f, "state representation is not a {expected}")
            }
            Self::ComponentCountMismatch { expected, found } => {
                write!(
                    f,
                    "compound state holds {found} sub-states, expected {expected}"
                )
            }
            Self::ComponentsLocked => {
                write!(f, "compound manifold is active; components are locked")
            }
            Self::EmptyCompound { operation } => {
                write!(f, "{operation} invoked on a compound manifold with no components")
            }
            Self::InvalidWeight { weight } => {
                write!(f, "component weight must be finite and >= 0, got {weight}")
            }
        }
    }
}

impl Error for ManifoldError {}
