//! The core `Manifold` trait and `dyn Manifold` downcast support.

use crate::sampler::StateSampler;
use roam_core::{ManifoldError, ManifoldInstanceId, State};
use std::any::Any;
use std::fmt;

/// Central topology abstraction for roam planning problems.
///
/// A `Manifold` describes one configuration space: its dimension, bounds,
/// metric, equality, canonical interpolation rule, and the lifecycle of the
/// [`State`]s that live in it. Planners, samplers, and nearest-neighbor
/// structures all consume this contract uniformly — a curved topology
/// (wrap-around angle, rotation group) implements `interpolate` with its
/// own shortest-path rule and the rest of the system never needs to know.
///
/// # Object safety
///
/// This trait is designed for use as `dyn Manifold`. Use
/// `downcast_ref` for opt-in specialization on concrete topologies.
///
/// # State lifecycle
///
/// Every state returned by [`alloc_state`](Self::alloc_state) is tagged
/// with this manifold's [`instance_id`](Self::instance_id). Operations
/// must reject states carrying a different tag with
/// [`ManifoldError::ForeignState`]: a state is valid only for the instance
/// that allocated it. [`free_state`](Self::free_state) consumes the state,
/// so a double free cannot be expressed.
///
/// # Thread safety
///
/// `Send + Sync` are required so a shared manifold can serve concurrent
/// read-only calls (`dimension`, `distance`, `satisfies_bounds`) from many
/// planner threads. Implementations must not self-mutate during `&self`
/// operations. Configuration is confined to `&mut self` methods
/// ([`set_bounds`](Self::set_bounds), [`clear_bounds`](Self::clear_bounds)),
/// which makes concurrent reconfiguration unrepresentable in safe code.
pub trait Manifold: Any + Send + Sync + 'static {
    /// Unique identifier for this manifold instance.
    ///
    /// Allocated from a monotonic counter at construction time and used to
    /// tag every state this manifold allocates.
    fn instance_id(&self) -> ManifoldInstanceId;

    /// Dimension of the space.
    ///
    /// Fixed for the lifetime of the instance, except across explicit
    /// reconfiguration.
    fn dimension(&self) -> usize;

    /// Bring `state` within the configured bounds, in place.
    ///
    /// Moves the state to the nearest point satisfying the bounds; a state
    /// already within bounds is untouched. Must be idempotent.
    fn enforce_bounds(&self, state: &mut State) -> Result<(), ManifoldError>;

    /// Check whether `state` lies within the configured bounds.
    ///
    /// Pure predicate; never mutates.
    fn satisfies_bounds(&self, state: &State) -> Result<bool, ManifoldError>;

    /// Deep-copy the value representation of `src` into the
    /// already-allocated `dst`.
    ///
    /// Never allocates a new state.
    fn copy_state(&self, dst: &mut State, src: &State) -> Result<(), ManifoldError>;

    /// Distance between two states under this topology's metric.
    ///
    /// Non-negative, with `distance(x, x) == 0`, and finite for any pair of
    /// well-formed states. Deterministic across repeated calls with
    /// identical inputs — external nearest-neighbor structures rely on
    /// this. Caller-supplied non-finite coordinates propagate NaN/inf
    /// through the result rather than being sanitized.
    fn distance(&self, a: &State, b: &State) -> Result<f64, ManifoldError>;

    /// Exact representation equality.
    ///
    /// Stricter than `distance(a, b) == 0` in spaces with degenerate
    /// metrics; used for exact-match termination checks.
    fn equal_states(&self, a: &State, b: &State) -> Result<bool, ManifoldError>;

    /// Write into `out` the point at parameter `t` along this topology's
    /// canonical path from `from` to `to`.
    ///
    /// `t == 0` yields a copy of `from` and `t == 1` a copy of `to`.
    /// Curved topologies follow their own shortest-path rule, not a linear
    /// blend of raw coordinates. `t` outside `[0, 1]` extrapolates; it is
    /// never clamped.
    fn interpolate(
        &self,
        from: &State,
        to: &State,
        t: f64,
        out: &mut State,
    ) -> Result<(), ManifoldError>;

    /// Allocate a new sampler bound to this space.
    fn alloc_sampler(&self) -> Result<Box<dyn StateSampler>, ManifoldError>;

    /// Allocate a state that can store one point of this space.
    fn alloc_state(&self) -> Result<State, ManifoldError>;

    /// Release a state allocated by this manifold.
    ///
    /// Consumes the state; the default implementation validates the origin
    /// tag and drops the value. Implementations with nested resources
    /// (compound spaces) override this to release sub-states in order.
    fn free_state(&self, state: State) -> Result<(), ManifoldError> {
        state.ensure_origin(self.instance_id())
    }

    /// Configure the admissible region of the space.
    ///
    /// `lower` and `upper` use the same state representation as the space
    /// itself. Callable multiple times; previously held bound
    /// representations are replaced. Topologies reporting
    /// [`requires_bounds`](Self::requires_bounds)` == false` reject this
    /// with [`ManifoldError::BoundsNotSupported`].
    fn set_bounds(&mut self, lower: &State, upper: &State) -> Result<(), ManifoldError>;

    /// Drop any configured bounds. Always succeeds.
    fn clear_bounds(&mut self);

    /// Whether this topology kind needs bounds to be sampled and validated.
    ///
    /// Static per topology kind: a bounded 3D box reports `true`, an
    /// unbounded rotation representation reports `false`.
    fn requires_bounds(&self) -> bool;

    /// Dimension of the optional low-dimensional embedding used by
    /// external indexing structures. Defaults to 0 (no projection).
    fn projection_dimension(&self) -> usize {
        0
    }

    /// Append the projection of `state` to `out`.
    ///
    /// The default implementation validates the origin tag and appends
    /// nothing, matching the default projection dimension of 0.
    fn project(&self, state: &State, out: &mut Vec<f64>) -> Result<(), ManifoldError> {
        let _ = out;
        state.ensure_origin(self.instance_id())
    }

    /// Write a human-readable rendering of `state` to `out`.
    ///
    /// Purely diagnostic; the default writes nothing. No correctness
    /// contract beyond not corrupting state.
    fn fmt_state(&self, state: &State, out: &mut dyn fmt::Write) -> fmt::Result {
        let _ = (state, out);
        Ok(())
    }

    /// Write a human-readable description of this space's settings to `out`.
    ///
    /// Purely diagnostic; the default writes nothing.
    fn fmt_settings(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let _ = out;
        Ok(())
    }
}

impl dyn Manifold {
    /// Attempt to downcast a trait object to a concrete manifold type.
    ///
    /// Code holding `&dyn Manifold` can check for a known topology and use
    /// type-specific fast paths.
    pub fn downcast_ref<T: Manifold>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}
