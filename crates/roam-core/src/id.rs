//! Strongly-typed manifold instance identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ManifoldInstanceId`] allocation.
static MANIFOLD_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a `Manifold` object.
///
/// Allocated from a monotonic atomic counter via [`ManifoldInstanceId::next`].
/// Two distinct manifold instances always have different IDs, even if they
/// describe identical topologies. Every [`State`](crate::State) carries the
/// ID of the manifold that allocated it, so operations can reject states
/// that belong to a different space instead of silently misinterpreting
/// their representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManifoldInstanceId(u64);

impl ManifoldInstanceId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(MANIFOLD_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ManifoldInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
