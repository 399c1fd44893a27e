//! Core types for the roam motion-planning framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental abstractions shared across the roam workspace: the opaque
//! [`State`] container, manifold instance identifiers, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod id;
mod state;

pub use error::ManifoldError;
pub use id::ManifoldInstanceId;
pub use state::State;

use smallvec::SmallVec;

/// A point in a real vector topology.
///
/// Uses `SmallVec<[f64; 4]>` to avoid heap allocation for components up to
/// 4 dimensions, which covers the common planning decompositions (position,
/// planar pose, 3D position). Higher-dimensional components spill to the
/// heap transparently.
pub type RealCoord = SmallVec<[f64; 4]>;
