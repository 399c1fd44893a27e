//! Roam: state-space abstractions for sampling-based motion planning.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the roam sub-crates. For most users, adding `roam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! Assemble a product space from a Euclidean component and a rotation
//! component, then operate on it through the uniform [`space::Manifold`]
//! contract:
//!
//! ```rust
//! use roam::prelude::*;
//! use roam_test_utils::{RealVectorManifold, So2Manifold};
//!
//! let mut space = CompoundManifold::new();
//! space
//!     .add_component(Box::new(RealVectorManifold::bounded(2, -1.0, 1.0)), 1.0)
//!     .unwrap();
//! space
//!     .add_component(Box::new(So2Manifold::new()), 0.5)
//!     .unwrap();
//! assert_eq!(space.dimension(), 3);
//!
//! let a = space.alloc_state().unwrap();
//! let b = space.alloc_state().unwrap();
//! assert_eq!(space.distance(&a, &b).unwrap(), 0.0);
//! space.free_state(a).unwrap();
//! space.free_state(b).unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `roam-core` | Opaque `State`, instance IDs, error types |
//! | [`space`] | `roam-space` | `Manifold` contract, compound spaces, sampler contract |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`roam-core`).
///
/// Contains the opaque [`types::State`] container, the
/// [`types::ManifoldInstanceId`] tag that binds states to their
/// originating space, and [`types::ManifoldError`].
pub use roam_core as types;

/// State-space contract and compound spaces (`roam-space`).
///
/// Provides the [`space::Manifold`] trait, the
/// [`space::CompoundManifold`] product space, and the
/// [`space::StateSampler`] construction contract.
pub use roam_space as space;

/// Common imports for typical roam usage.
///
/// ```rust
/// use roam::prelude::*;
/// ```
pub mod prelude {
    pub use roam_core::{ManifoldError, ManifoldInstanceId, RealCoord, State};
    pub use roam_space::{CompoundManifold, CompoundStateSampler, Manifold, StateSampler};
}
