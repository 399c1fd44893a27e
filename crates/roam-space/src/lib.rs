//! State-space abstractions for sampling-based motion planning.
//!
//! This crate defines the [`Manifold`] trait — the topology contract every
//! concrete state space must satisfy — together with the
//! [`StateSampler`] construction contract and [`CompoundManifold`], which
//! composes heterogeneous component topologies into one product space with
//! a single weighted scalar metric.
//!
//! Planners allocate [`State`](roam_core::State)s from a manifold and
//! repeatedly call `distance`/`interpolate`/`enforce_bounds` on them while
//! searching; the manifold instance itself is long-lived and shared.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compound;
pub mod manifold;
pub mod sampler;

#[cfg(test)]
pub(crate) mod compliance;

pub use compound::CompoundManifold;
pub use manifold::Manifold;
pub use sampler::{CompoundStateSampler, StateSampler};
