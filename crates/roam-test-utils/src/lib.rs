//! Test fixtures and reference geometries for roam development.
//!
//! Provides two concrete [`Manifold`](roam_space::Manifold)
//! implementations — [`RealVectorManifold`] (n-dimensional Euclidean box)
//! and [`So2Manifold`] (planar rotation with wrap-around) — used by
//! workspace integration tests and benchmarks. The core contract crates
//! deliberately ship no geometry; these exist so that tests can exercise
//! the contract against analytically known metrics.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{RealVectorManifold, So2Manifold};
