//! Benchmark profiles and utilities for the roam planning framework.
//!
//! Provides pre-built compound spaces for benchmarking:
//!
//! - [`pose_space`]: R²(weight 1) × SO(2)(weight 0.5) planar pose space
//! - [`sample_states`]: deterministic pre-sampling of benchmark inputs

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use roam_core::State;
use roam_space::{CompoundManifold, Manifold, StateSampler};
use roam_test_utils::{RealVectorManifold, So2Manifold};

/// Build an R²(weight 1) × SO(2)(weight 0.5) planar pose space.
///
/// The translation component is bounded to `[-10, 10]²`; the heading
/// component wraps. This is the smallest compound space that exercises
/// both a bounded Euclidean metric and a wrap-around one.
pub fn pose_space() -> CompoundManifold {
    let mut space = CompoundManifold::new();
    space
        .add_component(Box::new(RealVectorManifold::bounded(2, -10.0, 10.0)), 1.0)
        .expect("assembly-phase add");
    space
        .add_component(Box::new(So2Manifold::new()), 0.5)
        .expect("assembly-phase add");
    space
}

/// Pre-sample `n` states from `space` with its deterministic sampler.
pub fn sample_states(space: &CompoundManifold, n: usize) -> Vec<State> {
    let mut sampler = space.alloc_sampler().expect("sampler for bounded space");
    (0..n)
        .map(|_| {
            let mut s = space.alloc_state().expect("alloc benchmark state");
            sampler.sample(&mut s).expect("sample benchmark state");
            s
        })
        .collect()
}
