//! Integration scenarios: a compound space assembled from a Euclidean
//! component and a rotation component, checked against analytic metrics.

use roam::prelude::*;
use roam_test_utils::{RealVectorManifold, So2Manifold};
use std::f64::consts::{PI, TAU};

/// R²(weight 1) × SO(2)(weight 1) with a [-10, 10]² position box.
fn pose_space() -> CompoundManifold {
    let mut space = CompoundManifold::new();
    space
        .add_component(Box::new(RealVectorManifold::bounded(2, -10.0, 10.0)), 1.0)
        .unwrap();
    space
        .add_component(Box::new(So2Manifold::new()), 1.0)
        .unwrap();
    space
}

fn r2_of(space: &CompoundManifold) -> &RealVectorManifold {
    space
        .component(0)
        .downcast_ref::<RealVectorManifold>()
        .expect("component 0 is the position box")
}

fn so2_of(space: &CompoundManifold) -> &So2Manifold {
    space
        .component(1)
        .downcast_ref::<So2Manifold>()
        .expect("component 1 is the heading")
}

/// Write a (position, heading) pose into a compound state.
fn set_pose(space: &CompoundManifold, state: &mut State, xy: [f64; 2], angle: f64) {
    let subs = state
        .value_mut::<Vec<State>>(space.instance_id())
        .expect("compound state");
    r2_of(space)
        .copy_state(&mut subs[0], &r2_of(space).state_from(&xy))
        .unwrap();
    so2_of(space)
        .copy_state(&mut subs[1], &so2_of(space).state_from(angle))
        .unwrap();
}

#[test]
fn weighted_distance_uses_each_components_own_metric() {
    let space = pose_space();
    let mut a = space.alloc_state().unwrap();
    let mut b = space.alloc_state().unwrap();

    // Positions 5 apart; headings 3.0 and -3.0, whose shorter arc runs
    // through the wrap-around seam: 2π - 6, not 6.
    set_pose(&space, &mut a, [0.0, 0.0], 3.0);
    set_pose(&space, &mut b, [3.0, 4.0], -3.0);

    let expected = 5.0 + (TAU - 6.0);
    let got = space.distance(&a, &b).unwrap();
    assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");

    space.free_state(a).unwrap();
    space.free_state(b).unwrap();
}

#[test]
fn dimension_and_projection() {
    let space = pose_space();
    // 2 (position) + 1 (heading).
    assert_eq!(space.dimension(), 3);
    // The rotation component keeps the default empty projection, so only
    // the position coordinates appear.
    assert_eq!(space.projection_dimension(), 2);

    let mut s = space.alloc_state().unwrap();
    set_pose(&space, &mut s, [1.5, -2.0], 0.7);
    let mut proj = Vec::new();
    space.project(&s, &mut proj).unwrap();
    assert_eq!(proj, vec![1.5, -2.0]);
}

#[test]
fn interpolation_endpoints_are_exact_copies() {
    let space = pose_space();
    let mut a = space.alloc_state().unwrap();
    let mut b = space.alloc_state().unwrap();
    let mut out = space.alloc_state().unwrap();
    set_pose(&space, &mut a, [0.1, 0.2], 3.0);
    set_pose(&space, &mut b, [0.3, 0.7], -3.0);

    space.interpolate(&a, &b, 0.0, &mut out).unwrap();
    assert!(space.equal_states(&out, &a).unwrap());
    space.interpolate(&a, &b, 1.0, &mut out).unwrap();
    assert!(space.equal_states(&out, &b).unwrap());

    // Midway, the heading travels half the short arc, not half of |6|.
    space.interpolate(&a, &b, 0.5, &mut out).unwrap();
    let d_heading = so2_of(&space)
        .distance(
            &out.value::<Vec<State>>(space.instance_id()).unwrap()[1],
            &so2_of(&space).state_from(3.0),
        )
        .unwrap();
    assert!((d_heading - (TAU - 6.0) / 2.0).abs() < 1e-12);
}

#[test]
fn sampler_stays_within_bounds_and_weights_match_metric() {
    let space = pose_space();
    let mut sampler = space.alloc_sampler().unwrap();
    let mut s = space.alloc_state().unwrap();
    for _ in 0..64 {
        sampler.sample(&mut s).unwrap();
        assert!(space.satisfies_bounds(&s).unwrap());
        let heading = so2_of(&space)
            .angle(&s.value::<Vec<State>>(space.instance_id()).unwrap()[1])
            .unwrap();
        assert!((-PI..PI).contains(&heading));
    }
}

#[test]
fn set_bounds_propagates_component_rejection() {
    // The SO(2) component reports requires_bounds() == false and rejects
    // bounds, so a compound-wide set_bounds surfaces that rejection.
    let mut space = pose_space();
    let lower = space.alloc_state().unwrap();
    let upper = space.alloc_state().unwrap();
    assert_eq!(
        space.set_bounds(&lower, &upper),
        Err(ManifoldError::BoundsNotSupported)
    );
}

#[test]
fn enforce_bounds_clamps_and_normalizes() {
    let space = pose_space();
    let mut s = space.alloc_state().unwrap();
    set_pose(&space, &mut s, [12.0, -11.0], 7.0);
    assert!(!space.satisfies_bounds(&s).unwrap());

    space.enforce_bounds(&mut s).unwrap();
    assert!(space.satisfies_bounds(&s).unwrap());

    // Idempotent across the whole product.
    let mut once = space.alloc_state().unwrap();
    space.copy_state(&mut once, &s).unwrap();
    space.enforce_bounds(&mut s).unwrap();
    assert!(space.equal_states(&s, &once).unwrap());
}

#[test]
fn repeated_alloc_free_cycles() {
    let space = pose_space();
    for _ in 0..100 {
        let s = space.alloc_state().unwrap();
        space.free_state(s).unwrap();
    }
}

#[test]
fn states_are_bound_to_their_space() {
    let space_a = pose_space();
    let space_b = pose_space();
    let s = space_b.alloc_state().unwrap();
    assert!(matches!(
        space_a.satisfies_bounds(&s),
        Err(ManifoldError::ForeignState { .. })
    ));
    // The state is still valid for its own space.
    assert!(space_b.satisfies_bounds(&s).unwrap());
}

#[test]
fn assembly_locks_after_first_allocation() {
    let mut space = pose_space();
    let _s = space.alloc_state().unwrap();
    assert_eq!(
        space.add_component(Box::new(So2Manifold::new()), 1.0),
        Err(ManifoldError::ComponentsLocked)
    );
}

#[test]
fn diagnostics_render_through_components() {
    let space = pose_space();
    let mut s = space.alloc_state().unwrap();
    set_pose(&space, &mut s, [1.0, 2.0], 0.5);

    let mut text = String::new();
    space.fmt_state(&s, &mut text).unwrap();
    assert_eq!(text, "[(1 2) 0.5rad]");

    let mut settings = String::new();
    space.fmt_settings(&mut settings).unwrap();
    assert!(settings.contains("2 components"));
    assert!(settings.contains("SO(2)"));
}
