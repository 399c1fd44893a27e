//! Manifold contract compliance helpers and a minimal test topology.
//!
//! [`assert_metric_properties`] verifies the metric portion of the
//! [`Manifold`] contract for any implementation. [`Interval`] is a tiny
//! 1-D Euclidean segment used as a component in compound tests; it also
//! supports allocation tracking ([`LiveCounter`]) and injected allocation
//! failure so lifecycle edge cases can be observed.

use crate::manifold::Manifold;
use crate::sampler::StateSampler;
use roam_core::{ManifoldError, ManifoldInstanceId, State};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Assert reflexivity, symmetry, and the triangle inequality of
/// `distance` over the given states.
pub(crate) fn assert_metric_properties(m: &dyn Manifold, states: &[State]) {
    for a in states {
        let d = m.distance(a, a).unwrap();
        assert!(d.abs() < f64::EPSILON, "distance(s, s) = {d}, expected 0.0");
    }
    for a in states {
        for b in states {
            let dab = m.distance(a, b).unwrap();
            let dba = m.distance(b, a).unwrap();
            assert!(dab >= 0.0, "negative distance {dab}");
            assert!(
                (dab - dba).abs() < 1e-12,
                "asymmetric distance: {dab} != {dba}"
            );
        }
    }
    for a in states {
        for b in states {
            for c in states {
                let dac = m.distance(a, c).unwrap();
                let dab = m.distance(a, b).unwrap();
                let dbc = m.distance(b, c).unwrap();
                assert!(
                    dac <= dab + dbc + 1e-12,
                    "triangle inequality violated: {dac} > {dab} + {dbc}"
                );
            }
        }
    }
}

/// Shared count of live [`Interval`] states, for leak assertions.
#[derive(Clone)]
pub(crate) struct LiveCounter(Arc<AtomicI64>);

impl LiveCounter {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicI64::new(0)))
    }

    pub(crate) fn count(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Value representation of an [`Interval`] state.
///
/// Decrements its counter on drop, so both `free_state` and drop-based
/// rollback paths are visible to tests.
pub(crate) struct IntervalValue {
    pub(crate) v: f64,
    live: Option<LiveCounter>,
}

impl Drop for IntervalValue {
    fn drop(&mut self) {
        if let Some(live) = &self.live {
            live.0.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Write a value into an [`Interval`] sub-state owned by a compound state.
pub(crate) fn set_interval_value(sub: &mut State, id: ManifoldInstanceId, v: f64) {
    sub.value_mut::<IntervalValue>(id).unwrap().v = v;
}

/// A 1-D Euclidean segment with axis bounds, |a - b| metric, and linear
/// interpolation. Test topology only.
pub(crate) struct Interval {
    bounds: Option<(f64, f64)>,
    live: Option<LiveCounter>,
    fail_alloc: bool,
    instance_id: ManifoldInstanceId,
}

impl Interval {
    pub(crate) fn new(lo: f64, hi: f64) -> Self {
        Self {
            bounds: Some((lo, hi)),
            live: None,
            fail_alloc: false,
            instance_id: ManifoldInstanceId::next(),
        }
    }

    /// An interval whose allocations are counted in `live`.
    pub(crate) fn tracked(lo: f64, hi: f64, live: &LiveCounter) -> Self {
        Self {
            live: Some(live.clone()),
            ..Self::new(lo, hi)
        }
    }

    /// An interval whose `alloc_state` always fails.
    pub(crate) fn failing_alloc(lo: f64, hi: f64) -> Self {
        Self {
            fail_alloc: true,
            ..Self::new(lo, hi)
        }
    }

    fn value<'a>(&self, s: &'a State) -> Result<&'a IntervalValue, ManifoldError> {
        s.value::<IntervalValue>(self.instance_id)
    }
}

impl Manifold for Interval {
    fn instance_id(&self) -> ManifoldInstanceId {
        self.instance_id
    }

    fn dimension(&self) -> usize {
        1
    }

    fn enforce_bounds(&self, state: &mut State) -> Result<(), ManifoldError> {
        let value = state.value_mut::<IntervalValue>(self.instance_id)?;
        if let Some((lo, hi)) = self.bounds {
            value.v = value.v.clamp(lo, hi);
        }
        Ok(())
    }

    fn satisfies_bounds(&self, state: &State) -> Result<bool, ManifoldError> {
        let value = self.value(state)?;
        Ok(match self.bounds {
            Some((lo, hi)) => value.v >= lo && value.v <= hi,
            None => true,
        })
    }

    fn copy_state(&self, dst: &mut State, src: &State) -> Result<(), ManifoldError> {
        let v = self.value(src)?.v;
        dst.value_mut::<IntervalValue>(self.instance_id)?.v = v;
        Ok(())
    }

    fn distance(&self, a: &State, b: &State) -> Result<f64, ManifoldError> {
        Ok((self.value(a)?.v - self.value(b)?.v).abs())
    }

    fn equal_states(&self, a: &State, b: &State) -> Result<bool, ManifoldError> {
        Ok(self.value(a)?.v == self.value(b)?.v)
    }

    fn interpolate(
        &self,
        from: &State,
        to: &State,
        t: f64,
        out: &mut State,
    ) -> Result<(), ManifoldError> {
        let f = self.value(from)?.v;
        let v = f + t * (self.value(to)?.v - f);
        out.value_mut::<IntervalValue>(self.instance_id)?.v = v;
        Ok(())
    }

    fn alloc_sampler(&self) -> Result<Box<dyn StateSampler>, ManifoldError> {
        let (lo, hi) = self.bounds.ok_or(ManifoldError::BoundsNotSet)?;
        Ok(Box::new(IntervalSampler {
            manifold: self.instance_id,
            lo,
            hi,
            seed: 0x9e37_79b9_7f4a_7c15,
        }))
    }

    fn alloc_state(&self) -> Result<State, ManifoldError> {
        if self.fail_alloc {
            // Arbitrary failure to exercise the caller's unwind path.
            return Err(ManifoldError::BoundsNotSet);
        }
        if let Some(live) = &self.live {
            live.0.fetch_add(1, Ordering::SeqCst);
        }
        Ok(State::new(
            self.instance_id,
            IntervalValue {
                v: 0.0,
                live: self.live.clone(),
            },
        ))
    }

    fn set_bounds(&mut self, lower: &State, upper: &State) -> Result<(), ManifoldError> {
        let lo = self.value(lower)?.v;
        let hi = self.value(upper)?.v;
        if lo > hi {
            return Err(ManifoldError::BoundsMismatch {
                reason: format!("lower {lo} above upper {hi}"),
            });
        }
        self.bounds = Some((lo, hi));
        Ok(())
    }

    fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    fn requires_bounds(&self) -> bool {
        true
    }

    fn projection_dimension(&self) -> usize {
        1
    }

    fn project(&self, state: &State, out: &mut Vec<f64>) -> Result<(), ManifoldError> {
        out.push(self.value(state)?.v);
        Ok(())
    }

    fn fmt_state(&self, state: &State, out: &mut dyn fmt::Write) -> fmt::Result {
        match self.value(state) {
            Ok(value) => write!(out, "{}", value.v),
            Err(_) => write!(out, "<foreign state>"),
        }
    }

    fn fmt_settings(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "Interval bounds {:?}", self.bounds)
    }
}

/// Deterministic uniform sampler over an interval (splitmix-style
/// generator; no RNG dependency in this crate).
struct IntervalSampler {
    manifold: ManifoldInstanceId,
    lo: f64,
    hi: f64,
    seed: u64,
}

impl IntervalSampler {
    fn next_fraction(&mut self) -> f64 {
        self.seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.seed >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl StateSampler for IntervalSampler {
    fn sample(&mut self, out: &mut State) -> Result<(), ManifoldError> {
        let v = self.lo + self.next_fraction() * (self.hi - self.lo);
        out.value_mut::<IntervalValue>(self.manifold)?.v = v;
        Ok(())
    }

    fn sample_near(
        &mut self,
        out: &mut State,
        near: &State,
        distance: f64,
    ) -> Result<(), ManifoldError> {
        let center = near.value::<IntervalValue>(self.manifold)?.v;
        let v = center + (self.next_fraction() * 2.0 - 1.0) * distance;
        out.value_mut::<IntervalValue>(self.manifold)?.v = v.clamp(self.lo, self.hi);
        Ok(())
    }
}
