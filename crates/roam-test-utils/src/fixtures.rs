//! Reference manifold fixtures.
//!
//! Two standard geometries for contract and integration testing:
//!
//! - [`RealVectorManifold`] — n-dimensional Euclidean space with an
//!   axis-aligned bounding box, L2 metric, and linear interpolation.
//! - [`So2Manifold`] — planar rotation: angles normalized to [-π, π),
//!   shortest-arc metric and interpolation, no bounds.
//!
//! Both samplers use a seeded `ChaCha8Rng` so tests stay deterministic.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roam_core::{ManifoldError, ManifoldInstanceId, RealCoord, State};
use roam_space::{Manifold, StateSampler};
use smallvec::SmallVec;
use std::f64::consts::{PI, TAU};
use std::fmt;

/// n-dimensional Euclidean space with axis-aligned bounds.
///
/// States are [`RealCoord`] vectors; the metric is the L2 norm of the
/// coordinate difference, and interpolation is the straight segment
/// (extrapolating for `t` outside `[0, 1]`). Sampling requires bounds.
pub struct RealVectorManifold {
    dim: usize,
    bounds: Option<(RealCoord, RealCoord)>,
    seed: u64,
    instance_id: ManifoldInstanceId,
}

impl RealVectorManifold {
    /// An unbounded n-dimensional space. Bounds must be configured via
    /// `set_bounds` before sampling.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            bounds: None,
            seed: 0,
            instance_id: ManifoldInstanceId::next(),
        }
    }

    /// Convenience constructor with the same `[lo, hi]` range on every axis.
    pub fn bounded(dim: usize, lo: f64, hi: f64) -> Self {
        Self {
            bounds: Some((
                SmallVec::from_elem(lo, dim),
                SmallVec::from_elem(hi, dim),
            )),
            ..Self::new(dim)
        }
    }

    /// Set the sampler seed (default 0).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Allocate a state holding the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `coords.len() != dim` — fixture misuse is a test bug.
    pub fn state_from(&self, coords: &[f64]) -> State {
        assert_eq!(coords.len(), self.dim, "coordinate arity mismatch");
        State::new(self.instance_id, RealCoord::from_slice(coords))
    }

    /// Borrow the coordinates of a state allocated by this manifold.
    pub fn coords<'a>(&self, state: &'a State) -> Result<&'a [f64], ManifoldError> {
        Ok(state.value::<RealCoord>(self.instance_id)?.as_slice())
    }
}

impl Manifold for RealVectorManifold {
    fn instance_id(&self) -> ManifoldInstanceId {
        self.instance_id
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn enforce_bounds(&self, state: &mut State) -> Result<(), ManifoldError> {
        let coords = state.value_mut::<RealCoord>(self.instance_id)?;
        if let Some((lo, hi)) = &self.bounds {
            for (i, c) in coords.iter_mut().enumerate() {
                *c = c.clamp(lo[i], hi[i]);
            }
        }
        Ok(())
    }

    fn satisfies_bounds(&self, state: &State) -> Result<bool, ManifoldError> {
        let coords = state.value::<RealCoord>(self.instance_id)?;
        Ok(match &self.bounds {
            Some((lo, hi)) => coords
                .iter()
                .enumerate()
                .all(|(i, c)| *c >= lo[i] && *c <= hi[i]),
            None => true,
        })
    }

    fn copy_state(&self, dst: &mut State, src: &State) -> Result<(), ManifoldError> {
        let src_coords = src.value::<RealCoord>(self.instance_id)?.clone();
        *dst.value_mut::<RealCoord>(self.instance_id)? = src_coords;
        Ok(())
    }

    fn distance(&self, a: &State, b: &State) -> Result<f64, ManifoldError> {
        let a = a.value::<RealCoord>(self.instance_id)?;
        let b = b.value::<RealCoord>(self.instance_id)?;
        let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
        Ok(sum.sqrt())
    }

    fn equal_states(&self, a: &State, b: &State) -> Result<bool, ManifoldError> {
        let a = a.value::<RealCoord>(self.instance_id)?;
        let b = b.value::<RealCoord>(self.instance_id)?;
        Ok(a.iter().zip(b.iter()).all(|(x, y)| x == y))
    }

    fn interpolate(
        &self,
        from: &State,
        to: &State,
        t: f64,
        out: &mut State,
    ) -> Result<(), ManifoldError> {
        let from = from.value::<RealCoord>(self.instance_id)?.clone();
        let to = to.value::<RealCoord>(self.instance_id)?.clone();
        let out = out.value_mut::<RealCoord>(self.instance_id)?;
        // (1 - t)*a + t*b rather than a + t*(b - a): the endpoints t = 0
        // and t = 1 reproduce the inputs exactly, which equal_states needs.
        for (i, o) in out.iter_mut().enumerate() {
            *o = (1.0 - t) * from[i] + t * to[i];
        }
        Ok(())
    }

    fn alloc_sampler(&self) -> Result<Box<dyn StateSampler>, ManifoldError> {
        let (lo, hi) = self.bounds.clone().ok_or(ManifoldError::BoundsNotSet)?;
        Ok(Box::new(RealVectorSampler {
            manifold: self.instance_id,
            lo,
            hi,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
        }))
    }

    fn alloc_state(&self) -> Result<State, ManifoldError> {
        Ok(State::new(
            self.instance_id,
            RealCoord::from_elem(0.0, self.dim),
        ))
    }

    fn set_bounds(&mut self, lower: &State, upper: &State) -> Result<(), ManifoldError> {
        let lo = lower.value::<RealCoord>(self.instance_id)?.clone();
        let hi = upper.value::<RealCoord>(self.instance_id)?.clone();
        for i in 0..self.dim {
            if lo[i] > hi[i] {
                return Err(ManifoldError::BoundsMismatch {
                    reason: format!("axis {i}: lower {} above upper {}", lo[i], hi[i]),
                });
            }
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
        self.dim
    }

    fn project(&self, state: &State, out: &mut Vec<f64>) -> Result<(), ManifoldError> {
        let coords = state.value::<RealCoord>(self.instance_id)?;
        out.extend_from_slice(coords);
        Ok(())
    }

    fn fmt_state(&self, state: &State, out: &mut dyn fmt::Write) -> fmt::Result {
        match state.value::<RealCoord>(self.instance_id) {
            Ok(coords) => {
                write!(out, "(")?;
                for (i, c) in coords.iter().enumerate() {
                    if i > 0 {
                        write!(out, " ")?;
                    }
                    write!(out, "{c}")?;
                }
                write!(out, ")")
            }
            Err(_) => write!(out, "<foreign state>"),
        }
    }

    fn fmt_settings(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "RealVector dim {} bounds {:?}", self.dim, self.bounds)
    }
}

struct RealVectorSampler {
    manifold: ManifoldInstanceId,
    lo: RealCoord,
    hi: RealCoord,
    rng: ChaCha8Rng,
}

impl StateSampler for RealVectorSampler {
    fn sample(&mut self, out: &mut State) -> Result<(), ManifoldError> {
        let coords = out.value_mut::<RealCoord>(self.manifold)?;
        for (i, c) in coords.iter_mut().enumerate() {
            *c = self.rng.random_range(self.lo[i]..=self.hi[i]);
        }
        Ok(())
    }

    fn sample_near(
        &mut self,
        out: &mut State,
        near: &State,
        distance: f64,
    ) -> Result<(), ManifoldError> {
        let center = near.value::<RealCoord>(self.manifold)?.clone();
        let coords = out.value_mut::<RealCoord>(self.manifold)?;
        for (i, c) in coords.iter_mut().enumerate() {
            let v = center[i] + self.rng.random_range(-distance..=distance);
            *c = v.clamp(self.lo[i], self.hi[i]);
        }
        Ok(())
    }
}

/// Planar rotation group SO(2).
///
/// States are angles in radians, kept in the canonical range [-π, π) by
/// `enforce_bounds`. The metric is the shorter of the two arcs between the
/// angles, and interpolation follows that shortest arc — never a linear
/// blend of raw angle values across the wrap-around seam.
pub struct So2Manifold {
    seed: u64,
    instance_id: ManifoldInstanceId,
}

impl So2Manifold {
    pub fn new() -> Self {
        Self {
            seed: 0,
            instance_id: ManifoldInstanceId::next(),
        }
    }

    /// Set the sampler seed (default 0).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Allocate a state holding the given angle (radians).
    pub fn state_from(&self, angle: f64) -> State {
        State::new(self.instance_id, angle)
    }

    /// The angle stored in a state allocated by this manifold.
    pub fn angle(&self, state: &State) -> Result<f64, ManifoldError> {
        state.value::<f64>(self.instance_id).copied()
    }

    /// Wrap an angle into [-π, π). NaN and infinities pass through.
    fn normalize(angle: f64) -> f64 {
        (angle + PI).rem_euclid(TAU) - PI
    }

    /// Signed shortest-arc displacement from `from` to `to`, in (-π, π].
    fn shortest_arc(from: f64, to: f64) -> f64 {
        let d = (to - from).rem_euclid(TAU);
        if d > PI {
            d - TAU
        } else {
            d
        }
    }

    fn value(&self, s: &State) -> Result<f64, ManifoldError> {
        s.value::<f64>(self.instance_id).copied()
    }
}

impl Default for So2Manifold {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifold for So2Manifold {
    fn instance_id(&self) -> ManifoldInstanceId {
        self.instance_id
    }

    fn dimension(&self) -> usize {
        1
    }

    fn enforce_bounds(&self, state: &mut State) -> Result<(), ManifoldError> {
        let angle = state.value_mut::<f64>(self.instance_id)?;
        *angle = Self::normalize(*angle);
        Ok(())
    }

    fn satisfies_bounds(&self, state: &State) -> Result<bool, ManifoldError> {
        let angle = self.value(state)?;
        Ok((-PI..PI).contains(&angle))
    }

    fn copy_state(&self, dst: &mut State, src: &State) -> Result<(), ManifoldError> {
        let angle = self.value(src)?;
        *dst.value_mut::<f64>(self.instance_id)? = angle;
        Ok(())
    }

    fn distance(&self, a: &State, b: &State) -> Result<f64, ManifoldError> {
        Ok(Self::shortest_arc(self.value(a)?, self.value(b)?).abs())
    }

    fn equal_states(&self, a: &State, b: &State) -> Result<bool, ManifoldError> {
        Ok(self.value(a)? == self.value(b)?)
    }

    fn interpolate(
        &self,
        from: &State,
        to: &State,
        t: f64,
        out: &mut State,
    ) -> Result<(), ManifoldError> {
        let f = self.value(from)?;
        let to_angle = self.value(to)?;
        // Exact copies at the endpoints; the arc formula reintroduces
        // rounding that equal_states would reject.
        let v = if t == 0.0 {
            f
        } else if t == 1.0 {
            to_angle
        } else {
            Self::normalize(f + t * Self::shortest_arc(f, to_angle))
        };
        *out.value_mut::<f64>(self.instance_id)? = v;
        Ok(())
    }

    fn alloc_sampler(&self) -> Result<Box<dyn StateSampler>, ManifoldError> {
        Ok(Box::new(So2Sampler {
            manifold: self.instance_id,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
        }))
    }

    fn alloc_state(&self) -> Result<State, ManifoldError> {
        Ok(State::new(self.instance_id, 0.0f64))
    }

    fn set_bounds(&mut self, _lower: &State, _upper: &State) -> Result<(), ManifoldError> {
        Err(ManifoldError::BoundsNotSupported)
    }

    fn clear_bounds(&mut self) {}

    fn requires_bounds(&self) -> bool {
        false
    }

    fn fmt_state(&self, state: &State, out: &mut dyn fmt::Write) -> fmt::Result {
        match self.value(state) {
            Ok(angle) => write!(out, "{angle}rad"),
            Err(_) => write!(out, "<foreign state>"),
        }
    }

    fn fmt_settings(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "SO(2)")
    }
}

struct So2Sampler {
    manifold: ManifoldInstanceId,
    rng: ChaCha8Rng,
}

impl StateSampler for So2Sampler {
    fn sample(&mut self, out: &mut State) -> Result<(), ManifoldError> {
        *out.value_mut::<f64>(self.manifold)? = self.rng.random_range(-PI..PI);
        Ok(())
    }

    fn sample_near(
        &mut self,
        out: &mut State,
        near: &State,
        distance: f64,
    ) -> Result<(), ManifoldError> {
        let center = near.value::<f64>(self.manifold).copied()?;
        let offset = self.rng.random_range(-distance..=distance);
        *out.value_mut::<f64>(self.manifold)? = So2Manifold::normalize(center + offset);
        Ok(())
    }
}
