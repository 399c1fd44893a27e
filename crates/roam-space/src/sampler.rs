//! The `StateSampler` construction contract and the composite sampler
//! produced by compound spaces.
//!
//! Sampling strategy itself is a collaborator concern; this module only
//! fixes what the core guarantees: a sampler returned by
//! `Manifold::alloc_sampler` is bound to the issuing space and, for
//! compound spaces, carries the same weight vector as the metric.

use roam_core::{ManifoldError, ManifoldInstanceId, State};

/// Generates points from one manifold.
///
/// Samplers write into caller-allocated states; they never allocate.
/// A sampler is bound to the space instance that produced it and rejects
/// states belonging to any other instance.
pub trait StateSampler: Send {
    /// Overwrite `out` with a point drawn from the space.
    fn sample(&mut self, out: &mut State) -> Result<(), ManifoldError>;

    /// Overwrite `out` with a point near `near`, at most `distance` away
    /// under the space's metric.
    fn sample_near(
        &mut self,
        out: &mut State,
        near: &State,
        distance: f64,
    ) -> Result<(), ManifoldError>;
}

/// Composite sampler holding one sub-sampler per compound component.
///
/// Built by `CompoundManifold::alloc_sampler` with the same weight vector
/// the compound metric uses, so sampling density stays consistent with the
/// metric. Weights are fixed once a compound space is active, so a built
/// sampler cannot go stale.
pub struct CompoundStateSampler {
    manifold: ManifoldInstanceId,
    samplers: Vec<Box<dyn StateSampler>>,
    weights: Vec<f64>,
}

impl CompoundStateSampler {
    /// Assemble a composite sampler for the compound manifold with the
    /// given instance ID.
    ///
    /// `samplers` and `weights` must be index-aligned with the compound's
    /// component list.
    pub(crate) fn new(
        manifold: ManifoldInstanceId,
        samplers: Vec<Box<dyn StateSampler>>,
        weights: Vec<f64>,
    ) -> Self {
        Self {
            manifold,
            samplers,
            weights,
        }
    }

    /// The weight vector this sampler was built with.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Reject a sub-state count that disagrees with the sub-sampler list.
    ///
    /// Mirrors the compound manifold's own arity check: a hand-built state
    /// with the right origin tag must fail whole, not be sampled partially.
    fn check_arity(&self, found: usize) -> Result<(), ManifoldError> {
        if found == self.samplers.len() {
            Ok(())
        } else {
            Err(ManifoldError::ComponentCountMismatch {
                expected: self.samplers.len(),
                found,
            })
        }
    }
}

impl StateSampler for CompoundStateSampler {
    fn sample(&mut self, out: &mut State) -> Result<(), ManifoldError> {
        let subs = out.value_mut::<Vec<State>>(self.manifold)?;
        self.check_arity(subs.len())?;
        for (sampler, sub) in self.samplers.iter_mut().zip(subs.iter_mut()) {
            sampler.sample(sub)?;
        }
        Ok(())
    }

    fn sample_near(
        &mut self,
        out: &mut State,
        near: &State,
        distance: f64,
    ) -> Result<(), ManifoldError> {
        let near_subs = near.value::<Vec<State>>(self.manifold)?;
        let out_subs = out.value_mut::<Vec<State>>(self.manifold)?;
        self.check_arity(near_subs.len())?;
        self.check_arity(out_subs.len())?;
        for (i, sampler) in self.samplers.iter_mut().enumerate() {
            // A component with weight w contributes w * d_i to the compound
            // metric, so a compound ball of radius r allows r / w of travel
            // in that component. Zero-weight components are pinned.
            let sub_distance = if self.weights[i] > 0.0 {
                distance / self.weights[i]
            } else {
                0.0
            };
            sampler.sample_near(&mut out_subs[i], &near_subs[i], sub_distance)?;
        }
        Ok(())
    }
}
