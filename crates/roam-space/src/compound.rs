//! Product of arbitrary weighted component manifolds.

use crate::manifold::Manifold;
use crate::sampler::{CompoundStateSampler, StateSampler};
use roam_core::{ManifoldError, ManifoldInstanceId, State};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Product topology over an ordered, weighted list of component manifolds.
///
/// # Formal definition
///
/// Given components M_1, ..., M_N with weights w_1, ..., w_N:
///
/// - A compound state is an N-tuple of sub-states, index-aligned with the
///   component list; indices are fixed at assembly time.
/// - `dimension()` = dim(M_1) + ... + dim(M_N).
/// - `distance(a, b)` = sum_i w_i * d_i(a_i, b_i). Components may use
///   incompatible physical units (length vs. angle); the weights are the
///   only mechanism for reconciling them into the single scalar ordering
///   that nearest-neighbor structures and cost criteria require.
/// - All remaining operations fan out per index to the corresponding
///   component.
///
/// # Ownership
///
/// Components added with [`add_component`](Self::add_component) are owned
/// exclusively by the compound and dropped with it, in component order.
///
/// # Phase machine
///
/// A compound space has two phases: **assembly**, during which components
/// may be appended, and **active**, during which every other operation is
/// valid. The transition happens implicitly at the first state operation
/// and is enforced explicitly: `add_component` on an active space fails
/// with [`ManifoldError::ComponentsLocked`], and state operations on an
/// empty compound fail with [`ManifoldError::EmptyCompound`]. Weights are
/// therefore fixed once the space is active, which keeps previously built
/// composite samplers consistent with the metric.
pub struct CompoundManifold {
    components: Vec<Box<dyn Manifold>>,
    weights: Vec<f64>,
    active: AtomicBool,
    instance_id: ManifoldInstanceId,
}

impl fmt::Debug for CompoundManifold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundManifold")
            .field("n_components", &self.components.len())
            .field("weights", &self.weights)
            .field("dimension", &self.dimension())
            .field("active", &self.active.load(Ordering::Acquire))
            .field("instance_id", &self.instance_id)
            .finish()
    }
}

impl CompoundManifold {
    /// Create an empty compound manifold in the assembly phase.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            weights: Vec::new(),
            active: AtomicBool::new(false),
            instance_id: ManifoldInstanceId::next(),
        }
    }

    /// Append a component with the given metric weight.
    ///
    /// Ownership of the component transfers to the compound. Legal only in
    /// the assembly phase; once any state has been allocated or operated
    /// on, the component list is locked.
    ///
    /// # Errors
    ///
    /// - [`ManifoldError::ComponentsLocked`] if the space is active.
    /// - [`ManifoldError::InvalidWeight`] if `weight` is negative or
    ///   non-finite. An all-zero weight vector is permitted; the resulting
    ///   degenerate metric propagates to callers rather than being
    ///   rejected here.
    pub fn add_component(
        &mut self,
        component: Box<dyn Manifold>,
        weight: f64,
    ) -> Result<(), ManifoldError> {
        if self.active.load(Ordering::Acquire) {
            return Err(ManifoldError::ComponentsLocked);
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(ManifoldError::InvalidWeight { weight });
        }
        self.components.push(component);
        self.weights.push(weight);
        Ok(())
    }

    /// Number of component manifolds.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Access the i-th component manifold.
    pub fn component(&self, i: usize) -> &dyn Manifold {
        &*self.components[i]
    }

    /// The metric weight of the i-th component.
    pub fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    /// All component weights, index-aligned with the component list.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Whether the space has left the assembly phase.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Leave the assembly phase on behalf of `operation`.
    ///
    /// Every non-assembly operation calls this first: it rejects the
    /// degenerate zero-component space, then locks the component list.
    fn activate(&self, operation: &'static str) -> Result<(), ManifoldError> {
        if self.components.is_empty() {
            return Err(ManifoldError::EmptyCompound { operation });
        }
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    /// Reject a sub-state count that disagrees with the component list.
    ///
    /// `State::new` is public, so a state with the right origin tag can
    /// still carry a hand-built payload of the wrong arity. Every fan-out
    /// operation checks this up front and fails whole rather than applying
    /// only a prefix of the components.
    fn check_arity(&self, found: usize) -> Result<(), ManifoldError> {
        if found == self.components.len() {
            Ok(())
        } else {
            Err(ManifoldError::ComponentCountMismatch {
                expected: self.components.len(),
                found,
            })
        }
    }

    /// Borrow the sub-states of a compound state, checking origin and arity.
    fn sub_states<'a>(&self, state: &'a State) -> Result<&'a [State], ManifoldError> {
        let subs = state.value::<Vec<State>>(self.instance_id)?;
        self.check_arity(subs.len())?;
        Ok(subs)
    }

    /// Mutably borrow the sub-states of a compound state, checking origin
    /// and arity.
    fn sub_states_mut<'a>(&self, state: &'a mut State) -> Result<&'a mut [State], ManifoldError> {
        let subs = state.value_mut::<Vec<State>>(self.instance_id)?;
        self.check_arity(subs.len())?;
        Ok(subs)
    }
}

impl Default for CompoundManifold {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifold for CompoundManifold {
    fn instance_id(&self) -> ManifoldInstanceId {
        self.instance_id
    }

    fn dimension(&self) -> usize {
        self.components.iter().map(|c| c.dimension()).sum()
    }

    fn enforce_bounds(&self, state: &mut State) -> Result<(), ManifoldError> {
        self.activate("enforce_bounds")?;
        let subs = self.sub_states_mut(state)?;
        for (comp, sub) in self.components.iter().zip(subs.iter_mut()) {
            comp.enforce_bounds(sub)?;
        }
        Ok(())
    }

    fn satisfies_bounds(&self, state: &State) -> Result<bool, ManifoldError> {
        self.activate("satisfies_bounds")?;
        let subs = self.sub_states(state)?;
        for (comp, sub) in self.components.iter().zip(subs.iter()) {
            if !comp.satisfies_bounds(sub)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn copy_state(&self, dst: &mut State, src: &State) -> Result<(), ManifoldError> {
        self.activate("copy_state")?;
        let src_subs = self.sub_states(src)?;
        let dst_subs = self.sub_states_mut(dst)?;
        for (i, comp) in self.components.iter().enumerate() {
            comp.copy_state(&mut dst_subs[i], &src_subs[i])?;
        }
        Ok(())
    }

    fn distance(&self, a: &State, b: &State) -> Result<f64, ManifoldError> {
        self.activate("distance")?;
        let a_subs = self.sub_states(a)?;
        let b_subs = self.sub_states(b)?;
        let mut total = 0.0;
        for (i, comp) in self.components.iter().enumerate() {
            total += self.weights[i] * comp.distance(&a_subs[i], &b_subs[i])?;
        }
        Ok(total)
    }

    fn equal_states(&self, a: &State, b: &State) -> Result<bool, ManifoldError> {
        self.activate("equal_states")?;
        let a_subs = self.sub_states(a)?;
        let b_subs = self.sub_states(b)?;
        // Short-circuits on the first unequal component; no observable
        // difference from checking all of them.
        for (i, comp) in self.components.iter().enumerate() {
            if !comp.equal_states(&a_subs[i], &b_subs[i])? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn interpolate(
        &self,
        from: &State,
        to: &State,
        t: f64,
        out: &mut State,
    ) -> Result<(), ManifoldError> {
        self.activate("interpolate")?;
        let from_subs = self.sub_states(from)?;
        let to_subs = self.sub_states(to)?;
        let out_subs = self.sub_states_mut(out)?;
        for (i, comp) in self.components.iter().enumerate() {
            comp.interpolate(&from_subs[i], &to_subs[i], t, &mut out_subs[i])?;
        }
        Ok(())
    }

    fn alloc_sampler(&self) -> Result<Box<dyn StateSampler>, ManifoldError> {
        self.activate("alloc_sampler")?;
        let samplers = self
            .components
            .iter()
            .map(|c| c.alloc_sampler())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(CompoundStateSampler::new(
            self.instance_id,
            samplers,
            self.weights.clone(),
        )))
    }

    fn alloc_state(&self) -> Result<State, ManifoldError> {
        self.activate("alloc_state")?;
        // On a failing component, the `?` drops the sub-states already
        // collected, so a partial allocation never leaks.
        let subs = self
            .components
            .iter()
            .map(|c| c.alloc_state())
            .collect::<Result<Vec<State>, _>>()?;
        Ok(State::new(self.instance_id, subs))
    }

    fn free_state(&self, state: State) -> Result<(), ManifoldError> {
        self.activate("free_state")?;
        let subs = state.into_value::<Vec<State>>(self.instance_id)?;
        self.check_arity(subs.len())?;
        for (comp, sub) in self.components.iter().zip(subs) {
            comp.free_state(sub)?;
        }
        Ok(())
    }

    fn set_bounds(&mut self, lower: &State, upper: &State) -> Result<(), ManifoldError> {
        self.activate("set_bounds")?;
        let lower_subs = self.sub_states(lower)?;
        let upper_subs = self.sub_states(upper)?;
        for (i, comp) in self.components.iter_mut().enumerate() {
            comp.set_bounds(&lower_subs[i], &upper_subs[i])?;
        }
        Ok(())
    }

    fn clear_bounds(&mut self) {
        for comp in &mut self.components {
            comp.clear_bounds();
        }
    }

    fn requires_bounds(&self) -> bool {
        self.components.iter().any(|c| c.requires_bounds())
    }

    fn projection_dimension(&self) -> usize {
        self.components.iter().map(|c| c.projection_dimension()).sum()
    }

    fn project(&self, state: &State, out: &mut Vec<f64>) -> Result<(), ManifoldError> {
        self.activate("project")?;
        let subs = self.sub_states(state)?;
        // Components with projection dimension 0 append nothing, so the
        // output is the concatenation of the non-zero child projections in
        // component order.
        for (comp, sub) in self.components.iter().zip(subs.iter()) {
            comp.project(sub, out)?;
        }
        Ok(())
    }

    fn fmt_state(&self, state: &State, out: &mut dyn fmt::Write) -> fmt::Result {
        let Ok(subs) = state.value::<Vec<State>>(self.instance_id) else {
            return write!(out, "<foreign state>");
        };
        write!(out, "[")?;
        for (i, (comp, sub)) in self.components.iter().zip(subs.iter()).enumerate() {
            if i > 0 {
                write!(out, " ")?;
            }
            comp.fmt_state(sub, out)?;
        }
        write!(out, "]")
    }

    fn fmt_settings(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            out,
            "Compound manifold: {} components, dimension {}",
            self.components.len(),
            self.dimension()
        )?;
        for (i, comp) in self.components.iter().enumerate() {
            write!(out, "  [{i}] weight {}: ", self.weights[i])?;
            comp.fmt_settings(out)?;
            writeln!(out)?;
        }
        Ok(())
    }
}
