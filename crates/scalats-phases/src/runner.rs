//! Pipeline execution.
//!
//! One [`PhaseRunner`] owns one run's worth of state: the per-layer memo
//! cache and (implicitly, through the call stack) the in-flight key list used
//! for circular-dependency detection. Concurrent runs each get their own
//! runner; there is no global memoization.

use crate::listener::{PhaseEvent, PhaseListener};
use crate::rec_phase::{Initial, Next, Phase};
use crate::res::PhaseRes;
use crate::PhaseKey;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// The dependency-request capability handed to a phase: resolves every
/// requested key through the full pipeline (up to and including the current
/// phase) and combines the outcomes with [`PhaseRes::sequence`]. The set is
/// ordered, so resolution order, error maps, and listener events are
/// reproducible across runs.
pub type GetDeps<'a, Id, T> = &'a mut dyn FnMut(BTreeSet<Id>) -> PhaseRes<Id, BTreeMap<Id, T>>;

/// A runnable pipeline. Implemented by [`Initial`] and [`Next`]; user code
/// builds values of these types via [`crate::RecPhase`] and
/// [`crate::PipelineExt`] rather than implementing this trait.
pub trait Pipeline<Id: PhaseKey> {
    type Out: Clone;
    /// Per-run memoization state for this prefix of the pipeline.
    type State: Default;

    fn go(
        &self,
        id: &Id,
        in_flight: &[Id],
        state: &mut Self::State,
        listener: &dyn PhaseListener<Id>,
    ) -> PhaseRes<Id, Self::Out>;
}

impl<Id: PhaseKey> Pipeline<Id> for Initial<Id> {
    type Out = Id;
    type State = ();

    fn go(
        &self,
        id: &Id,
        _in_flight: &[Id],
        _state: &mut (),
        _listener: &dyn PhaseListener<Id>,
    ) -> PhaseRes<Id, Id> {
        PhaseRes::Ok(id.clone())
    }
}

impl<Id, Prev, P> Pipeline<Id> for Next<Prev, P>
where
    Id: PhaseKey,
    Prev: Pipeline<Id>,
    P: Phase<Id, In = Prev::Out>,
{
    type Out = P::Out;
    type State = (Prev::State, FxHashMap<(Id, bool), PhaseRes<Id, P::Out>>);

    fn go(
        &self,
        id: &Id,
        in_flight: &[Id],
        state: &mut Self::State,
        listener: &dyn PhaseListener<Id>,
    ) -> PhaseRes<Id, P::Out> {
        // A key already on the active path is re-entrant: the phase runs with
        // is_circular set and must not recurse for this key again.
        let is_circular = in_flight.contains(id);

        let value = match self.prev.go(id, in_flight, &mut state.0, listener) {
            PhaseRes::Ok(value) => value,
            // An earlier phase already settled this key; later phases never run.
            PhaseRes::Ignore => return PhaseRes::Ignore,
            PhaseRes::Failure(errors) => return PhaseRes::Failure(errors),
        };

        // The circular-entry result is cached independently of the full
        // result: the two are different values for the same key.
        let cache_key = (id.clone(), is_circular);
        if let Some(hit) = state.1.get(&cache_key) {
            return hit.clone();
        }

        listener.on(self.name, id, PhaseEvent::Started);
        let span = tracing::info_span!("phase", phase = self.name, lib = %id);
        let _guard = span.enter();

        let result = PhaseRes::attempt(id, {
            let state = &mut *state;
            move || {
                let mut get_deps = |deps: BTreeSet<Id>| {
                    listener.on(self.name, id, PhaseEvent::Blocked(deps.clone()));
                    let mut extended = in_flight.to_vec();
                    extended.push(id.clone());
                    let results: BTreeMap<Id, PhaseRes<Id, P::Out>> = deps
                        .into_iter()
                        .map(|dep| {
                            let res = self.go(&dep, &extended, state, listener);
                            (dep, res)
                        })
                        .collect();
                    PhaseRes::sequence(results)
                };
                self.phase.apply(id, &value, &mut get_deps, is_circular)
            }
        });

        match &result {
            PhaseRes::Ok(_) => listener.on(self.name, id, PhaseEvent::Success),
            PhaseRes::Ignore => listener.on(self.name, id, PhaseEvent::Ignored),
            PhaseRes::Failure(_) => listener.on(self.name, id, PhaseEvent::Failure),
        }

        state.1.insert(cache_key, result.clone());
        result
    }
}

/// One pipeline run: owns the memo cache, hands out results per key.
pub struct PhaseRunner<'l, Id: PhaseKey, P: Pipeline<Id>> {
    pipeline: P,
    listener: &'l dyn PhaseListener<Id>,
    state: P::State,
}

impl<'l, Id: PhaseKey, P: Pipeline<Id>> PhaseRunner<'l, Id, P> {
    pub fn new(pipeline: P, listener: &'l dyn PhaseListener<Id>) -> Self {
        Self {
            pipeline,
            listener,
            state: P::State::default(),
        }
    }

    /// Run the pipeline for `id`. Results are memoized for the lifetime of
    /// this runner, so requesting the same key twice (directly or through a
    /// diamond-shaped dependency graph) evaluates it once.
    pub fn run(&mut self, id: &Id) -> PhaseRes<Id, P::Out> {
        self.pipeline.go(id, &[], &mut self.state, self.listener)
    }
}
