//! Staged-computation engine for the scalats converter.
//!
//! A pipeline is an ordered list of named phases threaded over a keyed value
//! (here, per-library trees keyed by library name). A phase may request the
//! results of *other* keys, which re-enters the pipeline recursively with
//! memoization and circular-dependency detection. See:
//! - [`PhaseRes`] — the three-state outcome algebra
//! - [`RecPhase`] / [`Pipeline`] — pipeline construction
//! - [`PhaseRunner`] — one run's execution, cache, and in-flight stack
//! - [`PhaseListener`] — observable lifecycle events

pub mod listener;
pub mod rec_phase;
pub mod res;
pub mod runner;

pub use listener::{CollectingListener, NoListener, PhaseEvent, PhaseListener};
pub use rec_phase::{Initial, Next, OptPhase, Phase, PipelineExt, RecPhase};
pub use res::{PhaseError, PhaseRes};
pub use runner::{GetDeps, PhaseRunner, Pipeline};

use std::fmt::Display;
use std::hash::Hash;

/// Requirements on a pipeline key. Keys are small identifier-like values;
/// `Ord` gives deterministic dependency and error-map ordering.
pub trait PhaseKey: Clone + Ord + Hash + Display {}

impl<T: Clone + Ord + Hash + Display> PhaseKey for T {}
