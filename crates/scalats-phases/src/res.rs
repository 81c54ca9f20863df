//! The three-state result algebra threaded through the pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// An error attributed to one pipeline key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseError {
    /// A panic caught at the phase boundary.
    Panic(String),
    /// An expected failure described by the phase itself.
    Msg(String),
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panic(msg) => write!(f, "panic: {msg}"),
            Self::Msg(msg) => f.write_str(msg),
        }
    }
}

/// Outcome of running a phase for one key: success, deliberate skip, or
/// failure with per-key attribution.
///
/// Failures are keyed by the library that was being processed when they
/// occurred, so one failing library never masks the result of an unrelated
/// one. `BTreeMap` keeps error iteration deterministic.
#[derive(Clone, Debug, PartialEq)]
pub enum PhaseRes<Id, T> {
    Ok(T),
    Ignore,
    Failure(BTreeMap<Id, PhaseError>),
}

impl<Id: Ord + Clone, T> PhaseRes<Id, T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Transform the `Ok` payload; `Ignore` and `Failure` pass through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PhaseRes<Id, U> {
        match self {
            Self::Ok(value) => PhaseRes::Ok(f(value)),
            Self::Ignore => PhaseRes::Ignore,
            Self::Failure(errors) => PhaseRes::Failure(errors),
        }
    }

    pub fn flat_map<U>(self, f: impl FnOnce(T) -> PhaseRes<Id, U>) -> PhaseRes<Id, U> {
        match self {
            Self::Ok(value) => f(value),
            Self::Ignore => PhaseRes::Ignore,
            Self::Failure(errors) => PhaseRes::Failure(errors),
        }
    }

    pub fn for_each(&self, f: impl FnOnce(&T)) {
        if let Self::Ok(value) = self {
            f(value);
        }
    }

    /// Combine per-key results into one result of a map. All inputs must be
    /// `Ok` for the whole to be `Ok`; failures union their error maps; an
    /// `Ignore` among failure-free inputs yields `Ignore`.
    pub fn sequence(results: BTreeMap<Id, PhaseRes<Id, T>>) -> PhaseRes<Id, BTreeMap<Id, T>> {
        let mut values = BTreeMap::new();
        let mut errors: BTreeMap<Id, PhaseError> = BTreeMap::new();
        let mut ignored = false;
        for (id, res) in results {
            match res {
                PhaseRes::Ok(value) => {
                    values.insert(id, value);
                }
                PhaseRes::Ignore => ignored = true,
                PhaseRes::Failure(errs) => errors.extend(errs),
            }
        }
        if !errors.is_empty() {
            PhaseRes::Failure(errors)
        } else if ignored {
            PhaseRes::Ignore
        } else {
            PhaseRes::Ok(values)
        }
    }
}

impl<Id: Ord + Clone + fmt::Display, T> PhaseRes<Id, T> {
    /// Run a thunk that may panic, converting a panic into a `Failure` keyed
    /// by `id`. Nothing escapes the phase boundary as an unwind.
    pub fn attempt(id: &Id, f: impl FnOnce() -> PhaseRes<Id, T>) -> PhaseRes<Id, T> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(res) => res,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                tracing::error!(lib = %id, error = %msg, "phase panicked");
                let mut errors = BTreeMap::new();
                errors.insert(id.clone(), PhaseError::Panic(msg));
                PhaseRes::Failure(errors)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(v: i32) -> PhaseRes<String, i32> {
        PhaseRes::Ok(v)
    }

    fn fail(key: &str, msg: &str) -> PhaseRes<String, i32> {
        let mut errors = BTreeMap::new();
        errors.insert(key.to_string(), PhaseError::Msg(msg.to_string()));
        PhaseRes::Failure(errors)
    }

    #[test]
    fn map_passes_failure_through() {
        assert_eq!(fail("a", "boom").map(|v| v + 1), fail("a", "boom"));
        assert_eq!(ok(1).map(|v| v + 1), ok(2));
        assert_eq!(
            PhaseRes::<String, i32>::Ignore.map(|v| v + 1),
            PhaseRes::Ignore
        );
    }

    #[test]
    fn sequence_requires_all_ok() {
        let mut all = BTreeMap::new();
        all.insert("a".to_string(), ok(1));
        all.insert("b".to_string(), ok(2));
        match PhaseRes::sequence(all) {
            PhaseRes::Ok(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map["a"], 1);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn sequence_unions_failures() {
        let mut all = BTreeMap::new();
        all.insert("a".to_string(), fail("a", "first"));
        all.insert("b".to_string(), ok(2));
        all.insert("c".to_string(), fail("c", "second"));
        match PhaseRes::sequence(all) {
            PhaseRes::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains_key("a"));
                assert!(errors.contains_key("c"));
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn sequence_ignore_wins_only_without_failures() {
        let mut all = BTreeMap::new();
        all.insert("a".to_string(), ok(1));
        all.insert("b".to_string(), PhaseRes::Ignore);
        assert_eq!(PhaseRes::sequence(all), PhaseRes::Ignore);

        let mut all = BTreeMap::new();
        all.insert("a".to_string(), PhaseRes::Ignore);
        all.insert("b".to_string(), fail("b", "boom"));
        assert!(matches!(PhaseRes::sequence(all), PhaseRes::Failure(_)));
    }

    #[test]
    fn attempt_converts_panic() {
        let res: PhaseRes<String, i32> =
            PhaseRes::attempt(&"lib".to_string(), || panic!("exploded"));
        match res {
            PhaseRes::Failure(errors) => {
                assert_eq!(
                    errors.get("lib"),
                    Some(&PhaseError::Panic("exploded".to_string()))
                );
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }
}
