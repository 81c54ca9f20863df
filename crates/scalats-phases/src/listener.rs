//! Observable lifecycle events.
//!
//! The listener is an injected capability: it must never influence control
//! flow. A listener that panics indicates a programming error in a
//! collaborator, and the runner does not defend against it.

use std::cell::RefCell;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseEvent<Id> {
    Started,
    /// The phase requested the results of other keys and is waiting on them.
    Blocked(BTreeSet<Id>),
    Success,
    Failure,
    Ignored,
}

pub trait PhaseListener<Id> {
    fn on(&self, phase_name: &'static str, id: &Id, event: PhaseEvent<Id>);
}

/// Discards all events.
pub struct NoListener;

impl<Id> PhaseListener<Id> for NoListener {
    fn on(&self, _phase_name: &'static str, _id: &Id, _event: PhaseEvent<Id>) {}
}

/// Records every event in order. Test support.
#[derive(Default)]
pub struct CollectingListener<Id> {
    events: RefCell<Vec<(&'static str, Id, PhaseEvent<Id>)>>,
}

impl<Id: Clone> CollectingListener<Id> {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<(&'static str, Id, PhaseEvent<Id>)> {
        self.events.borrow().clone()
    }
}

impl<Id: Clone> PhaseListener<Id> for CollectingListener<Id> {
    fn on(&self, phase_name: &'static str, id: &Id, event: PhaseEvent<Id>) {
        self.events.borrow_mut().push((phase_name, id.clone(), event));
    }
}
