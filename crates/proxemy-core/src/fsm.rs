//! Generic finite state machine with per-state and per-transition callbacks.
//!
//! Callbacks receive the machine owner's context as `&mut C`, so the owner
//! keeps its machine and its mutable state in separate fields and passes
//! the state in on every call.
//!
//! Transitions that were never registered are ignored without error. A
//! caller that depends on an unregistered edge will stay in its current
//! state; that is a configuration matter, not a runtime failure.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;

use tracing::trace;

use crate::callbacks::CallbackCollection;

pub struct StateMachine<S, C> {
    states: HashMap<S, CallbackCollection<C>>,
    transitions: HashMap<(S, S), CallbackCollection<C>>,
    current: Option<S>,
}

impl<S, C> Default for StateMachine<S, C> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            transitions: HashMap::new(),
            current: None,
        }
    }
}

impl<S: Debug, C> Debug for StateMachine<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

impl<S, C> StateMachine<S, C>
where
    S: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state (idempotent) and return its callback list.
    pub fn add_state(&mut self, state: S) -> &mut CallbackCollection<C> {
        self.states.entry(state).or_default()
    }

    /// Register the `from -> to` edge (idempotent) and return its callback list.
    pub fn add_transition(&mut self, from: S, to: S) -> &mut CallbackCollection<C> {
        self.transitions.entry((from, to)).or_default()
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current == Some(state)
    }

    pub fn has_transition(&self, from: S, to: S) -> bool {
        self.transitions.contains_key(&(from, to))
    }

    /// Jump to `state` unconditionally and fire its callbacks.
    pub fn set_state(&mut self, state: S, ctx: &mut C) {
        trace!(from = ?self.current, to = ?state, "fsm set_state");
        self.current = Some(state);
        if let Some(callbacks) = self.states.get_mut(&state) {
            callbacks.fire(ctx);
        }
    }

    /// Follow the `current -> to` edge if it is registered: transition
    /// callbacks fire first, then the destination state's callbacks, then
    /// the current state is updated. Returns whether the edge was taken.
    pub fn call_transition(&mut self, to: S, ctx: &mut C) -> bool {
        let Some(from) = self.current else {
            return false;
        };
        let Some(callbacks) = self.transitions.get_mut(&(from, to)) else {
            return false;
        };
        trace!(?from, ?to, "fsm transition");
        callbacks.fire(ctx);
        if let Some(callbacks) = self.states.get_mut(&to) {
            callbacks.fire(ctx);
        }
        self.current = Some(to);
        true
    }
}
