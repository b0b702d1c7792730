//! Typed state machines for small UI states
//!
//! States implement [`StateTransitions`] as a match over `(state, event)`
//! pairs, returning the next state or `None` when the event does not apply.
//!
//! ```rust
//! use brilux_core::fsm::{StateMachine, StateTransitions};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Door { Open, Closed }
//!
//! #[derive(Debug, Clone, Copy)]
//! enum DoorEvent { Push, Pull }
//!
//! impl StateTransitions for Door {
//!     type Event = DoorEvent;
//!
//!     fn on_event(&self, event: &DoorEvent) -> Option<Self> {
//!         match (self, event) {
//!             (Door::Closed, DoorEvent::Push) => Some(Door::Open),
//!             (Door::Open, DoorEvent::Pull) => Some(Door::Closed),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut door = StateMachine::new(Door::Closed);
//! assert!(door.send(&DoorEvent::Push));
//! assert_eq!(door.current(), Door::Open);
//! assert!(!door.send(&DoorEvent::Push));
//! ```

use std::hash::Hash;

/// Transition table for a state type
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Event type driving the machine
    type Event: std::fmt::Debug;

    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: &Self::Event) -> Option<Self>;
}

/// A running state machine
#[derive(Debug, Clone)]
pub struct StateMachine<S: StateTransitions> {
    current: S,
    transitions: u64,
}

impl<S: StateTransitions> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            transitions: 0,
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    /// Number of transitions taken since creation
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Feed an event; returns true if the state changed
    pub fn send(&mut self, event: &S::Event) -> bool {
        match self.current.on_event(event) {
            Some(next) if next != self.current => {
                tracing::trace!(from = ?self.current, to = ?next, ?event, "state transition");
                self.current = next;
                self.transitions += 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Light {
        Off,
        On,
    }

    #[derive(Debug)]
    enum Flip {
        Toggle,
        ForceOff,
    }

    impl StateTransitions for Light {
        type Event = Flip;

        fn on_event(&self, event: &Flip) -> Option<Self> {
            match (self, event) {
                (Light::Off, Flip::Toggle) => Some(Light::On),
                (Light::On, Flip::Toggle) => Some(Light::Off),
                (_, Flip::ForceOff) => Some(Light::Off),
            }
        }
    }

    #[test]
    fn test_transitions_are_counted() {
        let mut fsm = StateMachine::new(Light::Off);
        assert!(fsm.send(&Flip::Toggle));
        assert!(fsm.send(&Flip::Toggle));
        assert_eq!(fsm.current(), Light::Off);
        assert_eq!(fsm.transition_count(), 2);
    }

    #[test]
    fn test_self_transition_is_not_a_change() {
        let mut fsm = StateMachine::new(Light::Off);
        assert!(!fsm.send(&Flip::ForceOff));
        assert_eq!(fsm.transition_count(), 0);
    }
}
