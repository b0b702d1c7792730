//! Viewport-entry triggers
//!
//! A trigger watches one element's visibility and decides when its
//! `AnimateOnEnter` variant plays. With `once` set, only the first entry
//! plays and the element keeps its final state afterwards; otherwise every
//! entry replays and every exit resets to `Initial`.

use brilux_core::{RootMargin, StateMachine, StateTransitions};

/// Visibility trigger attached to an element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTrigger {
    pub once: bool,
    pub margin: RootMargin,
}

impl ViewportTrigger {
    /// Plays on first entry only
    pub fn once(margin: RootMargin) -> Self {
        Self { once: true, margin }
    }

    /// Replays on every entry, resets on every exit
    pub fn repeating(margin: RootMargin) -> Self {
        Self {
            once: false,
            margin,
        }
    }
}

/// Where an element is in its visibility lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InViewState {
    /// Never been in view
    Waiting,
    Visible,
    /// Left the viewport after being visible
    Hidden,
    /// Played its single entry; ignores further visibility changes
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityEvent {
    Enter,
    EnterOnce,
    Leave,
}

impl StateTransitions for InViewState {
    type Event = VisibilityEvent;

    fn on_event(&self, event: &VisibilityEvent) -> Option<Self> {
        use InViewState::*;
        use VisibilityEvent::*;

        match (self, event) {
            (Waiting, EnterOnce) => Some(Settled),
            (Waiting | Hidden, Enter) => Some(Visible),
            (Visible, Leave) => Some(Hidden),
            _ => None,
        }
    }
}

/// What the owner of the trigger should do after a visibility update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerAction {
    None,
    PlayEnter,
    ResetToInitial,
}

/// Running trigger for one element
#[derive(Clone, Debug)]
pub struct TriggerState {
    config: ViewportTrigger,
    fsm: StateMachine<InViewState>,
}

impl TriggerState {
    pub fn new(config: ViewportTrigger) -> Self {
        Self {
            config,
            fsm: StateMachine::new(InViewState::Waiting),
        }
    }

    pub fn config(&self) -> ViewportTrigger {
        self.config
    }

    pub fn state(&self) -> InViewState {
        self.fsm.current()
    }

    /// Feed the latest visibility of the element
    pub fn update(&mut self, visible: bool) -> TriggerAction {
        let event = match (visible, self.config.once) {
            (true, true) => VisibilityEvent::EnterOnce,
            (true, false) => VisibilityEvent::Enter,
            (false, _) => VisibilityEvent::Leave,
        };

        if !self.fsm.send(&event) {
            return TriggerAction::None;
        }

        match self.fsm.current() {
            InViewState::Visible | InViewState::Settled => TriggerAction::PlayEnter,
            InViewState::Hidden => TriggerAction::ResetToInitial,
            InViewState::Waiting => TriggerAction::None,
        }
    }
}
