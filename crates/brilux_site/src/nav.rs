//! Navigation controller
//!
//! Owns the navbar state. Two signals drive it without user action: the
//! scroll tracker switches the navbar between expanded and compact, and the
//! section observer moves the active-link highlight. User actions navigate
//! to a section or toggle the mobile menu.

use crate::config::NavigationSettings;
use crate::error::NavigationError;
use crate::intersection::SectionIntersectionObserver;
use crate::section::{PageLayout, SectionId};
use crate::viewport::ViewportTracker;
use crate::window::{ScrollBehavior, Window};
use brilux_core::{EventSource, ListenerGuard, StateMachine, StateTransitions};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Everything the navbar renders from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub is_compact: bool,
    pub active_section: SectionId,
    pub is_mobile_menu_open: bool,
}

/// Mobile menu visibility
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    Navigate,
}

impl StateTransitions for MenuState {
    type Event = MenuEvent;

    fn on_event(&self, event: &MenuEvent) -> Option<Self> {
        match (self, event) {
            (MenuState::Closed, MenuEvent::Toggle) => Some(MenuState::Open),
            (MenuState::Open, MenuEvent::Toggle) => Some(MenuState::Closed),
            (MenuState::Open, MenuEvent::Navigate) => Some(MenuState::Closed),
            (MenuState::Closed, MenuEvent::Navigate) => None,
        }
    }
}

struct NavInner {
    state: RefCell<NavState>,
    menu: RefCell<StateMachine<MenuState>>,
    changes: EventSource<NavState>,
}

impl NavInner {
    /// Apply `update` and publish the result if anything changed
    fn update(&self, update: impl FnOnce(&mut NavState)) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = *state;
            update(&mut *state);
            (*state != before).then_some(*state)
        };
        if let Some(state) = changed {
            self.changes.emit(&state);
        }
    }

    fn send_menu(&self, event: MenuEvent) {
        let open = {
            let mut menu = self.menu.borrow_mut();
            menu.send(&event);
            menu.current() == MenuState::Open
        };
        self.update(|s| s.is_mobile_menu_open = open);
    }
}

/// Navbar state owner
pub struct NavigationController {
    window: Window,
    inner: Rc<NavInner>,
    tracker: ViewportTracker,
    observer: SectionIntersectionObserver,
    _compact: ListenerGuard,
    _active: ListenerGuard,
}

impl NavigationController {
    /// Mount on a window and the page layout
    ///
    /// All listeners are released when the controller is dropped.
    pub fn mount(window: &Window, layout: PageLayout, settings: &NavigationSettings) -> Self {
        let tracker = ViewportTracker::mount(window, settings.scroll_threshold);
        let observer = SectionIntersectionObserver::mount(window, layout, settings.section_margin);

        let inner = Rc::new(NavInner {
            state: RefCell::new(NavState {
                is_compact: tracker.is_past_threshold(),
                active_section: observer.active(),
                is_mobile_menu_open: false,
            }),
            menu: RefCell::new(StateMachine::new(MenuState::Closed)),
            changes: EventSource::new(),
        });

        let compact = {
            let inner = Rc::clone(&inner);
            tracker.subscribe(move |past| {
                let past = *past;
                inner.update(|s| s.is_compact = past);
            })
        };
        let active = {
            let inner = Rc::clone(&inner);
            observer.subscribe(move |section| {
                let section = *section;
                inner.update(|s| s.active_section = section);
            })
        };

        Self {
            window: window.clone(),
            inner,
            tracker,
            observer,
            _compact: compact,
            _active: active,
        }
    }

    pub fn state(&self) -> NavState {
        *self.inner.state.borrow()
    }

    pub fn menu_state(&self) -> MenuState {
        self.inner.menu.borrow().current()
    }

    pub fn tracker(&self) -> &ViewportTracker {
        &self.tracker
    }

    pub fn observer(&self) -> &SectionIntersectionObserver {
        &self.observer
    }

    /// Navigate to a section by anchor id
    ///
    /// Unknown ids and sections missing from the page leave the state as is.
    pub fn on_navigate(&self, id: &str) {
        if let Err(err) = self.try_navigate(id) {
            debug!(error = %err, "navigation ignored");
        }
    }

    pub fn try_navigate(&self, id: &str) -> Result<(), NavigationError> {
        let section =
            SectionId::parse(id).ok_or_else(|| NavigationError::TargetNotFound(id.to_string()))?;
        self.navigate(section)
    }

    /// Smooth scroll to `section`, highlight it and close the mobile menu
    pub fn navigate(&self, section: SectionId) -> Result<(), NavigationError> {
        let top = self
            .observer
            .layout()
            .anchor(section)
            .map(|block| block.top)
            .ok_or_else(|| NavigationError::TargetNotFound(section.to_string()))?;

        debug!(%section, top, "navigating");
        self.window.scroll_to(top, ScrollBehavior::Smooth);
        // Publishes through the observer listener into the navbar state
        self.observer.set_active(section);
        self.inner.send_menu(MenuEvent::Navigate);
        Ok(())
    }

    pub fn toggle_mobile_menu(&self) {
        self.inner.send_menu(MenuEvent::Toggle);
    }

    /// Listen for navbar state changes
    pub fn subscribe<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&NavState) + 'static,
    {
        self.inner.changes.subscribe(listener)
    }
}
