//! Scroll threshold tracking
//!
//! The tracker answers one question: has the page scrolled past the
//! threshold? The navbar turns compact while the answer is yes.

use crate::window::Window;
use brilux_core::{EventSource, ListenerGuard};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Scroll offset (in px) past which the navbar turns compact
pub const DEFAULT_SCROLL_THRESHOLD: f32 = 50.0;

/// Strictly greater: sitting exactly on the threshold is not past it
pub fn is_past_threshold(scroll_y: f32, threshold: f32) -> bool {
    scroll_y > threshold
}

/// Publishes whether the window is scrolled past a threshold
pub struct ViewportTracker {
    threshold: f32,
    past: Rc<Cell<bool>>,
    changes: EventSource<bool>,
    _scroll: ListenerGuard,
}

impl ViewportTracker {
    /// Start tracking `window`; stops when the tracker is dropped
    pub fn mount(window: &Window, threshold: f32) -> Self {
        let past = Rc::new(Cell::new(is_past_threshold(window.scroll_y(), threshold)));
        let changes = EventSource::new();

        let scroll = {
            let past = past.clone();
            let changes = changes.clone();
            window.on_scroll(move |y| {
                let now = is_past_threshold(*y, threshold);
                if past.replace(now) != now {
                    debug!(scroll_y = y, past_threshold = now, "scroll threshold crossed");
                    changes.emit(&now);
                }
            })
        };

        Self {
            threshold,
            past,
            changes,
            _scroll: scroll,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_past_threshold(&self) -> bool {
        self.past.get()
    }

    /// Listen for flips of the flag
    pub fn subscribe<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&bool) + 'static,
    {
        self.changes.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brilux_core::Size;
    use std::cell::RefCell;

    fn window() -> Window {
        Window::new(Size::new(1280.0, 800.0), 4000.0)
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(!is_past_threshold(0.0, 50.0));
        assert!(!is_past_threshold(50.0, 50.0));
        assert!(is_past_threshold(51.0, 50.0));
        assert!(is_past_threshold(50.5, 50.0));
    }

    #[test]
    fn test_tracks_window_scroll() {
        let window = window();
        let tracker = ViewportTracker::mount(&window, DEFAULT_SCROLL_THRESHOLD);
        assert!(!tracker.is_past_threshold());

        window.set_scroll_y(50.0);
        assert!(!tracker.is_past_threshold());
        window.set_scroll_y(51.0);
        assert!(tracker.is_past_threshold());
        window.set_scroll_y(0.0);
        assert!(!tracker.is_past_threshold());
    }

    #[test]
    fn test_publishes_flips_only() {
        let window = window();
        let tracker = ViewportTracker::mount(&window, DEFAULT_SCROLL_THRESHOLD);
        let flips = Rc::new(RefCell::new(Vec::new()));
        let f = flips.clone();
        let _guard = tracker.subscribe(move |past| f.borrow_mut().push(*past));

        for y in [10.0, 30.0, 60.0, 200.0, 40.0, 45.0] {
            window.set_scroll_y(y);
        }
        assert_eq!(*flips.borrow(), vec![true, false]);
    }

    #[test]
    fn test_initial_state_reflects_current_scroll() {
        let window = window();
        window.set_scroll_y(300.0);
        let tracker = ViewportTracker::mount(&window, DEFAULT_SCROLL_THRESHOLD);
        assert!(tracker.is_past_threshold());
    }

    #[test]
    fn test_drop_releases_scroll_listener() {
        let window = window();
        let tracker = ViewportTracker::mount(&window, DEFAULT_SCROLL_THRESHOLD);
        assert_eq!(window.scroll_listener_count(), 1);
        drop(tracker);
        assert_eq!(window.scroll_listener_count(), 0);
    }
}
