//! Element size tracking
//!
//! Re-measures an element whenever the window is resized. The measurement
//! itself belongs to the host; the tracker only decides when to ask.

use crate::window::Window;
use brilux_core::{EventSource, ListenerGuard, Size};
use std::cell::Cell;
use std::rc::Rc;

/// Latest measured size of one element
pub struct ElementSizeTracker {
    size: Rc<Cell<Size>>,
    changes: EventSource<Size>,
    _resize: ListenerGuard,
}

impl ElementSizeTracker {
    /// Measure now and after every resize
    ///
    /// `measure` receives the new viewport size and returns the element's size.
    pub fn mount<M>(window: &Window, measure: M) -> Self
    where
        M: Fn(Size) -> Size + 'static,
    {
        let size = Rc::new(Cell::new(measure(window.viewport())));
        let changes = EventSource::new();

        let resize = {
            let size = size.clone();
            let changes = changes.clone();
            window.on_resize(move |viewport| {
                let measured = measure(*viewport);
                if size.replace(measured) != measured {
                    changes.emit(&measured);
                }
            })
        };

        Self {
            size,
            changes,
            _resize: resize,
        }
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Listen for size changes
    pub fn subscribe<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&Size) + 'static,
    {
        self.changes.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measures_on_mount_and_resize() {
        let window = Window::new(Size::new(1200.0, 800.0), 3000.0);
        // Card spans a third of the viewport width at a fixed aspect
        let tracker = ElementSizeTracker::mount(&window, |viewport| {
            Size::new(viewport.width / 3.0, viewport.width / 3.0 * 0.75)
        });
        assert_eq!(tracker.size(), Size::new(400.0, 300.0));

        window.resize(Size::new(900.0, 800.0));
        assert_eq!(tracker.size(), Size::new(300.0, 225.0));
    }

    #[test]
    fn test_unchanged_measurement_is_not_published() {
        let window = Window::new(Size::new(1200.0, 800.0), 3000.0);
        let tracker = ElementSizeTracker::mount(&window, |_| Size::new(64.0, 64.0));
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _guard = tracker.subscribe(move |_| h.set(h.get() + 1));

        window.resize(Size::new(600.0, 800.0));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_drop_releases_resize_listener() {
        let window = Window::new(Size::new(1200.0, 800.0), 3000.0);
        let tracker = ElementSizeTracker::mount(&window, |viewport| viewport);
        assert_eq!(window.resize_listener_count(), 1);
        drop(tracker);
        assert_eq!(window.resize_listener_count(), 0);
    }
}
