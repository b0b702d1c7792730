//! Host window
//!
//! The window owns the document scroll offset and the viewport size and
//! publishes both through [`EventSource`]s. Components subscribe on mount and
//! keep the returned guards, so their listeners go away with them.
//!
//! Smooth scrolls are executed by [`Window::advance`]; every intermediate
//! offset is published like a user scroll.

use brilux_animation::Easing;
use brilux_core::{EventSource, ListenerGuard, Rect, Size};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// Scroll animation behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump immediately
    #[default]
    Auto,
    /// Animate over the window's smooth scroll duration
    Smooth,
}

#[derive(Debug, Clone, Copy)]
struct SmoothScroll {
    from: f32,
    to: f32,
    elapsed: Duration,
}

#[derive(Debug)]
struct WindowState {
    scroll_y: f32,
    viewport: Size,
    document_height: f32,
    smooth: Option<SmoothScroll>,
}

impl WindowState {
    fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.height).max(0.0)
    }
}

struct WindowInner {
    state: RefCell<WindowState>,
    smooth_duration: Duration,
    easing: Easing,
    scroll: EventSource<f32>,
    resize: EventSource<Size>,
}

/// Handle to the page window
///
/// Cloning yields another handle to the same window.
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

impl Window {
    pub fn new(viewport: Size, document_height: f32) -> Self {
        Self::with_smooth_scroll(viewport, document_height, Duration::from_millis(600))
    }

    pub fn with_smooth_scroll(viewport: Size, document_height: f32, duration: Duration) -> Self {
        Self {
            inner: Rc::new(WindowInner {
                state: RefCell::new(WindowState {
                    scroll_y: 0.0,
                    viewport,
                    document_height,
                    smooth: None,
                }),
                smooth_duration: duration,
                easing: Easing::EaseInOut,
                scroll: EventSource::new(),
                resize: EventSource::new(),
            }),
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.inner.state.borrow().scroll_y
    }

    pub fn viewport(&self) -> Size {
        self.inner.state.borrow().viewport
    }

    pub fn document_height(&self) -> f32 {
        self.inner.state.borrow().document_height
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f32 {
        self.inner.state.borrow().max_scroll()
    }

    /// Visible part of the document
    pub fn viewport_rect(&self) -> Rect {
        let state = self.inner.state.borrow();
        Rect::new(0.0, state.scroll_y, state.viewport.width, state.viewport.height)
    }

    pub fn is_smooth_scrolling(&self) -> bool {
        self.inner.state.borrow().smooth.is_some()
    }

    /// Listen for scroll offset changes
    pub fn on_scroll<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&f32) + 'static,
    {
        self.inner.scroll.subscribe(listener)
    }

    /// Listen for viewport size changes
    pub fn on_resize<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&Size) + 'static,
    {
        self.inner.resize.subscribe(listener)
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.inner.scroll.listener_count()
    }

    pub fn resize_listener_count(&self) -> usize {
        self.inner.resize.listener_count()
    }

    /// User scroll: cancels any smooth scroll in progress
    pub fn set_scroll_y(&self, y: f32) {
        self.inner.state.borrow_mut().smooth = None;
        self.apply_scroll(y);
    }

    /// Programmatic scroll
    pub fn scroll_to(&self, y: f32, behavior: ScrollBehavior) {
        match behavior {
            ScrollBehavior::Auto => self.set_scroll_y(y),
            ScrollBehavior::Smooth if self.inner.smooth_duration.is_zero() => self.set_scroll_y(y),
            ScrollBehavior::Smooth => {
                let mut state = self.inner.state.borrow_mut();
                let to = y.clamp(0.0, state.max_scroll());
                trace!(from = state.scroll_y, to, "smooth scroll");
                state.smooth = Some(SmoothScroll {
                    from: state.scroll_y,
                    to,
                    elapsed: Duration::ZERO,
                });
            }
        }
    }

    /// Step a smooth scroll in progress
    pub fn advance(&self, dt: Duration) {
        let next = {
            let mut state = self.inner.state.borrow_mut();
            let Some(mut smooth) = state.smooth else {
                return;
            };
            smooth.elapsed += dt;
            let t = smooth.elapsed.as_secs_f32() / self.inner.smooth_duration.as_secs_f32();
            if t >= 1.0 {
                state.smooth = None;
                smooth.to
            } else {
                state.smooth = Some(smooth);
                smooth.from + (smooth.to - smooth.from) * self.inner.easing.apply(t)
            }
        };
        self.apply_scroll(next);
    }

    /// Change the viewport size
    pub fn resize(&self, viewport: Size) {
        let clamped = {
            let mut state = self.inner.state.borrow_mut();
            if state.viewport == viewport {
                return;
            }
            state.viewport = viewport;
            let max = state.max_scroll();
            (state.scroll_y > max).then_some(max)
        };

        self.inner.resize.emit(&viewport);
        if let Some(y) = clamped {
            self.apply_scroll(y);
        }
    }

    /// Change the document height, clamping the scroll offset if needed
    pub fn set_document_height(&self, height: f32) {
        let clamped = {
            let mut state = self.inner.state.borrow_mut();
            state.document_height = height.max(0.0);
            let max = state.max_scroll();
            (state.scroll_y > max).then_some(max)
        };
        if let Some(y) = clamped {
            self.apply_scroll(y);
        }
    }

    fn apply_scroll(&self, y: f32) {
        let y = {
            let mut state = self.inner.state.borrow_mut();
            let y = y.clamp(0.0, state.max_scroll());
            if y == state.scroll_y {
                return;
            }
            state.scroll_y = y;
            y
        };
        self.inner.scroll.emit(&y);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn window() -> Window {
        Window::new(Size::new(1280.0, 800.0), 5000.0)
    }

    #[test]
    fn test_scroll_is_clamped_to_document() {
        let window = window();
        window.set_scroll_y(-20.0);
        assert_eq!(window.scroll_y(), 0.0);
        window.set_scroll_y(9000.0);
        assert_eq!(window.scroll_y(), 4200.0);
    }

    #[test]
    fn test_scroll_emits_only_on_change() {
        let window = window();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _guard = window.on_scroll(move |_| c.set(c.get() + 1));

        window.set_scroll_y(100.0);
        window.set_scroll_y(100.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_smooth_scroll_reaches_target() {
        let window = window();
        let offsets = Rc::new(RefCell::new(Vec::new()));
        let o = offsets.clone();
        let _guard = window.on_scroll(move |y| o.borrow_mut().push(*y));

        window.scroll_to(1000.0, ScrollBehavior::Smooth);
        assert!(window.is_smooth_scrolling());
        assert_eq!(window.scroll_y(), 0.0);

        for _ in 0..10 {
            window.advance(Duration::from_millis(100));
        }

        assert!(!window.is_smooth_scrolling());
        assert_eq!(window.scroll_y(), 1000.0);
        let offsets = offsets.borrow();
        assert!(offsets.len() > 2);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_user_scroll_cancels_smooth_scroll() {
        let window = window();
        window.scroll_to(2000.0, ScrollBehavior::Smooth);
        window.advance(Duration::from_millis(100));
        window.set_scroll_y(10.0);
        window.advance(Duration::from_secs(1));
        assert_eq!(window.scroll_y(), 10.0);
    }

    #[test]
    fn test_shrinking_document_clamps_offset() {
        let window = window();
        window.set_scroll_y(4000.0);
        window.set_document_height(2000.0);
        assert_eq!(window.scroll_y(), 1200.0);
    }

    #[test]
    fn test_resize_notifies_listeners() {
        let window = window();
        let seen = Rc::new(Cell::new(Size::ZERO));
        let s = seen.clone();
        let guard = window.on_resize(move |size| s.set(*size));

        window.resize(Size::new(390.0, 844.0));
        assert_eq!(seen.get(), Size::new(390.0, 844.0));

        drop(guard);
        assert_eq!(window.resize_listener_count(), 0);
    }
}
