//! Active section detection
//!
//! On every scroll or resize the observer measures how much of each anchored
//! section lies inside the viewport, after the root margin is applied. The
//! section with the greatest visible ratio is active. Ratios within
//! [`RATIO_EPSILON`] of each other tie, and ties go to the section that comes
//! first in the document. When no section intersects, the previous active
//! section is kept.

use crate::section::{PageLayout, SectionId};
use crate::window::Window;
use brilux_core::{EventSource, ListenerGuard, RootMargin};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// Ratios closer than this are treated as equal
pub const RATIO_EPSILON: f32 = 1e-4;

/// Visible share of one section
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionRatio {
    pub section: SectionId,
    /// `visible_height / section_height`, in 0..=1
    pub ratio: f32,
}

pub type SectionRatios = SmallVec<[SectionRatio; 8]>;

/// Visible ratio of every anchored section, in document order
pub fn intersection_ratios(
    layout: &PageLayout,
    window: &Window,
    margin: &RootMargin,
) -> SectionRatios {
    let root = margin.apply(window.viewport_rect());
    layout
        .sections()
        .map(|(section, block)| {
            let ratio = if block.height > 0.0 {
                block.bounds(root.width).vertical_overlap(&root) / block.height
            } else {
                0.0
            };
            SectionRatio { section, ratio }
        })
        .collect()
}

/// Section with the greatest ratio, earliest on ties, `None` if nothing intersects
pub fn pick_active(ratios: &[SectionRatio]) -> Option<SectionId> {
    let mut best: Option<SectionRatio> = None;
    for candidate in ratios.iter().filter(|r| r.ratio > 0.0) {
        match best {
            Some(current) if candidate.ratio <= current.ratio + RATIO_EPSILON => {}
            _ => best = Some(*candidate),
        }
    }
    best.map(|r| r.section)
}

struct ObserverInner {
    window: Window,
    layout: RefCell<PageLayout>,
    margin: RootMargin,
    active: Cell<SectionId>,
    changes: EventSource<SectionId>,
}

impl ObserverInner {
    fn refresh(&self) {
        let ratios = intersection_ratios(&self.layout.borrow(), &self.window, &self.margin);
        let Some(next) = pick_active(&ratios) else {
            return;
        };
        if self.active.replace(next) != next {
            debug!(section = %next, "active section changed");
            self.changes.emit(&next);
        }
    }
}

/// Reports which section currently fills the viewport
pub struct SectionIntersectionObserver {
    inner: Rc<ObserverInner>,
    _scroll: ListenerGuard,
    _resize: ListenerGuard,
}

impl SectionIntersectionObserver {
    /// Start observing `layout` through `window`; stops when dropped
    pub fn mount(window: &Window, layout: PageLayout, margin: RootMargin) -> Self {
        let initial = layout.sections().next().map(|(s, _)| s).unwrap_or_default();
        let inner = Rc::new(ObserverInner {
            window: window.clone(),
            layout: RefCell::new(layout),
            margin,
            active: Cell::new(initial),
            changes: EventSource::new(),
        });
        inner.refresh();

        let on_scroll = Rc::clone(&inner);
        let on_resize = Rc::clone(&inner);
        Self {
            _scroll: window.on_scroll(move |_| on_scroll.refresh()),
            _resize: window.on_resize(move |_| on_resize.refresh()),
            inner,
        }
    }

    pub fn active(&self) -> SectionId {
        self.inner.active.get()
    }

    pub fn margin(&self) -> RootMargin {
        self.inner.margin
    }

    pub fn layout(&self) -> std::cell::Ref<'_, PageLayout> {
        self.inner.layout.borrow()
    }

    /// Replace the section geometry and re-evaluate
    pub fn set_layout(&self, layout: PageLayout) {
        *self.inner.layout.borrow_mut() = layout;
        self.inner.refresh();
    }

    /// Mark `section` active, as after navigating to it
    ///
    /// The next scroll or resize re-evaluates from here, so a viewport that
    /// still shows another section publishes that section.
    pub fn set_active(&self, section: SectionId) {
        if self.inner.active.replace(section) != section {
            debug!(%section, "active section set");
            self.inner.changes.emit(&section);
        }
    }

    /// Current visible ratio of every section
    pub fn ratios(&self) -> SectionRatios {
        intersection_ratios(&self.inner.layout.borrow(), &self.inner.window, &self.inner.margin)
    }

    /// Listen for active section changes
    pub fn subscribe<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&SectionId) + 'static,
    {
        self.inner.changes.subscribe(listener)
    }
}
