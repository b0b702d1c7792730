//! Landing page runtime
//!
//! [`LandingSite`] mounts the navigation controller and the animated page on
//! one window and keeps them in step:
//!
//! - scrolling feeds every viewport trigger
//! - [`LandingSite::resize`] re-stacks the page (the hero fills the viewport)
//! - opening or closing the mobile menu plays its enter or exit variant
//!
//! Everything runs on the caller's thread; time moves through
//! [`LandingSite::advance`].

use crate::config::SiteConfig;
use crate::nav::{NavState, NavigationController};
use crate::page::{LandingPage, MountedPage};
use crate::section::{PageLayout, SectionId};
use crate::window::Window;
use brilux_animation::{
    presets, AnimationError, AnimationOrchestrator, ElementId, LifecycleTag, VisualState,
};
use brilux_core::{ListenerGuard, Size};
use smallvec::SmallVec;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// Animated parts of the navigation bar
#[derive(Clone, Debug)]
pub struct NavbarElements {
    pub bar: ElementId,
    pub logo: ElementId,
    pub links: SmallVec<[(SectionId, ElementId); 5]>,
    pub mobile_menu: ElementId,
}

impl NavbarElements {
    fn mount(orch: &mut AnimationOrchestrator) -> Result<Self, AnimationError> {
        let bar = orch.mount(Rc::new(presets::navbar_enter()), None)?;
        let logo = orch.mount(Rc::new(presets::logo()), Some(bar))?;

        let link = Rc::new(presets::nav_link());
        let links: SmallVec<[_; 5]> = SectionId::NAV_LINKS
            .into_iter()
            .map(|section| Ok((section, orch.mount(Rc::clone(&link), Some(bar))?)))
            .collect::<Result<_, AnimationError>>()?;

        // Not a child of the bar: it must not open when the bar slides in
        let mobile_menu = orch.mount(Rc::new(presets::mobile_menu()), None)?;
        orch.autoplay(bar, LifecycleTag::AnimateOnEnter)?;

        Ok(Self {
            bar,
            logo,
            links,
            mobile_menu,
        })
    }

    pub fn link(&self, section: SectionId) -> Option<ElementId> {
        self.links
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, id)| *id)
    }
}

type SharedOrchestrator = Rc<RefCell<AnimationOrchestrator>>;

fn sync(orch: &SharedOrchestrator, page: &MountedPage, layout: &PageLayout, window: &Window) {
    let result = page.sync_visibility(&mut orch.borrow_mut(), layout, window.viewport_rect());
    match result {
        Ok(0) => {}
        Ok(fired) => debug!(fired, scroll_y = window.scroll_y(), "viewport triggers fired"),
        Err(err) => warn!(error = %err, "viewport trigger update failed"),
    }
}

/// The running landing page
pub struct LandingSite {
    window: Window,
    page: LandingPage,
    layout: Rc<RefCell<PageLayout>>,
    animation: SharedOrchestrator,
    mounted: Rc<MountedPage>,
    navbar: NavbarElements,
    nav: NavigationController,
    _scroll: ListenerGuard,
    _menu: ListenerGuard,
}

impl LandingSite {
    /// Mount the standard page in a window of `viewport` size
    pub fn mount(config: &SiteConfig, viewport: Size) -> Result<Self, AnimationError> {
        let page = LandingPage::standard().with_trigger_margin(config.animation.trigger_margin);
        let layout = page.layout(viewport);
        let window = Window::with_smooth_scroll(
            viewport,
            layout.document_height(),
            config.navigation.smooth_scroll(),
        );

        let mut orch = AnimationOrchestrator::new();
        let mounted = Rc::new(page.mount(&mut orch)?);
        let navbar = NavbarElements::mount(&mut orch)?;
        let animation = Rc::new(RefCell::new(orch));
        let nav = NavigationController::mount(&window, layout.clone(), &config.navigation);
        let layout = Rc::new(RefCell::new(layout));

        sync(&animation, &mounted, &layout.borrow(), &window);

        let scroll = {
            let (animation, mounted, layout, win) = (
                Rc::clone(&animation),
                Rc::clone(&mounted),
                Rc::clone(&layout),
                window.clone(),
            );
            window.on_scroll(move |_| sync(&animation, &mounted, &layout.borrow(), &win))
        };

        let menu = {
            let animation = Rc::clone(&animation);
            let panel = navbar.mobile_menu;
            let was_open = Cell::new(false);
            nav.subscribe(move |state| {
                if was_open.replace(state.is_mobile_menu_open) == state.is_mobile_menu_open {
                    return;
                }
                let tag = if state.is_mobile_menu_open {
                    LifecycleTag::AnimateOnEnter
                } else {
                    LifecycleTag::Exit
                };
                if let Err(err) = animation.borrow_mut().play(panel, tag) {
                    warn!(error = %err, "mobile menu animation failed");
                }
            })
        };

        debug!(
            width = viewport.width,
            height = viewport.height,
            document_height = window.document_height(),
            "landing site mounted"
        );

        Ok(Self {
            window,
            page,
            layout,
            animation,
            mounted,
            navbar,
            nav,
            _scroll: scroll,
            _menu: menu,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn page(&self) -> &LandingPage {
        &self.page
    }

    pub fn layout(&self) -> Ref<'_, PageLayout> {
        self.layout.borrow()
    }

    pub fn nav(&self) -> &NavigationController {
        &self.nav
    }

    pub fn nav_state(&self) -> NavState {
        self.nav.state()
    }

    pub fn navbar(&self) -> &NavbarElements {
        &self.navbar
    }

    pub fn mounted(&self) -> &MountedPage {
        &self.mounted
    }

    pub fn animation(&self) -> Ref<'_, AnimationOrchestrator> {
        self.animation.borrow()
    }

    /// Element mounted at `path` (`block/label/...`)
    pub fn element(&self, path: &str) -> Option<ElementId> {
        self.mounted.element(path)
    }

    pub fn sample(&self, id: ElementId) -> Option<VisualState> {
        self.animation.borrow().sample(id)
    }

    /// User scroll
    pub fn scroll_to(&self, y: f32) {
        self.window.set_scroll_y(y);
    }

    /// Resize the window and re-stack the page for the new viewport
    pub fn resize(&self, viewport: Size) {
        let layout = self.page.layout(viewport);
        let height = layout.document_height();
        self.nav.observer().set_layout(layout.clone());
        *self.layout.borrow_mut() = layout;

        self.window.set_document_height(height);
        self.window.resize(viewport);
        sync(&self.animation, &self.mounted, &self.layout.borrow(), &self.window);
    }

    pub fn on_navigate(&self, id: &str) {
        self.nav.on_navigate(id);
    }

    pub fn toggle_mobile_menu(&self) {
        self.nav.toggle_mobile_menu();
    }

    pub fn set_hovered(&self, id: ElementId, hovered: bool) -> Result<(), AnimationError> {
        self.animation.borrow_mut().set_hovered(id, hovered)
    }

    pub fn set_pressed(&self, id: ElementId, pressed: bool) -> Result<(), AnimationError> {
        self.animation.borrow_mut().set_pressed(id, pressed)
    }

    /// Advance smooth scrolling and every animation
    pub fn advance(&self, dt: Duration) {
        self.window.advance(dt);
        self.animation.borrow_mut().advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> LandingSite {
        LandingSite::mount(&SiteConfig::default(), Size::new(1280.0, 800.0)).unwrap()
    }

    #[test]
    fn test_navbar_slides_in_but_menu_stays_closed() {
        let site = site();
        site.advance(Duration::from_secs(1));

        let navbar = site.navbar();
        assert_eq!(site.sample(navbar.bar).unwrap().y, 0.0);
        let menu = site.sample(navbar.mobile_menu).unwrap();
        assert_eq!(menu.opacity, 0.0);
        assert_eq!(menu.y, -20.0);
    }

    #[test]
    fn test_menu_animation_follows_toggle() {
        let site = site();
        let menu = site.navbar().mobile_menu;

        site.toggle_mobile_menu();
        site.advance(Duration::from_millis(400));
        assert_eq!(site.sample(menu).unwrap().opacity, 1.0);

        site.on_navigate("about");
        assert_eq!(site.animation().resting_tag(menu), Some(LifecycleTag::Exit));
        site.advance(Duration::from_millis(400));
        assert_eq!(site.sample(menu).unwrap().opacity, 0.0);
    }

    #[test]
    fn test_links_cover_navigation_sections() {
        let site = site();
        assert!(site.navbar().link(SectionId::Contact).is_some());
        assert!(site.navbar().link(SectionId::Design).is_none());
    }

    #[test]
    fn test_resize_restacks_page() {
        let site = site();
        site.resize(Size::new(390.0, 600.0));
        assert_eq!(site.layout().block("features").unwrap().top, 600.0);
        assert_eq!(site.window().document_height(), site.layout().document_height());
        assert_eq!(
            site.nav().observer().layout().anchor(SectionId::Features).unwrap().top,
            600.0
        );
    }
}
