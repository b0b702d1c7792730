//! BriLux Site
//!
//! The landing page runtime. A [`Window`] host publishes scroll and resize
//! events; the components below subscribe for as long as they are alive:
//!
//! - [`ViewportTracker`]: whether the page has scrolled past a threshold
//! - [`SectionIntersectionObserver`]: which section fills the viewport
//! - [`NavigationController`]: navbar state, section navigation, mobile menu
//! - [`ElementSizeTracker`]: re-measures an element after each resize
//! - [`LandingPage`]: the animated page plan, mounted on an orchestrator
//! - [`LandingSite`]: all of the above wired to one window
//!
//! # Example
//!
//! ```rust
//! use brilux_core::Size;
//! use brilux_site::{LandingSite, SectionId, SiteConfig};
//! use std::time::Duration;
//!
//! let site = LandingSite::mount(&SiteConfig::default(), Size::new(1280.0, 800.0)).unwrap();
//! assert_eq!(site.nav_state().active_section, SectionId::Home);
//!
//! site.on_navigate("products");
//! site.advance(Duration::from_secs(1));
//! assert!(site.nav_state().is_compact);
//! assert_eq!(site.nav_state().active_section, SectionId::Products);
//! ```

pub mod config;
pub mod element_size;
pub mod error;
pub mod intersection;
pub mod mask;
pub mod nav;
pub mod page;
pub mod section;
pub mod site;
pub mod viewport;
pub mod window;

pub use config::{
    AnimationSettings, NavigationSettings, ShowcaseSettings, SiteConfig, CONFIG_FILE,
};
pub use element_size::ElementSizeTracker;
pub use error::{ConfigError, NavigationError};
pub use intersection::{
    intersection_ratios, pick_active, SectionIntersectionObserver, SectionRatio, SectionRatios,
};
pub use mask::rounded_mask_uri;
pub use nav::{MenuEvent, MenuState, NavState, NavigationController};
pub use page::{
    Binding, BlockHeight, LandingPage, MountedElement, MountedPage, PageBlock, PlanNode, Preset,
};
pub use section::{LayoutBlock, PageLayout, SectionId};
pub use site::{LandingSite, NavbarElements};
pub use viewport::{is_past_threshold, ViewportTracker, DEFAULT_SCROLL_THRESHOLD};
pub use window::{ScrollBehavior, Window};
