//! Navbar behavior driven through a mounted landing site

use brilux_core::Size;
use brilux_site::{LandingSite, NavState, SectionId, SiteConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn site() -> LandingSite {
    LandingSite::mount(&SiteConfig::default(), Size::new(1280.0, 800.0)).unwrap()
}

fn settle(site: &LandingSite) {
    for _ in 0..30 {
        site.advance(Duration::from_millis(50));
    }
}

#[test]
fn test_fresh_page_state() {
    let site = site();
    assert_eq!(
        site.nav_state(),
        NavState {
            is_compact: false,
            active_section: SectionId::Home,
            is_mobile_menu_open: false,
        }
    );
}

#[test]
fn test_compact_threshold_is_strict() {
    let site = site();
    site.scroll_to(50.0);
    assert!(!site.nav_state().is_compact);
    site.scroll_to(50.5);
    assert!(site.nav_state().is_compact);
    site.scroll_to(0.0);
    assert!(!site.nav_state().is_compact);
}

#[test]
fn test_scrolling_moves_active_section() {
    let site = site();
    let features = site.layout().anchor(SectionId::Features).unwrap().top;
    site.scroll_to(features + 400.0);
    assert_eq!(site.nav_state().active_section, SectionId::Features);

    let about = site.layout().anchor(SectionId::About).unwrap().top;
    site.scroll_to(about);
    assert_eq!(site.nav_state().active_section, SectionId::About);
}

#[test]
fn test_untracked_block_keeps_previous_section() {
    let site = site();
    let features = site.layout().anchor(SectionId::Features).unwrap().top;
    let showcase = site.layout().block("showcase").unwrap().top;
    site.scroll_to(features + 400.0);
    // The trimmed viewport falls inside the showcase block only
    site.scroll_to(showcase + 100.0);
    assert_eq!(site.nav_state().active_section, SectionId::Features);
}

#[test]
fn test_navigate_scrolls_to_section() {
    let site = site();
    site.toggle_mobile_menu();
    site.on_navigate("contact");

    let state = site.nav_state();
    assert_eq!(state.active_section, SectionId::Contact);
    assert!(!state.is_mobile_menu_open);
    assert!(site.window().is_smooth_scrolling());

    settle(&site);
    let contact = site.layout().anchor(SectionId::Contact).unwrap().top;
    let expected = contact.min(site.window().max_scroll());
    assert_eq!(site.window().scroll_y(), expected);
    assert_eq!(site.nav_state().active_section, SectionId::Contact);
    assert!(site.nav_state().is_compact);
}

#[test]
fn test_unknown_target_changes_nothing() {
    let site = site();
    site.scroll_to(300.0);
    let before = site.nav_state();

    site.on_navigate("pricing");
    site.on_navigate("");
    assert_eq!(site.nav_state(), before);
    assert_eq!(site.window().scroll_y(), 300.0);
}

#[test]
fn test_user_scroll_cancels_navigation() {
    let site = site();
    site.on_navigate("products");
    site.advance(Duration::from_millis(100));
    site.scroll_to(10.0);
    assert!(!site.window().is_smooth_scrolling());

    settle(&site);
    assert_eq!(site.window().scroll_y(), 10.0);
}

#[test]
fn test_changes_are_published_once() {
    let site = site();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _guard = site.nav().subscribe(move |state| sink.borrow_mut().push(*state));

    site.scroll_to(80.0);
    site.scroll_to(90.0);
    site.toggle_mobile_menu();
    site.toggle_mobile_menu();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].is_compact);
    assert!(seen[1].is_mobile_menu_open);
    assert!(!seen[2].is_mobile_menu_open);
}

#[test]
fn test_dropping_site_releases_window() {
    let site = site();
    let window = site.window().clone();
    assert!(window.scroll_listener_count() > 0);

    drop(site);
    assert_eq!(window.scroll_listener_count(), 0);
    assert_eq!(window.resize_listener_count(), 0);
}

#[test]
fn test_scroll_after_navigating_restores_visible_section() {
    let site = site();
    let products = site.layout().anchor(SectionId::Products).unwrap().top;
    site.scroll_to(products);
    assert_eq!(site.nav_state().active_section, SectionId::Products);

    site.on_navigate("about");
    assert_eq!(site.nav_state().active_section, SectionId::About);

    // Scrolling before the smooth scroll leaves products cancels it
    site.scroll_to(products + 10.0);
    assert_eq!(site.nav().observer().active(), SectionId::Products);
    assert_eq!(site.nav_state().active_section, SectionId::Products);
}
