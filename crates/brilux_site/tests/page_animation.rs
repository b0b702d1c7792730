//! Scroll-driven animation of the mounted landing page

use brilux_animation::{InViewState, LifecycleTag};
use brilux_core::Size;
use brilux_site::{LandingSite, SiteConfig};
use std::time::Duration;

fn site() -> LandingSite {
    LandingSite::mount(&SiteConfig::default(), Size::new(1280.0, 800.0)).unwrap()
}

fn opacity(site: &LandingSite, path: &str) -> f32 {
    let id = site.element(path).unwrap();
    site.sample(id).unwrap().opacity
}

#[test]
fn test_hero_enters_without_scrolling() {
    let site = site();
    assert_eq!(opacity(&site, "hero/title"), 0.0);

    site.advance(Duration::from_millis(1500));
    for path in ["hero/title", "hero/subtitle", "hero/actions"] {
        assert_eq!(opacity(&site, path), 1.0, "{}", path);
    }
}

#[test]
fn test_sections_below_the_fold_wait() {
    let site = site();
    site.advance(Duration::from_secs(3));
    assert_eq!(opacity(&site, "features/content/smart-control"), 0.0);
    assert_eq!(opacity(&site, "showcase/gallery/wall-sconce"), 0.0);
}

#[test]
fn test_scrolling_plays_features_in_order() {
    let site = site();
    site.scroll_to(400.0);

    let animation = site.animation();
    let start = |path: &str| {
        animation
            .scheduled_start(site.element(path).unwrap())
            .unwrap()
    };
    let header = start("features/content/header");
    let first = start("features/content/smart-control");
    let last = start("features/content/enhanced-security");
    assert!(header < first && first < last);
}

#[test]
fn test_features_replay_after_leaving() {
    let site = site();
    let content = site.element("features/content").unwrap();

    site.scroll_to(400.0);
    site.advance(Duration::from_secs(3));
    assert_eq!(opacity(&site, "features/content/voice-control"), 1.0);

    site.scroll_to(0.0);
    assert_eq!(site.animation().trigger_state(content), Some(InViewState::Hidden));
    assert_eq!(opacity(&site, "features/content/voice-control"), 0.0);

    site.scroll_to(400.0);
    assert_eq!(site.animation().trigger_state(content), Some(InViewState::Visible));
}

#[test]
fn test_gallery_plays_once() {
    let site = site();
    let gallery = site.layout().block("showcase").unwrap().top;

    site.scroll_to(gallery);
    site.advance(Duration::from_secs(3));
    site.scroll_to(0.0);
    site.advance(Duration::from_secs(1));

    assert_eq!(opacity(&site, "showcase/gallery/strip-light"), 1.0);
    let id = site.element("showcase/gallery").unwrap();
    assert_eq!(site.animation().resting_tag(id), Some(LifecycleTag::AnimateOnEnter));
}

#[test]
fn test_navigation_reveals_target_section() {
    let site = site();
    site.on_navigate("about");
    for _ in 0..40 {
        site.advance(Duration::from_millis(50));
    }
    assert_eq!(opacity(&site, "about/content/story"), 1.0);
}

#[test]
fn test_card_hover_lifts_and_releases() {
    let site = site();
    site.scroll_to(400.0);
    site.advance(Duration::from_secs(3));

    let card = site.element("features/content/smart-control").unwrap();
    site.set_hovered(card, true).unwrap();
    site.advance(Duration::from_millis(300));
    assert_eq!(site.sample(card).unwrap().y, -10.0);

    site.set_hovered(card, false).unwrap();
    site.advance(Duration::from_secs(1));
    assert_eq!(site.sample(card).unwrap().y, 0.0);
}
