//! Headless scroll simulation of the landing page

use anyhow::Result;
use brilux_core::Size;
use brilux_site::{LandingSite, NavState, SectionId, SiteConfig};
use serde::Serialize;
use std::time::Duration;

/// Fixed frame step
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Serialize)]
pub struct SectionReport {
    pub section: SectionId,
    pub top: f32,
    pub ratio: f32,
}

/// Page state at one scroll offset
#[derive(Debug, Serialize)]
pub struct ScrollReport {
    pub scroll_y: f32,
    pub document_height: f32,
    pub nav: NavState,
    pub sections: Vec<SectionReport>,
    /// Elements whose viewport trigger has played
    pub revealed: Vec<String>,
}

fn mount(config: &SiteConfig, width: f32, height: f32) -> Result<LandingSite> {
    Ok(LandingSite::mount(config, Size::new(width, height))?)
}

fn report(site: &LandingSite) -> ScrollReport {
    let ratios = site.nav().observer().ratios();
    let layout = site.layout();
    let ratio_of = |section: SectionId| {
        ratios
            .iter()
            .find(|r| r.section == section)
            .map_or(0.0, |r| r.ratio)
    };

    let sections = layout
        .sections()
        .map(|(section, block)| SectionReport {
            section,
            top: block.top,
            ratio: ratio_of(section),
        })
        .collect();

    let animation = site.animation();
    let revealed = site
        .mounted()
        .triggered()
        .filter(|e| {
            animation.resting_tag(e.id) == Some(brilux_animation::LifecycleTag::AnimateOnEnter)
        })
        .map(|e| e.path.clone())
        .collect();

    ScrollReport {
        scroll_y: site.window().scroll_y(),
        document_height: site.window().document_height(),
        nav: site.nav_state(),
        sections,
        revealed,
    }
}

/// Jump to `y` and report
pub fn scroll(config: &SiteConfig, width: f32, height: f32, y: f32) -> Result<ScrollReport> {
    let site = mount(config, width, height)?;
    site.scroll_to(y);
    Ok(report(&site))
}

/// Navigate to `section` and run frames until the smooth scroll lands
pub fn navigate(
    config: &SiteConfig,
    width: f32,
    height: f32,
    section: &str,
) -> Result<ScrollReport> {
    let site = mount(config, width, height)?;
    site.nav().try_navigate(section)?;

    let budget = config.navigation.smooth_scroll() + FRAME * 2;
    let mut elapsed = Duration::ZERO;
    while site.window().is_smooth_scrolling() && elapsed < budget {
        site.advance(FRAME);
        elapsed += FRAME;
    }
    Ok(report(&site))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_report() {
        let config = SiteConfig::default();
        let report = scroll(&config, 1280.0, 800.0, 1200.0).unwrap();

        assert_eq!(report.scroll_y, 1200.0);
        assert!(report.nav.is_compact);
        assert_eq!(report.nav.active_section, SectionId::Features);
        assert!(report.revealed.iter().any(|p| p == "features/content"));

        let features = report
            .sections
            .iter()
            .find(|s| s.section == SectionId::Features)
            .unwrap();
        // The trimmed 320px root sits inside the 1600px block
        assert!((features.ratio - 0.2).abs() < 1e-4);
        assert!(report
            .sections
            .iter()
            .filter(|s| s.section != SectionId::Features)
            .all(|s| s.ratio == 0.0));
    }

    #[test]
    fn test_navigate_lands_on_section() {
        let config = SiteConfig::default();
        let report = navigate(&config, 1280.0, 800.0, "about").unwrap();

        let about = report
            .sections
            .iter()
            .find(|s| s.section == SectionId::About)
            .unwrap();
        assert_eq!(report.scroll_y, about.top);
        assert_eq!(report.nav.active_section, SectionId::About);
    }

    #[test]
    fn test_navigate_to_unknown_section_fails() {
        let config = SiteConfig::default();
        assert!(navigate(&config, 1280.0, 800.0, "pricing").is_err());
    }
}
