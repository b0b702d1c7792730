//! Page sections and their placement in the document

use brilux_core::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anchor-identified region of the page
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    #[default]
    Home,
    Features,
    Modularity,
    Design,
    Products,
    About,
    Contact,
}

impl SectionId {
    /// Every section, in document order
    pub const ALL: [SectionId; 7] = [
        SectionId::Home,
        SectionId::Features,
        SectionId::Modularity,
        SectionId::Design,
        SectionId::Products,
        SectionId::About,
        SectionId::Contact,
    ];

    /// Sections linked from the navigation bar
    pub const NAV_LINKS: [SectionId; 5] = [
        SectionId::Home,
        SectionId::Features,
        SectionId::Products,
        SectionId::About,
        SectionId::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::Features => "features",
            SectionId::Modularity => "modularity",
            SectionId::Design => "design",
            SectionId::Products => "products",
            SectionId::About => "about",
            SectionId::Contact => "contact",
        }
    }

    /// Look up a section by anchor id; unknown ids name no section
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }

    /// Navigation bar label
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::Features => "Features",
            SectionId::Modularity => "Modularity",
            SectionId::Design => "Design",
            SectionId::Products => "Products",
            SectionId::About => "About",
            SectionId::Contact => "Contact",
        }
    }

    pub fn is_nav_link(&self) -> bool {
        Self::NAV_LINKS.contains(self)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block of the page and where it sits in the document
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutBlock {
    pub name: String,
    /// Anchor id, if the block is a navigable section
    pub section: Option<SectionId>,
    pub top: f32,
    pub height: f32,
}

impl LayoutBlock {
    pub fn bounds(&self, width: f32) -> Rect {
        Rect::new(0.0, self.top, width, self.height)
    }
}

/// Vertical placement of every page block, in document order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageLayout {
    blocks: Vec<LayoutBlock>,
}

impl PageLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack blocks top to bottom starting at zero
    pub fn stacked<'a>(
        blocks: impl IntoIterator<Item = (&'a str, Option<SectionId>, f32)>,
    ) -> Self {
        let mut layout = Self::new();
        for (name, section, height) in blocks {
            layout.push(name, section, height);
        }
        layout
    }

    /// Append a block below the last one
    pub fn push(&mut self, name: &str, section: Option<SectionId>, height: f32) {
        let top = self.document_height();
        self.blocks.push(LayoutBlock {
            name: name.to_string(),
            section,
            top,
            height: height.max(0.0),
        });
    }

    pub fn blocks(&self) -> &[LayoutBlock] {
        &self.blocks
    }

    pub fn block(&self, name: &str) -> Option<&LayoutBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Block carrying a section anchor
    pub fn anchor(&self, section: SectionId) -> Option<&LayoutBlock> {
        self.blocks.iter().find(|b| b.section == Some(section))
    }

    /// Anchored sections in document order
    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &LayoutBlock)> {
        self.blocks
            .iter()
            .filter_map(|b| b.section.map(|section| (section, b)))
    }

    pub fn document_height(&self) -> f32 {
        self.blocks.last().map(|b| b.top + b.height).unwrap_or(0.0)
    }
}
