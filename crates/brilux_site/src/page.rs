//! Landing page animation plan
//!
//! The page is a list of blocks in document order. Each block holds a tree
//! of animated nodes; every node names the variant preset it plays and how
//! it is started:
//!
//! - [`Binding::Inherit`]: follows its parent, taking a stagger slot
//! - [`Binding::Viewport`]: starts from its own viewport trigger
//! - [`Binding::Autoplay`]: starts on mount
//!
//! Viewport triggers are tested against the bounds of their block.

use crate::section::{PageLayout, SectionId};
use brilux_animation::{
    presets, AnimationError, AnimationOrchestrator, ElementId, LifecycleTag, TriggerAction,
    VariantSet, ViewportTrigger,
};
use brilux_core::{MarginLength, Rect, RootMargin, Size};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Variant presets available to page nodes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    FadeInUp,
    StaggerContainer,
    IconPop,
    FeatureCard,
    GlowPulse,
    ScaleIn,
    HeroTitle,
    HeroSubtitle,
    HeroActions,
}

impl Preset {
    pub fn variant_set(&self) -> VariantSet {
        match self {
            Preset::FadeInUp => presets::fade_in_up(),
            Preset::StaggerContainer => presets::stagger_container(),
            Preset::IconPop => presets::icon_pop(),
            Preset::FeatureCard => presets::feature_card(),
            Preset::GlowPulse => presets::glow_pulse(),
            Preset::ScaleIn => presets::scale_in(),
            Preset::HeroTitle => presets::hero_line("hero-title", -50.0, Duration::ZERO),
            Preset::HeroSubtitle => {
                presets::hero_line("hero-subtitle", 30.0, Duration::from_millis(200))
            }
            Preset::HeroActions => {
                presets::hero_line("hero-actions", 30.0, Duration::from_millis(400))
            }
        }
    }
}

/// How a node starts animating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Binding {
    Inherit,
    Viewport { once: bool },
    Autoplay,
}

/// One animated element and its animated descendants
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanNode {
    pub label: String,
    pub preset: Preset,
    pub binding: Binding,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn new(label: impl Into<String>, preset: Preset) -> Self {
        Self {
            label: label.into(),
            preset,
            binding: Binding::Inherit,
            children: Vec::new(),
        }
    }

    pub fn viewport(mut self, once: bool) -> Self {
        self.binding = Binding::Viewport { once };
        self
    }

    pub fn autoplay(mut self) -> Self {
        self.binding = Binding::Autoplay;
        self
    }

    pub fn child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = PlanNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of nodes in this subtree
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(PlanNode::subtree_len).sum::<usize>()
    }
}

/// Height of a page block
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockHeight {
    /// Fills the viewport
    Viewport,
    Fixed(f32),
}

/// One block of the page
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageBlock {
    pub name: String,
    pub section: Option<SectionId>,
    pub height: BlockHeight,
    pub nodes: Vec<PlanNode>,
}

impl PageBlock {
    pub fn new(name: impl Into<String>, section: Option<SectionId>, height: BlockHeight) -> Self {
        Self {
            name: name.into(),
            section,
            height,
            nodes: Vec::new(),
        }
    }

    pub fn node(mut self, node: PlanNode) -> Self {
        self.nodes.push(node);
        self
    }
}

/// The whole page
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LandingPage {
    pub blocks: Vec<PageBlock>,
    /// Root margin of every viewport trigger
    pub trigger_margin: RootMargin,
}

fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// A fade-in-up item per title
fn items<'a>(titles: &'a [&'a str]) -> impl Iterator<Item = PlanNode> + 'a {
    titles.iter().map(|t| PlanNode::new(slug(t), Preset::FadeInUp))
}

/// Icon badge with its glow
fn icon(glow: PlanNode) -> PlanNode {
    PlanNode::new("icon", Preset::IconPop).child(glow)
}

/// Section heading block: title and lead paragraph
fn header() -> PlanNode {
    PlanNode::new("header", Preset::FadeInUp)
}

impl LandingPage {
    pub const FEATURES: [&'static str; 6] = [
        "Smart Control",
        "Energy Efficiency",
        "Custom Themes",
        "Voice Control",
        "Smart Scheduling",
        "Enhanced Security",
    ];

    pub const SHOWCASE: [&'static str; 6] = [
        "Smart Pendant Light",
        "Wall Sconce",
        "Table Lamp",
        "Floor Lamp",
        "Ceiling Light",
        "Strip Light",
    ];

    pub const MODULARITY: [&'static str; 4] = [
        "Customizable Components",
        "Scalable Architecture",
        "Easy Integration",
        "Future-Proof Design",
    ];

    pub const DESIGNS: [&'static str; 6] = [
        "Modern Minimalist",
        "Industrial Edge",
        "Artistic Fusion",
        "Natural Harmony",
        "Tech-Forward",
        "Classic Innovation",
    ];

    pub const PRODUCTS: [&'static str; 3] = ["Smart Bulb", "Light Strip", "Smart Lamp"];

    /// The BriLux landing page
    pub fn standard() -> Self {
        let fixed = BlockHeight::Fixed;
        let hero = PageBlock::new("hero", Some(SectionId::Home), BlockHeight::Viewport)
            .node(PlanNode::new("title", Preset::HeroTitle).autoplay())
            .node(PlanNode::new("subtitle", Preset::HeroSubtitle).autoplay())
            .node(PlanNode::new("actions", Preset::HeroActions).autoplay());

        let feature_cards = Self::FEATURES.iter().map(|title| {
            PlanNode::new(slug(title), Preset::FeatureCard)
                .child(icon(PlanNode::new("glow", Preset::GlowPulse)))
                .child(PlanNode::new("title", Preset::FadeInUp))
                .child(PlanNode::new("description", Preset::FadeInUp))
        });
        let features = PageBlock::new("features", Some(SectionId::Features), fixed(1600.0))
            .node(
                PlanNode::new("content", Preset::StaggerContainer)
                    .viewport(false)
                    .child(
                        header()
                            .child(icon(PlanNode::new("glow", Preset::GlowPulse).autoplay()))
                            .child(PlanNode::new("title", Preset::FadeInUp))
                            .child(PlanNode::new("description", Preset::FadeInUp)),
                    )
                    .children(feature_cards),
            );

        let showcase = PageBlock::new("showcase", None, fixed(1000.0)).node(
            PlanNode::new("gallery", Preset::StaggerContainer)
                .viewport(true)
                .children(items(&Self::SHOWCASE)),
        );

        let modularity = PageBlock::new("modularity", Some(SectionId::Modularity), fixed(900.0))
            .node(
                PlanNode::new("content", Preset::StaggerContainer)
                    .viewport(true)
                    .child(
                        PlanNode::new("text", Preset::FadeInUp).child(
                            PlanNode::new("modules", Preset::StaggerContainer)
                                .viewport(true)
                                .children(items(&Self::MODULARITY)),
                        ),
                    )
                    .child(PlanNode::new("scene", Preset::ScaleIn)),
            );

        let design = PageBlock::new("design", Some(SectionId::Design), fixed(1400.0))
            .node(PlanNode::new("title", Preset::FadeInUp).autoplay())
            .node(
                PlanNode::new("grid", Preset::StaggerContainer)
                    .viewport(true)
                    .children(items(&Self::DESIGNS)),
            );

        let products = PageBlock::new("products", Some(SectionId::Products), fixed(1000.0))
            .node(
                PlanNode::new("content", Preset::StaggerContainer)
                    .viewport(false)
                    .child(header())
                    .children(items(&Self::PRODUCTS)),
            );

        let about = PageBlock::new("about", Some(SectionId::About), fixed(900.0)).node(
            PlanNode::new("content", Preset::StaggerContainer)
                .viewport(false)
                .child(header())
                .child(PlanNode::new("story", Preset::FadeInUp))
                .child(PlanNode::new("visual", Preset::FadeInUp)),
        );

        let contact = PageBlock::new("contact", Some(SectionId::Contact), fixed(1000.0))
            .node(
                PlanNode::new("content", Preset::StaggerContainer)
                    .viewport(false)
                    .child(header())
                    .child(PlanNode::new("form", Preset::FadeInUp)),
            );

        Self {
            blocks: vec![hero, features, showcase, modularity, design, products, about, contact],
            trigger_margin: RootMargin::uniform(MarginLength::Px(-100.0)),
        }
    }

    pub fn with_trigger_margin(mut self, margin: RootMargin) -> Self {
        self.trigger_margin = margin;
        self
    }

    pub fn block(&self, name: &str) -> Option<&PageBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Total number of animated nodes
    pub fn node_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| b.nodes.iter())
            .map(PlanNode::subtree_len)
            .sum()
    }

    /// Stack the blocks for a viewport
    pub fn layout(&self, viewport: Size) -> PageLayout {
        PageLayout::stacked(self.blocks.iter().map(|b| {
            let height = match b.height {
                BlockHeight::Viewport => viewport.height,
                BlockHeight::Fixed(height) => height,
            };
            (b.name.as_str(), b.section, height)
        }))
    }

    /// Mount every node into the orchestrator
    pub fn mount(&self, orch: &mut AnimationOrchestrator) -> Result<MountedPage, AnimationError> {
        let mut mounter = Mounter {
            orch,
            margin: self.trigger_margin,
            page: MountedPage::default(),
            variants: FxHashMap::default(),
            autoplay: Vec::new(),
        };

        for block in &self.blocks {
            for node in &block.nodes {
                mounter.mount(&block.name, node, None, &block.name)?;
            }
        }

        // Subtrees are complete, so autoplay reaches every follower
        for id in std::mem::take(&mut mounter.autoplay) {
            mounter.orch.autoplay(id, LifecycleTag::AnimateOnEnter)?;
        }

        debug!(elements = mounter.page.elements.len(), "landing page mounted");
        Ok(mounter.page)
    }
}

struct Mounter<'a> {
    orch: &'a mut AnimationOrchestrator,
    margin: RootMargin,
    page: MountedPage,
    /// One shared variant set per preset
    variants: FxHashMap<Preset, Rc<VariantSet>>,
    autoplay: Vec<ElementId>,
}

impl Mounter<'_> {
    fn mount(
        &mut self,
        block: &str,
        node: &PlanNode,
        parent: Option<ElementId>,
        prefix: &str,
    ) -> Result<(), AnimationError> {
        let set = Rc::clone(
            self.variants
                .entry(node.preset)
                .or_insert_with(|| Rc::new(node.preset.variant_set())),
        );

        let id = match node.binding {
            Binding::Viewport { once: true } => {
                self.orch
                    .mount_with_trigger(set, parent, ViewportTrigger::once(self.margin))?
            }
            Binding::Viewport { once: false } => {
                self.orch
                    .mount_with_trigger(set, parent, ViewportTrigger::repeating(self.margin))?
            }
            Binding::Inherit | Binding::Autoplay => self.orch.mount(set, parent)?,
        };
        if node.binding == Binding::Autoplay {
            self.autoplay.push(id);
        }

        let path = format!("{}/{}", prefix, node.label);
        self.page.insert(MountedElement {
            path: path.clone(),
            block: block.to_string(),
            id,
            binding: node.binding,
        });

        for child in &node.children {
            self.mount(block, child, Some(id), &path)?;
        }
        Ok(())
    }
}

/// A node after mounting
#[derive(Clone, Debug, PartialEq)]
pub struct MountedElement {
    /// `block/label/label...`
    pub path: String,
    pub block: String,
    pub id: ElementId,
    pub binding: Binding,
}

/// Element handles of a mounted page
#[derive(Debug, Default)]
pub struct MountedPage {
    elements: Vec<MountedElement>,
    by_path: FxHashMap<String, usize>,
}

impl MountedPage {
    fn insert(&mut self, element: MountedElement) {
        self.by_path.insert(element.path.clone(), self.elements.len());
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[MountedElement] {
        &self.elements
    }

    pub fn element(&self, path: &str) -> Option<ElementId> {
        self.by_path.get(path).map(|&i| self.elements[i].id)
    }

    /// Elements that start from their own viewport trigger
    pub fn triggered(&self) -> impl Iterator<Item = &MountedElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e.binding, Binding::Viewport { .. }))
    }

    /// Feed the current viewport to every trigger
    ///
    /// Returns how many triggers played or reset.
    pub fn sync_visibility(
        &self,
        orch: &mut AnimationOrchestrator,
        layout: &PageLayout,
        viewport: Rect,
    ) -> Result<usize, AnimationError> {
        let mut fired = 0;
        for element in self.triggered() {
            let Some(block) = layout.block(&element.block) else {
                continue;
            };
            let Some(trigger) = orch.trigger(element.id) else {
                continue;
            };
            let root = trigger.margin.apply(viewport);
            let visible = block.bounds(viewport.width).vertical_overlap(&root) > 0.0;
            if orch.set_in_view(element.id, visible)? != TriggerAction::None {
                fired += 1;
            }
        }
        Ok(fired)
    }
}
