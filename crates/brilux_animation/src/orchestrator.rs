//! Animation orchestration over a tree of elements
//!
//! The orchestrator owns every animated element of a page. Elements form a
//! tree mirroring the document: when a parent plays a lifecycle tag, the tag
//! propagates to its children, which start after the parent's stagger delay
//! for their index. Delays of nested containers accumulate.
//!
//! Two kinds of elements stop propagation:
//!
//! - elements with their own [`ViewportTrigger`], which animate from their
//!   own visibility
//! - elements started with [`AnimationOrchestrator::autoplay`], which animate
//!   on mount and ignore their ancestors
//!
//! Time only moves through [`AnimationOrchestrator::advance`], which keeps
//! the whole tree deterministic under test.

use crate::error::AnimationError;
use crate::playback::Playback;
use crate::trigger::{InViewState, TriggerAction, TriggerState, ViewportTrigger};
use crate::variant::{LifecycleTag, Variant, VariantSet, VisualState, VisualTarget};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace};

new_key_type! {
    /// Handle to a mounted animated element
    pub struct ElementId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Gestures {
    hovered: bool,
    pressed: bool,
}

struct ElementNode {
    variants: Rc<VariantSet>,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 8]>,
    trigger: Option<TriggerState>,
    independent: bool,
    /// Last non-gesture tag played
    resting: LifecycleTag,
    /// Committed state while no playback runs
    state: VisualState,
    playback: Option<Playback>,
    gestures: Gestures,
    active_gesture: Option<LifecycleTag>,
}

impl ElementNode {
    fn current_state(&self, now: Duration) -> VisualState {
        self.playback
            .as_ref()
            .map(|p| p.sample(now).state)
            .unwrap_or(self.state)
    }

    fn wanted_gesture(&self) -> Option<LifecycleTag> {
        if self.gestures.pressed && self.variants.has(LifecycleTag::Tap) {
            Some(LifecycleTag::Tap)
        } else if (self.gestures.hovered || self.gestures.pressed)
            && self.variants.has(LifecycleTag::Hover)
        {
            Some(LifecycleTag::Hover)
        } else {
            None
        }
    }
}

/// Drives all variant playbacks of a page
pub struct AnimationOrchestrator {
    elements: SlotMap<ElementId, ElementNode>,
    roots: Vec<ElementId>,
    now: Duration,
}

impl Default for AnimationOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationOrchestrator {
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            roots: Vec::new(),
            now: Duration::ZERO,
        }
    }

    /// Current orchestrator time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Mount an element that follows its parent's lifecycle
    pub fn mount(
        &mut self,
        variants: Rc<VariantSet>,
        parent: Option<ElementId>,
    ) -> Result<ElementId, AnimationError> {
        self.insert(variants, parent, None)
    }

    /// Mount an element that animates from its own visibility
    pub fn mount_with_trigger(
        &mut self,
        variants: Rc<VariantSet>,
        parent: Option<ElementId>,
        trigger: ViewportTrigger,
    ) -> Result<ElementId, AnimationError> {
        self.insert(variants, parent, Some(TriggerState::new(trigger)))
    }

    fn insert(
        &mut self,
        variants: Rc<VariantSet>,
        parent: Option<ElementId>,
        trigger: Option<TriggerState>,
    ) -> Result<ElementId, AnimationError> {
        if let Some(parent) = parent {
            if !self.elements.contains_key(parent) {
                return Err(AnimationError::UnknownElement);
            }
        }

        let name = variants.name().to_string();
        let id = self.elements.insert(ElementNode {
            state: variants.initial_state(),
            variants,
            parent,
            children: SmallVec::new(),
            independent: trigger.is_some(),
            trigger,
            resting: LifecycleTag::Initial,
            playback: None,
            gestures: Gestures::default(),
            active_gesture: None,
        });

        match parent.and_then(|p| self.elements.get_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }

        trace!(variants = %name, ?id, ?parent, "mounted element");
        Ok(id)
    }

    /// Remove an element and its subtree; returns how many were removed
    pub fn unmount(&mut self, id: ElementId) -> Result<usize, AnimationError> {
        let parent = self
            .elements
            .get(id)
            .ok_or(AnimationError::UnknownElement)?
            .parent;

        match parent.and_then(|p| self.elements.get_mut(p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.elements.remove(next) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        debug!(?id, removed, "unmounted element subtree");
        Ok(removed)
    }

    /// Play `tag` on mount and detach the element from its ancestors
    pub fn autoplay(&mut self, id: ElementId, tag: LifecycleTag) -> Result<(), AnimationError> {
        self.elements
            .get_mut(id)
            .ok_or(AnimationError::UnknownElement)?
            .independent = true;
        self.play_tree(id, tag, Duration::ZERO)
    }

    /// Play `tag` on an element and propagate it to its subtree
    pub fn play(&mut self, id: ElementId, tag: LifecycleTag) -> Result<(), AnimationError> {
        self.play_tree(id, tag, Duration::ZERO)
    }

    fn play_tree(
        &mut self,
        id: ElementId,
        tag: LifecycleTag,
        offset: Duration,
    ) -> Result<(), AnimationError> {
        let now = self.now;
        let node = self
            .elements
            .get_mut(id)
            .ok_or(AnimationError::UnknownElement)?;

        let variants = Rc::clone(&node.variants);
        if let Some(variant) = variants.get(tag) {
            let from = node.current_state(now);
            node.playback = Some(Playback::new(from, variant, now, offset));
        }
        if !tag.is_gesture() {
            node.resting = tag;
        }

        let children = node.children.clone();
        let stagger = variants.stagger_group();
        let mut index = 0;
        for child in children {
            let follows = self
                .elements
                .get(child)
                .map(|c| !c.independent)
                .unwrap_or(false);
            if !follows {
                continue;
            }
            let delay = stagger.map(|g| g.delay_for(index)).unwrap_or_default();
            index += 1;
            self.play_tree(child, tag, offset + delay)?;
        }
        Ok(())
    }

    /// Snap an element and its followers back to their initial state
    pub fn reset(&mut self, id: ElementId) -> Result<(), AnimationError> {
        let node = self
            .elements
            .get_mut(id)
            .ok_or(AnimationError::UnknownElement)?;

        node.playback = None;
        node.state = node.variants.initial_state();
        node.resting = LifecycleTag::Initial;
        node.active_gesture = None;

        let children = node.children.clone();
        for child in children {
            if self.elements.get(child).is_some_and(|c| !c.independent) {
                self.reset(child)?;
            }
        }
        Ok(())
    }

    /// Report the visibility of an element with a trigger
    ///
    /// Elements without a trigger ignore visibility.
    pub fn set_in_view(
        &mut self,
        id: ElementId,
        visible: bool,
    ) -> Result<TriggerAction, AnimationError> {
        let node = self
            .elements
            .get_mut(id)
            .ok_or(AnimationError::UnknownElement)?;

        let action = match node.trigger.as_mut() {
            Some(trigger) => trigger.update(visible),
            None => return Ok(TriggerAction::None),
        };

        match action {
            TriggerAction::PlayEnter => {
                debug!(variants = node.variants.name(), ?id, "element entered viewport");
                self.play_tree(id, LifecycleTag::AnimateOnEnter, Duration::ZERO)?;
            }
            TriggerAction::ResetToInitial => {
                debug!(variants = node.variants.name(), ?id, "element left viewport");
                self.reset(id)?;
            }
            TriggerAction::None => {}
        }
        Ok(action)
    }

    pub fn set_hovered(&mut self, id: ElementId, hovered: bool) -> Result<(), AnimationError> {
        self.apply_gesture(id, &|g: &mut Gestures| g.hovered = hovered)
    }

    pub fn set_pressed(&mut self, id: ElementId, pressed: bool) -> Result<(), AnimationError> {
        self.apply_gesture(id, &|g: &mut Gestures| g.pressed = pressed)
    }

    /// Gestures reach every follower below the element
    fn apply_gesture(
        &mut self,
        id: ElementId,
        update: &dyn Fn(&mut Gestures),
    ) -> Result<(), AnimationError> {
        let node = self
            .elements
            .get_mut(id)
            .ok_or(AnimationError::UnknownElement)?;
        update(&mut node.gestures);
        self.retarget(id)?;

        let children = self.elements[id].children.clone();
        for child in children {
            if self.elements.get(child).is_some_and(|c| !c.independent) {
                self.apply_gesture(child, update)?;
            }
        }
        Ok(())
    }

    fn retarget(&mut self, id: ElementId) -> Result<(), AnimationError> {
        let now = self.now;
        let node = self
            .elements
            .get_mut(id)
            .ok_or(AnimationError::UnknownElement)?;

        let wanted = node.wanted_gesture();
        if wanted == node.active_gesture {
            return Ok(());
        }

        let variants = Rc::clone(&node.variants);
        let from = node.current_state(now);
        let variant = match wanted {
            Some(tag) => variants.get(tag).cloned(),
            None => {
                // Return to the resting stage at the pace of the released gesture
                let released = node.active_gesture.and_then(|tag| variants.get(tag));
                let rest = VisualTarget::from_state(&variants.resting_state(node.resting));
                Some(Variant {
                    target: rest,
                    transition: released.and_then(|v| v.transition),
                })
            }
        };

        if let Some(variant) = variant {
            node.playback = Some(Playback::new(from, &variant, now, Duration::ZERO));
        }
        trace!(?id, from = ?node.active_gesture, to = ?wanted, "gesture retarget");
        node.active_gesture = wanted;
        Ok(())
    }

    /// Move time forward and commit finished playbacks
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
        let now = self.now;
        for node in self.elements.values_mut() {
            let Some(playback) = &node.playback else {
                continue;
            };
            let sample = playback.sample(now);
            if sample.finished {
                node.state = sample.state;
                node.playback = None;
            }
        }
    }

    /// Visual state of an element at the current time
    pub fn sample(&self, id: ElementId) -> Option<VisualState> {
        self.elements.get(id).map(|n| n.current_state(self.now))
    }

    /// Whether a playback (running or scheduled) is attached
    pub fn is_animating(&self, id: ElementId) -> bool {
        self.elements
            .get(id)
            .is_some_and(|n| n.playback.is_some())
    }

    /// Absolute start time of the element's current playback
    pub fn scheduled_start(&self, id: ElementId) -> Option<Duration> {
        self.elements
            .get(id)
            .and_then(|n| n.playback.as_ref())
            .map(|p| p.start())
    }

    pub fn resting_tag(&self, id: ElementId) -> Option<LifecycleTag> {
        self.elements.get(id).map(|n| n.resting)
    }

    pub fn trigger_state(&self, id: ElementId) -> Option<InViewState> {
        self.elements
            .get(id)
            .and_then(|n| n.trigger.as_ref())
            .map(|t| t.state())
    }

    pub fn trigger(&self, id: ElementId) -> Option<ViewportTrigger> {
        self.elements
            .get(id)
            .and_then(|n| n.trigger.as_ref())
            .map(|t| t.config())
    }

    pub fn variants(&self, id: ElementId) -> Option<&VariantSet> {
        self.elements.get(id).map(|n| n.variants.as_ref())
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use brilux_core::RootMargin;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn section(orch: &mut AnimationOrchestrator, once: bool) -> ElementId {
        let trigger = if once {
            ViewportTrigger::once(RootMargin::ZERO)
        } else {
            ViewportTrigger::repeating(RootMargin::ZERO)
        };
        orch.mount_with_trigger(Rc::new(presets::stagger_container()), None, trigger)
            .unwrap()
    }

    #[test]
    fn test_children_start_staggered() {
        let mut orch = AnimationOrchestrator::new();
        let container = section(&mut orch, true);
        let fade = Rc::new(presets::fade_in_up());
        let children: Vec<_> = (0..4)
            .map(|_| orch.mount(fade.clone(), Some(container)).unwrap())
            .collect();

        assert_eq!(
            orch.set_in_view(container, true).unwrap(),
            TriggerAction::PlayEnter
        );

        let starts: Vec<_> = children
            .iter()
            .map(|&c| orch.scheduled_start(c).unwrap())
            .collect();
        assert_eq!(starts, vec![ms(300), ms(400), ms(500), ms(600)]);

        // Before its delay the last child still shows its initial state
        orch.advance(ms(550));
        assert_eq!(orch.sample(children[3]).unwrap().opacity, 0.0);

        orch.advance(ms(1000));
        for child in &children {
            assert_eq!(orch.sample(*child).unwrap().opacity, 1.0);
            assert!(!orch.is_animating(*child));
        }
    }

    #[test]
    fn test_nested_delays_accumulate() {
        let mut orch = AnimationOrchestrator::new();
        let outer = section(&mut orch, true);
        let fade = Rc::new(presets::fade_in_up());
        orch.mount(fade.clone(), Some(outer)).unwrap();
        let inner = orch
            .mount(Rc::new(presets::stagger_container()), Some(outer))
            .unwrap();
        let grandchild = orch.mount(fade, Some(inner)).unwrap();

        orch.set_in_view(outer, true).unwrap();
        // Inner container is child #1 (400ms), grandchild #0 of inner (+300ms)
        assert_eq!(orch.scheduled_start(grandchild), Some(ms(700)));
    }

    #[test]
    fn test_child_with_own_trigger_is_not_propagated() {
        let mut orch = AnimationOrchestrator::new();
        let outer = section(&mut orch, true);
        let fade = Rc::new(presets::fade_in_up());
        let list = orch
            .mount_with_trigger(
                Rc::new(presets::stagger_container()),
                Some(outer),
                ViewportTrigger::once(RootMargin::ZERO),
            )
            .unwrap();
        let item = orch.mount(fade.clone(), Some(list)).unwrap();
        let sibling = orch.mount(fade, Some(outer)).unwrap();

        orch.set_in_view(outer, true).unwrap();
        assert!(!orch.is_animating(item));
        // The independent list does not take a stagger slot
        assert_eq!(orch.scheduled_start(sibling), Some(ms(300)));

        orch.set_in_view(list, true).unwrap();
        assert_eq!(orch.scheduled_start(item), Some(ms(300)));
    }

    #[test]
    fn test_once_keeps_final_state() {
        let mut orch = AnimationOrchestrator::new();
        let container = section(&mut orch, true);
        let child = orch
            .mount(Rc::new(presets::fade_in_up()), Some(container))
            .unwrap();

        orch.set_in_view(container, true).unwrap();
        orch.advance(ms(2000));
        assert_eq!(orch.set_in_view(container, false).unwrap(), TriggerAction::None);
        assert_eq!(orch.set_in_view(container, true).unwrap(), TriggerAction::None);
        assert_eq!(orch.sample(child).unwrap().y, 0.0);
        assert!(!orch.is_animating(child));
    }

    #[test]
    fn test_repeating_resets_on_leave() {
        let mut orch = AnimationOrchestrator::new();
        let container = section(&mut orch, false);
        let child = orch
            .mount(Rc::new(presets::fade_in_up()), Some(container))
            .unwrap();

        orch.set_in_view(container, true).unwrap();
        orch.advance(ms(2000));
        assert_eq!(orch.sample(child).unwrap().opacity, 1.0);

        assert_eq!(
            orch.set_in_view(container, false).unwrap(),
            TriggerAction::ResetToInitial
        );
        let reset = orch.sample(child).unwrap();
        assert_eq!((reset.opacity, reset.y), (0.0, 60.0));
        assert_eq!(orch.resting_tag(child), Some(LifecycleTag::Initial));

        orch.set_in_view(container, true).unwrap();
        assert_eq!(orch.scheduled_start(child), Some(ms(2300)));
    }

    #[test]
    fn test_hover_lifts_card_and_icon_then_returns() {
        let mut orch = AnimationOrchestrator::new();
        let container = section(&mut orch, true);
        let card = orch
            .mount(Rc::new(presets::feature_card()), Some(container))
            .unwrap();
        let icon = orch.mount(Rc::new(presets::icon_pop()), Some(card)).unwrap();

        orch.set_in_view(container, true).unwrap();
        orch.advance(ms(3000));

        orch.set_hovered(card, true).unwrap();
        orch.advance(ms(400));
        let lifted = orch.sample(card).unwrap();
        assert_eq!((lifted.y, lifted.scale), (-10.0, 1.02));
        assert_eq!(orch.sample(icon).unwrap().rotate, 360.0);

        orch.set_pressed(card, true).unwrap();
        orch.advance(ms(200));
        assert_eq!(orch.sample(card).unwrap().scale, 0.98);

        orch.set_pressed(card, false).unwrap();
        orch.set_hovered(card, false).unwrap();
        orch.advance(ms(400));
        let rested = orch.sample(card).unwrap();
        assert_eq!((rested.y, rested.scale, rested.opacity), (0.0, 1.0, 1.0));
        assert_eq!(orch.sample(icon).unwrap().rotate, 0.0);
    }

    #[test]
    fn test_autoplay_ignores_parent() {
        let mut orch = AnimationOrchestrator::new();
        let container = section(&mut orch, false);
        let glow = orch
            .mount(Rc::new(presets::glow_pulse()), Some(container))
            .unwrap();
        orch.autoplay(glow, LifecycleTag::AnimateOnEnter).unwrap();
        assert_eq!(orch.scheduled_start(glow), Some(Duration::ZERO));

        orch.set_in_view(container, true).unwrap();
        assert_eq!(orch.scheduled_start(glow), Some(Duration::ZERO));

        orch.advance(ms(60_000));
        assert!(orch.is_animating(glow));
    }

    #[test]
    fn test_flip_runs_faces_in_sequence() {
        let mut orch = AnimationOrchestrator::new();
        let card = orch.mount(Rc::new(presets::card_flip()), None).unwrap();
        let front = orch.mount(Rc::new(presets::card_front()), Some(card)).unwrap();
        let back = orch.mount(Rc::new(presets::card_back()), Some(card)).unwrap();

        orch.play(card, LifecycleTag::Flip).unwrap();
        orch.advance(ms(300));
        assert_eq!(orch.sample(front).unwrap().opacity, 0.0);
        assert_eq!(orch.sample(back).unwrap().opacity, 0.0);

        orch.advance(ms(400));
        assert_eq!(orch.sample(back).unwrap().opacity, 1.0);
        assert_eq!(orch.sample(card).unwrap().rotate_y, 180.0);
    }

    #[test]
    fn test_unmount_removes_subtree() {
        let mut orch = AnimationOrchestrator::new();
        let container = section(&mut orch, true);
        let fade = Rc::new(presets::fade_in_up());
        let child = orch.mount(fade.clone(), Some(container)).unwrap();
        orch.mount(fade.clone(), Some(child)).unwrap();

        assert_eq!(orch.unmount(container).unwrap(), 3);
        assert_eq!(orch.element_count(), 0);
        assert!(orch.roots().is_empty());
        assert_eq!(orch.unmount(child), Err(AnimationError::UnknownElement));
        assert_eq!(
            orch.mount(fade, Some(child)),
            Err(AnimationError::UnknownElement)
        );
    }
}
