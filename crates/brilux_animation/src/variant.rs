//! Declarative animation variants
//!
//! A [`VariantSet`] describes how one class of element looks at each
//! lifecycle stage ([`LifecycleTag`]) and how it transitions there. Sets are
//! built once, shared behind `Rc`, and only ever selected at runtime.

use crate::easing::Easing;
use crate::spring::SpringConfig;
use crate::stagger::StaggerGroup;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::time::Duration;

/// Default transition when a variant does not declare one
pub const DEFAULT_TWEEN: Duration = Duration::from_millis(300);

/// Lifecycle stage an element can be animated to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleTag {
    Initial,
    AnimateOnEnter,
    Hover,
    Tap,
    Exit,
    /// Card flip (front to back)
    Flip,
}

impl LifecycleTag {
    /// Gesture tags are temporary overrides; the others become the resting stage
    pub fn is_gesture(&self) -> bool {
        matches!(self, LifecycleTag::Hover | LifecycleTag::Tap)
    }
}

/// Animatable visual property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    /// Rotation around the z axis, degrees
    Rotate,
    /// Rotation around the y axis, degrees
    RotateY,
}

impl Property {
    pub const ALL: [Property; 6] = [
        Property::Opacity,
        Property::X,
        Property::Y,
        Property::Scale,
        Property::Rotate,
        Property::RotateY,
    ];
}

/// Target for one property: a single value or evenly spaced keyframes
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    To(f32),
    Keyframes(SmallVec<[f32; 4]>),
}

impl PropertyValue {
    /// Value once the animation has completed
    pub fn final_value(&self, from: f32) -> f32 {
        match self {
            PropertyValue::To(v) => *v,
            PropertyValue::Keyframes(frames) => frames.last().copied().unwrap_or(from),
        }
    }

    /// Value at eased `progress`
    ///
    /// Single targets interpolate from `from` and may overshoot with the
    /// progress; keyframes start at their first frame and clamp.
    pub fn sample(&self, from: f32, progress: f32) -> f32 {
        match self {
            PropertyValue::To(to) if progress == 1.0 => *to,
            PropertyValue::To(to) => from + (to - from) * progress,
            PropertyValue::Keyframes(frames) => match frames.len() {
                0 => from,
                1 => from + (frames[0] - from) * progress.clamp(0.0, 1.0),
                n => {
                    let position = progress.clamp(0.0, 1.0) * (n - 1) as f32;
                    let index = (position.floor() as usize).min(n - 2);
                    let local = position - index as f32;
                    frames[index] + (frames[index + 1] - frames[index]) * local
                }
            },
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::To(value)
    }
}

impl From<&[f32]> for PropertyValue {
    fn from(frames: &[f32]) -> Self {
        PropertyValue::Keyframes(frames.iter().copied().collect())
    }
}

impl<const N: usize> From<[f32; N]> for PropertyValue {
    fn from(frames: [f32; N]) -> Self {
        PropertyValue::Keyframes(frames.iter().copied().collect())
    }
}

/// Concrete visual properties of an element at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotate: f32,
    pub rotate_y: f32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            rotate_y: 0.0,
        }
    }
}

impl VisualState {
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::Opacity => self.opacity,
            Property::X => self.x,
            Property::Y => self.y,
            Property::Scale => self.scale,
            Property::Rotate => self.rotate,
            Property::RotateY => self.rotate_y,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Scale => self.scale = value,
            Property::Rotate => self.rotate = value,
            Property::RotateY => self.rotate_y = value,
        }
    }
}

/// Set of property targets
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualTarget {
    values: SmallVec<[(Property, PropertyValue); 4]>,
}

impl VisualTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target that pins every property to the given state
    pub fn from_state(state: &VisualState) -> Self {
        Property::ALL
            .iter()
            .fold(Self::new(), |target, &p| target.with(p, state.get(p)))
    }

    /// Set (or replace) the target for a property
    pub fn with(mut self, property: Property, value: impl Into<PropertyValue>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.values.push((property, value)),
        }
        self
    }

    pub fn opacity(self, value: impl Into<PropertyValue>) -> Self {
        self.with(Property::Opacity, value)
    }

    pub fn x(self, value: impl Into<PropertyValue>) -> Self {
        self.with(Property::X, value)
    }

    pub fn y(self, value: impl Into<PropertyValue>) -> Self {
        self.with(Property::Y, value)
    }

    pub fn scale(self, value: impl Into<PropertyValue>) -> Self {
        self.with(Property::Scale, value)
    }

    pub fn rotate(self, value: impl Into<PropertyValue>) -> Self {
        self.with(Property::Rotate, value)
    }

    pub fn rotate_y(self, value: impl Into<PropertyValue>) -> Self {
        self.with(Property::RotateY, value)
    }

    pub fn get(&self, property: Property) -> Option<&PropertyValue> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Property, PropertyValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Final state reached when applying this target on top of `base`
    pub fn resolve(&self, base: &VisualState) -> VisualState {
        let mut state = *base;
        for (property, value) in &self.values {
            state.set(*property, value.final_value(base.get(*property)));
        }
        state
    }
}

/// How an iteration repeats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatType {
    /// Restart from the beginning
    Loop,
    /// Play odd iterations backwards in time
    Reverse,
    /// Swap origin and target on odd iterations, easing stays forward
    Mirror,
}

/// Repeat policy of a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Never,
    /// Repeat this many extra times after the first iteration
    Times(u32, RepeatType),
    /// Repeat until the element unmounts
    Forever(RepeatType),
}

/// Timing model of a transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionKind {
    Tween { duration: Duration, easing: Easing },
    Spring(SpringConfig),
}

/// Timing descriptor of a variant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub delay: Duration,
    pub repeat: Repeat,
}

impl Transition {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            kind: TransitionKind::Tween { duration, easing },
            delay: Duration::ZERO,
            repeat: Repeat::Never,
        }
    }

    pub fn spring(config: SpringConfig) -> Self {
        Self {
            kind: TransitionKind::Spring(config),
            delay: Duration::ZERO,
            repeat: Repeat::Never,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Whether the transition never finishes on its own
    pub fn is_infinite(&self) -> bool {
        matches!(
            (self.kind, self.repeat),
            (TransitionKind::Tween { .. }, Repeat::Forever(_))
        )
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::tween(DEFAULT_TWEEN, Easing::EaseOut)
    }
}

/// One lifecycle stage: where to go and how
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Variant {
    pub target: VisualTarget,
    pub transition: Option<Transition>,
}

impl Variant {
    pub fn new(target: VisualTarget) -> Self {
        Self {
            target,
            transition: None,
        }
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn transition_or_default(&self) -> Transition {
        self.transition.unwrap_or_default()
    }
}

/// Named bundle of variants for one class of element
#[derive(Clone, Debug, PartialEq)]
pub struct VariantSet {
    name: String,
    variants: IndexMap<LifecycleTag, Variant>,
    stagger: Option<StaggerGroup>,
}

impl VariantSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: IndexMap::new(),
            stagger: None,
        }
    }

    /// Add (or replace) the variant for a lifecycle tag
    pub fn variant(mut self, tag: LifecycleTag, variant: Variant) -> Self {
        self.variants.insert(tag, variant);
        self
    }

    /// Stagger the matching variants of children when this set plays
    pub fn stagger(mut self, group: StaggerGroup) -> Self {
        self.stagger = Some(group);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, tag: LifecycleTag) -> Option<&Variant> {
        self.variants.get(&tag)
    }

    pub fn has(&self, tag: LifecycleTag) -> bool {
        self.variants.contains_key(&tag)
    }

    pub fn stagger_group(&self) -> Option<StaggerGroup> {
        self.stagger
    }

    /// Tags in declaration order
    pub fn tags(&self) -> impl Iterator<Item = LifecycleTag> + '_ {
        self.variants.keys().copied()
    }

    /// State of an element that has not animated yet
    pub fn initial_state(&self) -> VisualState {
        self.get(LifecycleTag::Initial)
            .map(|v| v.target.resolve(&VisualState::default()))
            .unwrap_or_default()
    }

    /// State an element rests in once `tag` has completed
    pub fn resting_state(&self, tag: LifecycleTag) -> VisualState {
        let initial = self.initial_state();
        match self.get(tag) {
            Some(variant) if tag != LifecycleTag::Initial => variant.target.resolve(&initial),
            _ => initial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframes_are_evenly_spaced() {
        let frames = PropertyValue::from([0.0, 1.0, 0.5]);
        assert_eq!(frames.sample(0.3, 0.0), 0.0);
        assert_eq!(frames.sample(0.3, 0.25), 0.5);
        assert_eq!(frames.sample(0.3, 0.5), 1.0);
        assert_eq!(frames.sample(0.3, 1.0), 0.5);
        assert_eq!(frames.final_value(0.3), 0.5);
    }

    #[test]
    fn test_single_target_can_overshoot() {
        let to = PropertyValue::To(10.0);
        assert_eq!(to.sample(0.0, 1.1), 11.0);
    }

    #[test]
    fn test_target_with_replaces_existing() {
        let target = VisualTarget::new().opacity(0.0).opacity(0.5);
        assert_eq!(target.iter().count(), 1);
        assert_eq!(target.get(Property::Opacity), Some(&PropertyValue::To(0.5)));
    }

    #[test]
    fn test_resting_states() {
        let set = VariantSet::new("fade")
            .variant(
                LifecycleTag::Initial,
                Variant::new(VisualTarget::new().opacity(0.0).y(60.0)),
            )
            .variant(
                LifecycleTag::AnimateOnEnter,
                Variant::new(VisualTarget::new().opacity(1.0).y(0.0)),
            );

        let initial = set.initial_state();
        assert_eq!(initial.opacity, 0.0);
        assert_eq!(initial.y, 60.0);
        assert_eq!(initial.scale, 1.0);

        let entered = set.resting_state(LifecycleTag::AnimateOnEnter);
        assert_eq!(entered.opacity, 1.0);
        assert_eq!(entered.y, 0.0);

        // Missing tags rest where the element started
        assert_eq!(set.resting_state(LifecycleTag::Exit), initial);
    }

    #[test]
    fn test_only_repeating_tweens_are_infinite() {
        let pulse = Transition::tween(Duration::from_secs(2), Easing::Linear)
            .with_repeat(Repeat::Forever(RepeatType::Reverse));
        assert!(pulse.is_infinite());
        assert!(!Transition::default().is_infinite());
        assert!(!Transition::spring(SpringConfig::pop())
            .with_repeat(Repeat::Forever(RepeatType::Loop))
            .is_infinite());
    }
}
