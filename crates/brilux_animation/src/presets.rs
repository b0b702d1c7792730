//! Variant sets used across the landing page
//!
//! Every function builds a fresh [`VariantSet`]; callers wrap it in `Rc`
//! once and share it between all elements of the same kind.

use crate::easing::Easing;
use crate::spring::SpringConfig;
use crate::stagger::StaggerGroup;
use crate::variant::{
    LifecycleTag, Repeat, RepeatType, Transition, Variant, VariantSet, VisualTarget,
};
use std::time::Duration;

/// Anticipating curve of the content fade-ins
pub const FADE_EASE: Easing = Easing::CubicBezier(0.6, -0.05, 0.01, 0.99);

/// Children of a [`stagger_container`] start 300 ms in, 100 ms apart
pub const SECTION_STAGGER: StaggerGroup = StaggerGroup::from_millis(300, 100);

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn tween(millis: u64, easing: Easing) -> Transition {
    Transition::tween(ms(millis), easing)
}

/// Rise 60px while fading and growing in
pub fn fade_in_up() -> VariantSet {
    VariantSet::new("fade-in-up")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().y(60.0).opacity(0.0).scale(0.9)),
        )
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().y(0.0).opacity(1.0).scale(1.0))
                .with_transition(tween(600, FADE_EASE)),
        )
}

/// Invisible wrapper that staggers its children
pub fn stagger_container() -> VariantSet {
    VariantSet::new("stagger-container")
        .variant(LifecycleTag::Initial, Variant::default())
        .variant(LifecycleTag::AnimateOnEnter, Variant::default())
        .stagger(SECTION_STAGGER)
}

/// Icon badge that springs in and spins on hover
pub fn icon_pop() -> VariantSet {
    VariantSet::new("icon-pop")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().scale(0.0).rotate(-180.0)),
        )
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().scale(1.0).rotate(0.0))
                .with_transition(Transition::spring(SpringConfig::pop())),
        )
        .variant(
            LifecycleTag::Hover,
            Variant::new(VisualTarget::new().scale(1.2).rotate(360.0))
                .with_transition(tween(300, Easing::EaseOut)),
        )
}

/// Feature card: rises in, lifts on hover, presses on tap
pub fn feature_card() -> VariantSet {
    VariantSet::new("feature-card")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().y(50.0).opacity(0.0).scale(0.9)),
        )
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().y(0.0).opacity(1.0).scale(1.0))
                .with_transition(tween(500, Easing::EaseOut)),
        )
        .variant(
            LifecycleTag::Hover,
            Variant::new(VisualTarget::new().y(-10.0).scale(1.02))
                .with_transition(tween(200, Easing::EaseInOut)),
        )
        .variant(
            LifecycleTag::Tap,
            Variant::new(VisualTarget::new().scale(0.98))
                .with_transition(tween(100, Easing::EaseOut)),
        )
}

/// Pulsing glow behind icons, runs until unmounted
pub fn glow_pulse() -> VariantSet {
    VariantSet::new("glow-pulse")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().opacity(0.0).scale(0.5)),
        )
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(
                VisualTarget::new()
                    .opacity([0.0, 1.0, 0.5])
                    .scale([0.5, 1.2, 1.0]),
            )
            .with_transition(
                Transition::tween(Duration::from_secs(2), Easing::EaseInOut)
                    .with_repeat(Repeat::Forever(RepeatType::Reverse)),
            ),
        )
}

/// Scale up from 80% while fading in
pub fn scale_in() -> VariantSet {
    VariantSet::new("scale-in")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().scale(0.8).opacity(0.0)),
        )
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().scale(1.0).opacity(1.0))
                .with_transition(tween(600, Easing::EaseOut)),
        )
}

/// Card body turning over on flip
pub fn card_flip() -> VariantSet {
    VariantSet::new("card-flip")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().rotate_y(0.0)),
        )
        .variant(
            LifecycleTag::Flip,
            Variant::new(VisualTarget::new().rotate_y(180.0))
                .with_transition(tween(600, Easing::EaseInOut)),
        )
}

/// Front face content, hidden during the first half of the flip
pub fn card_front() -> VariantSet {
    VariantSet::new("card-front")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().opacity(1.0).rotate_y(0.0)),
        )
        .variant(
            LifecycleTag::Flip,
            Variant::new(VisualTarget::new().opacity(0.0).rotate_y(180.0))
                .with_transition(tween(300, Easing::EaseIn)),
        )
}

/// Back face content, revealed during the second half of the flip
pub fn card_back() -> VariantSet {
    VariantSet::new("card-back")
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().opacity(0.0).rotate_y(180.0)),
        )
        .variant(
            LifecycleTag::Flip,
            Variant::new(VisualTarget::new().opacity(1.0).rotate_y(0.0))
                .with_transition(tween(300, Easing::EaseOut).with_delay(ms(300))),
        )
}

/// Hero copy that animates on mount, `rise` pixels from below (negative: from above)
pub fn hero_line(name: &str, rise: f32, delay: Duration) -> VariantSet {
    VariantSet::new(name)
        .variant(
            LifecycleTag::Initial,
            Variant::new(VisualTarget::new().opacity(0.0).y(rise)),
        )
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().opacity(1.0).y(0.0))
                .with_transition(tween(800, Easing::EaseOut).with_delay(delay)),
        )
}

/// Navigation bar sliding down on mount
pub fn navbar_enter() -> VariantSet {
    VariantSet::new("navbar")
        .variant(LifecycleTag::Initial, Variant::new(VisualTarget::new().y(-100.0)))
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().y(0.0)).with_transition(tween(500, Easing::EaseOut)),
        )
}

/// Mobile menu panel
pub fn mobile_menu() -> VariantSet {
    let hidden = VisualTarget::new().opacity(0.0).y(-20.0);
    VariantSet::new("mobile-menu")
        .variant(LifecycleTag::Initial, Variant::new(hidden.clone()))
        .variant(
            LifecycleTag::AnimateOnEnter,
            Variant::new(VisualTarget::new().opacity(1.0).y(0.0))
                .with_transition(tween(300, Easing::EaseOut)),
        )
        .variant(
            LifecycleTag::Exit,
            Variant::new(hidden).with_transition(tween(300, Easing::EaseOut)),
        )
}

/// Navigation link nudging up under the pointer
pub fn nav_link() -> VariantSet {
    VariantSet::new("nav-link")
        .variant(
            LifecycleTag::Hover,
            Variant::new(VisualTarget::new().y(-2.0)).with_transition(tween(200, Easing::EaseOut)),
        )
        .variant(
            LifecycleTag::Tap,
            Variant::new(VisualTarget::new().y(0.0)).with_transition(tween(100, Easing::EaseOut)),
        )
}

/// Brand logo
pub fn logo() -> VariantSet {
    VariantSet::new("logo")
        .variant(
            LifecycleTag::Hover,
            Variant::new(VisualTarget::new().scale(1.05))
                .with_transition(tween(200, Easing::EaseOut)),
        )
        .variant(
            LifecycleTag::Tap,
            Variant::new(VisualTarget::new().scale(0.95))
                .with_transition(tween(100, Easing::EaseOut)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_up_states() {
        let set = fade_in_up();
        let initial = set.initial_state();
        assert_eq!((initial.y, initial.opacity, initial.scale), (60.0, 0.0, 0.9));

        let entered = set.resting_state(LifecycleTag::AnimateOnEnter);
        assert_eq!((entered.y, entered.opacity, entered.scale), (0.0, 1.0, 1.0));
    }

    #[test]
    fn test_container_staggers_children() {
        let set = stagger_container();
        assert_eq!(set.stagger_group(), Some(SECTION_STAGGER));
        assert_eq!(SECTION_STAGGER.delay_for(0), ms(300));
        assert_eq!(SECTION_STAGGER.delay_for(3), ms(600));
    }

    #[test]
    fn test_glow_pulse_is_infinite() {
        let set = glow_pulse();
        let transition = set
            .get(LifecycleTag::AnimateOnEnter)
            .map(|v| v.transition_or_default())
            .unwrap();
        assert!(transition.is_infinite());
    }

    #[test]
    fn test_back_face_waits_for_front_face() {
        let front = card_front().get(LifecycleTag::Flip).unwrap().transition_or_default();
        let back = card_back().get(LifecycleTag::Flip).unwrap().transition_or_default();
        assert_eq!(front.delay, Duration::ZERO);
        assert_eq!(back.delay, ms(300));
    }

    #[test]
    fn test_menu_exit_returns_to_hidden() {
        let set = mobile_menu();
        assert_eq!(set.resting_state(LifecycleTag::Exit), set.initial_state());
    }
}
