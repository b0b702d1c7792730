//! A single variant playing on a single element

use crate::spring::spring_progress;
use crate::variant::{
    Repeat, RepeatType, Transition, TransitionKind, Variant, VisualState, VisualTarget,
};
use std::time::Duration;

/// Sampled output of a playback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub state: VisualState,
    pub finished: bool,
}

/// Interpolation from a captured state toward a variant target
#[derive(Clone, Debug)]
pub struct Playback {
    from: VisualState,
    target: VisualTarget,
    transition: Transition,
    /// Absolute start time, delays included
    start: Duration,
}

impl Playback {
    /// Start `variant` from `from`, `offset` after `now`
    ///
    /// The variant's own transition delay is added on top of `offset`.
    pub fn new(from: VisualState, variant: &Variant, now: Duration, offset: Duration) -> Self {
        let transition = variant.transition_or_default();
        Self {
            from,
            target: variant.target.clone(),
            start: now + offset + transition.delay,
            transition,
        }
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Whether the playback has not started yet at `now`
    pub fn is_pending(&self, now: Duration) -> bool {
        now < self.start
    }

    pub fn sample(&self, now: Duration) -> Sample {
        let elapsed = now.saturating_sub(self.start).as_secs_f32();
        let (progress, finished) = if now < self.start {
            (0.0, false)
        } else {
            self.progress(elapsed)
        };

        let mut state = self.from;
        for (property, value) in self.target.iter() {
            state.set(*property, value.sample(self.from.get(*property), progress));
        }
        Sample { state, finished }
    }

    fn progress(&self, elapsed: f32) -> (f32, bool) {
        match self.transition.kind {
            TransitionKind::Spring(config) => spring_progress(config, elapsed),
            TransitionKind::Tween { duration, easing } => {
                let duration = duration.as_secs_f32();
                if duration <= 0.0 {
                    return (1.0, true);
                }

                let raw = elapsed / duration;
                let (iteration, local, finished) = match self.transition.repeat {
                    Repeat::Never if raw >= 1.0 => (0, 1.0, true),
                    Repeat::Never => (0, raw, false),
                    Repeat::Times(extra, _) => {
                        let total = extra as f32 + 1.0;
                        if raw >= total {
                            (extra, 1.0, true)
                        } else {
                            (raw.floor() as u32, raw.fract(), false)
                        }
                    }
                    Repeat::Forever(_) => (raw.floor() as u32, raw.fract(), false),
                };

                let repeat_type = match self.transition.repeat {
                    Repeat::Times(_, ty) | Repeat::Forever(ty) => ty,
                    Repeat::Never => RepeatType::Loop,
                };
                let progress = match (repeat_type, iteration % 2 == 1) {
                    (RepeatType::Reverse, true) => easing.apply(1.0 - local),
                    (RepeatType::Mirror, true) => 1.0 - easing.apply(local),
                    _ => easing.apply(local),
                };
                (progress, finished)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::spring::SpringConfig;

    fn fade(transition: Transition) -> Variant {
        Variant::new(VisualTarget::new().opacity(1.0)).with_transition(transition)
    }

    fn hidden() -> VisualState {
        VisualState {
            opacity: 0.0,
            ..VisualState::default()
        }
    }

    #[test]
    fn test_tween_holds_until_delay_then_completes() {
        let transition = Transition::tween(Duration::from_millis(500), Easing::Linear)
            .with_delay(Duration::from_millis(200));
        let playback = Playback::new(
            hidden(),
            &fade(transition),
            Duration::ZERO,
            Duration::from_millis(100),
        );

        assert_eq!(playback.start(), Duration::from_millis(300));
        assert!(playback.is_pending(Duration::from_millis(250)));
        assert_eq!(playback.sample(Duration::from_millis(250)).state.opacity, 0.0);

        let mid = playback.sample(Duration::from_millis(550));
        assert!((mid.state.opacity - 0.5).abs() < 1e-4);
        assert!(!mid.finished);

        let end = playback.sample(Duration::from_millis(800));
        assert_eq!(end.state.opacity, 1.0);
        assert!(end.finished);
    }

    #[test]
    fn test_untouched_properties_keep_captured_values() {
        let from = VisualState {
            opacity: 0.0,
            y: 60.0,
            ..VisualState::default()
        };
        let playback =
            Playback::new(from, &fade(Transition::default()), Duration::ZERO, Duration::ZERO);
        let end = playback.sample(Duration::from_secs(1));
        assert_eq!(end.state.y, 60.0);
        assert_eq!(end.state.opacity, 1.0);
    }

    #[test]
    fn test_reverse_repeat_plays_backwards_on_odd_iterations() {
        let transition = Transition::tween(Duration::from_secs(2), Easing::Linear)
            .with_repeat(Repeat::Forever(RepeatType::Reverse));
        let playback = Playback::new(hidden(), &fade(transition), Duration::ZERO, Duration::ZERO);

        assert!((playback.sample(Duration::from_millis(1500)).state.opacity - 0.75).abs() < 1e-4);
        assert!((playback.sample(Duration::from_millis(3500)).state.opacity - 0.25).abs() < 1e-4);
        assert!(!playback.sample(Duration::from_secs(100)).finished);
    }

    #[test]
    fn test_mirror_swaps_direction_with_forward_easing() {
        let transition = Transition::tween(Duration::from_secs(1), Easing::EaseIn)
            .with_repeat(Repeat::Times(1, RepeatType::Mirror));
        let playback = Playback::new(hidden(), &fade(transition), Duration::ZERO, Duration::ZERO);

        let second = playback.sample(Duration::from_millis(1300)).state.opacity;
        assert!((second - (1.0 - Easing::EaseIn.apply(0.3))).abs() < 1e-4);

        // Two iterations, the second one ends back at the origin
        let end = playback.sample(Duration::from_secs(3));
        assert!(end.finished);
        assert!(end.state.opacity.abs() < 1e-4);
    }

    #[test]
    fn test_spring_overshoots_target() {
        let variant = Variant::new(VisualTarget::new().scale(1.0))
            .with_transition(Transition::spring(SpringConfig::pop()));
        let from = VisualState {
            scale: 0.0,
            ..VisualState::default()
        };
        let playback = Playback::new(from, &variant, Duration::ZERO, Duration::ZERO);

        let peak = (1..60)
            .map(|i| playback.sample(Duration::from_millis(i * 10)).state.scale)
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!(playback.sample(Duration::from_secs(5)).finished);
    }
}
