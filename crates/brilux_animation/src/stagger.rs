//! Staggered child timing
//!
//! When a parent plays a variant, its children start in document order:
//! child `i` begins at `initial_delay + i * increment`. Delays are stored in
//! whole milliseconds so schedules are exact and never negative.

use crate::error::AnimationError;
use std::time::Duration;

/// Per-child delay rule of a parent variant set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaggerGroup {
    initial_delay_ms: u32,
    increment_ms: u32,
}

impl StaggerGroup {
    pub const fn from_millis(initial_delay_ms: u32, increment_ms: u32) -> Self {
        Self {
            initial_delay_ms,
            increment_ms,
        }
    }

    /// Build from seconds, rounding to the nearest millisecond
    ///
    /// Negative or non-finite values are rejected.
    pub fn from_secs(initial_delay: f32, increment: f32) -> Result<Self, AnimationError> {
        Ok(Self {
            initial_delay_ms: secs_to_millis("initial_delay", initial_delay)?,
            increment_ms: secs_to_millis("increment", increment)?,
        })
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.initial_delay_ms))
    }

    pub fn increment(&self) -> Duration {
        Duration::from_millis(u64::from(self.increment_ms))
    }

    /// Start delay of the child at `index` (document order)
    pub fn delay_for(&self, index: usize) -> Duration {
        let offset = u64::from(self.increment_ms).saturating_mul(index as u64);
        Duration::from_millis(u64::from(self.initial_delay_ms).saturating_add(offset))
    }

    /// Delays for `count` children, in document order
    pub fn delays(&self, count: usize) -> Vec<Duration> {
        (0..count).map(|i| self.delay_for(i)).collect()
    }
}

fn secs_to_millis(field: &'static str, secs: f32) -> Result<u32, AnimationError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(AnimationError::InvalidDelay { field, value: secs });
    }
    Ok((secs * 1000.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_children_from_seconds() {
        let group = StaggerGroup::from_secs(0.3, 0.1).unwrap();
        let expected: Vec<Duration> = [300, 400, 500, 600]
            .iter()
            .map(|&ms| Duration::from_millis(ms))
            .collect();
        assert_eq!(group.delays(4), expected);
    }

    #[test]
    fn test_delays_are_monotonic() {
        let group = StaggerGroup::from_millis(0, 50);
        let delays = group.delays(10);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(delays[0], Duration::ZERO);
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        assert!(matches!(
            StaggerGroup::from_secs(-0.1, 0.1),
            Err(AnimationError::InvalidDelay {
                field: "initial_delay",
                ..
            })
        ));
        assert!(StaggerGroup::from_secs(0.0, f32::NAN).is_err());
    }
}
