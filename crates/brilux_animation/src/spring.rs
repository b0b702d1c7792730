//! Spring physics
//!
//! RK4-integrated damped springs. Variant transitions of the spring kind do
//! not animate property values directly: they drive a unit spring from 0 to
//! 1 and use its position as eased progress, so overshoot carries over to
//! every animated property.

/// Fixed simulation step for sampling (seconds)
const SAMPLE_STEP: f32 = 1.0 / 240.0;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Quick pop used by icon badges (slight overshoot)
    pub fn pop() -> Self {
        Self::new(260.0, 20.0, 1.0)
    }

    /// Damping that removes all oscillation for this stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Whether the spring oscillates around its target
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }
}

/// A running spring
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32, target: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Within 0.1% of the target span and practically at rest
    pub fn is_settled(&self) -> bool {
        const EPSILON: f32 = 1e-3;
        const VELOCITY_EPSILON: f32 = 1e-2;

        (self.value - self.target).abs() < EPSILON && self.velocity.abs() < VELOCITY_EPSILON
    }

    /// Advance the simulation by `dt` seconds using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let (x, v) = (self.value, self.velocity);

        let k1_v = self.acceleration(x, v);
        let k1_x = v;
        let k2_v = self.acceleration(x + k1_x * dt * 0.5, v + k1_v * dt * 0.5);
        let k2_x = v + k1_v * dt * 0.5;
        let k3_v = self.acceleration(x + k2_x * dt * 0.5, v + k2_v * dt * 0.5);
        let k3_x = v + k2_v * dt * 0.5;
        let k4_v = self.acceleration(x + k3_x * dt, v + k3_v * dt);
        let k4_x = v + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

/// Progress of a unit spring (0 → 1) after `elapsed` seconds
///
/// Returns the progress and whether the spring has settled.
pub fn spring_progress(config: SpringConfig, elapsed: f32) -> (f32, bool) {
    if elapsed <= 0.0 {
        return (0.0, false);
    }

    let mut spring = Spring::new(config, 0.0, 1.0);
    let mut t = 0.0;
    while t < elapsed {
        let dt = SAMPLE_STEP.min(elapsed - t);
        spring.step(dt);
        t += dt;
        if spring.is_settled() {
            return (1.0, true);
        }
    }

    (spring.value(), false)
}
