//! Health pool with delayed regeneration, and the health bar geometry it drives.
use super::host::BarTransform;
use super::AgentError;
use bevy::math::Vec3;

/// Health state of the agent. `0 <= current <= max` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    regen_delay: f32,
    regen_rate: f32,
    countdown: f32,
}

impl Health {
    /// Full health pool with the regen countdown primed to `regen_delay`.
    #[must_use]
    pub fn new(max: f32, regen_delay: f32, regen_rate: f32) -> Self {
        Self { current: max, max, regen_delay, regen_rate, countdown: regen_delay }
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Seconds left before regeneration resumes.
    #[must_use]
    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    /// Fill fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtract `damage`, flooring at zero. Negative damage counts as zero.
    pub fn take_damage(&mut self, damage: f32) {
        let damage = if damage.is_finite() { damage.max(0.0) } else { 0.0 };
        self.current = if self.current >= damage { self.current - damage } else { 0.0 };
    }

    /// Restart the regen countdown from `regen_delay`.
    pub fn restart_regen_delay(&mut self) {
        self.countdown = self.regen_delay;
    }

    /// Advance the countdown by `dt` and regenerate once it has run out.
    ///
    /// # Returns
    /// `true` when health changed this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.countdown > 0.0 {
            self.countdown -= dt;
        }
        if self.countdown > 0.0 || self.current >= self.max {
            return false;
        }
        self.current = (self.current + self.regen_rate * dt).min(self.max);
        true
    }
}

/// Full-health reference geometry of the bar, captured once at startup.
///
/// The bar is anchored on its left edge: as it empties, its width shrinks
/// and its centre shifts left by half the lost width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    base_scale: Vec3,
    base_position: Vec3,
}

impl BarGeometry {
    /// Capture the current bar transform as the full-health reference.
    ///
    /// # Errors
    /// Returns `AgentError::DegenerateHealthBar` when the captured width is
    /// not a positive finite number.
    pub fn capture(bar: &impl BarTransform) -> Result<Self, AgentError> {
        let base_scale = bar.local_scale();
        if !(base_scale.x.is_finite() && base_scale.x > 0.0) {
            return Err(AgentError::DegenerateHealthBar { width: base_scale.x });
        }
        Ok(Self { base_scale, base_position: bar.local_position() })
    }

    #[must_use]
    pub fn base_scale(&self) -> Vec3 {
        self.base_scale
    }

    #[must_use]
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// Scale and position for a bar filled to `fraction`.
    #[must_use]
    pub fn fill(&self, fraction: f32) -> (Vec3, Vec3) {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction >= 1.0 {
            return (self.base_scale, self.base_position);
        }
        let width = self.base_scale.x * fraction;
        let lost = self.base_scale.x - width;
        let scale = Vec3::new(width, self.base_scale.y, self.base_scale.z);
        let position = Vec3::new(self.base_position.x - lost / 2.0, self.base_position.y, self.base_position.z);
        (scale, position)
    }

    /// Write the geometry for `fraction` into `bar`.
    pub fn apply(&self, fraction: f32, bar: &mut impl BarTransform) {
        let (scale, position) = self.fill(fraction);
        bar.set_local_scale(scale);
        bar.set_local_position(position);
    }
}
