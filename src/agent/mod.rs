//! The player agent: movement, jumping, ground detection and health.
//!
//! `PlayerAgent` is a plain state machine with no engine types in its state.
//! A host drives it explicitly:
//!
//! - `on_fixed_step` once per fixed simulation tick
//! - `on_move_input` / `on_jump_input` whenever input arrives
//! - `on_collision` for each contact that begins
//!
//! Physics, scene control and the health bar are reached through the traits
//! in [`host`]. The agent never renders: health changes are reported as
//! [`HealthChanged`] values for a presentation layer to apply.
//!
//! # Example:
//!
//! ```ignore
//! let mut agent = PlayerAgent::new(AgentConfig::default(), "level_1")?;
//! agent.on_move_input(1.0);
//! let outcome = agent.on_fixed_step(1.0 / 50.0, &mut body, &mut scenes);
//! ```
pub mod health;
pub mod host;
pub mod smoothing;

use bevy::log::{debug, info};
use bevy::math::Vec2;
use thiserror::Error;

pub use health::{BarGeometry, Health};
pub use host::{BarTransform, ColliderId, Contact, PhysicsBody, SceneController};
pub use smoothing::smooth_damp;

/// Height of the box used to probe for ground beneath the agent.
pub const GROUND_PROBE_HEIGHT: f32 = 0.001;

/// Precondition violations detected when the agent is built.
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("invalid tuning: {field} = {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    #[error("health bar has non-positive width {width}")]
    DegenerateHealthBar { width: f32 },
}

/// Tuning of a player agent. Immutable once the agent is built.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub max_speed: f32,
    pub smooth_time: f32,
    pub initial_jump_speed: f32,
    pub max_health: f32,
    pub regen_delay: f32,
    pub regen_rate: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_speed: 12.0,
            smooth_time: 0.3,
            initial_jump_speed: 10.0,
            max_health: 100.0,
            regen_delay: 1.0,
            regen_rate: 5.0,
        }
    }
}

impl AgentConfig {
    fn validate(&self) -> Result<(), AgentError> {
        let checks = [
            ("max_speed", self.max_speed, self.max_speed >= 0.0),
            ("smooth_time", self.smooth_time, self.smooth_time >= 0.0),
            ("initial_jump_speed", self.initial_jump_speed, self.initial_jump_speed >= 0.0),
            ("max_health", self.max_health, self.max_health > 0.0),
            ("regen_delay", self.regen_delay, self.regen_delay >= 0.0),
            ("regen_rate", self.regen_rate, self.regen_rate >= 0.0),
        ];
        for (field, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(AgentError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }
}

/// Whether the agent may jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footing {
    Grounded,
    Airborne,
}

/// Health notification for listeners such as the health bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub health: f32,
    /// `health / max_health`, in `[0, 1]`.
    pub fraction: f32,
}

/// What happened during one fixed step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// The ground probe succeeded this step.
    pub landed: bool,
    /// Health hit zero and a scene reload was requested.
    pub reload_requested: bool,
    /// Set when regeneration changed health.
    pub health_changed: Option<HealthChanged>,
}

/// State of one playable character.
#[derive(Debug, Clone)]
pub struct PlayerAgent {
    config: AgentConfig,
    scene: String,
    horizontal_axis: f32,
    smoothing_velocity: f32,
    footing: Footing,
    health: Health,
}

impl PlayerAgent {
    /// Build an agent at full health, airborne until the first ground probe.
    ///
    /// # Arguments
    /// * `config` - movement and health tuning
    /// * `scene` - name of the scene to reload when health runs out
    ///
    /// # Errors
    /// Returns `AgentError::InvalidTuning` for negative, zero (`max_health`)
    /// or non-finite tuning values.
    pub fn new(config: AgentConfig, scene: impl Into<String>) -> Result<Self, AgentError> {
        config.validate()?;
        let health = Health::new(config.max_health, config.regen_delay, config.regen_rate);
        Ok(Self {
            config,
            scene: scene.into(),
            horizontal_axis: 0.0,
            smoothing_velocity: 0.0,
            footing: Footing::Airborne,
            health,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &str {
        &self.scene
    }

    #[must_use]
    pub fn health(&self) -> &Health {
        &self.health
    }

    #[must_use]
    pub fn footing(&self) -> Footing {
        self.footing
    }

    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.footing == Footing::Grounded
    }

    #[must_use]
    pub fn horizontal_axis(&self) -> f32 {
        self.horizontal_axis
    }

    #[must_use]
    pub fn health_changed(&self) -> HealthChanged {
        HealthChanged { health: self.health.current(), fraction: self.health.fraction() }
    }

    /// Run one fixed simulation step of length `dt` seconds.
    pub fn on_fixed_step(
        &mut self,
        dt: f32,
        body: &mut impl PhysicsBody,
        scenes: &mut impl SceneController,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        if self.horizontal_axis != 0.0 {
            self.apply_movement(dt, body);
        }

        if self.footing == Footing::Airborne && self.probe_ground(body) {
            self.footing = Footing::Grounded;
            outcome.landed = true;
            debug!("player landed");
        }

        if self.health.is_depleted() {
            info!("player died, reloading scene '{}'", self.scene);
            scenes.reload_scene(&self.scene);
            outcome.reload_requested = true;
            return outcome;
        }

        if self.health.tick(dt) {
            outcome.health_changed = Some(self.health_changed());
        }

        outcome
    }

    /// Store the latest horizontal axis. Applied on the next step.
    pub fn on_move_input(&mut self, axis: f32) {
        self.horizontal_axis = if axis.is_finite() { axis.clamp(-1.0, 1.0) } else { 0.0 };
    }

    /// Jump if grounded.
    ///
    /// # Returns
    /// `true` when an impulse was applied.
    pub fn on_jump_input(&mut self, body: &mut impl PhysicsBody) -> bool {
        if self.footing != Footing::Grounded {
            return false;
        }
        self.footing = Footing::Airborne;
        body.apply_impulse(Vec2::new(0.0, self.config.initial_jump_speed));
        debug!("player jumped");
        true
    }

    /// Handle a contact that just began.
    ///
    /// Damaging contacts always apply, with no invulnerability window, and
    /// restart the regen delay.
    pub fn on_collision(&mut self, contact: &Contact) -> Option<HealthChanged> {
        let Contact::Damaging { damage } = *contact else {
            return None;
        };
        self.take_damage(damage);
        self.health.restart_regen_delay();
        debug!("player took {damage} damage, health now {}", self.health.current());
        Some(self.health_changed())
    }

    /// `health = max(0, health - damage)`. Listeners are not notified.
    pub fn take_damage(&mut self, damage: f32) {
        self.health.take_damage(damage);
    }

    fn apply_movement(&mut self, dt: f32, body: &mut impl PhysicsBody) {
        let velocity = body.velocity();
        let target = self.horizontal_axis * self.config.max_speed;
        let x = smooth_damp(velocity.x, target, &mut self.smoothing_velocity, self.config.smooth_time, dt);
        body.set_velocity(Vec2::new(x, velocity.y));
    }

    fn probe_ground(&self, body: &impl PhysicsBody) -> bool {
        if body.velocity().y > 0.0 {
            return false;
        }
        let size = Vec2::new(body.horizontal_scale(), GROUND_PROBE_HEIGHT);
        body.overlap_box(body.ground_check_point(), size)
            .is_some_and(|hit| hit != body.own_collider())
    }
}
