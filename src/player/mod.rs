//! Player components, events and systems.
//!
//! The module wires the engine-free `PlayerAgent` into Bevy: keyboard input
//! becomes `MoveInput`/`JumpInput`, a fixed-step system drives the agent
//! against the host physics, and begun contacts with a `Hazard` become
//! damage.
//!
//! # Example:
//!
//! ```ignore
//! app.add_systems(Update, (read_keyboard, dispatch_input).chain());
//! app.add_systems(FixedUpdate, (player_fixed_step, integrate_bodies, player_contacts).chain());
//! ```
pub mod input;
pub mod physics;

use crate::agent::{HealthChanged, PlayerAgent};
use bevy::prelude::*;

pub use input::*;
pub use physics::*;

/// Component owning the agent state of a playable character.
#[derive(Component, Debug)]
pub struct Player {
    pub agent: PlayerAgent,
}

impl Player {
    #[must_use]
    pub fn new(agent: PlayerAgent) -> Self {
        Self { agent }
    }
}

/// Where the ground probe sits, as a fraction of the player's height
/// below (negative) or above its centre.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundCheck {
    pub offset: f32,
}

impl Default for GroundCheck {
    fn default() -> Self {
        Self { offset: -0.5 }
    }
}

/// Static collider that damages the player on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hazard {
    pub damage: f32,
}

/// Horizontal move axis in `[-1, 1]`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveInput(pub f32);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpInput;

/// A player's health changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerHealthChanged {
    pub entity: Entity,
    pub change: HealthChanged,
}
