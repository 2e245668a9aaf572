//! User interface: the health bar and a debug overlay.
//!
//! The health bar is the presentation listener for `PlayerHealthChanged`. It
//! captures its full-health geometry once when spawned and redraws itself
//! from the fraction carried by each event. The overlay (F1 by default)
//! shows the player's agent state and outlines the ground probe.

use crate::agent::{AgentError, BarGeometry, BarTransform, Footing, GROUND_PROBE_HEIGHT};
use crate::physics::Body;
use crate::player::{ground_check_point, GroundCheck, Player, PlayerHealthChanged};
use crate::settings::Settings;
use bevy::prelude::*;

/// Health bar sprite and the reference geometry it was spawned with.
#[derive(Component, Debug, Clone, Copy)]
pub struct HealthBar {
    pub geometry: BarGeometry,
}

impl HealthBar {
    /// Capture `bar` as the full-health geometry.
    ///
    /// # Errors
    /// See `BarGeometry::capture`.
    pub fn capture(bar: &impl BarTransform) -> Result<Self, AgentError> {
        Ok(Self { geometry: BarGeometry::capture(bar)? })
    }
}

/// Resize every health bar to the latest reported fraction.
pub fn apply_health_bar(
    mut changes: EventReader<PlayerHealthChanged>,
    mut bars: Query<(&HealthBar, &mut Transform)>,
) {
    let Some(latest) = changes.read().last() else { return };
    for (bar, mut tf) in &mut bars {
        bar.geometry.apply(latest.change.fraction, &mut *tf);
    }
}

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource)]
pub struct DebugOverlayTimer(pub Timer);

impl Default for DebugOverlayTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(0.1, TimerMode::Repeating))
    }
}

#[derive(Component)]
pub struct DebugOverlayText;

/// Spawn the (initially empty) overlay text node.
pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle { font_size: 18.0, color: Color::srgb(1.0, 1.0, 0.0), ..default() },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                bottom: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

/// Toggle the overlay with the `toggle_debug` binding.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.controls.key("toggle_debug", KeyCode::F1)) {
        state.visible = !state.visible;
    }
}

/// One-line-per-field summary of a player's agent.
#[must_use]
pub fn describe_player(player: &Player, body: &Body) -> String {
    let agent = &player.agent;
    let footing = match agent.footing() {
        Footing::Grounded => "grounded",
        Footing::Airborne => "airborne",
    };
    format!(
        "Health: {:.1} / {:.1}\nRegen in: {:.2}s\nFooting: {footing}\nAxis: {:+.2}\nVelocity: ({:.2}, {:.2})",
        agent.health().current(),
        agent.health().max(),
        agent.health().countdown().max(0.0),
        agent.horizontal_axis(),
        body.velocity.x,
        body.velocity.y,
    )
}

/// Refresh the overlay text on a short interval.
#[allow(clippy::needless_pass_by_value)]
pub fn update_debug_overlay(
    state: Res<DebugOverlayState>,
    time: Res<Time>,
    mut timer: ResMut<DebugOverlayTimer>,
    mut text: Query<&mut Text, With<DebugOverlayText>>,
    players: Query<(&Player, &Body)>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let Ok(mut text) = text.get_single_mut() else { return };

    text.sections[0].value = if !state.visible {
        String::new()
    } else if let Ok((player, body)) = players.get_single() {
        describe_player(player, body)
    } else {
        "Player: N/A".to_string()
    };
}

/// Outline each player's ground probe while the overlay is visible.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_ground_probe(
    state: Res<DebugOverlayState>,
    mut gizmos: Gizmos,
    players: Query<(&Player, &Transform, &GroundCheck)>,
) {
    if !state.visible {
        return;
    }
    for (player, tf, ground_check) in &players {
        let center = ground_check_point(tf, ground_check);
        // the real probe is too thin to see
        let half = Vec2::new(tf.scale.x.abs(), GROUND_PROBE_HEIGHT.max(0.05)) * 0.5;
        let color = if player.agent.is_grounded() { Color::srgb(0.0, 1.0, 0.0) } else { Color::srgb(1.0, 0.5, 0.0) };

        let (a, b) = (center - half, center + half);
        gizmos.line_2d(Vec2::new(a.x, a.y), Vec2::new(b.x, a.y), color);
        gizmos.line_2d(Vec2::new(b.x, a.y), Vec2::new(b.x, b.y), color);
        gizmos.line_2d(Vec2::new(b.x, b.y), Vec2::new(a.x, b.y), color);
        gizmos.line_2d(Vec2::new(a.x, b.y), Vec2::new(a.x, a.y), color);
    }
}
