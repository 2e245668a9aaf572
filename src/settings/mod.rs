//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`).
use crate::agent::AgentConfig;
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        [
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("toggle_debug", "F1"),
            ("dump_debug", "F3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Resolve the key bound to `action`, falling back to `default`.
    #[must_use]
    pub fn key(&self, action: &str, default: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { keybinds: Self::default_keybinds() }
    }
}

/// Movement tuning for the player agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    #[serde(default = "PlayerSettings::default_max_speed")]
    pub max_speed: f32, // Top horizontal speed in units per second.
    #[serde(default = "PlayerSettings::default_smooth_time")]
    pub smooth_time: f32, // Seconds the velocity smoothing takes to settle.
    #[serde(default = "PlayerSettings::default_initial_jump_speed")]
    pub initial_jump_speed: f32, // Upward impulse applied on jump.
    #[serde(default = "PlayerSettings::default_ground_check_offset")]
    pub ground_check_offset: f32, // Vertical offset of the ground probe, in player heights.
}

impl PlayerSettings {
    fn default_max_speed() -> f32 { 12.0 }
    fn default_smooth_time() -> f32 { 0.3 }
    fn default_initial_jump_speed() -> f32 { 10.0 }
    fn default_ground_check_offset() -> f32 { -0.5 }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_speed: Self::default_max_speed(),
            smooth_time: Self::default_smooth_time(),
            initial_jump_speed: Self::default_initial_jump_speed(),
            ground_check_offset: Self::default_ground_check_offset(),
        }
    }
}

/// Health pool and regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSettings {
    #[serde(default = "HealthSettings::default_max_health")]
    pub max_health: f32,
    #[serde(default = "HealthSettings::default_regen_delay")]
    pub regen_delay: f32, // Seconds after damage before regeneration starts.
    #[serde(default = "HealthSettings::default_regen_rate")]
    pub regen_rate: f32, // Health regenerated per second.
}

impl HealthSettings {
    fn default_max_health() -> f32 { 100.0 }
    fn default_regen_delay() -> f32 { 1.0 }
    fn default_regen_rate() -> f32 { 5.0 }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            max_health: Self::default_max_health(),
            regen_delay: Self::default_regen_delay(),
            regen_rate: Self::default_regen_rate(),
        }
    }
}

/// Host physics and simulation rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: f32,
    #[serde(default = "PhysicsSettings::default_fixed_hz")]
    pub fixed_hz: f64, // Fixed simulation steps per second.
    #[serde(default = "PhysicsSettings::default_ground_friction")]
    pub ground_friction: f32, // Horizontal slow-down per second while resting on ground.
}

impl PhysicsSettings {
    fn default_gravity() -> f32 { -30.0 }
    fn default_fixed_hz() -> f64 { 50.0 }
    fn default_ground_friction() -> f32 { 4.0 }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            fixed_hz: Self::default_fixed_hz(),
            ground_friction: Self::default_ground_friction(),
        }
    }
}

/// Where scene layouts live and which one loads first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSettings {
    #[serde(default = "SceneSettings::default_directory")]
    pub directory: String,
    #[serde(default = "SceneSettings::default_initial")]
    pub initial: String,
}

impl SceneSettings {
    fn default_directory() -> String { "data/scenes".to_string() }
    fn default_initial() -> String { "level_1".to_string() }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self { directory: Self::default_directory(), initial: Self::default_initial() }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub player: PlayerSettings,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub scenes: SceneSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Agent tuning taken from the `player` and `health` sections.
    #[must_use]
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            max_speed: self.player.max_speed,
            smooth_time: self.player.smooth_time,
            initial_jump_speed: self.player.initial_jump_speed,
            max_health: self.health.max_health,
            regen_delay: self.health.regen_delay,
            regen_rate: self.health.regen_rate,
        }
    }

    /// Convert a string key identifier (e.g. from `controls.keybinds`) into a `KeyCode`.
    ///
    /// Accepts single letters and digits, function keys `F1`..`F12`, arrows and
    /// the common named keys. Matching is case-insensitive.
    ///
    /// # Returns
    /// `None` if the string does not name a known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return FUNCTION.get(n.wrapping_sub(1)).copied();
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" => KeyCode::Backspace,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys() {
        assert_eq!(Settings::keycode_from_str("a"), Some(KeyCode::KeyA));
        assert_eq!(Settings::keycode_from_str("Z"), Some(KeyCode::KeyZ));
        assert_eq!(Settings::keycode_from_str("7"), Some(KeyCode::Digit7));
        assert_eq!(Settings::keycode_from_str("f12"), Some(KeyCode::F12));
        assert_eq!(Settings::keycode_from_str("Space"), Some(KeyCode::Space));
        assert_eq!(Settings::keycode_from_str("ArrowLeft"), Some(KeyCode::ArrowLeft));
        assert_eq!(Settings::keycode_from_str("F0"), None);
        assert_eq!(Settings::keycode_from_str("F13"), None);
        assert_eq!(Settings::keycode_from_str("nope"), None);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let s: Settings = ron::from_str("(health: (max_health: 50.0))").unwrap();
        assert_eq!(s.health.max_health, 50.0);
        assert_eq!(s.health.regen_rate, 5.0);
        assert_eq!(s.player.max_speed, 12.0);
        assert_eq!(s.controls.key("jump", KeyCode::KeyW), KeyCode::Space);
    }

    #[test]
    fn agent_config_follows_sections() {
        let mut s = Settings::defaults();
        s.player.initial_jump_speed = 14.0;
        s.health.regen_delay = 2.5;
        let c = s.agent_config();
        assert_eq!(c.initial_jump_speed, 14.0);
        assert_eq!(c.regen_delay, 2.5);
        assert_eq!(c.max_health, 100.0);
    }

    #[test]
    fn unknown_binding_falls_back() {
        let mut s = ControlsSettings::default();
        s.keybinds.insert("jump".into(), "???".into());
        assert_eq!(s.key("jump", KeyCode::KeyW), KeyCode::KeyW);
    }
}
