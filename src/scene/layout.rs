//! Scene layouts: what a named scene contains, loaded from `data/scenes/<name>.ron`.
use crate::agent::AgentError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene '{0}' not found")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// A static block the player can stand on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub center: (f32, f32),
    pub size: (f32, f32),
}

/// A block that hurts on contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSpec {
    pub center: (f32, f32),
    pub size: (f32, f32),
    pub damage: f32,
}

/// Health bar placement, relative to the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSpec {
    pub position: (f32, f32),
    pub size: (f32, f32),
}

impl Default for BarSpec {
    fn default() -> Self {
        Self { position: (-6.0, 4.0), size: (4.0, 0.35) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    #[serde(default = "SceneLayout::default_spawn")]
    pub spawn: (f32, f32),
    #[serde(default = "SceneLayout::default_player_size")]
    pub player_size: (f32, f32),
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub hazards: Vec<HazardSpec>,
    #[serde(default)]
    pub health_bar: BarSpec,
}

impl SceneLayout {
    fn default_spawn() -> (f32, f32) { (0.0, 2.0) }
    fn default_player_size() -> (f32, f32) { (0.8, 1.6) }
}

impl Default for SceneLayout {
    /// Built-in level: a long floor, two ledges and a pair of hazards.
    fn default() -> Self {
        Self {
            spawn: Self::default_spawn(),
            player_size: Self::default_player_size(),
            platforms: vec![
                PlatformSpec { center: (0.0, -1.0), size: (60.0, 1.0) },
                PlatformSpec { center: (6.0, 1.5), size: (4.0, 0.5) },
                PlatformSpec { center: (12.0, 3.0), size: (4.0, 0.5) },
                PlatformSpec { center: (-29.5, 5.0), size: (1.0, 12.0) },
                PlatformSpec { center: (29.5, 5.0), size: (1.0, 12.0) },
            ],
            hazards: vec![
                HazardSpec { center: (-8.0, 0.0), size: (1.0, 1.0), damage: 30.0 },
                HazardSpec { center: (18.0, 0.0), size: (2.0, 1.0), damage: 80.0 },
            ],
            health_bar: BarSpec::default(),
        }
    }
}

/// Read and parse `<dir>/<name>.ron`.
///
/// # Errors
/// `SceneError::NotFound` when the file does not exist, `Io` for other read
/// failures and `Parse` for malformed RON.
pub fn load_layout(dir: &str, name: &str) -> Result<SceneLayout, SceneError> {
    let path = Path::new(dir).join(format!("{name}.ron"));
    let content = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SceneError::NotFound(name.to_string())
        } else {
            SceneError::Io { path: path.display().to_string(), source }
        }
    })?;
    Ok(ron::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_scene_is_not_found() {
        assert!(matches!(load_layout("/no/scenes", "level_9"), Err(SceneError::NotFound(n)) if n == "level_9"));
    }

    #[test]
    fn parses_partial_layout() {
        let dir = std::env::temp_dir().join(format!("stride-scenes-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("tiny.ron"),
            "(spawn: (1.0, 3.0), hazards: [(center: (2.0, 0.0), size: (1.0, 1.0), damage: 12.5)])",
        )
        .unwrap();
        std::fs::write(dir.join("broken.ron"), "(spawn: ").unwrap();

        let tiny = load_layout(dir.to_str().unwrap(), "tiny");
        let broken = load_layout(dir.to_str().unwrap(), "broken");
        std::fs::remove_dir_all(&dir).ok();

        let tiny = tiny.unwrap();
        assert_eq!(tiny.spawn, (1.0, 3.0));
        assert_eq!(tiny.hazards[0].damage, 12.5);
        assert!(tiny.platforms.is_empty());
        assert_eq!(tiny.player_size, (0.8, 1.6));
        assert!(matches!(broken, Err(SceneError::Parse(_))));
    }

    #[test]
    fn shipped_level_parses() {
        let level = load_layout("data/scenes", "level_1").unwrap();
        assert_eq!(level.spawn, SceneLayout::default().spawn);
        assert!(level.platforms.len() >= SceneLayout::default().platforms.len());
        assert!(level.hazards.iter().all(|h| h.damage > 0.0));
    }
}
