//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in `data/settings`. If several files are
//! present the first one (by file name) that parses wins. With no usable file,
//! defaults are used.
//!
//! Player tuning is captured when the player spawns, so edits to `player` or
//! `health` take effect from the next scene (re)load. Physics values and the
//! fixed step rate are re-synced every frame by the app.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::log::info;
use bevy::prelude::{Res, ResMut, Resource};

/// Default directory holding settings files.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher {
    pub watcher: crate::ron::RonWatcher,
    pub dir: String,
}

/// Load settings from `path` (directory), falling back to defaults.
///
/// # Example
/// ```ignore
/// let settings = load_settings_from_dir("data/settings");
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    load_ron_files::<Settings>(path)
        .into_iter()
        .next()
        .unwrap_or_else(Settings::defaults)
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Propagates `notify::Error` when the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(|watcher| SettingsWatcher { watcher, dir: path.to_string() })
}

/// Reload the `Settings` resource when the watched directory changes.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.watcher.take_changed() {
        info!("settings changed, reloading from {}", watcher.dir);
        *settings = load_settings_from_dir(&watcher.dir);
    }
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher { watcher: crate::ron::RonWatcher::stub(), dir: SETTINGS_DIR.to_string() }
    }
}
