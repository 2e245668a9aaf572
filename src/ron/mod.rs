//! Utilities for loading RON files and watching directories for changes.
//!
//! Settings and scene layouts are plain RON files under `data/`. This module
//! reads them and provides a watcher resource that raises a shared flag when
//! a watched directory changes, which is how settings hot-reload.

use bevy::log::warn;
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    changed: Arc<Mutex<bool>>,
    _watcher: Option<RecommendedWatcher>, // kept alive for as long as the resource
}

impl RonWatcher {
    /// A watcher with no OS backing. Its flag only changes through `mark_changed`.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher { changed: Arc::new(Mutex::new(false)), _watcher: None }
    }

    /// Return whether anything changed since the last call and clear the flag.
    ///
    /// A poisoned flag is recovered rather than propagated.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(flag) => flag,
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::replace(&mut *flag, false)
    }

    pub fn mark_changed(&self) {
        if let Ok(mut flag) = self.changed.lock() {
            *flag = true;
        }
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files that fail to parse are skipped with a warning. A missing directory
/// yields an empty list.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    // read_dir order is platform dependent
    files.sort();

    let mut items = Vec::new();
    for file in files {
        let Ok(content) = std::fs::read_to_string(&file) else {
            warn!("could not read {}", file.display());
            continue;
        };
        match ron::from_str::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => warn!("failed to parse {}: {e}", file.display()),
        }
    }
    items
}

/// Create a `RonWatcher` that flags modifications under `path`.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or cannot
/// watch `path`.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let flag = changed.clone();
    let watched: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()).starts_with(&watched)
                });
                if relevant && let Ok(mut f) = flag.lock() {
                    *f = true;
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn loads_sorted_and_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!("stride-ron-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.ron"), "(name: \"second\")").unwrap();
        std::fs::write(dir.join("a.ron"), "(name: \"first\")").unwrap();
        std::fs::write(dir.join("c.ron"), "(name: ").unwrap();
        std::fs::write(dir.join("notes.txt"), "(name: \"ignored\")").unwrap();

        let items: Vec<Item> = load_ron_files(dir.to_str().unwrap());
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(items, vec![Item { name: "first".into() }, Item { name: "second".into() }]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let items: Vec<Item> = load_ron_files("/definitely/not/here");
        assert!(items.is_empty());
    }

    #[test]
    fn stub_flag_is_taken_once() {
        let w = RonWatcher::stub();
        assert!(!w.take_changed());
        w.mark_changed();
        assert!(w.take_changed());
        assert!(!w.take_changed());
    }
}
