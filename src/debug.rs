//! Debug utilities, including a system (F3 default) that dumps the player's
//! agent state, entity counts and process memory to a timestamped text file
//! in `./debug-dumps/`.
//!
//! Useful for capturing the exact state behind a movement or health bug
//! without attaching a debugger.
use crate::physics::Body;
use crate::player::Player;
use crate::scene::ActiveScene;
use crate::settings::Settings;
use crate::ui::describe_player;
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use sysinfo::{Pid, ProcessExt, System, SystemExt};

/// Directory dumps are written to.
pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

/// Convert bytes to a human-readable megabyte string (e.g. "123.45 MB").
fn bytes_to_mb(bytes: u64) -> String {
    format!("{:.2} MB", (bytes as f64) / (1024.0 * 1024.0))
}

/// Build the dump text. Kept separate from the system so it can be tested.
#[must_use]
pub fn dump_text(
    now: DateTime<Utc>,
    scene: Option<&str>,
    entity_count: usize,
    players: &[(Entity, &Player, &Body, &Transform)],
    memory_bytes: Option<(u64, u64)>,
) -> String {
    let mut out = String::new();
    writeln!(out, "Debug dump: {}", now.timestamp()).ok();
    writeln!(out, "Timestamp: {}", now.format("%Y-%m-%d %H:%M:%S")).ok();
    writeln!(out, "Scene: {}", scene.unwrap_or("(none)")).ok();
    writeln!(out, "Entities: {entity_count}").ok();
    if let Some((resident, virt)) = memory_bytes {
        writeln!(out, "Process memory: {} (virtual {})", bytes_to_mb(resident), bytes_to_mb(virt)).ok();
    }

    if players.is_empty() {
        writeln!(out, "\nNo player spawned").ok();
    }
    for (entity, player, body, tf) in players {
        writeln!(out, "\nPlayer {entity:?}").ok();
        writeln!(out, "Position: ({:.3}, {:.3})", tf.translation.x, tf.translation.y).ok();
        writeln!(out, "Resting: {}", body.resting).ok();
        out.push_str(&describe_player(player, body));
        out.push('\n');
        writeln!(out, "Tuning: {:?}", player.agent.config()).ok();
    }
    out
}

/// Resident and virtual memory of this process, in bytes.
fn process_memory_bytes() -> Option<(u64, u64)> {
    let mut sys = System::new();
    let pid = Pid::from(std::process::id() as usize);
    sys.refresh_process(pid);
    sys.process(pid).map(|p| (p.memory(), p.virtual_memory()))
}

/// Write a dump when the `dump_debug` binding (default F3) is pressed.
#[allow(clippy::needless_pass_by_value)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    scene: Option<Res<ActiveScene>>,
    entities: Query<Entity>,
    players: Query<(Entity, &Player, &Body, &Transform)>,
) {
    if !keys.just_pressed(settings.controls.key("dump_debug", KeyCode::F3)) {
        return;
    }

    let now = Utc::now();
    let players: Vec<_> = players.iter().collect();
    let out = dump_text(
        now,
        scene.as_deref().map(|s| s.name.as_str()),
        entities.iter().count(),
        &players,
        process_memory_bytes(),
    );

    let fname = format!("{DUMP_DIR}/debug-{}.txt", now.timestamp());
    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    match fs::write(&fname, out) {
        Ok(()) => info!("wrote debug dump: {fname}"),
        Err(e) => error!("debug dump: failed to write {fname}: {e}"),
    }
}
