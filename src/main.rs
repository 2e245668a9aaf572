use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use stride::physics::{integrate_bodies, ActiveContacts, CollisionStarted, PhysicsParams};
use stride::player::{
    dispatch_input, player_contacts, player_fixed_step, read_keyboard, JumpInput, MoveInput,
    PlayerHealthChanged,
};
use stride::scene::{follow_player, load_initial_scene, reload_scene, SceneReloadRequested};
use stride::settings::loader as settings_loader;
use stride::ui::{
    apply_health_bar, draw_ground_probe, spawn_debug_overlay, toggle_debug_overlay,
    update_debug_overlay, DebugOverlayState, DebugOverlayTimer,
};

mod app;
use stride::debug::DebugDumpPlugin;
use app::{sync_fixed_timestep, sync_physics_settings};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "stride".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(DebugDumpPlugin);

    app.add_event::<MoveInput>();
    app.add_event::<JumpInput>();
    app.add_event::<PlayerHealthChanged>();
    app.add_event::<CollisionStarted>();
    app.add_event::<SceneReloadRequested>();

    app.insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.12)));
    app.init_resource::<PhysicsParams>();
    app.init_resource::<ActiveContacts>();
    app.init_resource::<DebugOverlayState>();
    app.init_resource::<DebugOverlayTimer>();

    app.insert_resource(settings.clone());
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, load_initial_scene);
    app.add_systems(Startup, spawn_debug_overlay);

    app.add_systems(Update, (read_keyboard, dispatch_input).chain());
    app.add_systems(Update, apply_health_bar);
    app.add_systems(Update, reload_scene);
    app.add_systems(Update, follow_player);
    app.add_systems(Update, toggle_debug_overlay);
    app.add_systems(Update, update_debug_overlay);
    app.add_systems(Update, draw_ground_probe);

    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, sync_fixed_timestep);
    app.add_systems(Update, sync_physics_settings);

    app.add_systems(FixedUpdate, (player_fixed_step, integrate_bodies, player_contacts).chain());

    app.run();
}
