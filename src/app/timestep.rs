//! Fixed simulation rate, driven by `Settings.physics.fixed_hz`.
use bevy::prelude::*;
use stride::settings::Settings;

/// Fallback when the configured rate is not a positive number.
const DEFAULT_FIXED_HZ: f64 = 50.0;

/// Re-insert `Time<Fixed>` whenever the configured step rate changes.
pub fn sync_fixed_timestep(
    settings: Res<Settings>,
    mut fixed: ResMut<Time<Fixed>>,
    mut last: Local<Option<f64>>,
) {
    let hz = settings.physics.fixed_hz;
    if *last == Some(hz) { return; }

    let applied = if hz.is_finite() && hz > 0.0 {
        hz
    } else {
        warn!("ignoring fixed_hz {hz}, stepping at {DEFAULT_FIXED_HZ} Hz");
        DEFAULT_FIXED_HZ
    };
    fixed.set_timestep_hz(applied);
    info!("fixed timestep: {applied} Hz");
    *last = Some(hz);
}
