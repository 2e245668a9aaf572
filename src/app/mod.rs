pub mod physics;
pub mod timestep;

pub use physics::sync_physics_settings;
pub use timestep::sync_fixed_timestep;
