use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::config::DemoConfig;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier for the boxes world

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        let dt = app
            .world()
            .get_resource::<DemoConfig>()
            .map_or(1.0 / 60.0, |cfg| cfg.boxes.timestep);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            // One step of exactly `dt` per frame, regardless of wall-clock frame time.
            // Inserted after the plugin so it overrides Rapier's own default.
            .insert_resource(fixed_timestep(dt))
            // Runs on the first frame and again whenever the config is hot-reloaded.
            .add_systems(Update, configure_gravity.run_if(resource_changed::<DemoConfig>));
    }
}

pub fn fixed_timestep(dt: f32) -> TimestepMode {
    TimestepMode::Fixed { dt, substeps: 1 }
}

fn configure_gravity(mut q_cfg: Query<&mut RapierConfiguration>, cfg: Res<DemoConfig>) {
    // RapierConfiguration lives on the default context entity, not in a resource.
    if let Ok(mut rapier_cfg) = q_cfg.single_mut() {
        if rapier_cfg.gravity != cfg.boxes.gravity {
            rapier_cfg.gravity = cfg.boxes.gravity;
            info!(target: "boxes", gravity = ?cfg.boxes.gravity, "physics gravity configured");
        }
    } else {
        warn!(target: "boxes", "no Rapier context found; gravity left at engine default");
    }
}
