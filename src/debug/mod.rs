//! Debug module: feature gated stats logging and the physics wireframe toggle.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
pub mod keys; // pub for testing
#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
mod state;
#[cfg(feature = "debug")]
mod stats;

#[cfg(feature = "debug")]
pub use state::{DebugState, DebugStats};

#[cfg(feature = "debug")]
use crate::core::config::DemoConfig;
#[cfg(feature = "debug")]
use crate::core::system::system_order::PrePhysicsSet;
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugPreRenderSet;

#[cfg(feature = "debug")]
pub struct DebugPlugin;
#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use bevy_rapier3d::render::DebugRenderContext;
        use keys::debug_key_input_system;
        use logging::debug_logging_system;
        use stats::debug_stats_collect_system;

        fn toggle_rapier_debug(state: Res<DebugState>, ctx: Option<ResMut<DebugRenderContext>>) {
            if let Some(mut c) = ctx {
                if c.enabled != state.rapier_wireframe {
                    c.enabled = state.rapier_wireframe;
                }
            }
        }

        let rapier_wireframe = app
            .world()
            .get_resource::<DemoConfig>()
            .is_some_and(|c| c.rapier_debug);
        app.insert_resource(DebugState {
            rapier_wireframe,
            ..default()
        })
        .init_resource::<DebugStats>()
        .configure_sets(Update, DebugPreRenderSet.after(PrePhysicsSet))
        .add_systems(
            Update,
            (
                debug_key_input_system,
                debug_stats_collect_system,
                toggle_rapier_debug,
                debug_logging_system,
            )
                .chain()
                .in_set(DebugPreRenderSet),
        );
    }
}

#[cfg(not(feature = "debug"))]
pub struct DebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
