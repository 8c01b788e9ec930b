//! Galaxy view simulation state: the point cloud, its random source, the color
//! controls, and the recolor request handling. Drawing lives in `rendering::galaxy`.

pub mod cloud;
pub mod palette;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::components::GalaxyPoints;
use crate::core::config::{DemoConfig, GalaxyConfig};
use crate::core::system::system_order::PrePhysicsSet;
use cloud::{DiskShape, PointCloud};
use palette::{ColorInputs, ColorStops};

/// Ask the galaxy to re-blend every point from the current `ColorInputs`.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RecolorRequested;

/// Random source shared by generation and every recolor.
#[derive(Resource, Deref, DerefMut)]
pub struct GalaxyRng(pub StdRng);

impl GalaxyRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self(match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        })
    }
}

impl From<&GalaxyConfig> for DiskShape {
    fn from(cfg: &GalaxyConfig) -> Self {
        Self {
            radius: cfg.radius,
            height: cfg.height,
        }
    }
}

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RecolorRequested>()
            .add_systems(Startup, setup_galaxy_state)
            .add_systems(
                Update,
                (apply_recolor_requests.in_set(PrePhysicsSet), spin_galaxy),
            );
    }
}

pub fn setup_galaxy_state(mut commands: Commands, cfg: Res<DemoConfig>) {
    let g = &cfg.galaxy;
    let mut rng = GalaxyRng::from_seed(g.seed);
    let cloud = PointCloud::generate(g.count, DiskShape::from(g), &mut rng.0);
    info!(
        target: "galaxy",
        points = cloud.len(),
        seed = ?g.seed,
        "point cloud generated"
    );
    commands.insert_resource(cloud);
    commands.insert_resource(rng);
    commands.insert_resource(ColorInputs::new(g.initial_colors.clone()));
}

fn apply_recolor_requests(
    mut requests: EventReader<RecolorRequested>,
    inputs: Res<ColorInputs>,
    mut cloud: ResMut<PointCloud>,
    mut rng: ResMut<GalaxyRng>,
) {
    for _ in requests.read() {
        match ColorStops::parse(&inputs.values) {
            Ok(stops) => {
                cloud.recolor(&stops, &mut rng.0);
                info!(target: "galaxy", colors = ?inputs.values, "recolored {} points", cloud.len());
            }
            // Prior colors stay as they were.
            Err(e) => warn!(target: "galaxy", "recolor rejected: {e:#}"),
        }
    }
}

fn spin_galaxy(cfg: Res<DemoConfig>, mut q: Query<&mut Transform, With<GalaxyPoints>>) {
    for mut tf in &mut q {
        tf.rotate_y(cfg.galaxy.rotation_per_frame);
    }
}
