use bevy::prelude::*;
use bevy::render::view::RenderLayers;

use crate::core::components::{BoxVisual, Ground, ViewKind};
use crate::core::config::DemoConfig;

/// Shared mesh + lit material handles for the boxes view.
#[derive(Resource, Debug, Clone)]
pub struct BoxesAppearance {
    pub box_mesh: Handle<Mesh>,
    pub box_material: Handle<StandardMaterial>,
    pub ground_mesh: Handle<Mesh>,
    pub ground_material: Handle<StandardMaterial>,
}

pub struct MaterialsPlugin;

impl Plugin for MaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_boxes_appearance)
            .add_systems(Update, (dress_box_visuals, dress_ground));
    }
}

/// Parses a config color, falling back (with a warning) when it is malformed.
pub fn config_color(raw: &str, fallback: Srgba) -> Color {
    match Srgba::hex(raw) {
        Ok(c) => c.into(),
        Err(e) => {
            warn!(target: "config", "color '{raw}' unusable ({e}); using {}", fallback.to_hex());
            fallback.into()
        }
    }
}

fn setup_boxes_appearance(
    mut commands: Commands,
    cfg: Res<DemoConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let b = &cfg.boxes;
    let size = b.half_extent * 2.0;
    let ground_size = b.ground_half_extents * 2.0;
    commands.insert_resource(BoxesAppearance {
        box_mesh: meshes.add(Cuboid::new(size, size, size)),
        box_material: materials.add(config_color(&b.box_color, Srgba::rgb(1.0, 0.333, 0.2))),
        ground_mesh: meshes.add(Cuboid::from_size(ground_size)),
        ground_material: materials.add(config_color(&b.ground_color, Srgba::rgb(0.333, 0.333, 0.333))),
    });
}

fn dress_box_visuals(
    mut commands: Commands,
    appearance: Res<BoxesAppearance>,
    q: Query<Entity, Added<BoxVisual>>,
) {
    for e in &q {
        commands.entity(e).insert((
            Mesh3d(appearance.box_mesh.clone()),
            MeshMaterial3d(appearance.box_material.clone()),
            RenderLayers::layer(ViewKind::Boxes.render_layer()),
        ));
    }
}

fn dress_ground(
    mut commands: Commands,
    appearance: Res<BoxesAppearance>,
    q: Query<Entity, Added<Ground>>,
) {
    for e in &q {
        commands.entity(e).insert((
            Mesh3d(appearance.ground_mesh.clone()),
            MeshMaterial3d(appearance.ground_material.clone()),
            RenderLayers::layer(ViewKind::Boxes.render_layer()),
        ));
    }
}
