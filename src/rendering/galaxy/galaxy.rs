use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::render::view::RenderLayers;

use crate::core::components::{GalaxyPoints, ViewKind};
use crate::core::system::system_order::PostPhysicsSyncSet;
use crate::galaxy::cloud::PointCloud;

/// Handle to the point-list mesh built from the `PointCloud`.
#[derive(Resource, Debug, Clone)]
pub struct GalaxyMesh(pub Handle<Mesh>);

pub struct GalaxyRenderPlugin;

impl Plugin for GalaxyRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, spawn_galaxy_points)
            .add_systems(PostUpdate, upload_galaxy_colors.in_set(PostPhysicsSyncSet));
    }
}

pub fn point_cloud_mesh(cloud: &PointCloud) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, cloud.positions().to_vec());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, cloud.colors_rgba());
    mesh
}

fn spawn_galaxy_points(
    mut commands: Commands,
    cloud: Res<PointCloud>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(point_cloud_mesh(&cloud));
    // Unlit white base; the vertex colors carry the palette.
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });
    commands.spawn((
        Name::new("GalaxyPoints"),
        GalaxyPoints,
        Mesh3d(mesh.clone()),
        MeshMaterial3d(material),
        Transform::default(),
        RenderLayers::layer(ViewKind::Galaxy.render_layer()),
    ));
    commands.insert_resource(GalaxyMesh(mesh));
}

/// Re-uploads the vertex colors after a recolor, then clears the dirty flag.
pub fn upload_galaxy_colors(
    mut cloud: ResMut<PointCloud>,
    galaxy_mesh: Option<Res<GalaxyMesh>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    if !cloud.colors_dirty() {
        return;
    }
    let Some(galaxy_mesh) = galaxy_mesh else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&galaxy_mesh.0) else {
        warn!(target: "galaxy", "point mesh asset missing; colors not uploaded");
        return;
    };
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, cloud.colors_rgba());
    cloud.clear_dirty();
}

/// Current vertex colors of a point mesh, if it has any.
pub fn mesh_colors(mesh: &Mesh) -> Option<&[[f32; 4]]> {
    match mesh.attribute(Mesh::ATTRIBUTE_COLOR)? {
        VertexAttributeValues::Float32x4(colors) => Some(colors),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::cloud::DiskShape;
    use crate::galaxy::palette::ColorStops;
    use rand::rngs::mock::StepRng;

    #[test]
    fn mesh_mirrors_cloud() {
        let cloud = PointCloud::generate(5, DiskShape::default(), &mut StepRng::new(0, 0));
        let mesh = point_cloud_mesh(&cloud);
        assert_eq!(mesh.count_vertices(), 5);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
        assert_eq!(mesh_colors(&mesh).unwrap(), &[[1.0; 4]; 5][..]);
    }

    #[test]
    fn dirty_colors_are_uploaded_once() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .add_systems(Update, upload_galaxy_colors);

        let mut cloud = PointCloud::generate(4, DiskShape::default(), &mut StepRng::new(0, 0));
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(point_cloud_mesh(&cloud));
        let stops = ColorStops::parse(&["#ff0000", "#ff0000", "#ff0000"]).unwrap();
        cloud.recolor(&stops, &mut StepRng::new(0, 0));
        app.insert_resource(cloud).insert_resource(GalaxyMesh(handle.clone()));

        app.update();

        assert!(!app.world().resource::<PointCloud>().colors_dirty());
        let meshes = app.world().resource::<Assets<Mesh>>();
        let colors = mesh_colors(meshes.get(&handle).unwrap()).unwrap();
        assert!(colors.iter().all(|c| *c == [1.0, 0.0, 0.0, 1.0]));
    }
}
