use bevy::prelude::*;
use bevy::render::camera::{ClearColorConfig, RenderTarget};
use bevy::render::view::RenderLayers;
use bevy::window::{PrimaryWindow, WindowRef};

use crate::core::components::{CanvasWindow, SceneCamera, UiCamera, ViewKind};
use crate::core::config::{CameraConfig, DemoConfig, WindowConfig};

/// One window per view: the primary window shows the galaxy, a second one the boxes.
/// Each window gets a perspective scene camera and a UI camera drawn on top of it.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                open_view_windows,
                spawn_view_cameras,
                spawn_boxes_light,
                route_gizmos_to_boxes_view,
            )
                .chain(),
        );
    }
}

pub fn view_title(kind: ViewKind, cfg: &WindowConfig) -> String {
    match kind {
        ViewKind::Galaxy => cfg.galaxy_title.clone(),
        ViewKind::Boxes => cfg.boxes_title.clone(),
    }
}

/// Window description for a view. Also used by `main` for the primary window.
pub fn view_window(kind: ViewKind, cfg: &WindowConfig) -> Window {
    Window {
        title: view_title(kind, cfg),
        resolution: (cfg.width, cfg.height).into(),
        resizable: true,
        #[cfg(target_arch = "wasm32")]
        canvas: Some(kind.canvas_selector().into()),
        #[cfg(target_arch = "wasm32")]
        fit_canvas_to_parent: true,
        ..default()
    }
}

fn view_camera(kind: ViewKind, cfg: &DemoConfig) -> &CameraConfig {
    match kind {
        ViewKind::Galaxy => &cfg.galaxy.camera,
        ViewKind::Boxes => &cfg.boxes.camera,
    }
}

fn open_view_windows(
    mut commands: Commands,
    cfg: Res<DemoConfig>,
    primary: Query<Entity, With<PrimaryWindow>>,
) {
    match primary.single() {
        Ok(window) => {
            commands.entity(window).insert(CanvasWindow(ViewKind::Galaxy));
        }
        Err(_) => warn!(target: "viewport", "no primary window; galaxy view has no surface"),
    }
    commands.spawn((
        CanvasWindow(ViewKind::Boxes),
        view_window(ViewKind::Boxes, &cfg.window),
    ));
}

fn spawn_view_cameras(
    mut commands: Commands,
    cfg: Res<DemoConfig>,
    windows: Query<(Entity, &CanvasWindow)>,
) {
    for (window, view) in &windows {
        let kind = view.0;
        let cam = view_camera(kind, &cfg);
        let target = RenderTarget::Window(WindowRef::Entity(window));
        // No look-at: both scene cameras face -Z from where they stand.
        commands.spawn((
            Name::new(format!("{kind:?}SceneCamera")),
            SceneCamera(kind),
            Camera3d::default(),
            Camera {
                target: target.clone(),
                order: 0,
                clear_color: ClearColorConfig::Custom(Color::BLACK),
                ..default()
            },
            Projection::from(PerspectiveProjection {
                fov: cam.fov_degrees.to_radians(),
                near: cam.near,
                far: cam.far,
                ..default()
            }),
            Transform::from_translation(cam.position),
            RenderLayers::layer(kind.render_layer()),
        ));
        commands.spawn((
            Name::new(format!("{kind:?}UiCamera")),
            UiCamera(kind),
            Camera2d,
            Camera {
                target,
                order: 1,
                clear_color: ClearColorConfig::None,
                ..default()
            },
        ));
        info!(target: "viewport", view = ?kind, "cameras attached to window {window}");
    }
}

fn spawn_boxes_light(mut commands: Commands, cfg: Res<DemoConfig>) {
    commands.spawn((
        Name::new("BoxesLight"),
        DirectionalLight::default(),
        Transform::from_translation(cfg.boxes.light_position).looking_at(Vec3::ZERO, Vec3::Y),
        RenderLayers::layer(ViewKind::Boxes.render_layer()),
    ));
}

// Physics wireframes are drawn with the default gizmo group; show them in the boxes view.
fn route_gizmos_to_boxes_view(store: Option<ResMut<GizmoConfigStore>>) {
    let Some(mut store) = store else {
        return;
    };
    let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    config.render_layers = RenderLayers::layer(ViewKind::Boxes.render_layer());
}
