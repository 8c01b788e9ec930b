//! Per-view surface bookkeeping. Whenever a view's window changes size, its 3D
//! surface becomes the top `height_fraction` of the window; the strip below is
//! left to the controls.
//!
//! `aspect` records the host window's `width / height`. The scene camera's
//! projection is recomputed from the surface itself (`surface_aspect`).

use bevy::prelude::*;
use bevy::render::camera::Viewport;
use bevy::window::{WindowResized, WindowScaleFactorChanged};
use std::collections::HashMap;

use crate::core::components::{CanvasWindow, SceneCamera, ViewKind};
use crate::core::config::DemoConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Logical size of the 3D output surface.
    pub surface: Vec2,
    pub aspect: f32,
}

impl ViewportState {
    pub fn on_resize(width: f32, height: f32, height_fraction: f32) -> Self {
        Self {
            surface: Vec2::new(width, height * height_fraction),
            aspect: width / height,
        }
    }

    /// Width over height of the drawn surface; the projection uses this one.
    pub fn surface_aspect(&self) -> f32 {
        self.surface.x / self.surface.y
    }

    /// False for minimized or otherwise zero-area windows.
    pub fn is_drawable(&self) -> bool {
        self.surface.x >= 1.0 && self.surface.y >= 1.0 && self.aspect.is_finite()
    }

    /// Surface in physical pixels, never larger than the window it sits in.
    pub fn physical_size(&self, scale_factor: f32, window_physical: UVec2) -> UVec2 {
        (self.surface * scale_factor)
            .round()
            .as_uvec2()
            .min(window_physical)
    }
}

#[derive(Resource, Debug, Default)]
pub struct Viewports(HashMap<ViewKind, ViewportState>);

impl Viewports {
    pub fn get(&self, kind: ViewKind) -> Option<&ViewportState> {
        self.0.get(&kind)
    }
}

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewports>()
            .add_event::<WindowResized>()
            .add_event::<WindowScaleFactorChanged>()
            .add_systems(Update, track_view_surfaces);
    }
}

pub fn track_view_surfaces(
    mut resized: EventReader<WindowResized>,
    mut rescaled: EventReader<WindowScaleFactorChanged>,
    new_windows: Query<Entity, Added<CanvasWindow>>,
    windows: Query<(&Window, &CanvasWindow)>,
    mut cameras: Query<(&mut Camera, &mut Projection, &SceneCamera)>,
    mut viewports: ResMut<Viewports>,
    cfg: Res<DemoConfig>,
) {
    // Freshly opened views get their initial size from the window itself.
    let mut pending: Vec<(Entity, f32, f32)> = new_windows
        .iter()
        .filter_map(|e| windows.get(e).ok().map(|(w, _)| (e, w.width(), w.height())))
        .collect();
    pending.extend(resized.read().map(|ev| (ev.window, ev.width, ev.height)));
    // A scale change keeps the logical size but not the physical one.
    pending.extend(rescaled.read().filter_map(|ev| {
        windows
            .get(ev.window)
            .ok()
            .map(|(w, _)| (ev.window, w.width(), w.height()))
    }));

    for (entity, width, height) in pending {
        let Ok((window, view)) = windows.get(entity) else {
            continue;
        };
        let kind = view.0;
        let state = ViewportState::on_resize(width, height, cfg.window.height_fraction);
        if !state.is_drawable() {
            debug!(target: "viewport", view = ?kind, width, height, "zero-area window; keeping previous surface");
            continue;
        }
        let physical_size = state.physical_size(window.scale_factor(), window.physical_size());
        let state_changed = viewports.get(kind) != Some(&state);
        viewports.0.insert(kind, state);

        let mut camera_changed = false;
        for (mut camera, mut projection, scene) in &mut cameras {
            if scene.0 != kind {
                continue;
            }
            if camera.viewport.as_ref().map(|v| v.physical_size) != Some(physical_size) {
                camera.viewport = Some(Viewport {
                    physical_position: UVec2::ZERO,
                    physical_size,
                    ..default()
                });
                camera_changed = true;
            }
            if let Projection::Perspective(persp) = projection.as_mut() {
                if persp.aspect_ratio != state.surface_aspect() {
                    persp.aspect_ratio = state.surface_aspect();
                    camera_changed = true;
                }
            }
        }
        if state_changed || camera_changed {
            info!(
                target: "viewport",
                view = ?kind,
                surface = ?state.surface,
                physical = ?physical_size,
                aspect = state.aspect,
                "surface resized"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_800_by_600() {
        let s = ViewportState::on_resize(800.0, 600.0, 0.7);
        assert_eq!(s.surface.x, 800.0);
        assert!((s.surface.y - 420.0).abs() < 1e-3);
        assert!((s.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((s.surface_aspect() - 800.0 / 420.0).abs() < 1e-4);
        assert!(s.is_drawable());
    }

    #[test]
    fn resize_is_idempotent() {
        assert_eq!(
            ViewportState::on_resize(1024.0, 768.0, 0.7),
            ViewportState::on_resize(1024.0, 768.0, 0.7)
        );
    }

    #[test]
    fn minimized_window_is_not_drawable() {
        assert!(!ViewportState::on_resize(0.0, 0.0, 0.7).is_drawable());
        assert!(!ViewportState::on_resize(800.0, 1.0, 0.7).is_drawable());
    }

    #[test]
    fn physical_size_scales_and_clamps() {
        let s = ViewportState::on_resize(800.0, 600.0, 0.7);
        assert_eq!(s.physical_size(2.0, UVec2::new(1600, 1200)), UVec2::new(1600, 840));
        assert_eq!(s.physical_size(2.0, UVec2::new(1000, 500)), UVec2::new(1000, 500));
    }
}
