use bevy::prelude::*;

/// Which of the two visualizations an entity (window, camera, UI panel) belongs to.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Galaxy,
    Boxes,
}

impl ViewKind {
    /// Render layer isolating this view's scene from the other one.
    pub fn render_layer(self) -> usize {
        match self {
            ViewKind::Galaxy => 1,
            ViewKind::Boxes => 2,
        }
    }

    /// Stable output surface identifier (canvas selector on the web).
    pub fn canvas_selector(self) -> &'static str {
        match self {
            ViewKind::Galaxy => "#particleCanvas",
            ViewKind::Boxes => "#physicsCanvas",
        }
    }
}

/// Marker on the window that hosts a view.
#[derive(Component, Debug, Clone, Copy, Deref)]
pub struct CanvasWindow(pub ViewKind);

/// Marker on the 3D camera that draws a view's scene.
#[derive(Component, Debug, Clone, Copy, Deref)]
pub struct SceneCamera(pub ViewKind);

/// Marker on the point cloud entity.
#[derive(Component)]
pub struct GalaxyPoints;

/// Simulation half of a box pair (holds the rigid body & collider).
#[derive(Component, Debug, Clone, Copy)]
pub struct BoxBody {
    pub index: usize,
}

/// Visual half of a box pair; its transform is copied from the body every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoxVisual {
    pub index: usize,
}

/// Static floor the boxes land on.
#[derive(Component)]
pub struct Ground;

/// Marker on the 2D camera that draws a view's controls strip.
#[derive(Component, Debug, Clone, Copy, Deref)]
pub struct UiCamera(pub ViewKind);
