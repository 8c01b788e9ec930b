pub mod app;
pub mod core;
pub mod debug;
pub mod galaxy;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::demo::DemoPlugin;
pub use core::components::ViewKind;
pub use core::config::DemoConfig;
pub use galaxy::cloud::{DiskShape, PointCloud};
pub use galaxy::palette::ColorStops;
pub use physics::boxes::{BoxPairs, ResetBoxes};
pub use rendering::viewport::viewport::ViewportState;
