pub mod config;

pub use config::{BoxesConfig, CameraConfig, ConfigOverrides, DemoConfig, GalaxyConfig, WindowConfig};
