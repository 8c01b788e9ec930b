pub mod camera;
pub mod galaxy;
pub mod materials;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod webgpu_guard;
