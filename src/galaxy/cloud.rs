//! Fixed-size point cloud: disk-shaped placement and three-stop random color blending.
//!
//! Pure data; no ECS access. The random source is always passed in so callers
//! (and tests) decide between a seeded, mocked, or entropy-backed generator.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use super::palette::ColorStops;

/// Volume the points are scattered in: a disk of `radius` around the Y axis,
/// `height` tall and centered on y = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskShape {
    pub radius: f32,
    pub height: f32,
}

impl Default for DiskShape {
    fn default() -> Self {
        Self {
            radius: 5.0,
            height: 5.0,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PointCloud {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    colors_dirty: bool,
}

impl PointCloud {
    /// Scatters `count` white points inside `shape`.
    ///
    /// Per point, three draws in order: radius fraction, angle fraction, height fraction.
    pub fn generate<R: Rng + ?Sized>(count: usize, shape: DiskShape, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        for _ in 0..count {
            let radius = rng.gen::<f32>() * shape.radius;
            let angle = rng.gen::<f32>() * TAU;
            let y = (rng.gen::<f32>() - 0.5) * shape.height;
            let (x, z) = inside_rim(angle.cos() * radius, angle.sin() * radius, shape.radius);
            positions.push([x, y, z]);
        }
        Self {
            colors: vec![[1.0; 3]; count],
            positions,
            colors_dirty: false,
        }
    }

    /// Rewrites every color as `lerp(lerp(c1, c2, t1), c3, t2)` with fresh `t1`, `t2` per point.
    ///
    /// Length and ordering never change. Marks the color buffer for re-upload.
    pub fn recolor<R: Rng + ?Sized>(&mut self, stops: &ColorStops, rng: &mut R) {
        let [c1, c2, c3] = stops.channels();
        for slot in self.colors.iter_mut() {
            let t1 = rng.gen::<f32>();
            let t2 = rng.gen::<f32>();
            let toward_second = lerp3(c1, c2, t1);
            *slot = lerp3(toward_second, c3, t2);
        }
        self.colors_dirty = true;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Colors widened to the RGBA layout the vertex color attribute expects.
    pub fn colors_rgba(&self) -> Vec<[f32; 4]> {
        self.colors.iter().map(|&[r, g, b]| [r, g, b, 1.0]).collect()
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Called by the renderer once the new colors are on the GPU.
    pub fn clear_dirty(&mut self) {
        self.colors_dirty = false;
    }
}

/// Pulls a point whose rounded planar distance reaches the rim back inside it.
fn inside_rim(x: f32, z: f32, rim: f32) -> (f32, f32) {
    let planar = (x * x + z * z).sqrt();
    if planar < rim || planar == 0.0 {
        return (x, z);
    }
    let k = rim * RIM_INSET / planar;
    (x * k, z * k)
}

const RIM_INSET: f32 = 1.0 - 1e-5;

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
