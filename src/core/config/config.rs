use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub galaxy_title: String,
    pub boxes_title: String,
    /// Share of the window height given to the 3D surface; the rest hosts the controls.
    pub height_fraction: f32,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            galaxy_title: "Galaxy".into(),
            boxes_title: "Falling Boxes".into(),
            height_fraction: 0.7,
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}
impl CameraConfig {
    fn at(position: Vec3) -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position,
        }
    }
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self::at(Vec3::new(0.0, 0.0, 3.0))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GalaxyConfig {
    pub count: usize,
    pub radius: f32,
    /// Full vertical extent, centered on y = 0.
    pub height: f32,
    /// Radians about +Y added every presented frame.
    pub rotation_per_frame: f32,
    /// Fixed seed for point placement and blending; entropy when absent.
    pub seed: Option<u64>,
    /// Values the three color controls start with.
    pub initial_colors: [String; 3],
    /// Values a color control cycles through when clicked.
    pub swatches: Vec<String>,
    pub camera: CameraConfig,
}
impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            radius: 5.0,
            height: 5.0,
            rotation_per_frame: 0.002,
            seed: None,
            initial_colors: ["#ff6030".into(), "#1b3984".into(), "#ffffff".into()],
            swatches: vec![
                "#ff6030".into(),
                "#1b3984".into(),
                "#ffffff".into(),
                "#ff0000".into(),
                "#00ff88".into(),
                "#8a2be2".into(),
                "#ffd700".into(),
            ],
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BoxesConfig {
    pub gravity: Vec3,
    /// Fixed physics step in seconds; one step per presented frame.
    pub timestep: f32,
    pub count: usize,
    pub half_extent: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Initial position of box 0; box i starts at `first_position + i * spacing`.
    pub first_position: Vec3,
    pub spacing: Vec3,
    pub ground_half_extents: Vec3,
    pub ground_center: Vec3,
    pub box_color: String,
    pub ground_color: String,
    pub light_position: Vec3,
    pub camera: CameraConfig,
}
impl Default for BoxesConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            timestep: 1.0 / 60.0,
            count: 3,
            half_extent: 0.5,
            mass: 1.0,
            friction: 0.3,
            restitution: 0.0,
            first_position: Vec3::new(0.0, 5.0, 0.0),
            spacing: Vec3::new(0.5, 2.0, 0.0),
            ground_half_extents: Vec3::new(5.0, 0.5, 5.0),
            ground_center: Vec3::new(0.0, -0.5, 0.0),
            box_color: "#ff5533".into(),
            ground_color: "#555555".into(),
            light_position: Vec3::new(5.0, 10.0, 5.0),
            camera: CameraConfig::at(Vec3::new(0.0, 5.0, 15.0)),
        }
    }
}
impl BoxesConfig {
    pub fn initial_position(&self, index: usize) -> Vec3 {
        self.first_position + self.spacing * index as f32
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub galaxy: GalaxyConfig,
    pub boxes: BoxesConfig,
    pub rapier_debug: bool,
}

/// Values given on the command line. They win over every file layer, including on hot reload.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub auto_close: Option<f32>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut DemoConfig) {
        if let Some(seed) = self.seed {
            cfg.galaxy.seed = Some(seed);
        }
        if let Some(secs) = self.auto_close {
            cfg.window.auto_close = secs;
        }
    }
}

impl DemoConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
    /// Merges every readable layer in order (later keys win) and deserializes the result.
    /// Returns the config, the layers that were used, and per-layer problems.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (DemoConfig::default(), used, errors);
        };
        match val.into_rust::<DemoConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (DemoConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.window.height_fraction) || self.window.height_fraction == 0.0 {
            w.push(format!(
                "window.height_fraction {} outside (0, 1]",
                self.window.height_fraction
            ));
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }

        let g = &self.galaxy;
        if g.count == 0 {
            w.push("galaxy.count is 0; nothing will be drawn".into());
        }
        if g.count > 1_000_000 {
            w.push(format!("galaxy.count {} very high; upload cost per recolor", g.count));
        }
        if g.radius <= 0.0 {
            w.push("galaxy.radius must be > 0".into());
        }
        if g.height < 0.0 {
            w.push("galaxy.height negative".into());
        }
        for (i, raw) in g.initial_colors.iter().enumerate() {
            if Srgba::hex(raw).is_err() {
                w.push(format!("galaxy.initial_colors[{i}] '{raw}' is not a #rrggbb color"));
            }
        }
        if g.swatches.is_empty() {
            w.push("galaxy.swatches is empty; color controls cannot cycle".into());
        }
        for raw in &g.swatches {
            if Srgba::hex(raw).is_err() {
                w.push(format!("galaxy.swatches entry '{raw}' is not a #rrggbb color"));
            }
        }
        check_camera(&mut w, "galaxy.camera", &g.camera);

        let b = &self.boxes;
        if b.timestep <= 0.0 {
            w.push("boxes.timestep must be > 0".into());
        } else if b.timestep > 0.1 {
            w.push(format!("boxes.timestep {} very large; tunneling likely", b.timestep));
        }
        if b.count == 0 {
            w.push("boxes.count is 0; nothing will fall".into());
        }
        if b.half_extent <= 0.0 {
            w.push("boxes.half_extent must be > 0".into());
        }
        if b.mass <= 0.0 {
            w.push("boxes.mass must be > 0 for dynamic bodies".into());
        }
        if b.friction < 0.0 {
            w.push("boxes.friction negative".into());
        }
        if !(0.0..=1.0).contains(&b.restitution) {
            w.push(format!("boxes.restitution {} outside 0..1", b.restitution));
        }
        if b.gravity.length_squared() < 1e-8 {
            w.push("boxes.gravity near zero; boxes will float".into());
        }
        if b.ground_half_extents.min_element() <= 0.0 {
            w.push("boxes.ground_half_extents must all be > 0".into());
        }
        for (label, raw) in [("boxes.box_color", &b.box_color), ("boxes.ground_color", &b.ground_color)] {
            if Srgba::hex(raw).is_err() {
                w.push(format!("{label} '{raw}' is not a #rrggbb color"));
            }
        }
        check_camera(&mut w, "boxes.camera", &b.camera);
        w
    }
}

fn check_camera(w: &mut Vec<String>, label: &str, c: &CameraConfig) {
    if !(1.0..179.0).contains(&c.fov_degrees) {
        w.push(format!("{label}.fov_degrees {} outside 1..179", c.fov_degrees));
    }
    if c.near <= 0.0 {
        w.push(format!("{label}.near must be > 0"));
    }
    if c.far <= c.near {
        w.push(format!("{label}.far ({}) must exceed near ({})", c.far, c.near));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_sample_config() {
        let sample = r##"(
            window: (width: 800.0, height: 600.0, galaxy_title: "G", boxes_title: "B", height_fraction: 0.7),
            galaxy: (
                count: 500,
                radius: 4.0,
                height: 2.0,
                rotation_per_frame: 0.01,
                seed: Some(7),
                initial_colors: ("#ff0000", "#00ff00", "#0000ff"),
                swatches: ["#ff0000", "#00ff00"],
            ),
            boxes: (
                gravity: (0.0, -9.82, 0.0),
                timestep: 0.02,
                count: 5,
                spacing: (1.0, 1.5, 0.0),
            ),
            rapier_debug: true,
        )"##;
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = DemoConfig::load_from_file(file.path()).expect("parse config");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.galaxy.count, 500);
        assert_eq!(cfg.galaxy.seed, Some(7));
        assert_eq!(cfg.galaxy.initial_colors[2], "#0000ff");
        assert_eq!(cfg.boxes.count, 5);
        assert!((cfg.boxes.timestep - 0.02).abs() < 1e-6);
        // unspecified keys keep defaults
        assert_eq!(cfg.boxes.half_extent, 0.5);
        assert!(cfg.rapier_debug);
        assert!(
            cfg.validate().is_empty(),
            "expected no validation warnings for sample config: {:?}",
            cfg.validate()
        );
    }

    #[test]
    fn defaults_validate_clean() {
        assert!(DemoConfig::default().validate().is_empty());
    }

    #[test]
    fn initial_positions_follow_spacing() {
        let b = BoxesConfig::default();
        assert_eq!(b.initial_position(0), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(b.initial_position(1), Vec3::new(0.5, 7.0, 0.0));
        assert_eq!(b.initial_position(2), Vec3::new(1.0, 9.0, 0.0));
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = DemoConfig::default();
        bad.window.width = -1.0;
        bad.window.height_fraction = 1.5;
        bad.galaxy.count = 0;
        bad.galaxy.radius = 0.0;
        bad.galaxy.initial_colors[1] = "blue-ish".into();
        bad.galaxy.swatches.clear();
        bad.galaxy.camera.near = 0.0;
        bad.boxes.timestep = 0.0;
        bad.boxes.mass = -1.0;
        bad.boxes.gravity = Vec3::ZERO;
        bad.boxes.box_color = "#12".into();
        bad.boxes.camera.far = 0.01;
        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("window.height_fraction"));
        assert!(joined.contains("galaxy.count is 0"));
        assert!(joined.contains("galaxy.radius must be > 0"));
        assert!(joined.contains("galaxy.initial_colors[1] 'blue-ish'"));
        assert!(joined.contains("galaxy.swatches is empty"));
        assert!(joined.contains("galaxy.camera.near"));
        assert!(joined.contains("boxes.timestep must be > 0"));
        assert!(joined.contains("boxes.mass must be > 0"));
        assert!(joined.contains("boxes.gravity near zero"));
        assert!(joined.contains("boxes.box_color '#12'"));
        assert!(joined.contains("boxes.camera.far"));
        assert!(warnings.len() >= 12, "got {}: {joined}", warnings.len());
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = DemoConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, DemoConfig::default());
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r#"(
            window: (width: 900.0),
            galaxy: (count: 2000, radius: 3.0),
        )"#;
        let override_one = r#"(
            window: (galaxy_title: "Custom Title"),
            galaxy: (count: 64),
        )"#;
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        let mut f2 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(base.as_bytes()).unwrap();
        f2.write_all(override_one.as_bytes()).unwrap();
        let (cfg, used, errors) = DemoConfig::load_layered([f1.path(), f2.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.galaxy_title, "Custom Title");
        assert_eq!(cfg.galaxy.count, 64);
        // nested key from the base layer survives the override of its sibling
        assert_eq!(cfg.galaxy.radius, 3.0);
        assert_eq!(cfg.window.height, WindowConfig::default().height);
    }

    #[test]
    fn layered_merge_adds_sections_missing_from_base() {
        let mut base = tempfile::NamedTempFile::new().unwrap();
        let mut extra = tempfile::NamedTempFile::new().unwrap();
        base.write_all(b"(window: (width: 640.0))").unwrap();
        extra
            .write_all(b"(boxes: (count: 5), window: (height: 480.0))")
            .unwrap();
        let (cfg, _, errors) = DemoConfig::load_layered([base.path(), extra.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(cfg.boxes.count, 5);
        assert_eq!(cfg.window.width, 640.0);
        assert_eq!(cfg.window.height, 480.0);
    }

    #[test]
    fn overrides_only_touch_what_was_given() {
        let mut cfg = DemoConfig::default();
        ConfigOverrides::default().apply(&mut cfg);
        assert_eq!(cfg, DemoConfig::default());

        ConfigOverrides {
            seed: Some(9),
            auto_close: None,
        }
        .apply(&mut cfg);
        assert_eq!(cfg.galaxy.seed, Some(9));
        assert_eq!(cfg.window.auto_close, WindowConfig::default().auto_close);
    }

    #[test]
    fn layered_reports_missing_and_broken_layers() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"(window: (width: ").unwrap();
        let (cfg, used, errors) =
            DemoConfig::load_layered([Path::new("nope/demo.ron"), broken.path()]);
        assert!(used.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("read error"));
        assert!(errors[1].contains("parse error"));
        assert_eq!(cfg, DemoConfig::default());
    }
}
