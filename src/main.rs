use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use galaxy_boxes::core::config::ConfigOverrides;
use galaxy_boxes::rendering::camera::camera::view_window;
use galaxy_boxes::{DemoConfig, DemoPlugin, ViewKind};

#[cfg(not(target_arch = "wasm32"))]
const BASE_LAYER: &str = "assets/config/demo.ron";
#[cfg(not(target_arch = "wasm32"))]
const LOCAL_LAYER: &str = "assets/config/demo.local.ron";

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(version, about = "Rotating point-cloud galaxy and a falling-boxes simulation")]
struct Args {
    /// Extra RON layer merged over the built-in ones (repeatable; later layers win)
    #[arg(long = "config", value_name = "PATH")]
    configs: Vec<PathBuf>,
    /// Seed for point placement and recolor blending
    #[arg(long)]
    seed: Option<u64>,
    /// Exit after this many seconds
    #[arg(long, value_name = "SECONDS")]
    auto_close: Option<f32>,
}

struct LoadedConfig {
    cfg: DemoConfig,
    used: Vec<String>,
    issues: Vec<String>,
    #[cfg(not(target_arch = "wasm32"))]
    layers: Vec<PathBuf>,
    #[cfg(not(target_arch = "wasm32"))]
    overrides: ConfigOverrides,
}

// ---------------- Config Loading ----------------

#[cfg(not(target_arch = "wasm32"))]
fn load_config(args: &Args) -> LoadedConfig {
    let mut layers = vec![PathBuf::from(BASE_LAYER), PathBuf::from(LOCAL_LAYER)];
    layers.extend(args.configs.iter().cloned());
    // The local override is optional; everything else is reported when missing.
    let (mut cfg, used, issues) = DemoConfig::load_layered(
        layers
            .iter()
            .filter(|p| p.as_path() != std::path::Path::new(LOCAL_LAYER) || p.exists()),
    );
    let overrides = ConfigOverrides {
        seed: args.seed,
        auto_close: args.auto_close,
    };
    overrides.apply(&mut cfg);
    LoadedConfig {
        cfg,
        used,
        issues,
        layers,
        overrides,
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> LoadedConfig {
    // No filesystem in the browser: the base layer is compiled in.
    const RAW: &str = include_str!("../assets/config/demo.ron");
    match ron::from_str::<DemoConfig>(RAW) {
        Ok(cfg) => LoadedConfig {
            cfg,
            used: vec!["embedded demo.ron".into()],
            issues: Vec::new(),
        },
        Err(e) => LoadedConfig {
            cfg: DemoConfig::default(),
            used: Vec::new(),
            issues: vec![format!("embedded demo.ron: parse error: {e}; using defaults")],
        },
    }
}

// ---------------- Main ----------------

fn main() -> AppExit {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        galaxy_boxes::rendering::webgpu_guard::assert_webgpu_available();
    }

    #[cfg(not(target_arch = "wasm32"))]
    let loaded = load_config(&Args::parse());
    #[cfg(target_arch = "wasm32")]
    let loaded = load_config();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(view_window(ViewKind::Galaxy, &loaded.cfg.window)),
        ..default()
    }));

    // Logging is live once DefaultPlugins are built.
    for issue in &loaded.issues {
        warn!(target: "config", "load issue: {issue}");
    }
    for w in loaded.cfg.validate() {
        warn!(target: "config", "{w}");
    }
    if loaded.used.is_empty() {
        info!(target: "config", "no config layers found; using defaults");
    } else {
        info!(target: "config", used = ?loaded.used, "config layers loaded");
    }
    info!(
        target: "config",
        points = loaded.cfg.galaxy.count,
        boxes = loaded.cfg.boxes.count,
        seed = ?loaded.cfg.galaxy.seed,
        "runtime summary"
    );

    #[cfg(not(target_arch = "wasm32"))]
    app.insert_resource(
        galaxy_boxes::interaction::session::config_hot_reload::ConfigReloadSettings {
            paths: loaded.layers,
            overrides: loaded.overrides,
            ..default()
        },
    );

    app.insert_resource(loaded.cfg).add_plugins(DemoPlugin);
    app.run()
}
