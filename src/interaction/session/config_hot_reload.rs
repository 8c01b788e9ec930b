use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::components::CanvasWindow;
use crate::core::config::{ConfigOverrides, DemoConfig};
use crate::rendering::camera::camera::view_title;

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
    /// Re-applied over every reload.
    pub overrides: ConfigOverrides,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/demo.ron"),
                PathBuf::from("assets/config/demo.local.ron"),
            ],
            interval_secs: 0.5,
            overrides: ConfigOverrides::default(),
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl FromWorld for ConfigReloadState {
    fn from_world(world: &mut World) -> Self {
        let secs = world
            .get_resource::<ConfigReloadSettings>()
            .map_or(0.5, |s| s.interval_secs);
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(secs.max(0.05), TimerMode::Repeating),
        }
    }
}

/// Polls the config layers on disk and swaps in a new `DemoConfig` when any of them changes.
/// Native only; the web build embeds its config.
pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = app;
    }
}

/// Records newer modification times; true when any layer changed since the last poll.
fn layers_modified(state: &mut ConfigReloadState, paths: &[PathBuf]) -> bool {
    let mut dirty = false;
    for path in paths {
        let Ok(mod_time) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let seen = state
            .last_mod
            .entry(path.clone())
            .or_insert(SystemTime::UNIX_EPOCH);
        if mod_time > *seen {
            *seen = mod_time;
            dirty = true;
        }
    }
    dirty
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<DemoConfig>,
    mut windows: Query<(&mut Window, &CanvasWindow)>,
) {
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }
    if !layers_modified(&mut state, &settings.paths) {
        return;
    }
    // Optional layers that do not exist yet are skipped, not reported.
    let (mut new_cfg, _used, errors) =
        DemoConfig::load_layered(settings.paths.iter().filter(|p| p.exists()));
    settings.overrides.apply(&mut new_cfg);
    for e in errors {
        warn!(target: "config", "hot-reload issue: {e}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    for w in new_cfg.validate() {
        warn!(target: "config", "{w}");
    }
    if new_cfg.galaxy != cfg_res.galaxy || new_cfg.boxes.count != cfg_res.boxes.count {
        info!(target: "config", "point cloud and box layout changes take effect on restart");
    }
    // A window the user resized keeps its size unless the configured size moved.
    let resize = new_cfg.window.width != cfg_res.window.width
        || new_cfg.window.height != cfg_res.window.height;
    for (mut window, view) in &mut windows {
        let title = view_title(view.0, &new_cfg.window);
        if window.title != title {
            window.title = title;
        }
        if resize {
            window
                .resolution
                .set(new_cfg.window.width, new_cfg.window.height);
        }
    }
    // Gravity follows through `resource_changed::<DemoConfig>` in the physics setup.
    *cfg_res = new_cfg;
    info!(target: "config", "config hot-reload applied");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn modified_layer_replaces_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(boxes: (gravity: (0.0, -1.0, 0.0)), window: (boxes_title: \"Crates\"))").unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
            .insert_resource(DemoConfig::default())
            .insert_resource(ConfigReloadSettings {
                paths: vec![file.path().to_path_buf()],
                interval_secs: 0.1,
                overrides: ConfigOverrides::default(),
            })
            .add_plugins(ConfigHotReloadPlugin);
        let window = app
            .world_mut()
            .spawn((Window::default(), CanvasWindow(crate::core::components::ViewKind::Boxes)))
            .id();

        for _ in 0..3 {
            app.update();
        }

        let cfg = app.world().resource::<DemoConfig>();
        assert_eq!(cfg.boxes.gravity, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(cfg.window.boxes_title, "Crates");
        assert_eq!(app.world().get::<Window>(window).unwrap().title, "Crates");
    }

    fn reload_app(
        layer: &str,
        start: DemoConfig,
        overrides: ConfigOverrides,
    ) -> (App, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{layer}").unwrap();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
            .insert_resource(start)
            .insert_resource(ConfigReloadSettings {
                paths: vec![file.path().to_path_buf()],
                interval_secs: 0.1,
                overrides,
            })
            .add_plugins(ConfigHotReloadPlugin);
        (app, file)
    }

    #[test]
    fn command_line_overrides_survive_reload() {
        let overrides = ConfigOverrides {
            seed: Some(7),
            auto_close: Some(3.0),
        };
        let mut start = DemoConfig::default();
        overrides.apply(&mut start);
        let (mut app, _file) = reload_app("(window: (galaxy_title: \"Spiral\"))", start, overrides);

        for _ in 0..3 {
            app.update();
        }

        let cfg = app.world().resource::<DemoConfig>();
        assert_eq!(cfg.window.galaxy_title, "Spiral");
        assert_eq!(cfg.galaxy.seed, Some(7));
        assert_eq!(cfg.window.auto_close, 3.0);
    }

    #[test]
    fn manual_window_size_kept_when_configured_size_unchanged() {
        let (mut app, _file) = reload_app(
            "(window: (boxes_title: \"Crates\"))",
            DemoConfig::default(),
            ConfigOverrides::default(),
        );
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: bevy::window::WindowResolution::new(1024.0, 700.0),
                    ..default()
                },
                CanvasWindow(crate::core::components::ViewKind::Boxes),
            ))
            .id();

        for _ in 0..3 {
            app.update();
        }

        let w = app.world().get::<Window>(window).unwrap();
        assert_eq!(w.title, "Crates");
        assert_eq!((w.width(), w.height()), (1024.0, 700.0));
    }

    #[test]
    fn configured_size_change_resizes_windows() {
        let (mut app, _file) = reload_app(
            "(window: (width: 900.0))",
            DemoConfig::default(),
            ConfigOverrides::default(),
        );
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: bevy::window::WindowResolution::new(1024.0, 700.0),
                    ..default()
                },
                CanvasWindow(crate::core::components::ViewKind::Galaxy),
            ))
            .id();

        for _ in 0..3 {
            app.update();
        }

        let w = app.world().get::<Window>(window).unwrap();
        assert_eq!((w.width(), w.height()), (900.0, 720.0));
    }

    #[test]
    fn untouched_layers_are_not_reported_twice() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let paths = vec![file.path().to_path_buf(), PathBuf::from("does/not/exist.ron")];
        let mut state = ConfigReloadState {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        };
        assert!(layers_modified(&mut state, &paths));
        assert!(!layers_modified(&mut state, &paths));
    }
}
