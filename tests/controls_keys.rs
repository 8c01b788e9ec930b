use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use galaxy_boxes::galaxy::palette::ColorInputs;
use galaxy_boxes::galaxy::GalaxyPlugin;
use galaxy_boxes::interaction::controls::controls::ControlsPlugin;
use galaxy_boxes::physics::boxes::FallingBoxesPlugin;
use galaxy_boxes::{BoxPairs, DemoConfig, PointCloud};

fn controls_app() -> App {
    let mut cfg = DemoConfig::default();
    cfg.galaxy.count = 100;
    cfg.galaxy.seed = Some(1);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(cfg)
        .insert_resource(ButtonInput::<KeyCode>::default())
        .add_plugins((GalaxyPlugin, FallingBoxesPlugin, ControlsPlugin));
    app.update();
    app
}

// Nothing clears `just_pressed` without the input plugin, so tap = press, update, release + clear.
fn tap(app: &mut App, key: KeyCode) {
    app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
    app.update();
    let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    input.release(key);
    input.clear();
}

#[test]
fn digit_keys_cycle_their_color_input() {
    let mut app = controls_app();
    let swatches = DemoConfig::default().galaxy.swatches;
    // Initial values are the first three swatches.
    tap(&mut app, KeyCode::Digit1);
    tap(&mut app, KeyCode::Digit3);
    tap(&mut app, KeyCode::Digit3);
    let inputs = app.world().resource::<ColorInputs>();
    assert_eq!(inputs.values[0], swatches[1]);
    assert_eq!(inputs.values[1], swatches[1]);
    assert_eq!(inputs.values[2], swatches[4]);
}

#[test]
fn enter_recolors_the_galaxy() {
    let mut app = controls_app();
    assert!(!app.world().resource::<PointCloud>().colors_dirty());
    tap(&mut app, KeyCode::Enter);
    let cloud = app.world().resource::<PointCloud>();
    assert!(cloud.colors_dirty());
    assert!(cloud.colors().iter().any(|c| *c != [1.0; 3]));
}

#[test]
fn r_resets_the_boxes() {
    let mut app = controls_app();
    let pair = *app.world().resource::<BoxPairs>().get(0).unwrap();
    app.world_mut().get_mut::<Transform>(pair.body).unwrap().translation = Vec3::new(9.0, 0.0, 9.0);
    app.world_mut().get_mut::<Velocity>(pair.body).unwrap().linvel = Vec3::NEG_Y;
    tap(&mut app, KeyCode::KeyR);
    assert_eq!(
        app.world().get::<Transform>(pair.body).unwrap().translation,
        pair.initial_position()
    );
    assert_eq!(*app.world().get::<Velocity>(pair.body).unwrap(), Velocity::zero());
}

#[test]
fn escape_requests_exit() {
    let mut app = controls_app();
    assert!(app.should_exit().is_none());
    tap(&mut app, KeyCode::Escape);
    assert_eq!(app.should_exit(), Some(AppExit::Success));
}
