#![cfg(feature = "debug")]
use bevy::prelude::*;
use galaxy_boxes::debug::keys::debug_key_input_system;
use galaxy_boxes::debug::DebugState;

#[test]
fn f1_toggles_rapier_wireframe() {
    let mut app = App::new();
    // Insert only the resources we need.
    app.insert_resource(ButtonInput::<KeyCode>::default());
    app.init_resource::<DebugState>();
    app.add_systems(Update, debug_key_input_system);

    app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::F1);
    app.update();
    assert!(app.world().resource::<DebugState>().rapier_wireframe);

    // Held, not re-pressed: no further toggles.
    app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
    app.update();
    assert!(app.world().resource::<DebugState>().rapier_wireframe);

    {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.release(KeyCode::F1);
        input.clear();
        input.press(KeyCode::F1);
    }
    app.update();
    assert!(!app.world().resource::<DebugState>().rapier_wireframe);
}
