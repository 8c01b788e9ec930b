// This file is part of Galaxy Boxes.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;
use bevy_rapier3d::render::RapierDebugRenderPlugin;

use crate::core::config::DemoConfig;
use crate::core::system::system_order::{ControlsSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::galaxy::GalaxyPlugin;
use crate::interaction::controls::controls::ControlsPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::boxes::FallingBoxesPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;
use crate::rendering::galaxy::galaxy::GalaxyRenderPlugin;
use crate::rendering::materials::materials::MaterialsPlugin;
use crate::rendering::viewport::viewport::ViewportPlugin;

/// Everything except the engine's `DefaultPlugins`. Expects `DemoConfig` to be inserted first.
pub struct DemoPlugin;

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, (ControlsSet, PrePhysicsSet.after(ControlsSet)))
            .add_plugins((
                PhysicsSetupPlugin,
                GalaxyPlugin,
                FallingBoxesPlugin,
                CameraPlugin,
                ViewportPlugin,
                GalaxyRenderPlugin,
                MaterialsPlugin,
                ControlsPlugin,
                DebugPlugin,
                ConfigHotReloadPlugin,
                AutoClosePlugin,
            ));

        let rapier_debug = app
            .world()
            .get_resource::<DemoConfig>()
            .is_some_and(|c| c.rapier_debug);
        // With the debug feature the wireframe is always available and F1 toggles it.
        if rapier_debug || cfg!(feature = "debug") {
            app.add_plugins(RapierDebugRenderPlugin {
                enabled: rapier_debug,
                ..default()
            });
        }
    }
}
