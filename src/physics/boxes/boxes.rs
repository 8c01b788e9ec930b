//! Falling boxes: rigid bodies paired index-for-index with the entities that get drawn.
//!
//! Per frame Rapier advances the world by one fixed step (PostUpdate), then
//! `sync_box_visuals` copies each body's pose onto its visual. `ResetBoxes`
//! puts every body back at its spawn pose with zero velocity before the next step.

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy_rapier3d::prelude::*;

use crate::core::components::{BoxBody, BoxVisual, Ground};
use crate::core::config::DemoConfig;
use crate::core::system::system_order::{PostPhysicsSyncSet, PrePhysicsSet};

/// Put every box back where it spawned, at rest.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetBoxes;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPair {
    pub body: Entity,
    pub visual: Entity,
    initial_position: Vec3,
}

impl BoxPair {
    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Spawn pose: initial position, identity rotation.
    pub fn initial_transform(&self) -> Transform {
        Transform::from_translation(self.initial_position)
    }
}

/// All box pairs in spawn order. Fixed after startup.
#[derive(Resource, Debug, Default)]
pub struct BoxPairs(Vec<BoxPair>);

impl BoxPairs {
    pub fn iter(&self) -> impl Iterator<Item = &BoxPair> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&BoxPair> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct FallingBoxesPlugin;

impl Plugin for FallingBoxesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ResetBoxes>()
            .configure_sets(
                PostUpdate,
                PostPhysicsSyncSet
                    .after(PhysicsSet::Writeback)
                    .before(TransformSystem::TransformPropagate),
            )
            .add_systems(Startup, spawn_boxes_world)
            .add_systems(Update, reset_boxes.in_set(PrePhysicsSet))
            .add_systems(PostUpdate, sync_box_visuals.in_set(PostPhysicsSyncSet));
    }
}

pub fn spawn_boxes_world(mut commands: Commands, cfg: Res<DemoConfig>) {
    let b = &cfg.boxes;
    let ground = b.ground_half_extents;
    commands.spawn((
        Ground,
        Name::new("Ground"),
        Transform::from_translation(b.ground_center),
        RigidBody::Fixed,
        Collider::cuboid(ground.x, ground.y, ground.z),
        Friction::coefficient(b.friction),
        Restitution::coefficient(b.restitution),
    ));

    let h = b.half_extent;
    let mut pairs = Vec::with_capacity(b.count);
    for index in 0..b.count {
        let initial_position = b.initial_position(index);
        let body = commands
            .spawn((
                BoxBody { index },
                Name::new(format!("BoxBody{index}")),
                Transform::from_translation(initial_position),
                RigidBody::Dynamic,
                Collider::cuboid(h, h, h),
                ColliderMassProperties::Mass(b.mass),
                Velocity::zero(),
                Friction::coefficient(b.friction),
                Restitution::coefficient(b.restitution),
            ))
            .id();
        let visual = commands
            .spawn((
                BoxVisual { index },
                Name::new(format!("BoxVisual{index}")),
                Transform::from_translation(initial_position),
            ))
            .id();
        pairs.push(BoxPair {
            body,
            visual,
            initial_position,
        });
    }
    info!(target: "boxes", count = pairs.len(), "falling boxes spawned");
    commands.insert_resource(BoxPairs(pairs));
}

fn reset_boxes(
    mut requests: EventReader<ResetBoxes>,
    pairs: Res<BoxPairs>,
    mut bodies: Query<(&mut Transform, &mut Velocity), (With<BoxBody>, Without<BoxVisual>)>,
    mut visuals: Query<&mut Transform, (With<BoxVisual>, Without<BoxBody>)>,
) {
    if requests.is_empty() {
        return;
    }
    // Several clicks in one frame are one reset.
    requests.clear();

    for pair in pairs.iter() {
        let home = pair.initial_transform();
        match bodies.get_mut(pair.body) {
            Ok((mut tf, mut vel)) => {
                *tf = home;
                *vel = Velocity::zero();
            }
            Err(_) => broken_pair(pair, "body"),
        }
        match visuals.get_mut(pair.visual) {
            Ok(mut tf) => *tf = home,
            Err(_) => broken_pair(pair, "visual"),
        }
    }
    info!(target: "boxes", "reset {} boxes to their spawn poses", pairs.len());
}

fn sync_box_visuals(
    pairs: Res<BoxPairs>,
    bodies: Query<&Transform, (With<BoxBody>, Without<BoxVisual>)>,
    mut visuals: Query<&mut Transform, (With<BoxVisual>, Without<BoxBody>)>,
) {
    for pair in pairs.iter() {
        let Ok(body_tf) = bodies.get(pair.body) else {
            broken_pair(pair, "body");
            continue;
        };
        let Ok(mut visual_tf) = visuals.get_mut(pair.visual) else {
            broken_pair(pair, "visual");
            continue;
        };
        visual_tf.translation = body_tf.translation;
        visual_tf.rotation = body_tf.rotation;
    }
}

/// Pairs are created together and never despawned; a missing half is a wiring bug.
fn broken_pair(pair: &BoxPair, half: &str) {
    if cfg!(debug_assertions) {
        panic!("box pair {pair:?} lost its {half}");
    }
    error!(target: "boxes", ?pair, "box pair lost its {half}; skipping");
}
