//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. Controls (UI / keyboard -> events)
//! 2. PrePhysics (event consumers that rewrite simulation state: recolor, reset)
//! 3. Rapier step (PostUpdate, handled by plugin)
//! 4. PostPhysicsSync (body -> visual copy, GPU buffer refresh)
//! 5. Rendering (implicit)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ControlsSet; // input handling that only emits events

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // state rewrites requested this frame, before the physics step

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsSyncSet; // copy simulation results onto what gets drawn
