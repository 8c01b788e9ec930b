#[cfg(feature = "debug")]
use super::state::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::galaxy::cloud::PointCloud;
#[cfg(feature = "debug")]
use crate::galaxy::RecolorRequested;
#[cfg(feature = "debug")]
use crate::physics::boxes::{BoxPairs, ResetBoxes};
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    cloud: Option<Res<PointCloud>>,
    pairs: Option<Res<BoxPairs>>,
    mut recolor_requests: EventReader<RecolorRequested>,
    mut resets: EventReader<ResetBoxes>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    let inst_fps = 1.0 / dt;
    if stats.fps == 0.0 {
        stats.fps = inst_fps;
    } else {
        stats.fps = stats.fps * 0.9 + inst_fps * 0.1;
    }
    let inst_ms = dt * 1000.0;
    if stats.frame_time_ms == 0.0 {
        stats.frame_time_ms = inst_ms;
    } else {
        stats.frame_time_ms = stats.frame_time_ms * 0.9 + inst_ms * 0.1;
    }
    stats.point_count = cloud.map_or(0, |c| c.len());
    stats.box_count = pairs.map_or(0, |p| p.len());
    stats.recolor_requests += recolor_requests.read().count() as u64;
    stats.resets += resets.read().count() as u64;
}
