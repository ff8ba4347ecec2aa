use bevy::prelude::*;

/// Milestones gating the move from `Loading` to `Running`.
///
/// Terrain is tracked separately by `TerrainLoad`: the app runs with or without it.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub scene_spawned: bool,
    pub water_textures_loaded: bool,
}

impl LoadingProgress {
    pub fn ready_to_run(&self) -> bool {
        self.manifest_loaded && self.scene_spawned && self.water_textures_loaded
    }
}
