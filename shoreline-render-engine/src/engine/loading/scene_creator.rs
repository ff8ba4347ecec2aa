use bevy::prelude::*;

use super::progress::LoadingProgress;
use crate::engine::assets::scene_manifest::SceneManifest;
use crate::engine::camera::viewport_camera::spawn_viewport_camera;
use crate::engine::render::water::WaterSurface;
use crate::engine::render::water::params::WaterParams;
use crate::engine::scene::reference_objects::{spawn_lighting, spawn_reference_cube};

/// Spawn camera, light, reference cube and water as soon as the manifest is known.
pub fn create_scene_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    manifest: Option<Res<SceneManifest>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if loading_progress.scene_spawned {
        return;
    }
    let Some(manifest) = manifest else {
        return;
    };

    spawn_viewport_camera(&mut commands, &manifest.camera);
    spawn_lighting(&mut commands);
    spawn_reference_cube(&mut commands, &mut meshes, &mut materials);

    let water = &manifest.water;
    let params = match water.params.validate() {
        Ok(()) => water.params,
        Err(error) => {
            warn!("Manifest water parameters rejected ({error}), using defaults");
            WaterParams::default()
        }
    };
    commands.spawn((
        WaterSurface {
            size: Vec2::splat(water.size),
            subdivisions: water.subdivisions,
        },
        params,
        Transform::IDENTITY,
    ));

    loading_progress.scene_spawned = true;
    println!("✓ Camera, lighting and water surface ready");
}
