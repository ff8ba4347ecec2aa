use bevy::prelude::*;

use crate::constants::render_settings::{
    AMBIENT_BRIGHTNESS, REFERENCE_CUBE_COLOUR, REFERENCE_CUBE_POSITION, REFERENCE_CUBE_SIZE,
    SUN_COLOUR, SUN_POSITION,
};

/// Magenta unit cube at the origin. Half submerged at the default water level.
#[derive(Component)]
pub struct ReferenceCube;

pub fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            color: SUN_COLOUR,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
}

pub fn spawn_reference_cube(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_length(REFERENCE_CUBE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: REFERENCE_CUBE_COLOUR,
            ..default()
        })),
        Transform::from_translation(REFERENCE_CUBE_POSITION),
        ReferenceCube,
    ));
}
