use bevy::prelude::*;
use shoreline_render_engine::engine::render::water::shading::{
    clip_to_screen, reconstruct_world_position, shallowness, water_depth,
};
use shoreline_render_engine::engine::render::water::uniforms::CameraSnapshot;

const NEAR: f32 = 0.1;
const FAR: f32 = 2000.0;
const FALLOFF: f32 = 0.6;

/// Camera 10 units above the origin looking straight down, with Bevy's
/// reverse-Z infinite projection.
fn overhead_camera() -> CameraSnapshot {
    let world_from_view = Transform::from_xyz(0.0, 10.0, 0.0)
        .looking_at(Vec3::ZERO, Vec3::NEG_Z)
        .compute_matrix();
    let clip_from_view =
        Mat4::perspective_infinite_reverse_rh(45f32.to_radians(), 16.0 / 9.0, NEAR);
    CameraSnapshot::new(world_from_view, clip_from_view, Vec2::new(1280.0, 720.0), NEAR, FAR)
}

fn project(camera: &CameraSnapshot, world: Vec3) -> (Vec2, f32) {
    clip_to_screen(camera.clip_from_world * world.extend(1.0))
}

#[test]
fn floor_under_water_reconstructs_and_shades() {
    let camera = overhead_camera();

    for floor in [
        Vec3::ZERO,
        Vec3::new(1.5, 0.0, -2.0),
        Vec3::new(-3.0, 0.0, 1.25),
    ] {
        let (uv, depth) = project(&camera, floor);
        assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));

        let reconstructed = reconstruct_world_position(uv, depth, &camera);
        assert!(
            reconstructed.distance(floor) < 1e-3,
            "{floor} reconstructed as {reconstructed}"
        );

        let depth_below_surface = water_depth(2.0, reconstructed.y);
        assert!((depth_below_surface - 2.0).abs() < 1e-3);
        assert!(
            (shallowness(depth_below_surface, FALLOFF) - (-2.0 / FALLOFF).exp()).abs() < 1e-3
        );
    }
}

#[test]
fn cleared_sky_lands_on_the_far_plane() {
    let camera = overhead_camera();
    let reconstructed = reconstruct_world_position(Vec2::splat(0.5), 0.0, &camera);

    assert!((reconstructed.y - (10.0 - FAR)).abs() < 0.5);
    assert!(shallowness(water_depth(0.0, reconstructed.y), FALLOFF) < 1e-6);
}
