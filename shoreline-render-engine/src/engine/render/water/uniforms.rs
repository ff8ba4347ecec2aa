//! GPU-facing data for the water pass.
//!
//! Two uniforms feed `water.wgsl`:
//!
//! - [`WaterSurfaceUniform`]: derived from [`WaterParams`], the surface
//!   transform and the debug view. Rewritten only when one of those changes.
//! - [`WaterViewUniform`]: derived from an immutable [`WaterFrameContext`]
//!   built fresh every frame for every view.

use bevy::prelude::*;
use bevy::render::render_resource::ShaderType;
use constants::water::PATTERN_TILE_SIZE;

use super::params::{WaterParams, srgb_to_linear_vec4};
use crate::engine::systems::render_mode::WaterDebugView;

#[derive(Clone, Copy, Debug, PartialEq, ShaderType)]
pub struct WaterSurfaceUniform {
    pub foam_color: Vec4,
    pub surface_color: Vec4,
    pub deep_color: Vec4,
    pub highlight_color: Vec4,
    pub shadow_color: Vec4,
    pub world_from_local: Mat4,
    pub foam_velocity: Vec2,
    pub depth_falloff: f32,
    pub shallow_transmit_alpha: f32,
    pub deep_transmit_alpha: f32,
    pub debug_view: u32,
    /// World units covered by one repeat of the pattern textures.
    pub pattern_tile_size: f32,
}

impl WaterSurfaceUniform {
    pub fn new(params: &WaterParams, world_from_local: Mat4, debug_view: WaterDebugView) -> Self {
        Self {
            foam_color: srgb_to_linear_vec4(params.foam_color),
            surface_color: srgb_to_linear_vec4(params.surface_color),
            deep_color: srgb_to_linear_vec4(params.deep_color),
            highlight_color: srgb_to_linear_vec4(params.highlight_color),
            shadow_color: srgb_to_linear_vec4(params.shadow_color),
            world_from_local,
            foam_velocity: Vec2::from_array(params.foam_velocity),
            depth_falloff: params.depth_falloff,
            shallow_transmit_alpha: params.shallow_transmit_alpha,
            deep_transmit_alpha: params.deep_transmit_alpha,
            debug_view: debug_view as u32,
            pattern_tile_size: PATTERN_TILE_SIZE,
        }
    }
}

impl Default for WaterSurfaceUniform {
    fn default() -> Self {
        Self::new(&WaterParams::default(), Mat4::IDENTITY, WaterDebugView::default())
    }
}

/// Camera state the water shader needs to undo the scene's projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub resolution: Vec2,
    pub near: f32,
    pub far: f32,
    pub clip_from_view: Mat4,
    pub view_from_clip: Mat4,
    pub world_from_view: Mat4,
    pub clip_from_world: Mat4,
}

impl CameraSnapshot {
    pub fn new(
        world_from_view: Mat4,
        clip_from_view: Mat4,
        resolution: Vec2,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            resolution,
            near,
            far,
            clip_from_view,
            view_from_clip: clip_from_view.inverse(),
            world_from_view,
            clip_from_world: clip_from_view * world_from_view.inverse(),
        }
    }
}

/// Everything the water pass reads that changes per frame, frozen for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterFrameContext {
    pub camera: CameraSnapshot,
    pub time: f32,
}

impl WaterFrameContext {
    pub fn to_uniform(&self) -> WaterViewUniform {
        let camera = &self.camera;
        WaterViewUniform {
            clip_from_world: camera.clip_from_world,
            clip_from_view: camera.clip_from_view,
            view_from_clip: camera.view_from_clip,
            world_from_view: camera.world_from_view,
            resolution: camera.resolution,
            near: camera.near,
            far: camera.far,
            time: self.time,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, ShaderType)]
pub struct WaterViewUniform {
    pub clip_from_world: Mat4,
    pub clip_from_view: Mat4,
    pub view_from_clip: Mat4,
    pub world_from_view: Mat4,
    pub resolution: Vec2,
    pub near: f32,
    pub far: f32,
    pub time: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_uniform_carries_scalars_and_debug_view() {
        let params = WaterParams {
            depth_falloff: 1.3,
            foam_velocity: [-0.2, 0.4],
            ..default()
        };
        let uniform = WaterSurfaceUniform::new(&params, Mat4::IDENTITY, WaterDebugView::Shallowness);
        assert_eq!(uniform.depth_falloff, 1.3);
        assert_eq!(uniform.foam_velocity, Vec2::new(-0.2, 0.4));
        assert_eq!(uniform.debug_view, WaterDebugView::Shallowness as u32);
        assert_eq!(uniform.surface_color.w, 1.0);
        assert_eq!(uniform.pattern_tile_size, PATTERN_TILE_SIZE);
    }

    #[test]
    fn snapshot_matrices_are_consistent() {
        let world_from_view = Transform::from_xyz(3.0, 4.0, 5.0)
            .looking_at(Vec3::ZERO, Vec3::Y)
            .compute_matrix();
        let clip_from_view = Mat4::perspective_infinite_reverse_rh(0.8, 1.5, 0.1);
        let snapshot = CameraSnapshot::new(
            world_from_view,
            clip_from_view,
            Vec2::new(1200.0, 800.0),
            0.1,
            2000.0,
        );

        let identity = snapshot.view_from_clip * snapshot.clip_from_view;
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-5));

        let point = Vec3::new(0.5, -1.0, 0.25);
        let via_view = clip_from_view * world_from_view.inverse() * point.extend(1.0);
        let direct = snapshot.clip_from_world * point.extend(1.0);
        assert!(via_view.abs_diff_eq(direct, 1e-4));
    }

    #[test]
    fn frame_context_copies_time() {
        let camera = CameraSnapshot::new(
            Mat4::IDENTITY,
            Mat4::perspective_infinite_reverse_rh(1.0, 1.0, 0.1),
            Vec2::splat(64.0),
            0.1,
            100.0,
        );
        let uniform = WaterFrameContext { camera, time: 12.5 }.to_uniform();
        assert_eq!(uniform.time, 12.5);
        assert_eq!(uniform.resolution, Vec2::splat(64.0));
        assert_eq!(uniform.far, 100.0);
    }

    #[test]
    fn shader_reads_tile_size_from_the_surface_uniform() {
        let source = include_str!("../../../../assets/shaders/water.wgsl");
        assert!(source.contains("pattern_tile_size: f32,"));
        assert!(source.contains("world.xz / surface.pattern_tile_size"));
    }
}
