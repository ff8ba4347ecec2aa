//! CPU reference for the maths in `water.wgsl`.
//!
//! The shader and these functions must agree; tests exercise the pipeline's
//! numeric behaviour here without a GPU.

use bevy::prelude::*;

use super::uniforms::{CameraSnapshot, WaterSurfaceUniform};

/// Linear view-space Z (negative in front of the camera) for a reverse-Z depth.
///
/// Depth is clamped to the far plane, so cleared sky pixels land at `-far`
/// instead of infinity.
pub fn perspective_depth_to_view_z(depth: f32, near: f32, far: f32) -> f32 {
    -near / clamp_depth(depth, near, far)
}

fn clamp_depth(depth: f32, near: f32, far: f32) -> f32 {
    depth.max(near / far)
}

/// Framebuffer UV (origin top-left) and depth to normalised device coordinates.
pub fn screen_to_ndc(screen_uv: Vec2, depth: f32) -> Vec4 {
    Vec4::new(screen_uv.x * 2.0 - 1.0, 1.0 - screen_uv.y * 2.0, depth, 1.0)
}

/// Inverse of [`screen_to_ndc`] for a projected clip-space point.
pub fn clip_to_screen(clip: Vec4) -> (Vec2, f32) {
    let ndc = clip.xyz() / clip.w;
    (Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5), ndc.z)
}

/// World position of the scene surface under a pixel.
pub fn reconstruct_world_position(screen_uv: Vec2, depth: f32, camera: &CameraSnapshot) -> Vec3 {
    let view_z = perspective_depth_to_view_z(depth, camera.near, camera.far);
    let projection = camera.clip_from_view;
    let clip_w = projection.z_axis.w * view_z + projection.w_axis.w;
    let ndc = screen_to_ndc(screen_uv, clamp_depth(depth, camera.near, camera.far));
    let view = camera.view_from_clip * (ndc * clip_w);
    (camera.world_from_view * view).xyz()
}

pub fn water_depth(water_y: f32, scene_y: f32) -> f32 {
    water_y - scene_y
}

/// 1 at the waterline, decaying towards 0 as the water deepens.
pub fn shallowness(water_depth: f32, depth_falloff: f32) -> f32 {
    (-water_depth / depth_falloff).exp().clamp(0.0, 1.0)
}

/// Hard-edged foam: on wherever the foam texture value is at most `s^4`.
pub fn foam_mask(foam_sample: f32, shallowness: f32) -> f32 {
    if shallowness.powi(4) >= foam_sample {
        1.0
    } else {
        0.0
    }
}

/// Red-channel reads of the three pattern textures for one fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatternSamples {
    pub highlight: f32,
    pub shadow: f32,
    pub foam: f32,
}

/// Final colour of a water fragment, alpha always 1.
pub fn composite(
    surface: &WaterSurfaceUniform,
    scene_colour: Vec3,
    shallowness: f32,
    samples: PatternSamples,
) -> Vec4 {
    let transmit = lerp(
        surface.deep_transmit_alpha,
        surface.shallow_transmit_alpha,
        shallowness,
    );

    let colour = surface.deep_color.xyz().lerp(surface.surface_color.xyz(), shallowness);
    let colour = colour.lerp(surface.shadow_color.xyz(), samples.shadow);
    let colour = colour.lerp(surface.highlight_color.xyz(), samples.highlight);
    let colour = colour.lerp(scene_colour, transmit);
    let colour = colour.lerp(
        surface.foam_color.xyz(),
        foam_mask(samples.foam, shallowness),
    );
    colour.extend(1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::systems::render_mode::WaterDebugView;
    use crate::engine::render::water::params::WaterParams;

    #[test]
    fn view_z_clamps_to_far_plane() {
        assert!((perspective_depth_to_view_z(0.0, 0.1, 2000.0) + 2000.0).abs() < 1e-2);
        assert!((perspective_depth_to_view_z(1.0, 0.1, 2000.0) + 0.1).abs() < 1e-6);
        assert!((perspective_depth_to_view_z(0.01, 0.1, 2000.0) + 10.0).abs() < 1e-4);
    }

    #[test]
    fn screen_origin_is_top_left() {
        assert_eq!(screen_to_ndc(Vec2::ZERO, 0.5), Vec4::new(-1.0, 1.0, 0.5, 1.0));
        assert_eq!(screen_to_ndc(Vec2::ONE, 0.5), Vec4::new(1.0, -1.0, 0.5, 1.0));
    }

    #[test]
    fn shallowness_decays_with_depth() {
        assert_eq!(shallowness(0.0, 0.6), 1.0);
        assert!((shallowness(0.6, 0.6) - (-1.0f32).exp()).abs() < 1e-6);
        // Scene above the water surface counts as fully shallow.
        assert_eq!(shallowness(-1.0, 0.6), 1.0);
    }

    #[test]
    fn foam_appears_only_near_shore() {
        assert_eq!(foam_mask(0.5, 1.0), 1.0);
        assert_eq!(foam_mask(0.5, 0.5), 0.0);
        assert_eq!(foam_mask(0.0, 0.0), 1.0);
    }

    #[test]
    fn deep_water_without_patterns_is_mostly_deep_colour() {
        let surface = WaterSurfaceUniform::new(
            &WaterParams::default(),
            Mat4::IDENTITY,
            WaterDebugView::Shaded,
        );
        let samples = PatternSamples {
            highlight: 0.0,
            shadow: 0.0,
            foam: 1.0,
        };
        let colour = composite(&surface, Vec3::ONE, 0.0, samples);

        let expected = surface.deep_color.xyz().lerp(Vec3::ONE, surface.deep_transmit_alpha);
        assert!(colour.xyz().abs_diff_eq(expected, 1e-6));
        assert_eq!(colour.w, 1.0);
    }

    #[test]
    fn full_foam_overrides_everything() {
        let surface = WaterSurfaceUniform::default();
        let samples = PatternSamples {
            highlight: 0.7,
            shadow: 0.3,
            foam: 0.2,
        };
        let colour = composite(&surface, Vec3::ZERO, 1.0, samples);
        assert!(colour.xyz().abs_diff_eq(surface.foam_color.xyz(), 1e-6));
    }
}
