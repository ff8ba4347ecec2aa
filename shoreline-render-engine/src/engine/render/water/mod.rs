//! Animated, depth-aware ocean surface.
//!
//! The surface lives in the main world as a [`WaterSurface`] entity carrying
//! [`WaterParams`](params::WaterParams). Each frame the render world:
//!
//! 1. extracts parameter changes and, only when something changed, rewrites
//!    the surface uniform,
//! 2. builds an immutable [`WaterFrameContext`](uniforms::WaterFrameContext)
//!    per view from the camera and the [`WaterClock`],
//! 3. draws the surface once inside the frame compositor's water pass.

use bevy::prelude::*;
use bevy::render::camera::ExtractedCamera;
use bevy::render::extract_component::{ExtractComponent, ExtractComponentPlugin};
use bevy::render::extract_resource::ExtractResourcePlugin;
use bevy::render::render_resource::{DynamicUniformBuffer, UniformBuffer};
use bevy::render::renderer::{RenderDevice, RenderQueue};
use bevy::render::view::ExtractedView;
use bevy::render::{Extract, ExtractSchedule, Render, RenderApp, RenderSet};

use crate::engine::assets::water_textures::WaterTextures;
use crate::engine::systems::render_mode::WaterDebugView;
use crate::engine::systems::water_clock::{WaterClock, advance_water_clock};

/// Editable colours and scalars, range validation.
pub mod params;

/// Render pipeline, bind group layouts and the draw itself.
pub mod pipeline;

/// Water grid geometry and its vertex/index buffers.
pub mod mesh_buffers;

/// CPU mirror of the shader's reconstruction and blending.
pub mod shading;

/// Surface and per-view uniform layouts and the per-frame camera snapshot.
pub mod uniforms;

use mesh_buffers::{WaterGeometry, WaterMeshBuffers};
use params::WaterParams;
use pipeline::WaterPipeline;
use uniforms::{CameraSnapshot, WaterFrameContext, WaterSurfaceUniform, WaterViewUniform};

/// Square water plane centred on its transform.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
#[require(WaterParams, Transform)]
pub struct WaterSurface {
    pub size: Vec2,
    pub subdivisions: u32,
}

/// Clip planes of the scene camera, used to linearise sampled depth.
#[derive(Component, ExtractComponent, Clone, Copy, Debug, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

/// Changes waiting to be pushed to the GPU, filled during extraction.
#[derive(Resource, Default)]
pub struct ExtractedWaterSurface {
    present: bool,
    pending_geometry: Option<WaterGeometry>,
    pending_uniform: Option<WaterSurfaceUniform>,
}

#[derive(Resource, Default)]
pub struct WaterSurfaceGpu {
    pub uniform: UniformBuffer<WaterSurfaceUniform>,
    pub mesh: Option<WaterMeshBuffers>,
}

#[derive(Resource, Default)]
pub struct WaterViewUniforms {
    pub uniforms: DynamicUniformBuffer<WaterViewUniform>,
}

#[derive(Component)]
pub struct WaterViewUniformOffset {
    pub offset: u32,
}

pub struct WaterSurfacePlugin;

impl Plugin for WaterSurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaterClock>()
            .init_resource::<WaterDebugView>()
            .add_plugins((
                ExtractResourcePlugin::<WaterClock>::default(),
                ExtractResourcePlugin::<WaterDebugView>::default(),
                ExtractResourcePlugin::<WaterTextures>::default(),
                ExtractComponentPlugin::<DepthRange>::default(),
            ))
            .add_systems(Update, advance_water_clock);

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .init_resource::<ExtractedWaterSurface>()
            .init_resource::<WaterSurfaceGpu>()
            .init_resource::<WaterViewUniforms>()
            .add_systems(ExtractSchedule, extract_water_surface)
            .add_systems(
                Render,
                (prepare_water_surface, prepare_water_view_uniforms)
                    .in_set(RenderSet::PrepareResources),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<WaterPipeline>();
    }
}

/// Record geometry and uniform changes for the single water surface.
pub fn extract_water_surface(
    mut extracted: ResMut<ExtractedWaterSurface>,
    surfaces: Extract<Query<(Ref<WaterSurface>, Ref<WaterParams>, Ref<GlobalTransform>)>>,
    debug_view: Extract<Res<WaterDebugView>>,
) {
    let Ok((surface, params, transform)) = surfaces.single() else {
        extracted.present = false;
        return;
    };

    let added = !extracted.present;
    extracted.present = true;

    if added || surface.is_changed() {
        extracted.pending_geometry = Some(WaterGeometry::plane(surface.size, surface.subdivisions));
    }
    if added
        || surface.is_changed()
        || params.is_changed()
        || transform.is_changed()
        || debug_view.is_changed()
    {
        extracted.pending_uniform = Some(WaterSurfaceUniform::new(
            &params,
            transform.compute_matrix(),
            **debug_view,
        ));
    }
}

/// Push pending surface changes to the GPU. Nothing is written on frames
/// where the parameters did not change.
pub fn prepare_water_surface(
    mut extracted: ResMut<ExtractedWaterSurface>,
    mut gpu: ResMut<WaterSurfaceGpu>,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
) {
    if !extracted.present {
        gpu.mesh = None;
        return;
    }

    if let Some(geometry) = extracted.pending_geometry.take() {
        gpu.mesh = Some(WaterMeshBuffers::new(&render_device, &geometry));
    }
    if let Some(uniform) = extracted.pending_uniform.take() {
        gpu.uniform.set(uniform);
        gpu.uniform.write_buffer(&render_device, &render_queue);
        debug!("Water surface uniform updated");
    }
}

/// Snapshot every camera into a [`WaterFrameContext`] and upload it.
pub fn prepare_water_view_uniforms(
    mut commands: Commands,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
    mut view_uniforms: ResMut<WaterViewUniforms>,
    clock: Option<Res<WaterClock>>,
    views: Query<(Entity, &ExtractedView, &ExtractedCamera, &DepthRange)>,
) {
    let time = clock.map_or(0.0, |clock| clock.elapsed());
    let view_iter = views.iter();
    let Some(mut writer) =
        view_uniforms
            .uniforms
            .get_writer(view_iter.len(), &render_device, &render_queue)
    else {
        return;
    };

    for (entity, view, camera, depth_range) in view_iter {
        let Some(size) = camera.physical_target_size else {
            continue;
        };
        let context = WaterFrameContext {
            camera: CameraSnapshot::new(
                view.world_from_view.compute_matrix(),
                view.clip_from_view,
                size.as_vec2(),
                depth_range.near,
                depth_range.far,
            ),
            time,
        };
        commands.entity(entity).insert(WaterViewUniformOffset {
            offset: writer.write(&context.to_uniform()),
        });
    }
}
