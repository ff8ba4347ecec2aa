use bevy::core_pipeline::core_3d::CORE_3D_DEPTH_FORMAT;
use bevy::image::BevyDefault;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssets;
use bevy::render::render_resource::{
    binding_types::{sampler, texture_2d, texture_depth_2d, uniform_buffer},
    *,
};
use bevy::render::renderer::{RenderContext, RenderDevice};
use bevy::render::texture::GpuImage;

use super::mesh_buffers::WaterMeshBuffers;
use super::uniforms::{WaterSurfaceUniform, WaterViewUniform};
use super::{WaterSurfaceGpu, WaterViewUniforms};
use crate::constants::path::WATER_SHADER_PATH;
use crate::engine::assets::water_textures::WaterTextures;
use crate::engine::render::compositing::targets::ResolvedTarget;

/// Pipeline state for the water pass.
///
/// Group 0 holds the per-view and per-surface uniforms; group 1 holds the
/// pattern textures and the upstream scene colour and depth.
#[derive(Resource)]
pub struct WaterPipeline {
    uniform_layout: BindGroupLayout,
    texture_layout: BindGroupLayout,
    pattern_sampler: Sampler,
    scene_sampler: Sampler,
    pipeline_id: CachedRenderPipelineId,
}

impl FromWorld for WaterPipeline {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let uniform_layout = render_device.create_bind_group_layout(
            "water_uniform_bind_group_layout",
            &water_uniform_layout_entries(),
        );
        let texture_layout = render_device.create_bind_group_layout(
            "water_texture_bind_group_layout",
            &water_texture_layout_entries(),
        );

        let pattern_sampler = render_device.create_sampler(&SamplerDescriptor {
            label: Some("water_pattern_sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..default()
        });
        let scene_sampler = render_device.create_sampler(&SamplerDescriptor {
            label: Some("water_scene_sampler"),
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..default()
        });

        let shader = world.load_asset(WATER_SHADER_PATH);
        let pipeline_id =
            world
                .resource_mut::<PipelineCache>()
                .queue_render_pipeline(water_pipeline_descriptor(
                    vec![uniform_layout.clone(), texture_layout.clone()],
                    shader,
                    TextureFormat::bevy_default(),
                ));

        Self {
            uniform_layout,
            texture_layout,
            pattern_sampler,
            scene_sampler,
            pipeline_id,
        }
    }
}

pub fn water_uniform_layout_entries() -> Vec<BindGroupLayoutEntry> {
    BindGroupLayoutEntries::sequential(
        ShaderStages::VERTEX_FRAGMENT,
        (
            uniform_buffer::<WaterViewUniform>(true),
            uniform_buffer::<WaterSurfaceUniform>(false),
        ),
    )
    .to_vec()
}

pub fn water_texture_layout_entries() -> Vec<BindGroupLayoutEntry> {
    BindGroupLayoutEntries::sequential(
        ShaderStages::FRAGMENT,
        (
            // noise, water pattern, foam
            texture_2d(TextureSampleType::Float { filterable: true }),
            texture_2d(TextureSampleType::Float { filterable: true }),
            texture_2d(TextureSampleType::Float { filterable: true }),
            sampler(SamplerBindingType::Filtering),
            // upstream scene
            texture_2d(TextureSampleType::Float { filterable: true }),
            sampler(SamplerBindingType::Filtering),
            texture_depth_2d(),
        ),
    )
    .to_vec()
}

pub fn water_pipeline_descriptor(
    layout: Vec<BindGroupLayout>,
    shader: Handle<Shader>,
    format: TextureFormat,
) -> RenderPipelineDescriptor {
    RenderPipelineDescriptor {
        label: Some("water_pipeline".into()),
        layout,
        vertex: VertexState {
            shader: shader.clone(),
            shader_defs: vec![],
            entry_point: "vertex".into(),
            buffers: vec![VertexBufferLayout::from_vertex_formats(
                VertexStepMode::Vertex,
                [VertexFormat::Float32x3],
            )],
        },
        fragment: Some(FragmentState {
            shader,
            shader_defs: vec![],
            entry_point: "fragment".into(),
            targets: vec![Some(ColorTargetState {
                format,
                blend: None,
                write_mask: ColorWrites::ALL,
            })],
        }),
        // Visible from above and below the waterline.
        primitive: PrimitiveState {
            cull_mode: None,
            ..default()
        },
        // Reverse-Z: nearer fragments have larger depth.
        depth_stencil: Some(DepthStencilState {
            format: CORE_3D_DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::GreaterEqual,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState::default(),
        push_constant_ranges: vec![],
        zero_initialize_workgroup_memory: false,
    }
}

/// Everything the water draw binds besides the scene target, gathered once per view.
pub struct WaterPassInputs<'a> {
    view_uniforms: BindingResource<'a>,
    view_offset: u32,
    surface_uniform: BindingResource<'a>,
    mesh: &'a WaterMeshBuffers,
    noise: &'a TextureView,
    water_map: &'a TextureView,
    foam: &'a TextureView,
}

impl<'a> WaterPassInputs<'a> {
    /// `None` until the surface, its uniforms and all pattern textures are on the GPU.
    pub fn gather(world: &'a World, view_offset: u32) -> Option<Self> {
        let surface = world.get_resource::<WaterSurfaceGpu>()?;
        let textures = world.get_resource::<WaterTextures>()?;
        let gpu_images = world.resource::<RenderAssets<GpuImage>>();

        Some(Self {
            view_uniforms: world
                .get_resource::<WaterViewUniforms>()?
                .uniforms
                .binding()?,
            view_offset,
            surface_uniform: surface.uniform.binding()?,
            mesh: surface.mesh.as_ref()?,
            noise: &gpu_images.get(&textures.noise)?.texture_view,
            water_map: &gpu_images.get(&textures.water_map)?.texture_view,
            foam: &gpu_images.get(&textures.foam)?.texture_view,
        })
    }
}

impl WaterPipeline {
    pub fn pipeline<'a>(&self, pipeline_cache: &'a PipelineCache) -> Option<&'a RenderPipeline> {
        pipeline_cache.get_render_pipeline(self.pipeline_id)
    }

    /// Draw the surface into `destination`, depth-tested against its depth,
    /// sampling `scene` for colour and depth.
    pub fn render(
        &self,
        render_context: &mut RenderContext,
        pipeline: &RenderPipeline,
        inputs: &WaterPassInputs,
        scene: ResolvedTarget,
        destination: ResolvedTarget,
    ) {
        let (Some(scene_depth), Some(destination_depth)) = (scene.depth, destination.depth) else {
            warn!("Water pass skipped: scene or destination has no depth");
            return;
        };

        let uniform_bind_group = render_context.render_device().create_bind_group(
            "water_uniform_bind_group",
            &self.uniform_layout,
            &BindGroupEntries::sequential((
                inputs.view_uniforms.clone(),
                inputs.surface_uniform.clone(),
            )),
        );
        let texture_bind_group = render_context.render_device().create_bind_group(
            "water_texture_bind_group",
            &self.texture_layout,
            &BindGroupEntries::sequential((
                inputs.noise,
                inputs.water_map,
                inputs.foam,
                &self.pattern_sampler,
                scene.colour,
                &self.scene_sampler,
                scene_depth,
            )),
        );

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some("water_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: destination.colour,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: destination_depth,
                depth_ops: Some(Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &uniform_bind_group, &[inputs.view_offset]);
        render_pass.set_bind_group(1, &texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, inputs.mesh.vertex.slice(..));
        render_pass.set_index_buffer(
            inputs.mesh.index.slice(..),
            0,
            WaterMeshBuffers::INDEX_FORMAT,
        );
        render_pass.draw_indexed(0..inputs.mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_matches_reverse_z() {
        let descriptor =
            water_pipeline_descriptor(vec![], Handle::default(), TextureFormat::Rgba8UnormSrgb);
        let depth = descriptor.depth_stencil.unwrap();
        assert_eq!(depth.depth_compare, CompareFunction::GreaterEqual);
        assert_eq!(depth.format, TextureFormat::Depth32Float);
        assert!(descriptor.primitive.cull_mode.is_none());
    }

    #[test]
    fn vertex_layout_is_position_only() {
        let descriptor =
            water_pipeline_descriptor(vec![], Handle::default(), TextureFormat::Rgba8UnormSrgb);
        let buffers = &descriptor.vertex.buffers;
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].array_stride, 12);
        assert_eq!(buffers[0].attributes[0].format, VertexFormat::Float32x3);
    }

    #[test]
    fn scene_depth_is_the_last_texture_binding() {
        let entries = water_texture_layout_entries();
        assert_eq!(entries.len(), 7);
        assert!(matches!(
            entries[6].ty,
            BindingType::Texture {
                sample_type: TextureSampleType::Depth,
                ..
            }
        ));
        let uniforms = water_uniform_layout_entries();
        assert!(matches!(
            uniforms[0].ty,
            BindingType::Buffer {
                has_dynamic_offset: true,
                ..
            }
        ));
    }
}
