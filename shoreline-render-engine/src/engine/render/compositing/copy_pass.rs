use bevy::core_pipeline::core_3d::CORE_3D_DEPTH_FORMAT;
use bevy::core_pipeline::fullscreen_vertex_shader::fullscreen_shader_vertex_state;
use bevy::prelude::*;
use bevy::render::render_resource::{
    binding_types::{sampler, texture_2d, texture_depth_2d},
    *,
};
use bevy::render::renderer::{RenderContext, RenderDevice};

use super::targets::ResolvedTarget;
use crate::constants::path::COPY_PASS_SHADER_PATH;

/// Shader def enabling the `frag_depth` write in `copy_pass.wgsl`.
pub const COPY_DEPTH_DEF: &str = "COPY_DEPTH";

/// Full-screen triangle that copies colour, and optionally depth, between targets.
pub struct CopyPass {
    copy_depth: bool,
    layout: BindGroupLayout,
    sampler: Sampler,
    pipeline_id: CachedRenderPipelineId,
}

impl CopyPass {
    pub fn new(world: &mut World, copy_depth: bool, format: TextureFormat) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            layout_label(copy_depth),
            &copy_layout_entries(copy_depth),
        );
        let sampler = render_device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..default()
        });

        let shader = world.load_asset(COPY_PASS_SHADER_PATH);
        let pipeline_id = world
            .resource_mut::<PipelineCache>()
            .queue_render_pipeline(copy_pipeline_descriptor(
                copy_depth,
                vec![layout.clone()],
                shader,
                format,
            ));

        Self {
            copy_depth,
            layout,
            sampler,
            pipeline_id,
        }
    }

    pub fn pipeline<'a>(&self, pipeline_cache: &'a PipelineCache) -> Option<&'a RenderPipeline> {
        pipeline_cache.get_render_pipeline(self.pipeline_id)
    }

    /// Clear `destination`, then draw `source` over it.
    pub fn render(
        &self,
        render_context: &mut RenderContext,
        pipeline: &RenderPipeline,
        source: ResolvedTarget,
        destination: ResolvedTarget,
    ) {
        let bind_group = match (self.copy_depth, source.depth) {
            (true, Some(source_depth)) => render_context.render_device().create_bind_group(
                "copy_pass_depth_bind_group",
                &self.layout,
                &BindGroupEntries::sequential((source.colour, &self.sampler, source_depth)),
            ),
            (true, None) => {
                warn!("Depth copy skipped: source target has no depth");
                return;
            }
            (false, _) => render_context.render_device().create_bind_group(
                "copy_pass_bind_group",
                &self.layout,
                &BindGroupEntries::sequential((source.colour, &self.sampler)),
            ),
        };

        let depth_stencil_attachment = match (self.copy_depth, destination.depth) {
            (true, Some(view)) => Some(RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(0.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            (true, None) => {
                warn!("Depth copy skipped: destination target has no depth");
                return;
            }
            (false, _) => None,
        };

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some(if self.copy_depth {
                "copy_pass_with_depth"
            } else {
                "copy_pass"
            }),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: destination.colour,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

fn layout_label(copy_depth: bool) -> &'static str {
    if copy_depth {
        "copy_pass_depth_bind_group_layout"
    } else {
        "copy_pass_bind_group_layout"
    }
}

/// Colour texture and sampler, plus the source depth only when it is copied.
pub fn copy_layout_entries(copy_depth: bool) -> Vec<BindGroupLayoutEntry> {
    if copy_depth {
        BindGroupLayoutEntries::sequential(
            ShaderStages::FRAGMENT,
            (
                texture_2d(TextureSampleType::Float { filterable: true }),
                sampler(SamplerBindingType::Filtering),
                texture_depth_2d(),
            ),
        )
        .to_vec()
    } else {
        BindGroupLayoutEntries::sequential(
            ShaderStages::FRAGMENT,
            (
                texture_2d(TextureSampleType::Float { filterable: true }),
                sampler(SamplerBindingType::Filtering),
            ),
        )
        .to_vec()
    }
}

pub fn copy_pipeline_descriptor(
    copy_depth: bool,
    layout: Vec<BindGroupLayout>,
    shader: Handle<Shader>,
    format: TextureFormat,
) -> RenderPipelineDescriptor {
    let shader_defs = if copy_depth {
        vec![COPY_DEPTH_DEF.into()]
    } else {
        vec![]
    };

    // Every fragment must land, so the copied depth is written unconditionally.
    let depth_stencil = copy_depth.then(|| DepthStencilState {
        format: CORE_3D_DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: CompareFunction::Always,
        stencil: StencilState::default(),
        bias: DepthBiasState::default(),
    });

    RenderPipelineDescriptor {
        label: Some(
            if copy_depth {
                "copy_pass_depth_pipeline"
            } else {
                "copy_pass_pipeline"
            }
            .into(),
        ),
        layout,
        vertex: fullscreen_shader_vertex_state(),
        fragment: Some(FragmentState {
            shader,
            shader_defs,
            entry_point: "fragment".into(),
            targets: vec![Some(ColorTargetState {
                format,
                blend: None,
                write_mask: ColorWrites::ALL,
            })],
        }),
        primitive: PrimitiveState::default(),
        depth_stencil,
        multisample: MultisampleState::default(),
        push_constant_ranges: vec![],
        zero_initialize_workgroup_memory: false,
    }
}

// These run without a GPU adapter, so copy behaviour is checked through the
// pipeline descriptor and bind-group layout rather than read-back pixels.
#[cfg(test)]
mod tests {
    use super::*;

    fn has_depth_binding(entries: &[BindGroupLayoutEntry]) -> bool {
        entries.iter().any(|entry| {
            matches!(
                entry.ty,
                BindingType::Texture {
                    sample_type: TextureSampleType::Depth,
                    ..
                }
            )
        })
    }

    #[test]
    fn colour_copy_has_no_depth_anywhere() {
        let entries = copy_layout_entries(false);
        assert_eq!(entries.len(), 2);
        assert!(!has_depth_binding(&entries));

        let descriptor = copy_pipeline_descriptor(
            false,
            vec![],
            Handle::default(),
            TextureFormat::Rgba8UnormSrgb,
        );
        assert!(descriptor.depth_stencil.is_none());
        assert!(descriptor.fragment.unwrap().shader_defs.is_empty());
    }

    #[test]
    fn depth_copy_writes_depth_unconditionally() {
        let entries = copy_layout_entries(true);
        assert_eq!(entries.len(), 3);
        assert!(has_depth_binding(&entries));

        let descriptor = copy_pipeline_descriptor(
            true,
            vec![],
            Handle::default(),
            TextureFormat::Rgba8UnormSrgb,
        );
        let depth = descriptor.depth_stencil.clone().unwrap();
        assert_eq!(depth.format, TextureFormat::Depth32Float);
        assert_eq!(depth.depth_compare, CompareFunction::Always);
        assert!(depth.depth_write_enabled);
        assert_eq!(
            descriptor.fragment.unwrap().shader_defs,
            vec![ShaderDefVal::from(COPY_DEPTH_DEF)]
        );
    }

    #[test]
    fn copy_targets_requested_format() {
        let descriptor =
            copy_pipeline_descriptor(true, vec![], Handle::default(), TextureFormat::Rgba16Float);
        let fragment = descriptor.fragment.unwrap();
        let target = fragment.targets[0].as_ref().unwrap();
        assert_eq!(target.format, TextureFormat::Rgba16Float);
        assert!(target.blend.is_none());
    }

    #[test]
    fn shader_gates_depth_on_the_copy_def() {
        let source = include_str!("../../../../assets/shaders/copy_pass.wgsl");
        let gated: Vec<_> = source
            .split(&format!("#ifdef {COPY_DEPTH_DEF}"))
            .skip(1)
            .map(|block| block.split("#endif").next().unwrap_or_default())
            .collect();
        assert!(gated.iter().any(|block| block.contains("frag_depth")));
        assert!(gated.iter().any(|block| block.contains("textureLoad(source_depth")));
        assert!(source.contains("out.colour = textureSample(source_colour"));
    }
}
