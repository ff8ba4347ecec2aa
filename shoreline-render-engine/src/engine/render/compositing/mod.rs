//! Frame compositor: runs the validated pass list after Bevy's main passes.
//!
//! The opaque terrain and reference objects land in the view's main texture
//! as usual. The compositor then copies them (with depth) into its own
//! target, draws the water there while sampling the untouched scene, and
//! copies the result back to the screen.

use bevy::core_pipeline::core_3d::graph::{Core3d, Node3d};
use bevy::ecs::query::QueryItem;
use bevy::image::BevyDefault;
use bevy::prelude::*;
use bevy::render::render_graph::{
    NodeRunError, RenderGraphApp, RenderGraphContext, RenderLabel, ViewNode, ViewNodeRunner,
};
use bevy::render::render_resource::{PipelineCache, TextureFormat};
use bevy::render::renderer::RenderContext;
use bevy::render::view::{ViewDepthTexture, ViewTarget};
use bevy::render::{Render, RenderApp, RenderSet};

use crate::engine::render::water::WaterViewUniformOffset;
use crate::engine::render::water::pipeline::{WaterPassInputs, WaterPipeline};

pub mod copy_pass;
pub mod pass_plan;
pub mod targets;

use copy_pass::CopyPass;
use pass_plan::{PassList, PassShader, TargetRole};
use targets::{ResolvedTarget, ViewCompositeTargets, prepare_composite_targets};

/// The pass list every view runs each frame.
#[derive(Resource)]
pub struct CompositorPlan(pub PassList);

/// Both copy variants, compiled once for the main texture format.
#[derive(Resource)]
pub struct CopyPasses {
    pub with_depth: CopyPass,
    pub colour_only: CopyPass,
}

impl FromWorld for CopyPasses {
    fn from_world(world: &mut World) -> Self {
        Self {
            with_depth: CopyPass::new(world, true, TextureFormat::bevy_default()),
            colour_only: CopyPass::new(world, false, TextureFormat::bevy_default()),
        }
    }
}

impl CopyPasses {
    pub fn variant(&self, copy_depth: bool) -> &CopyPass {
        if copy_depth {
            &self.with_depth
        } else {
            &self.colour_only
        }
    }
}

pub struct FrameCompositorPlugin;

impl Plugin for FrameCompositorPlugin {
    fn build(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_systems(
                Render,
                prepare_composite_targets.in_set(RenderSet::PrepareResources),
            )
            .add_render_graph_node::<ViewNodeRunner<FrameCompositorNode>>(
                Core3d,
                FrameCompositorLabel,
            )
            .add_render_graph_edges(
                Core3d,
                (
                    Node3d::MainTransparentPass,
                    FrameCompositorLabel,
                    Node3d::EndMainPass,
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        let plan = match PassList::ocean_default() {
            Ok(plan) => plan,
            Err(error) => panic!("Invalid compositor pass list: {error}"),
        };
        let labels: Vec<_> = plan.passes().iter().map(|pass| pass.label).collect();
        info!("Compositor passes: {}", labels.join(" -> "));

        render_app
            .insert_resource(CompositorPlan(plan))
            .init_resource::<CopyPasses>();
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub struct FrameCompositorLabel;

#[derive(Default)]
pub struct FrameCompositorNode;

impl ViewNode for FrameCompositorNode {
    type ViewQuery = (
        &'static ViewTarget,
        &'static ViewDepthTexture,
        &'static ViewCompositeTargets,
        &'static WaterViewUniformOffset,
    );

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, view_depth, composite_targets, view_offset): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let plan = world.resource::<CompositorPlan>();
        let copy_passes = world.resource::<CopyPasses>();
        let water_pipeline = world.resource::<WaterPipeline>();
        let pipeline_cache = world.resource::<PipelineCache>();

        // Run all passes or none, so a half-compiled frame never reaches the screen.
        let (Some(copy_depth), Some(copy_colour), Some(water)) = (
            copy_passes.with_depth.pipeline(pipeline_cache),
            copy_passes.colour_only.pipeline(pipeline_cache),
            water_pipeline.pipeline(pipeline_cache),
        ) else {
            return Ok(());
        };
        let Some(water_inputs) = WaterPassInputs::gather(world, view_offset.offset) else {
            return Ok(());
        };

        let resolve = |role: TargetRole| match role {
            TargetRole::Scene => ResolvedTarget::scene(view_target, view_depth),
            TargetRole::Composite => composite_targets.composite.resolved(),
            TargetRole::Screen => ResolvedTarget::screen(view_target),
        };

        for pass in plan.0.passes() {
            let source = resolve(pass.read);
            let destination = resolve(pass.write);
            match pass.shader {
                PassShader::Copy { depth } => {
                    let pipeline = if depth { copy_depth } else { copy_colour };
                    copy_passes
                        .variant(depth)
                        .render(render_context, pipeline, source, destination);
                }
                PassShader::Water => {
                    water_pipeline.render(
                        render_context,
                        water,
                        &water_inputs,
                        source,
                        destination,
                    );
                }
            }
        }

        Ok(())
    }
}
