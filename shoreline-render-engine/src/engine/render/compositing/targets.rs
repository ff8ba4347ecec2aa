use bevy::core_pipeline::core_3d::CORE_3D_DEPTH_FORMAT;
use bevy::prelude::*;
use bevy::render::camera::ExtractedCamera;
use bevy::render::render_resource::{
    Extent3d, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor,
};
use bevy::render::renderer::RenderDevice;
use bevy::render::view::{ViewDepthTexture, ViewTarget};

use super::CompositorPlan;
use super::pass_plan::TargetRole;

const COLOUR_LABEL: &str = "composite_colour_texture";
const DEPTH_LABEL: &str = "composite_depth_texture";

/// Off-screen colour and optional depth, sized to one view's framebuffer.
pub struct CompositingTarget {
    size: UVec2,
    colour: TextureView,
    depth: Option<TextureView>,
}

impl CompositingTarget {
    pub fn new(
        render_device: &RenderDevice,
        size: UVec2,
        format: TextureFormat,
        with_depth: bool,
    ) -> Self {
        let colour = render_device
            .create_texture(&colour_texture_descriptor(size, format))
            .create_view(&TextureViewDescriptor::default());
        let depth = with_depth.then(|| {
            render_device
                .create_texture(&depth_texture_descriptor(size))
                .create_view(&TextureViewDescriptor::default())
        });
        Self {
            size,
            colour,
            depth,
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn resolved(&self) -> ResolvedTarget<'_> {
        ResolvedTarget {
            colour: &self.colour,
            depth: self.depth.as_ref(),
        }
    }
}

/// Colour and depth views a pass reads from or renders into this frame.
#[derive(Clone, Copy)]
pub struct ResolvedTarget<'a> {
    pub colour: &'a TextureView,
    pub depth: Option<&'a TextureView>,
}

impl<'a> ResolvedTarget<'a> {
    pub fn scene(view_target: &'a ViewTarget, view_depth: &'a ViewDepthTexture) -> Self {
        Self {
            colour: view_target.main_texture_view(),
            depth: Some(view_depth.view()),
        }
    }

    pub fn screen(view_target: &'a ViewTarget) -> Self {
        Self {
            colour: view_target.main_texture_view(),
            depth: None,
        }
    }
}

pub fn colour_texture_descriptor(size: UVec2, format: TextureFormat) -> TextureDescriptor<'static> {
    TextureDescriptor {
        label: Some(COLOUR_LABEL),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    }
}

pub fn depth_texture_descriptor(size: UVec2) -> TextureDescriptor<'static> {
    TextureDescriptor {
        label: Some(DEPTH_LABEL),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: CORE_3D_DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    }
}

fn extent(size: UVec2) -> Extent3d {
    Extent3d {
        width: size.x.max(1),
        height: size.y.max(1),
        depth_or_array_layers: 1,
    }
}

/// Per-view storage for every compositor-owned target.
#[derive(Component)]
pub struct ViewCompositeTargets {
    pub composite: CompositingTarget,
}

/// True when a view has no target yet or its framebuffer changed size.
pub fn needs_reallocation(current: Option<UVec2>, framebuffer: UVec2) -> bool {
    framebuffer.x > 0 && framebuffer.y > 0 && current != Some(framebuffer)
}

/// Allocate composite targets for new views and re-allocate them on resize.
pub fn prepare_composite_targets(
    mut commands: Commands,
    render_device: Res<RenderDevice>,
    plan: Res<CompositorPlan>,
    views: Query<(
        Entity,
        &ExtractedCamera,
        &ViewTarget,
        Option<&ViewCompositeTargets>,
    )>,
) {
    let with_depth = plan
        .0
        .target(TargetRole::Composite)
        .is_some_and(|spec| spec.has_depth);

    for (entity, camera, view_target, existing) in &views {
        let Some(size) = camera.physical_target_size else {
            continue;
        };
        let current = existing.map(|targets| targets.composite.size());
        if !needs_reallocation(current, size) {
            continue;
        }

        match current {
            Some(previous) => info!(
                "Resizing composite target {}x{} -> {}x{}",
                previous.x, previous.y, size.x, size.y
            ),
            None => info!("Allocating composite target {}x{}", size.x, size.y),
        }

        commands.entity(entity).insert(ViewCompositeTargets {
            composite: CompositingTarget::new(
                &render_device,
                size,
                view_target.main_texture_format(),
                with_depth,
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reallocates_only_on_size_change() {
        let size = UVec2::new(1280, 720);
        assert!(needs_reallocation(None, size));
        assert!(!needs_reallocation(Some(size), size));
        assert!(needs_reallocation(Some(size), UVec2::new(800, 600)));
    }

    #[test]
    fn minimised_window_keeps_old_target() {
        assert!(!needs_reallocation(Some(UVec2::new(640, 480)), UVec2::new(0, 480)));
        assert!(!needs_reallocation(None, UVec2::ZERO));
    }

    #[test]
    fn depth_storage_is_sampleable() {
        let descriptor = depth_texture_descriptor(UVec2::new(300, 200));
        assert_eq!(descriptor.format, TextureFormat::Depth32Float);
        assert!(descriptor.usage.contains(TextureUsages::TEXTURE_BINDING));
        assert!(descriptor.usage.contains(TextureUsages::RENDER_ATTACHMENT));
        assert_eq!((descriptor.size.width, descriptor.size.height), (300, 200));
    }

    #[test]
    fn colour_storage_matches_requested_format() {
        let descriptor = colour_texture_descriptor(UVec2::new(16, 9), TextureFormat::Rgba8UnormSrgb);
        assert_eq!(descriptor.format, TextureFormat::Rgba8UnormSrgb);
        assert_eq!(descriptor.sample_count, 1);
        assert!(descriptor.usage.contains(TextureUsages::TEXTURE_BINDING));
    }
}
