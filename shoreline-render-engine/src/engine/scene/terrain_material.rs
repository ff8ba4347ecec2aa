use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType, SpecializedMeshPipelineError,
};

use crate::constants::path::TERRAIN_SHADER_PATH;
use crate::engine::render::water::params::srgb_to_linear_vec4;

/// Ground colours blended by the type map, in linear space.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct TerrainPalette {
    pub lowland: Vec4,
    pub upland: Vec4,
}

impl TerrainPalette {
    pub fn from_srgb(lowland: [f32; 3], upland: [f32; 3]) -> Self {
        Self {
            lowland: srgb_to_linear_vec4(lowland),
            upland: srgb_to_linear_vec4(upland),
        }
    }
}

/// Unlit, double-sided terrain shading: `mix(lowland, upland, type_map(uv).r)`.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct TerrainMaterial {
    #[uniform(0)]
    pub palette: TerrainPalette,

    #[texture(1)]
    #[sampler(2)]
    pub type_map: Handle<Image>,
}

impl Material for TerrainMaterial {
    fn fragment_shader() -> ShaderRef {
        TERRAIN_SHADER_PATH.into()
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
