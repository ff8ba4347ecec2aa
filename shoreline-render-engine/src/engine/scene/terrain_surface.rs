//! Terrain mesh and type texture, built once from decoded [`TerrainMaps`].

use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::world::{LOWLAND_COLOR, UPLAND_COLOR};
use half::f16;
use thiserror::Error;

use super::height_field::HeightField;
use super::terrain_material::{TerrainMaterial, TerrainPalette};
use crate::engine::assets::scene_manifest::TerrainSettings;
use crate::engine::loading::terrain_loader::TerrainMaps;
use crate::engine::mesh::deformer::{DeformError, warp};
use crate::engine::mesh::plane_grid::PlaneGrid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainSurfaceError {
    #[error("terrain maps must be at least 2x2 samples, got {width}x{height}")]
    TooSmall { width: usize, height: usize },
    #[error(transparent)]
    Deform(#[from] DeformError),
}

#[derive(Component)]
pub struct TerrainSurface;

/// Grid with one vertex per elevation sample, displaced by the remapped elevation.
pub fn build_terrain_mesh(
    elevation: &HeightField,
    settings: &TerrainSettings,
) -> Result<Mesh, TerrainSurfaceError> {
    let (width, height) = (elevation.width(), elevation.height());
    if width < 2 || height < 2 {
        return Err(TerrainSurfaceError::TooSmall { width, height });
    }

    let mut remapped = elevation.clone();
    remapped.apply(|h, _, _| h * settings.elevation_scale + settings.elevation_offset);

    let segments = UVec2::new(width as u32 - 1, height as u32 - 1);
    let mut mesh = PlaneGrid::new(Vec2::splat(settings.size), segments).into_mesh();
    warp(&mut mesh, &remapped)?;
    Ok(mesh)
}

/// Single-channel half-float texture of the type map, linearly filtered.
pub fn type_map_image(terrain_type: &HeightField) -> Image {
    let data: Vec<u8> = terrain_type
        .samples()
        .iter()
        .flat_map(|&value| f16::from_f32(value).to_le_bytes())
        .collect();

    let mut image = Image::new(
        Extent3d {
            width: terrain_type.width() as u32,
            height: terrain_type.height() as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::R16Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::linear();
    image
}

pub fn spawn_terrain(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<TerrainMaterial>,
    images: &mut Assets<Image>,
    maps: &TerrainMaps,
    settings: &TerrainSettings,
) -> Result<Entity, TerrainSurfaceError> {
    let mesh = build_terrain_mesh(&maps.elevation, settings)?;
    let material = TerrainMaterial {
        palette: TerrainPalette::from_srgb(LOWLAND_COLOR, UPLAND_COLOR),
        type_map: images.add(type_map_image(&maps.terrain_type)),
    };

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(material)),
            Transform::IDENTITY,
            TerrainSurface,
        ))
        .id();
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn positions(mesh: &Mesh) -> &[[f32; 3]] {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) => positions,
            _ => panic!("terrain mesh has no positions"),
        }
    }

    #[test]
    fn one_vertex_per_sample_with_remapped_height() {
        let elevation = HeightField::from_samples(3, 2, vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0]).unwrap();
        let mesh = build_terrain_mesh(&elevation, &TerrainSettings::default()).unwrap();
        let positions = positions(&mesh);
        assert_eq!(positions.len(), 6);

        let heights: Vec<f32> = positions.iter().map(|p| p[1]).collect();
        let (min, max) = heights
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));
        assert!((min - 1.0).abs() < 1e-5);
        assert!((max - 4.0).abs() < 1e-5);
    }

    #[test]
    fn single_row_is_rejected() {
        let elevation = HeightField::new(8, 1);
        assert_eq!(
            build_terrain_mesh(&elevation, &TerrainSettings::default()).unwrap_err(),
            TerrainSurfaceError::TooSmall {
                width: 8,
                height: 1
            }
        );
    }

    #[test]
    fn type_map_is_half_float() {
        let field = HeightField::from_samples(2, 1, vec![0.25, 1.0]).unwrap();
        let image = type_map_image(&field);
        assert_eq!(image.texture_descriptor.format, TextureFormat::R16Float);
        let data = image.data.unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(f16::from_le_bytes([data[0], data[1]]).to_f32(), 0.25);
        assert_eq!(f16::from_le_bytes([data[2], data[3]]).to_f32(), 1.0);
    }
}
