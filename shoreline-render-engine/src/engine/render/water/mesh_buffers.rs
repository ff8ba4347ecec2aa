use bevy::prelude::*;
use bevy::render::render_resource::{Buffer, BufferInitDescriptor, BufferUsages, IndexFormat};
use bevy::render::renderer::RenderDevice;
use bytemuck::{Pod, Zeroable};

use crate::engine::mesh::plane_grid::PlaneGrid;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct WaterVertex {
    pub position: [f32; 3],
}

/// CPU copy of the water grid, handed from the main world to the render world.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterGeometry {
    pub vertices: Vec<WaterVertex>,
    pub indices: Vec<u32>,
}

impl WaterGeometry {
    /// Flat square grid of `size` with `subdivisions` quads per side.
    pub fn plane(size: Vec2, subdivisions: u32) -> Self {
        let grid = PlaneGrid::new(size, UVec2::splat(subdivisions));
        Self {
            vertices: grid
                .positions
                .iter()
                .map(|&position| WaterVertex { position })
                .collect(),
            indices: grid.indices,
        }
    }
}

pub struct WaterMeshBuffers {
    pub vertex: Buffer,
    pub index: Buffer,
    pub index_count: u32,
}

impl WaterMeshBuffers {
    pub const INDEX_FORMAT: IndexFormat = IndexFormat::Uint32;

    pub fn new(render_device: &RenderDevice, geometry: &WaterGeometry) -> Self {
        let vertex = render_device.create_buffer_with_data(&BufferInitDescriptor {
            label: Some("water_vertex_buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: BufferUsages::VERTEX,
        });
        let index = render_device.create_buffer_with_data(&BufferInitDescriptor {
            label: Some("water_index_buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: geometry.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_matches_requested_subdivisions() {
        let geometry = WaterGeometry::plane(Vec2::splat(20.0), 5);
        assert_eq!(geometry.vertices.len(), 36);
        assert_eq!(geometry.indices.len(), 5 * 5 * 6);
        assert!(geometry.vertices.iter().all(|vertex| vertex.position[1] == 0.0));
        assert_eq!(geometry.vertices[0].position, [-10.0, 0.0, -10.0]);
    }

    #[test]
    fn vertices_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<WaterVertex>(), 12);
        let geometry = WaterGeometry::plane(Vec2::ONE, 1);
        let bytes: &[u8] = bytemuck::cast_slice(&geometry.vertices);
        assert_eq!(bytes.len(), 4 * 12);
    }
}
