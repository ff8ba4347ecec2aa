use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Flat, horizontal, indexed grid centred on the origin in the XZ plane.
///
/// U runs from 0 at `-X` to 1 at `+X`. V runs from 0 at `+Z` to 1 at `-Z`,
/// so the first row of a heightmap lands on the near (`+Z`) edge. Triangles
/// wind counter-clockwise seen from `+Y`.
#[derive(Debug, Clone)]
pub struct PlaneGrid {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl PlaneGrid {
    /// `segments` is the number of quads along X and Z; both must be at least one.
    pub fn new(size: Vec2, segments: UVec2) -> Self {
        let segments = segments.max(UVec2::ONE);
        let columns = segments.x + 1;
        let rows = segments.y + 1;
        let vertex_count = (columns * rows) as usize;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        for iz in 0..rows {
            let z = iz as f32 / segments.y as f32;
            for ix in 0..columns {
                let u = ix as f32 / segments.x as f32;
                positions.push([(u - 0.5) * size.x, 0.0, (z - 0.5) * size.y]);
                uvs.push([u, 1.0 - z]);
            }
        }

        let mut indices = Vec::with_capacity((segments.x * segments.y * 6) as usize);
        for iz in 0..segments.y {
            for ix in 0..segments.x {
                let a = iz * columns + ix;
                let b = a + 1;
                let c = a + columns;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Self {
            positions,
            normals: vec![[0.0, 1.0, 0.0]; vertex_count],
            uvs,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn into_mesh(self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
        .with_inserted_indices(Indices::U32(self.indices))
    }
}
