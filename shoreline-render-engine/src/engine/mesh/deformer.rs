/// One-shot heightfield deformation of planar meshes
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use thiserror::Error;

use crate::engine::scene::height_field::HeightField;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeformError {
    #[error("mesh has no float32x3 position attribute")]
    MissingPositions,
    #[error("mesh has no float32x2 uv attribute")]
    MissingUvs,
    #[error("mesh has {positions} positions but {uvs} uvs")]
    AttributeLengthMismatch { positions: usize, uvs: usize },
}

/// Set every vertex's Y to `field.sample(uv)`, then rebuild the normals.
///
/// Intended to run once after the mesh is built; it is O(vertex count) and
/// keeps no reference to `field`.
pub fn warp(mesh: &mut Mesh, field: &HeightField) -> Result<(), DeformError> {
    let heights: Vec<f32> = match mesh.attribute(Mesh::ATTRIBUTE_UV_0) {
        Some(VertexAttributeValues::Float32x2(uvs)) => {
            uvs.iter().map(|&[u, v]| field.sample(u, v)).collect()
        }
        _ => return Err(DeformError::MissingUvs),
    };
    let indices = mesh_triangle_indices(mesh);

    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    else {
        return Err(DeformError::MissingPositions);
    };
    if positions.len() != heights.len() {
        return Err(DeformError::AttributeLengthMismatch {
            positions: positions.len(),
            uvs: heights.len(),
        });
    }
    for (position, height) in positions.iter_mut().zip(heights) {
        position[1] = height;
    }

    let normals = vertex_normals(positions, indices.as_deref());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    Ok(())
}

fn mesh_triangle_indices(mesh: &Mesh) -> Option<Vec<usize>> {
    mesh.indices().map(|indices| indices.iter().collect())
}

/// Area-weighted average of the face normals around each vertex.
///
/// `indices` of `None` means an unindexed triangle list. Vertices touched by
/// no (non-degenerate) triangle get `+Y`.
pub fn vertex_normals(positions: &[[f32; 3]], indices: Option<&[usize]>) -> Vec<[f32; 3]> {
    let sequential: Vec<usize>;
    let indices = match indices {
        Some(indices) => indices,
        None => {
            sequential = (0..positions.len()).collect();
            &sequential
        }
    };

    let mut accumulated = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
        let pa = Vec3::from(positions[a]);
        let face = (Vec3::from(positions[b]) - pa).cross(Vec3::from(positions[c]) - pa);
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    accumulated
        .into_iter()
        .map(|normal| normal.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::plane_grid::PlaneGrid;

    fn positions(mesh: &Mesh) -> &[[f32; 3]] {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) => positions,
            _ => panic!("positions missing"),
        }
    }

    fn normals(mesh: &Mesh) -> &[[f32; 3]] {
        match mesh.attribute(Mesh::ATTRIBUTE_NORMAL) {
            Some(VertexAttributeValues::Float32x3(normals)) => normals,
            _ => panic!("normals missing"),
        }
    }

    #[test]
    fn constant_field_lifts_every_vertex() {
        let mut mesh = PlaneGrid::new(Vec2::splat(2.0), UVec2::splat(2)).into_mesh();
        let mut field = HeightField::new(3, 3);
        field.apply(|_, _, _| 5.0);

        warp(&mut mesh, &field).unwrap();

        assert_eq!(positions(&mesh).len(), 9);
        assert!(positions(&mesh).iter().all(|p| p[1] == 5.0));
        assert!(normals(&mesh).iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn horizontal_position_is_preserved() {
        let mut mesh = PlaneGrid::new(Vec2::splat(4.0), UVec2::splat(4)).into_mesh();
        let before: Vec<[f32; 3]> = positions(&mesh).to_vec();
        warp(&mut mesh, &HeightField::sine_test_pattern(5, 5).unwrap()).unwrap();

        for (old, new) in before.iter().zip(positions(&mesh)) {
            assert_eq!((old[0], old[2]), (new[0], new[2]));
        }
    }

    #[test]
    fn heights_follow_uv_lookup() {
        let field = HeightField::from_samples(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut mesh = PlaneGrid::new(Vec2::ONE, UVec2::ONE).into_mesh();
        warp(&mut mesh, &field).unwrap();

        // Vertices run -Z to +Z; field row 0 sits at +Z.
        let heights: Vec<f32> = positions(&mesh).iter().map(|p| p[1]).collect();
        assert_eq!(heights, vec![2.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn slope_tilts_normals_away_from_rise() {
        // Height rises along +X, so normals lean towards -X.
        let field = HeightField::from_samples(2, 1, vec![0.0, 1.0]).unwrap();
        let mut mesh = PlaneGrid::new(Vec2::ONE, UVec2::ONE).into_mesh();
        warp(&mut mesh, &field).unwrap();

        for normal in normals(&mesh) {
            assert!(normal[0] < 0.0 && normal[1] > 0.0);
            assert!((Vec3::from(*normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn mesh_without_uvs_is_rejected() {
        let mut mesh = PlaneGrid::new(Vec2::ONE, UVec2::ONE).into_mesh();
        mesh.remove_attribute(Mesh::ATTRIBUTE_UV_0);
        assert_eq!(warp(&mut mesh, &HeightField::new(2, 2)), Err(DeformError::MissingUvs));
    }

    #[test]
    fn unindexed_triangles_get_face_normals() {
        let normals = vertex_normals(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]], None);
        assert!(normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }
}
