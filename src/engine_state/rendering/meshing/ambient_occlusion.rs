//! Per-vertex ambient occlusion.
//!
//! Each face corner looks at the three cells that touch it from the face's
//! open side: two edge neighbours and the diagonal. The more of them are
//! solid, the darker the corner.

use cgmath::Vector3;

use super::face::FaceGeometry;
use super::neighborhood::Neighborhood;

/// Brightness by occlusion level 0..=3.
pub const AO_TABLE: [f32; 4] = [1.0, 0.8, 0.6, 0.45];

/// Occlusion level of a corner. Two solid edge neighbours fully close the
/// corner regardless of the diagonal.
pub fn occlusion_level(side1: bool, side2: bool, corner: bool) -> usize {
    if side1 && side2 {
        3
    } else {
        side1 as usize + side2 as usize + corner as usize
    }
}

/// The two edge cells and the diagonal cell touching corner `(su, sv)` of a
/// face whose open cell is `face_cell`.
pub fn corner_cells(face_cell: Vector3<i32>, geometry: &FaceGeometry, su: i32, sv: i32) -> [Vector3<i32>; 3] {
    let side1 = face_cell + geometry.u * su;
    let side2 = face_cell + geometry.v * sv;
    [side1, side2, side1 + geometry.v * sv]
}

/// Occlusion level of one face corner.
pub fn corner_occlusion(
    neighborhood: &Neighborhood,
    face_cell: Vector3<i32>,
    geometry: &FaceGeometry,
    su: i32,
    sv: i32,
) -> usize {
    let [side1, side2, corner] = corner_cells(face_cell, geometry, su, sv);
    occlusion_level(
        neighborhood.is_solid(side1),
        neighborhood.is_solid(side2),
        neighborhood.is_solid(corner),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sides_close_the_corner() {
        assert_eq!(occlusion_level(true, true, false), 3);
        assert_eq!(occlusion_level(true, false, true), 2);
        assert_eq!(occlusion_level(false, false, true), 1);
        assert_eq!(occlusion_level(false, false, false), 0);
    }

    #[test]
    fn diagonal_is_the_sum_of_both_edges() {
        let geometry = FaceGeometry::of(crate::engine_state::voxels::block::block_side::BlockSide::TOP);
        let [side1, side2, corner] = corner_cells(Vector3::new(4, 5, 4), &geometry, 1, 1);
        assert_eq!(side1, Vector3::new(5, 5, 4));
        assert_eq!(side2, Vector3::new(4, 5, 3));
        assert_eq!(corner, Vector3::new(5, 5, 3));
    }
}
