use cgmath::Vector3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Orientation of one block face.
///
/// `u` and `v` span the face with `u × v = normal`, so walking the corners in
/// [`CORNERS`] order is counter-clockwise seen from outside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceGeometry {
    pub normal: Vector3<i32>,
    pub u: Vector3<i32>,
    /// Points "up" on the texture.
    pub v: Vector3<i32>,
}

/// Corner signs along `(u, v)`: lower-left, lower-right, upper-right, upper-left.
pub const CORNERS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

impl FaceGeometry {
    pub fn of(side: BlockSide) -> Self {
        let (u, v) = match side {
            BlockSide::TOP => (Vector3::new(1, 0, 0), Vector3::new(0, 0, -1)),
            BlockSide::BOTTOM => (Vector3::new(1, 0, 0), Vector3::new(0, 0, 1)),
            BlockSide::RIGHT => (Vector3::new(0, 0, -1), Vector3::new(0, 1, 0)),
            BlockSide::LEFT => (Vector3::new(0, 0, 1), Vector3::new(0, 1, 0)),
            BlockSide::FRONT => (Vector3::new(1, 0, 0), Vector3::new(0, 1, 0)),
            BlockSide::BACK => (Vector3::new(-1, 0, 0), Vector3::new(0, 1, 0)),
        };

        FaceGeometry {
            normal: side.offset(),
            u,
            v,
        }
    }

    /// Offset of a corner from the block centre, in block units.
    pub fn corner_offset(&self, su: i32, sv: i32) -> Vector3<f32> {
        let doubled = self.normal + self.u * su + self.v * sv;
        Vector3::new(doubled.x as f32, doubled.y as f32, doubled.z as f32) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_right_handed_around_the_normal() {
        for side in BlockSide::all() {
            let geometry = FaceGeometry::of(side);
            assert_eq!(geometry.u.cross(geometry.v), geometry.normal, "{:?}", side);
        }
    }

    #[test]
    fn top_corners_sit_on_the_upper_plane() {
        let geometry = FaceGeometry::of(BlockSide::TOP);
        for (su, sv) in CORNERS {
            let offset = geometry.corner_offset(su, sv);
            assert_eq!(offset.y, 0.5);
            assert_eq!(offset.x.abs(), 0.5);
            assert_eq!(offset.z.abs(), 0.5);
        }
    }
}
