use cgmath::{Point3, Vector3};

use super::{PLAYER_EYE_HEIGHT, PLAYER_HALF_WIDTH, PLAYER_HEAD_ROOM};

/// An axis-aligned box given by its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// The unit cube of the block centred on `position`.
    pub fn block(position: Point3<i32>) -> Self {
        let center = Point3::new(position.x as f32, position.y as f32, position.z as f32);
        let half = Vector3::new(0.5, 0.5, 0.5);
        Aabb::new(center - half, center + half)
    }

    /// The player's body for an eye at `eye`.
    pub fn player(eye: Point3<f32>) -> Self {
        Aabb::new(
            eye - Vector3::new(PLAYER_HALF_WIDTH, PLAYER_EYE_HEIGHT, PLAYER_HALF_WIDTH),
            eye + Vector3::new(PLAYER_HALF_WIDTH, PLAYER_HEAD_ROOM, PLAYER_HALF_WIDTH),
        )
    }

    /// Whether the two boxes overlap with positive volume. Touching faces do
    /// not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn translated(&self, delta: Vector3<f32>) -> Self {
        Aabb::new(self.min + delta, self.max + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_boxes_are_centred_on_integers() {
        let block = Aabb::block(Point3::new(2, -1, 0));
        assert_eq!(block.min, Point3::new(1.5, -1.5, -0.5));
        assert_eq!(block.max, Point3::new(2.5, -0.5, 0.5));
    }

    #[test]
    fn player_box_hangs_below_the_eye() {
        let player = Aabb::player(Point3::new(0.0, 10.0, 0.0));
        assert_eq!(player.min, Point3::new(-0.45, 8.5, -0.45));
        assert_eq!(player.max, Point3::new(0.45, 10.25, 0.45));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let floor = Aabb::block(Point3::new(0, 0, 0));
        let standing = Aabb::player(Point3::new(0.0, 2.0, 0.0));
        assert!(!floor.intersects(&standing));
        assert!(floor.intersects(&standing.translated(Vector3::new(0.0, -0.1, 0.0))));
    }
}
