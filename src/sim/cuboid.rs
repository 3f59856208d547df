//! Axis-aligned rectangular solids
//!
//! A `Cuboid` owns its six faces. Extents are fixed at construction; only
//! the center moves, and moving it shifts every owned face by the same
//! delta so the derived geometry can never drift apart.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::face::{Axis, Face};
use crate::tuning::ContactPolicy;

/// An axis-aligned box defined by center and extents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cuboid {
    center: DVec3,
    extents: DVec3,
    faces: [Face; 6],
}

impl Cuboid {
    /// Face storage order; also the deterministic tie-break when a ray
    /// grazes two faces at exactly the same time (corner hits).
    ///
    /// front/back hold z constant, left/right hold x, top/bottom hold y.
    pub fn new(center: DVec3, extents: DVec3) -> Self {
        assert!(
            extents.x > 0.0 && extents.y > 0.0 && extents.z > 0.0,
            "cuboid extents must be positive"
        );
        let half = extents / 2.0;
        let black = [0, 0, 0];
        let faces = [
            // front, back
            Face::centered(Axis::Z, center - DVec3::Z * half.z, extents.x, extents.y, black),
            Face::centered(Axis::Z, center + DVec3::Z * half.z, extents.x, extents.y, black),
            // left, right
            Face::centered(Axis::X, center - DVec3::X * half.x, extents.y, extents.z, black),
            Face::centered(Axis::X, center + DVec3::X * half.x, extents.y, extents.z, black),
            // top, bottom
            Face::centered(Axis::Y, center + DVec3::Y * half.y, extents.x, extents.z, black),
            Face::centered(Axis::Y, center - DVec3::Y * half.y, extents.x, extents.z, black),
        ];
        Self { center, extents, faces }
    }

    #[inline]
    pub fn center(&self) -> DVec3 {
        self.center
    }

    #[inline]
    pub fn extents(&self) -> DVec3 {
        self.extents
    }

    #[inline]
    pub fn faces(&self) -> &[Face; 6] {
        &self.faces
    }

    pub fn min_x(&self) -> f64 {
        self.center.x - self.extents.x / 2.0
    }

    pub fn max_x(&self) -> f64 {
        self.center.x + self.extents.x / 2.0
    }

    pub fn min_y(&self) -> f64 {
        self.center.y - self.extents.y / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.center.y + self.extents.y / 2.0
    }

    pub fn min_z(&self) -> f64 {
        self.center.z - self.extents.z / 2.0
    }

    pub fn max_z(&self) -> f64 {
        self.center.z + self.extents.z / 2.0
    }

    /// The eight corner points
    pub fn vertices(&self) -> [DVec3; 8] {
        let (x0, x1) = (self.min_x(), self.max_x());
        let (y0, y1) = (self.min_y(), self.max_y());
        let (z0, z1) = (self.min_z(), self.max_z());
        [
            DVec3::new(x0, y0, z0),
            DVec3::new(x0, y1, z0),
            DVec3::new(x1, y0, z0),
            DVec3::new(x1, y1, z0),
            DVec3::new(x0, y0, z1),
            DVec3::new(x0, y1, z1),
            DVec3::new(x1, y0, z1),
            DVec3::new(x1, y1, z1),
        ]
    }

    /// Nearest-face ray crossing: delegates to each face and keeps the
    /// soonest hit. Strict comparison, so on an exact tie the first face
    /// in storage order wins.
    pub fn intersection(
        &self,
        point: DVec3,
        velocity: DVec3,
        policy: ContactPolicy,
    ) -> Option<(f64, Axis)> {
        let mut best: Option<(f64, Axis)> = None;
        for face in &self.faces {
            if let Some(t) = face.intersection(point, velocity, policy) {
                if best.is_none_or(|(bt, _)| t < bt) {
                    best = Some((t, face.axis));
                }
            }
        }
        best
    }

    /// Move the center, shifting all owned faces atomically
    pub fn move_to(&mut self, center: DVec3) {
        let delta = center - self.center;
        self.center = center;
        for face in &mut self.faces {
            face.translate(delta);
        }
    }

    /// Color every face
    pub fn set_color(&mut self, color: [u8; 3]) {
        for face in &mut self.faces {
            face.color = color;
        }
    }

    /// Color the face nearest the viewer (the one players actually see)
    pub fn set_front_color(&mut self, color: [u8; 3]) {
        self.faces[0].color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: ContactPolicy = ContactPolicy::Exclusive;

    #[test]
    fn test_nearest_face_selection() {
        let cube = Cuboid::new(DVec3::ZERO, DVec3::splat(100.0));
        let (t, axis) = cube
            .intersection(DVec3::new(0.0, 0.0, -1000.0), DVec3::new(0.0, 0.0, 1.0), POLICY)
            .unwrap();
        // Front face sits at z = -50, so impact after 950 units of travel
        assert_eq!(t, 950.0);
        assert_eq!(axis, Axis::Z);
    }

    #[test]
    fn test_miss_from_offside() {
        let cube = Cuboid::new(DVec3::ZERO, DVec3::splat(100.0));
        assert!(cube
            .intersection(DVec3::new(200.0, 0.0, -1000.0), DVec3::new(0.0, 0.0, 1.0), POLICY)
            .is_none());
    }

    #[test]
    fn test_move_shifts_faces() {
        let mut cube = Cuboid::new(DVec3::ZERO, DVec3::new(10.0, 20.0, 30.0));
        cube.move_to(DVec3::new(5.0, -5.0, 100.0));
        assert_eq!(cube.center(), DVec3::new(5.0, -5.0, 100.0));
        assert_eq!(cube.extents(), DVec3::new(10.0, 20.0, 30.0));
        // Front face follows the center
        assert_eq!(cube.faces()[0].constant, 100.0 - 15.0);
        // And stays aligned with the corner vertices
        assert_eq!(cube.vertices()[0], DVec3::new(0.0, -15.0, 85.0));
    }

    #[test]
    fn test_corner_tie_break_is_first_listed() {
        let cube = Cuboid::new(DVec3::ZERO, DVec3::splat(100.0));
        // Diagonal ray aimed exactly at the front/right edge
        let p = DVec3::new(-150.0, 0.0, -150.0);
        let v = DVec3::new(1.0, 0.0, 1.0);
        let (t, axis) = cube.intersection(p, v, POLICY).unwrap();
        assert_eq!(t, 100.0);
        // Front (Z) is listed before left/right (X)
        assert_eq!(axis, Axis::Z);
    }

    #[test]
    #[should_panic]
    fn test_zero_extent_fails_fast() {
        Cuboid::new(DVec3::ZERO, DVec3::new(10.0, 0.0, 10.0));
    }
}
