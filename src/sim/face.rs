//! Axis-aligned face geometry
//!
//! A `Face` is a rectangle lying in a plane of constant x, y, or z. All of
//! the ray math is written once in the face's internal frame - constant
//! axis first, then the two free axes "a" and "b" - and `Axis::orient` /
//! `Axis::rorient` permute between that frame and world coordinates.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::tuning::ContactPolicy;

/// Which world axis a face holds constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Map a vector from the face-internal (constant, a, b) order to world order
    #[inline]
    pub fn orient(self, v: DVec3) -> DVec3 {
        match self {
            Axis::X => v,
            Axis::Y => DVec3::new(v.y, v.x, v.z),
            Axis::Z => DVec3::new(v.y, v.z, v.x),
        }
    }

    /// Inverse of [`Axis::orient`]: world order to (constant, a, b) order
    #[inline]
    pub fn rorient(self, v: DVec3) -> DVec3 {
        match self {
            Axis::X => v,
            Axis::Y => DVec3::new(v.y, v.x, v.z),
            Axis::Z => DVec3::new(v.z, v.x, v.y),
        }
    }
}

/// An axis-aligned rectangle in a plane of constant x, y, or z
///
/// `visible` is a rendering property only; an invisible face still
/// participates in collision (the near-wall sentinel relies on this).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub axis: Axis,
    /// Position along the constant axis
    pub constant: f64,
    pub min_a: f64,
    pub max_a: f64,
    pub min_b: f64,
    pub max_b: f64,
    pub color: [u8; 3],
    pub visible: bool,
    /// Additive nudge imparted to whatever bounces off this face
    pub velocity_adjustment: DVec3,
}

impl Face {
    /// Build a face from explicit bounds along its two free axes.
    ///
    /// Panics if a min bound exceeds its max; malformed geometry is a
    /// construction bug, not a runtime condition.
    pub fn new(
        axis: Axis,
        constant: f64,
        (min_a, max_a): (f64, f64),
        (min_b, max_b): (f64, f64),
        color: [u8; 3],
    ) -> Self {
        assert!(min_a <= max_a, "face bounds: min_a {min_a} > max_a {max_a}");
        assert!(min_b <= max_b, "face bounds: min_b {min_b} > max_b {max_b}");
        Self {
            axis,
            constant,
            min_a,
            max_a,
            min_b,
            max_b,
            color,
            visible: true,
            velocity_adjustment: DVec3::ZERO,
        }
    }

    /// Build a face from a world-space center point and free-axis dimensions
    pub fn centered(axis: Axis, center: DVec3, dim_a: f64, dim_b: f64, color: [u8; 3]) -> Self {
        assert!(dim_a >= 0.0 && dim_b >= 0.0, "face dimensions must be non-negative");
        let c = axis.rorient(center);
        Self::new(
            axis,
            c.x,
            (c.y - dim_a / 2.0, c.y + dim_a / 2.0),
            (c.z - dim_b / 2.0, c.z + dim_b / 2.0),
            color,
        )
    }

    /// Corner points in world coordinates, wound for two CCW triangles
    pub fn vertices(&self) -> [DVec3; 4] {
        [
            self.axis.orient(DVec3::new(self.constant, self.min_a, self.min_b)),
            self.axis.orient(DVec3::new(self.constant, self.max_a, self.min_b)),
            self.axis.orient(DVec3::new(self.constant, self.max_a, self.max_b)),
            self.axis.orient(DVec3::new(self.constant, self.min_a, self.max_b)),
        ]
    }

    /// Shift the face by a world-space delta
    pub fn translate(&mut self, delta: DVec3) {
        let d = self.axis.rorient(delta);
        self.constant += d.x;
        self.min_a += d.y;
        self.max_a += d.y;
        self.min_b += d.z;
        self.max_b += d.z;
    }

    /// Time until a point moving at `velocity` crosses this face.
    ///
    /// Returns `None` for parallel motion (zero velocity along the constant
    /// axis), contacts behind the point, and crossings that land outside
    /// the inclusive a/b bounds. Grazing exactly on a bound counts as a hit.
    pub fn intersection(&self, point: DVec3, velocity: DVec3, policy: ContactPolicy) -> Option<f64> {
        let p = self.axis.rorient(point);
        let v = self.axis.rorient(velocity);
        if v.x == 0.0 {
            return None;
        }

        let t = (self.constant - p.x) / v.x;
        if !policy.accepts(t) {
            return None;
        }

        let a = p.y + v.y * t;
        let b = p.z + v.z * t;
        if self.min_a <= a && a <= self.max_a && self.min_b <= b && b <= self.max_b {
            Some(t)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POLICY: ContactPolicy = ContactPolicy::Exclusive;

    fn z_face() -> Face {
        // 200x200 face in the z = 1000 plane, centered on the z axis
        Face::new(Axis::Z, 1000.0, (-100.0, 100.0), (-100.0, 100.0), [255, 0, 0])
    }

    #[test]
    fn test_head_on_hit_time() {
        let face = z_face();
        let t = face
            .intersection(DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0), POLICY)
            .unwrap();
        assert_eq!(t, 500.0); // distance 1000 at speed 2
    }

    #[test]
    fn test_moving_away_misses() {
        let face = z_face();
        assert!(face
            .intersection(DVec3::ZERO, DVec3::new(0.0, 0.0, -2.0), POLICY)
            .is_none());
    }

    #[test]
    fn test_parallel_motion_never_registers() {
        let face = z_face();
        // Sliding along the plane itself still misses
        let on_plane = DVec3::new(0.0, 0.0, 1000.0);
        assert!(face
            .intersection(on_plane, DVec3::new(1.0, 0.0, 0.0), POLICY)
            .is_none());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let face = z_face();
        // Lands exactly on the (max_a, max_b) corner
        let p = DVec3::new(100.0, 100.0, 0.0);
        let t = face
            .intersection(p, DVec3::new(0.0, 0.0, 1.0), POLICY)
            .unwrap();
        assert_eq!(t, 1000.0);

        // One unit past the corner misses
        let p = DVec3::new(101.0, 100.0, 0.0);
        assert!(face.intersection(p, DVec3::new(0.0, 0.0, 1.0), POLICY).is_none());
    }

    #[test]
    fn test_touching_contact_policy() {
        let face = z_face();
        let touching = DVec3::new(0.0, 0.0, 1000.0);
        let v = DVec3::new(0.0, 0.0, 1.0);
        assert!(face.intersection(touching, v, ContactPolicy::Exclusive).is_none());
        assert_eq!(face.intersection(touching, v, ContactPolicy::Inclusive), Some(0.0));
    }

    #[test]
    fn test_invisible_face_still_collides() {
        let mut face = z_face();
        face.visible = false;
        assert!(face
            .intersection(DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0), POLICY)
            .is_some());
    }

    #[test]
    fn test_translate_moves_bounds() {
        let mut face = Face::new(Axis::X, 5.0, (0.0, 10.0), (0.0, 10.0), [0, 0, 0]);
        face.translate(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(face.constant, 6.0);
        assert_eq!((face.min_a, face.max_a), (2.0, 12.0)); // a spans y for X faces
        assert_eq!((face.min_b, face.max_b), (3.0, 13.0)); // b spans z
    }

    #[test]
    #[should_panic]
    fn test_malformed_bounds_fail_fast() {
        Face::new(Axis::Y, 0.0, (1.0, -1.0), (0.0, 1.0), [0, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_orient_rorient_roundtrip(
            x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e6f64..1e6,
            axis in prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)],
        ) {
            let v = DVec3::new(x, y, z);
            prop_assert_eq!(axis.orient(axis.rorient(v)), v);
            prop_assert_eq!(axis.rorient(axis.orient(v)), v);
        }
    }
}
