//! Piecewise-linear trajectories and bounce resolution
//!
//! A mover's motion is a sequence of linear segments. Each segment knows
//! when it ends (the precomputed collision time) and what it ends on (the
//! simultaneous hit set), so advancing a mover is pure extrapolation until
//! the driver resolves the course change.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::collision::{Candidate, Hit, Target, predict};
use super::cuboid::Cuboid;
use super::face::Axis;
use crate::tuning::{CapMode, Tuning};

/// One linear leg of a trajectory
///
/// Position at any `t <= collision_time` is
/// `start_position + velocity * (t - start_time)`; past that the segment
/// clamps, because the geometry beyond the impact is not meaningful.
#[derive(Debug, Clone)]
pub struct Segment {
    pub velocity: DVec3,
    pub start_time: f64,
    pub start_position: DVec3,
    /// Absolute time this segment ends; `f64::INFINITY` when the course
    /// never meets an obstacle.
    pub collision_time: f64,
    /// Everything struck at `collision_time`
    pub hits: Vec<Hit>,
}

impl Segment {
    /// Clamped to the segment's lifetime: queries past `collision_time`
    /// settle on the impact point, and queries before `start_time` (two
    /// horizons landing within the settle margin of each other) stay at
    /// the origin instead of extrapolating backward.
    pub fn position_at(&self, t: f64) -> DVec3 {
        let t = t.clamp(self.start_time, self.collision_time);
        self.start_position + self.velocity * (t - self.start_time)
    }
}

/// Patrol limits for a mover's center. A mover with path bounds turns
/// around when its center reaches a bound, independent of any obstacle
/// geometry, so a patroller can hold a lane narrower than the walls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathBounds {
    pub min: DVec3,
    pub max: DVec3,
}

/// What role a trajectory-bearing body plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoverKind {
    /// The player's ball: velocity-capped, checked against the paddle
    Ball,
    /// A drifting obstacle: other movers bounce off it
    Patroller,
}

/// A trajectory-bearing body
#[derive(Debug, Clone)]
pub struct Mover {
    pub id: u32,
    pub kind: MoverKind,
    pub body: Cuboid,
    pub velocity: DVec3,
    /// Patrol limits, if this mover holds a lane
    pub path: Option<PathBounds>,
    /// Active leg, or `None` before the first course starts (and after a
    /// pause or stale frame discards planning)
    pub segment: Option<Segment>,
}

impl Mover {
    pub fn new(id: u32, kind: MoverKind, body: Cuboid, velocity: DVec3) -> Self {
        Self { id, kind, body, velocity, path: None, segment: None }
    }

    /// Whether other movers collide with this one
    pub fn is_collidable(&self) -> bool {
        self.kind == MoverKind::Patroller
    }

    /// Begin a new segment at `now` from the body's current position,
    /// predicting the next collision against `candidates`.
    ///
    /// Returns the relative time until that collision, or `None` when the
    /// course is open (the segment still starts, with an infinite horizon).
    pub fn start_course(&mut self, now: f64, candidates: &[Candidate], tuning: &Tuning) -> Option<f64> {
        if self.kind == MoverKind::Ball {
            self.velocity = cap_velocity(self.velocity, tuning);
        }

        let prediction = predict(
            &self.body.vertices(),
            self.velocity,
            candidates,
            tuning.contact_policy,
        );
        let mut delta = prediction.time;
        let mut hits = prediction.hits;

        // Patrol limits compete with the predicted geometry on the same
        // tie rules: a turnaround landing first replaces the hit set, an
        // exact tie joins it.
        if let Some(path) = self.path {
            let center = self.body.center();
            for (i, axis) in [Axis::X, Axis::Y, Axis::Z].into_iter().enumerate() {
                let v = self.velocity[i];
                if v == 0.0 {
                    continue;
                }
                let bound = if v > 0.0 { path.max[i] } else { path.min[i] };
                let t = (bound - center[i]) / v;
                if !tuning.contact_policy.accepts(t) {
                    continue;
                }
                match delta {
                    Some(d) if t > d => {}
                    Some(d) if t == d => hits.push(Hit { target: Target::PathBound, axis }),
                    _ => {
                        delta = Some(t);
                        hits.clear();
                        hits.push(Hit { target: Target::PathBound, axis });
                    }
                }
            }
        }

        self.segment = Some(Segment {
            velocity: self.velocity,
            start_time: now,
            start_position: self.body.center(),
            collision_time: now + delta.unwrap_or(f64::INFINITY),
            hits,
        });
        delta
    }

    /// Move the body to its segment position at `t` (clamped at the
    /// segment's collision time). A no-op without an active segment.
    pub fn settle(&mut self, t: f64) {
        if let Some(segment) = &self.segment {
            let position = segment.position_at(t);
            self.body.move_to(position);
        }
    }

    /// Drop the active segment so the next tick re-derives it
    pub fn clear_course(&mut self) {
        self.segment = None;
    }

    /// Absolute end time of the active segment
    pub fn collision_time(&self) -> f64 {
        self.segment
            .as_ref()
            .map_or(f64::INFINITY, |s| s.collision_time)
    }
}

/// Compute the post-bounce velocity for one simultaneous hit set.
///
/// Each struck axis is negated at most once, no matter how many of the
/// simultaneous hits share it; every struck target's velocity adjustment
/// is then added component-wise (paddle english rides in through the near
/// wall this way).
pub fn bounce_velocity(
    velocity: DVec3,
    hits: &[Hit],
    adjustment_of: impl Fn(Target) -> DVec3,
) -> DVec3 {
    let mut v = velocity;
    let mut reversed = [false; 3];
    for hit in hits {
        let i = match hit.axis {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        };
        if !reversed[i] {
            v[i] = -v[i];
            reversed[i] = true;
        }
        v += adjustment_of(hit.target);
    }
    v
}

/// Clamp the paddle-plane velocity components; z (depth) is never capped
pub fn cap_velocity(v: DVec3, tuning: &Tuning) -> DVec3 {
    let max = tuning.max_motion;
    match tuning.cap_mode {
        CapMode::Joint => {
            let planar = v.x.hypot(v.y);
            if planar > max {
                let scale = max / planar;
                DVec3::new(v.x * scale, v.y * scale, v.z)
            } else {
                v
            }
        }
        CapMode::PerAxis => DVec3::new(v.x.clamp(-max, max), v.y.clamp(-max, max), v.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{ShapeRef, Target};
    use crate::sim::face::Face;
    use proptest::prelude::*;

    fn no_adjustment(_: Target) -> DVec3 {
        DVec3::ZERO
    }

    fn ball_at_origin() -> Mover {
        Mover::new(
            0,
            MoverKind::Ball,
            Cuboid::new(DVec3::ZERO, DVec3::splat(10.0)),
            DVec3::ZERO,
        )
    }

    #[test]
    fn test_extrapolation_round_trip() {
        let segment = Segment {
            velocity: DVec3::new(0.25, -0.5, 1.0),
            start_time: 100.0,
            start_position: DVec3::new(1.0, 2.0, 3.0),
            collision_time: 1000.0,
            hits: Vec::new(),
        };
        for t in [100.0, 250.0, 999.0] {
            let expected = segment.start_position + segment.velocity * (t - 100.0);
            assert_eq!(segment.position_at(t), expected);
        }
    }

    #[test]
    fn test_position_clamps_past_collision_time() {
        let segment = Segment {
            velocity: DVec3::new(1.0, 0.0, 0.0),
            start_time: 0.0,
            start_position: DVec3::ZERO,
            collision_time: 50.0,
            hits: Vec::new(),
        };
        assert_eq!(segment.position_at(200.0), segment.position_at(50.0));
    }

    #[test]
    fn test_position_clamps_before_start_time() {
        // A settle target just before this segment's origin (two horizons
        // within the settle margin) must not extrapolate backward.
        let segment = Segment {
            velocity: DVec3::new(1.0, 0.0, 0.0),
            start_time: 100.0,
            start_position: DVec3::new(5.0, 0.0, 0.0),
            collision_time: 150.0,
            hits: Vec::new(),
        };
        assert_eq!(segment.position_at(99.5), segment.start_position);
    }

    #[test]
    fn test_path_bound_ends_an_open_course() {
        let body = Cuboid::new(DVec3::new(0.0, 0.0, 100.0), DVec3::splat(20.0));
        let mut mover = Mover::new(3, MoverKind::Patroller, body, DVec3::new(0.0, 0.5, 0.0));
        mover.path = Some(PathBounds {
            min: DVec3::new(0.0, -80.0, 100.0),
            max: DVec3::new(0.0, 80.0, 100.0),
        });
        // No obstacles at all: the turnaround alone ends the segment
        let delta = mover.start_course(0.0, &[], &Tuning::default());
        // Center reaches y = 80 after 160 ms at 0.5/ms
        assert_eq!(delta, Some(160.0));
        let segment = mover.segment.as_ref().unwrap();
        assert_eq!(segment.hits, vec![Hit { target: Target::PathBound, axis: Axis::Y }]);
    }

    #[test]
    fn test_nearer_obstacle_beats_path_bound() {
        let wall = Face::new(Axis::Y, 30.0, (-100.0, 100.0), (-100.0, 100.0), [0, 0, 0]);
        let candidates = [Candidate::fixed(Target::Obstacle(1), ShapeRef::Face(&wall))];
        let body = Cuboid::new(DVec3::new(0.0, 0.0, 0.0), DVec3::splat(20.0));
        let mut mover = Mover::new(3, MoverKind::Patroller, body, DVec3::new(0.0, 0.5, 0.0));
        mover.path = Some(PathBounds {
            min: DVec3::new(0.0, -80.0, 0.0),
            max: DVec3::new(0.0, 80.0, 0.0),
        });
        // Top vertices at y = 10 strike the wall after 40 ms, well before
        // the 160 ms turnaround
        let delta = mover.start_course(0.0, &candidates, &Tuning::default());
        assert_eq!(delta, Some(40.0));
        let segment = mover.segment.as_ref().unwrap();
        assert_eq!(segment.hits, vec![Hit { target: Target::Obstacle(1), axis: Axis::Y }]);
    }

    #[test]
    fn test_open_course_has_infinite_horizon() {
        let mut mover = ball_at_origin();
        mover.velocity = DVec3::new(0.0, 0.0, 1.0);
        let delta = mover.start_course(0.0, &[], &Tuning::default());
        assert!(delta.is_none());
        assert_eq!(mover.collision_time(), f64::INFINITY);
        // Linear motion still works indefinitely
        mover.settle(1e9);
        assert_eq!(mover.body.center(), DVec3::new(0.0, 0.0, 1e9));
    }

    #[test]
    fn test_start_course_stores_absolute_collision_time() {
        let wall = Face::new(
            crate::sim::face::Axis::Z,
            1000.0,
            (-500.0, 500.0),
            (-500.0, 500.0),
            [0, 0, 0],
        );
        let candidates = [Candidate::fixed(Target::Obstacle(1), ShapeRef::Face(&wall))];
        let mut mover = ball_at_origin();
        mover.velocity = DVec3::new(0.0, 0.0, 0.5);
        let delta = mover.start_course(200.0, &candidates, &Tuning::default());
        // Leading face at z = 5, so 995 units at 0.5/ms
        assert_eq!(delta, Some(1990.0));
        assert_eq!(mover.collision_time(), 2190.0);
    }

    #[test]
    fn test_axis_reversed_once_per_bounce_event() {
        // Double corner hit: two simultaneous targets on the same axis
        let hits = [
            Hit { target: Target::Obstacle(1), axis: Axis::X },
            Hit { target: Target::Obstacle(2), axis: Axis::X },
        ];
        let v = bounce_velocity(DVec3::new(2.0, 1.0, 1.0), &hits, no_adjustment);
        assert_eq!(v, DVec3::new(-2.0, 1.0, 1.0));
    }

    #[test]
    fn test_corner_bounce_reverses_both_axes_at_once() {
        let hits = [
            Hit { target: Target::Obstacle(1), axis: Axis::X },
            Hit { target: Target::Obstacle(2), axis: Axis::Y },
        ];
        let v = bounce_velocity(DVec3::new(1.0, 2.0, 3.0), &hits, no_adjustment);
        assert_eq!(v, DVec3::new(-1.0, -2.0, 3.0));
    }

    #[test]
    fn test_adjustment_added_per_struck_target() {
        let hits = [Hit { target: Target::Obstacle(9), axis: Axis::Z }];
        let v = bounce_velocity(DVec3::new(0.0, 0.0, -1.0), &hits, |t| {
            assert_eq!(t, Target::Obstacle(9));
            DVec3::new(0.3, -0.2, 0.0)
        });
        assert_eq!(v, DVec3::new(0.3, -0.2, 1.0));
    }

    #[test]
    fn test_per_axis_cap() {
        let tuning = Tuning { cap_mode: CapMode::PerAxis, max_motion: 1.0, ..Tuning::default() };
        let v = cap_velocity(DVec3::new(3.0, -0.5, 9.0), &tuning);
        assert_eq!(v, DVec3::new(1.0, -0.5, 9.0));
    }

    proptest! {
        #[test]
        fn prop_joint_cap_bounds_planar_speed(
            x in -10.0f64..10.0, y in -10.0f64..10.0, z in -10.0f64..10.0,
        ) {
            let tuning = Tuning::default();
            let capped = cap_velocity(DVec3::new(x, y, z), &tuning);
            prop_assert!(capped.x.hypot(capped.y) <= tuning.max_motion + 1e-9);
            // Depth axis is untouched
            prop_assert_eq!(capped.z, z);
            // Direction is preserved when the cap engages
            if x != 0.0 {
                prop_assert_eq!(capped.x.signum(), x.signum());
            }
        }
    }
}
