//! Collision prediction across many vertices and many obstacles
//!
//! Given a moving body's corner vertices and velocity, find the soonest
//! crossing over every vertex/obstacle pair - and the complete set of
//! obstacles struck at exactly that instant, so a corner hit can reverse
//! two axes in a single resolution step.

use glam::DVec3;

use super::cuboid::Cuboid;
use super::face::{Axis, Face};
use crate::tuning::ContactPolicy;

/// What a predicted hit lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A static obstacle, by stable id
    Obstacle(u32),
    /// Another mover, by stable id
    Mover(u32),
    /// A patrol turnaround limit, not scene geometry
    PathBound,
}

/// One face crossing in a simultaneous-collision set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: Target,
    /// The struck face's constant axis - the velocity component to reverse
    pub axis: Axis,
}

/// Result of a prediction pass
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Time until the earliest crossing; `None` means the body never
    /// collides on its current course.
    pub time: Option<f64>,
    /// Every target struck at exactly that time
    pub hits: Vec<Hit>,
}

/// Borrowed view of a collidable shape
#[derive(Debug, Clone, Copy)]
pub enum ShapeRef<'a> {
    Face(&'a Face),
    Cuboid(&'a Cuboid),
}

impl ShapeRef<'_> {
    fn intersection(&self, point: DVec3, velocity: DVec3, policy: ContactPolicy) -> Option<(f64, Axis)> {
        match self {
            ShapeRef::Face(face) => face
                .intersection(point, velocity, policy)
                .map(|t| (t, face.axis)),
            ShapeRef::Cuboid(cuboid) => cuboid.intersection(point, velocity, policy),
        }
    }
}

/// One obstacle under consideration, with its own velocity if it moves
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub target: Target,
    pub shape: ShapeRef<'a>,
    pub velocity: DVec3,
}

impl<'a> Candidate<'a> {
    pub fn fixed(target: Target, shape: ShapeRef<'a>) -> Self {
        Self { target, shape, velocity: DVec3::ZERO }
    }
}

/// Predict the soonest collision for a body whose corners are `vertices`,
/// moving at `velocity`, against `candidates`.
///
/// Moving candidates are tested in their comoving frame: the query velocity
/// becomes `velocity - candidate.velocity`, which is what makes bounce
/// timing against a drifting obstacle come out right.
///
/// Ties are exact: a candidate joins the simultaneous set only when its
/// own soonest time equals the global soonest bit-for-bit.
pub fn predict(
    vertices: &[DVec3],
    velocity: DVec3,
    candidates: &[Candidate],
    policy: ContactPolicy,
) -> Prediction {
    let mut soonest: Option<f64> = None;
    let mut hits: Vec<Hit> = Vec::new();

    for candidate in candidates {
        let relative = velocity - candidate.velocity;

        let mut best: Option<(f64, Axis)> = None;
        for &vertex in vertices {
            if let Some((t, axis)) = candidate.shape.intersection(vertex, relative, policy) {
                if best.is_none_or(|(bt, _)| t < bt) {
                    best = Some((t, axis));
                }
            }
        }

        let Some((t, axis)) = best else { continue };
        match soonest {
            Some(s) if t > s => {}
            Some(s) if t == s => hits.push(Hit { target: candidate.target, axis }),
            _ => {
                soonest = Some(t);
                hits.clear();
                hits.push(Hit { target: candidate.target, axis });
            }
        }
    }

    Prediction { time: soonest, hits }
}
