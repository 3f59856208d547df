//! Scene state for one play session
//!
//! Obstacles live in a stable-id collection with deferred removal: a brick
//! destroyed mid-tick is only marked dead, and the storage is compacted
//! after the course loop, so nothing is spliced out from under an
//! in-flight iteration.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::collision::{Candidate, ShapeRef, Target};
use super::cuboid::Cuboid;
use super::face::{Axis, Face};
use super::trajectory::{Mover, MoverKind};
use crate::level::Level;
use crate::tuning::Tuning;

/// What an obstacle means to the game rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Plain boundary: bounce and nothing else
    Wall,
    /// Invisible sentinel at the viewer end; a ball bounce here runs the
    /// paddle containment check
    NearWall,
    /// Destructible; clearing all of them wins the session
    Brick,
}

/// Collidable geometry, as a closed set of variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Face(Face),
    Cuboid(Cuboid),
}

impl Shape {
    pub fn as_ref(&self) -> ShapeRef<'_> {
        match self {
            Shape::Face(face) => ShapeRef::Face(face),
            Shape::Cuboid(cuboid) => ShapeRef::Cuboid(cuboid),
        }
    }

    fn velocity_adjustment(&self) -> DVec3 {
        match self {
            Shape::Face(face) => face.velocity_adjustment,
            Shape::Cuboid(_) => DVec3::ZERO,
        }
    }
}

/// A static (or at most repositioned) collidable in the scene
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub shape: Shape,
    /// Cleared when destroyed; compacted out after the tick
    pub alive: bool,
}

/// The player's paddle: a framed rectangle at the near end of the tunnel.
///
/// Not a ray-collidable - the ball is tested against the near-wall
/// sentinel, and the paddle only answers containment queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    /// Frame bar thickness (rendering only)
    pub thickness: f64,
    pub color: [u8; 3],
}

impl Paddle {
    /// Bounding-rectangle test in the paddle's plane
    pub fn contains(&self, point: DVec3) -> bool {
        point.x >= self.x - self.width / 2.0
            && point.x <= self.x + self.width / 2.0
            && point.y >= self.y - self.height / 2.0
            && point.y <= self.y + self.height / 2.0
    }
}

/// Full state of one play session
#[derive(Debug)]
pub struct Scene {
    pub tuning: Tuning,
    pub(crate) obstacles: Vec<Obstacle>,
    /// Ball first, then patrollers; stable order for determinism
    pub(crate) movers: Vec<Mover>,
    pub(crate) paddle: Paddle,
    pub(crate) bricks_remaining: u32,
    pub(crate) alive: bool,
    pub(crate) paused: bool,
    pub(crate) ball_id: u32,
    pub(crate) near_wall_id: u32,
    // Shared-clock bookkeeping (driven by `tick`)
    pub(crate) last_time: Option<f64>,
    pub(crate) last_course_change: Option<f64>,
    pub(crate) next_course_change: Option<f64>,
    pub(crate) course_changers: Vec<u32>,
    pub(crate) last_paddle_position: Option<(f64, f64)>,
    next_id: u32,
}

impl Scene {
    /// Build a scene from level data: boundary walls around the play
    /// volume, the invisible near-wall sentinel, bricks, the ball, and
    /// any patrollers.
    pub fn new(level: &Level, tuning: Tuning) -> Self {
        let mut scene = Self {
            tuning,
            obstacles: Vec::new(),
            movers: Vec::new(),
            paddle: Paddle {
                x: 0.0,
                y: 0.0,
                z: level.bounds.z_min,
                width: level.paddle.width,
                height: level.paddle.height,
                thickness: level.paddle.thickness,
                color: level.paddle.color,
            },
            bricks_remaining: 0,
            alive: true,
            paused: true,
            ball_id: 0,
            near_wall_id: 0,
            last_time: None,
            last_course_change: None,
            next_course_change: None,
            course_changers: Vec::new(),
            last_paddle_position: None,
            next_id: 1,
        };

        let b = &level.bounds;
        let wall_color = level.wall_color;
        let walls = [
            Face::new(Axis::X, -b.x_max, (-b.y_max, b.y_max), (b.z_min, b.z_max), wall_color),
            Face::new(Axis::X, b.x_max, (-b.y_max, b.y_max), (b.z_min, b.z_max), wall_color),
            Face::new(Axis::Y, -b.y_max, (-b.x_max, b.x_max), (b.z_min, b.z_max), wall_color),
            Face::new(Axis::Y, b.y_max, (-b.x_max, b.x_max), (b.z_min, b.z_max), wall_color),
            // Far wall
            Face::new(Axis::Z, b.z_max, (-b.x_max, b.x_max), (-b.y_max, b.y_max), wall_color),
        ];
        for wall in walls {
            scene.add_obstacle(ObstacleKind::Wall, Shape::Face(wall));
        }

        let mut near_wall =
            Face::new(Axis::Z, b.z_min, (-b.x_max, b.x_max), (-b.y_max, b.y_max), [0, 0, 0]);
        near_wall.visible = false;
        scene.near_wall_id = scene.add_obstacle(ObstacleKind::NearWall, Shape::Face(near_wall));

        for brick in &level.bricks {
            let mut cuboid = Cuboid::new(brick.center, brick.extents);
            cuboid.set_front_color(brick.color);
            scene.add_obstacle(ObstacleKind::Brick, Shape::Cuboid(cuboid));
            scene.bricks_remaining += 1;
        }

        let ball_body = Cuboid::new(level.ball.center, level.ball.extents);
        scene.ball_id = scene.add_mover(MoverKind::Ball, ball_body, level.initial_velocity);

        for patroller in &level.patrollers {
            let mut body = Cuboid::new(patroller.center, patroller.extents);
            body.set_front_color(patroller.color);
            scene.add_mover(MoverKind::Patroller, body, patroller.velocity);
            if let Some(mover) = scene.movers.last_mut() {
                mover.path = patroller.path;
            }
        }

        scene
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn add_obstacle(&mut self, kind: ObstacleKind, shape: Shape) -> u32 {
        let id = self.alloc_id();
        self.obstacles.push(Obstacle { id, kind, shape, alive: true });
        id
    }

    pub(crate) fn add_mover(&mut self, kind: MoverKind, body: Cuboid, velocity: DVec3) -> u32 {
        let id = self.alloc_id();
        self.movers.push(Mover::new(id, kind, body, velocity));
        id
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume. Pausing discards horizon state so resuming derives
    /// a fresh trajectory instead of integrating across the gap.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn bricks_remaining(&self) -> u32 {
        self.bricks_remaining
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    /// Move the paddle; the pointer-to-world mapping is the caller's job
    pub fn set_paddle_position(&mut self, x: f64, y: f64) {
        self.paddle.x = x;
        self.paddle.y = y;
    }

    pub fn ball(&self) -> &Mover {
        self.mover(self.ball_id).expect("scene always owns its ball")
    }

    pub fn movers(&self) -> &[Mover] {
        &self.movers
    }

    /// Live obstacles, in stable id order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.alive)
    }

    pub(crate) fn mover(&self, id: u32) -> Option<&Mover> {
        self.movers.iter().find(|m| m.id == id)
    }

    pub(crate) fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id && o.alive)
    }

    pub(crate) fn velocity_adjustment_of(&self, target: Target) -> DVec3 {
        match target {
            Target::Obstacle(id) => self
                .obstacle(id)
                .map_or(DVec3::ZERO, |o| o.shape.velocity_adjustment()),
            Target::Mover(_) | Target::PathBound => DVec3::ZERO,
        }
    }

    /// Mark a brick (or any obstacle) destroyed; storage compacts later
    pub(crate) fn mark_destroyed(&mut self, id: u32) -> bool {
        match self.obstacles.iter_mut().find(|o| o.id == id && o.alive) {
            Some(obstacle) => {
                obstacle.alive = false;
                true
            }
            None => false,
        }
    }

    /// Drop obstacles marked dead during the tick
    pub(crate) fn compact_obstacles(&mut self) {
        self.obstacles.retain(|o| o.alive);
    }

    pub(crate) fn set_near_wall_adjustment(&mut self, adjustment: DVec3) {
        let near_wall_id = self.near_wall_id;
        if let Some(obstacle) = self
            .obstacles
            .iter_mut()
            .find(|o| o.id == near_wall_id)
            && let Shape::Face(face) = &mut obstacle.shape
        {
            face.velocity_adjustment = adjustment;
        }
    }

    /// Snapshot of collidable movers (id, body, velocity) for candidate
    /// building while movers are being mutated.
    pub(crate) fn collidable_mover_snapshot(&self) -> Vec<(u32, Cuboid, DVec3)> {
        self.movers
            .iter()
            .filter(|m| m.is_collidable())
            .map(|m| (m.id, m.body.clone(), m.velocity))
            .collect()
    }
}

/// Candidate set for one mover: live obstacles plus every *other*
/// collidable mover, carrying its velocity for relative-motion tests.
///
/// A free function over the obstacle storage so the driver can plan one
/// mover's course while holding the mover list mutably.
pub(crate) fn candidates<'a>(
    obstacles: &'a [Obstacle],
    mover_snapshot: &'a [(u32, Cuboid, DVec3)],
    mover_id: u32,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = obstacles
        .iter()
        .filter(|o| o.alive)
        .map(|o| Candidate::fixed(Target::Obstacle(o.id), o.shape.as_ref()))
        .collect();
    for (id, body, velocity) in mover_snapshot {
        if *id != mover_id {
            candidates.push(Candidate {
                target: Target::Mover(*id),
                shape: ShapeRef::Cuboid(body),
                velocity: *velocity,
            });
        }
    }
    candidates
}
