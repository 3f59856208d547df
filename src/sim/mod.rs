//! Deterministic collision and trajectory simulation
//!
//! Everything here works in `f64` milliseconds and world units: the same
//! sequence of tick timestamps produces the same sequence of bounces,
//! independent of frame rate. Geometry is axis-aligned throughout, which
//! is what lets collision prediction stay exact ray-plane arithmetic
//! instead of iterative overlap resolution.
//!
//! Layering, bottom up:
//! - [`face`]: single axis-aligned rectangles and ray crossings
//! - [`cuboid`]: six-faced solids built from faces
//! - [`collision`]: soonest-hit prediction over many bodies
//! - [`trajectory`]: piecewise-linear segments and bounce velocities
//! - [`state`]: the scene (obstacles, movers, paddle, rules bookkeeping)
//! - [`tick`]: the shared-clock driver that advances a scene

pub mod collision;
pub mod cuboid;
pub mod face;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use collision::{Candidate, Hit, Prediction, ShapeRef, Target, predict};
pub use cuboid::Cuboid;
pub use face::{Axis, Face};
pub use state::{Obstacle, ObstacleKind, Paddle, Scene, Shape};
pub use tick::{CollisionEvent, Outcome, TickReport, tick};
pub use trajectory::{Mover, MoverKind, PathBounds, Segment, bounce_velocity, cap_velocity};
