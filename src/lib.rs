//! Tunnel Break - a 3D breakout core for a straight rectangular tunnel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collision prediction, trajectories, scene driver)
//! - `render`: Drawable contract handed to an external renderer (triangle soup + flat colors)
//! - `level`: Data-driven level tables (bounds, bricks, patrollers)
//! - `tuning`: Policy parameters for the collision/trajectory engine
//! - `session`: One play session wired to a completion callback
//!
//! The renderer, camera math, and input mapping are collaborators, not part
//! of this crate: the scene produces a vertex mesh per tick and reads the
//! paddle position something else has set.

pub mod level;
pub mod render;
pub mod session;
pub mod sim;
pub mod tuning;

pub use level::Level;
pub use session::Session;
pub use tuning::{CapMode, ContactPolicy, Tuning};

/// Engine defaults
pub mod consts {
    /// Default joint cap on the paddle-plane velocity components (units/ms)
    pub const MAX_MOTION: f64 = 1.0;
    /// Default settle margin before a collision instant (ms)
    pub const SETTLE_EPSILON_MS: f64 = 1.0;
    /// Frames with a larger delta than this are dropped, not integrated (ms)
    pub const STALE_FRAME_MS: f64 = 200.0;
    /// How far ahead the driver assumes a course change when none is predicted (ms)
    pub const COURSE_CHECK_MS: f64 = 1000.0;
    /// Bounce-cascade budget for a single tick
    pub const MAX_COURSE_CHANGES_PER_TICK: u32 = 64;
}
