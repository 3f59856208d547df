//! Policy parameters for the collision/trajectory engine
//!
//! The source prototypes disagreed on a handful of rounding and tie-break
//! details (settle epsilon, whether a touching contact counts, joint vs.
//! per-axis velocity capping). Those are knobs here rather than hardcoded
//! choices.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the paddle-plane velocity cap is applied after a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CapMode {
    /// Cap `hypot(v.x, v.y)`, preserving direction
    #[default]
    Joint,
    /// Clamp x and y independently
    PerAxis,
}

/// Whether a ray already touching a face counts as a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContactPolicy {
    /// Reject `t <= 0`: an exactly-touching contact does not register
    #[default]
    Exclusive,
    /// Reject only `t < 0`: an exactly-touching contact registers
    Inclusive,
}

impl ContactPolicy {
    #[inline]
    pub fn accepts(&self, t: f64) -> bool {
        match self {
            ContactPolicy::Exclusive => t > 0.0,
            ContactPolicy::Inclusive => t >= 0.0,
        }
    }
}

/// Engine policy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Maximum combined x/y speed for the ball (units/ms); z is never capped
    pub max_motion: f64,
    /// Velocity cap policy
    pub cap_mode: CapMode,
    /// Contact acceptance policy for already-touching rays
    pub contact_policy: ContactPolicy,
    /// Margin subtracted from a collision instant when settling movers (ms)
    pub settle_epsilon_ms: f64,
    /// Frame deltas above this are dropped rather than integrated (ms)
    pub stale_frame_ms: f64,
    /// Check-in cadence when no collision is on the horizon (ms)
    pub course_check_ms: f64,
    /// Maximum course changes resolved within one tick
    pub max_course_changes_per_tick: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_motion: MAX_MOTION,
            cap_mode: CapMode::default(),
            contact_policy: ContactPolicy::default(),
            settle_epsilon_ms: SETTLE_EPSILON_MS,
            stale_frame_ms: STALE_FRAME_MS,
            course_check_ms: COURSE_CHECK_MS,
            max_course_changes_per_tick: MAX_COURSE_CHANGES_PER_TICK,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Tuning::default();
        assert_eq!(t.cap_mode, CapMode::Joint);
        assert_eq!(t.contact_policy, ContactPolicy::Exclusive);
        assert!(t.settle_epsilon_ms > 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{"cap_mode":"PerAxis","max_motion":2.5}"#).unwrap();
        assert_eq!(t.cap_mode, CapMode::PerAxis);
        assert_eq!(t.max_motion, 2.5);
        assert_eq!(t.stale_frame_ms, crate::consts::STALE_FRAME_MS);
    }

    #[test]
    fn test_contact_policy() {
        assert!(!ContactPolicy::Exclusive.accepts(0.0));
        assert!(ContactPolicy::Inclusive.accepts(0.0));
        assert!(ContactPolicy::Exclusive.accepts(1e-9));
        assert!(!ContactPolicy::Inclusive.accepts(-1e-9));
    }
}
