//! Level definitions
//!
//! Levels are plain data (serde-friendly, so custom layouts can come from
//! JSON) plus the two built-in layouts.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::sim::PathBounds;

/// Play volume limits. The tunnel is symmetric in x and y around the
/// origin and runs from `z_min` (the viewer / paddle end) to `z_max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub x_max: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

/// One destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickSpec {
    pub center: DVec3,
    pub extents: DVec3,
    pub color: [u8; 3],
}

/// One drifting obstacle, with its patrol velocity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrollerSpec {
    pub center: DVec3,
    pub extents: DVec3,
    pub velocity: DVec3,
    pub color: [u8; 3],
    /// Patrol limits for the center; without them the patroller ranges
    /// the whole play volume and turns on the walls
    #[serde(default)]
    pub path: Option<PathBounds>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSpec {
    pub center: DVec3,
    pub extents: DVec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddleSpec {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub color: [u8; 3],
}

/// Everything needed to build a fresh scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub bounds: Bounds,
    pub wall_color: [u8; 3],
    pub bricks: Vec<BrickSpec>,
    #[serde(default)]
    pub patrollers: Vec<PatrollerSpec>,
    pub ball: BallSpec,
    pub initial_velocity: DVec3,
    pub paddle: PaddleSpec,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn standard_bounds() -> Bounds {
    Bounds { x_max: 300.0, y_max: 300.0, z_min: 1000.0, z_max: 5000.0 }
}

fn standard_ball() -> BallSpec {
    BallSpec { center: DVec3::new(0.0, 0.0, 1500.0), extents: DVec3::splat(50.0) }
}

fn standard_paddle() -> PaddleSpec {
    PaddleSpec { width: 150.0, height: 150.0, thickness: 10.0, color: [200, 200, 255] }
}

/// 3x3 grid of brick centers in the paddle plane at depth `z`
fn brick_grid(z: f64, spacing: f64) -> impl Iterator<Item = DVec3> {
    (0..3).flat_map(move |row| {
        (0..3).map(move |col| {
            DVec3::new(
                spacing * (col as f64 - 1.0),
                spacing * (row as f64 - 1.0),
                z,
            )
        })
    })
}

/// Single 3x3 wall of bricks deep in the tunnel
pub fn level_one() -> Level {
    Level {
        name: "first contact".into(),
        bounds: standard_bounds(),
        wall_color: [80, 80, 110],
        bricks: brick_grid(3000.0, 180.0)
            .map(|center| BrickSpec {
                center,
                extents: DVec3::splat(150.0),
                color: [122, 255, 255],
            })
            .collect(),
        patrollers: Vec::new(),
        ball: standard_ball(),
        initial_velocity: DVec3::new(0.15, 0.2, 1.2),
        paddle: standard_paddle(),
    }
}

/// Two brick layers at different depths, guarded by a patroller
pub fn level_two() -> Level {
    let mut bricks: Vec<BrickSpec> = brick_grid(3000.0, 180.0)
        .map(|center| BrickSpec {
            center,
            extents: DVec3::splat(100.0),
            color: [122, 255, 122],
        })
        .collect();
    bricks.extend(brick_grid(3200.0, 180.0).map(|center| BrickSpec {
        center,
        extents: DVec3::splat(150.0),
        color: [122, 255, 255],
    }));
    Level {
        name: "double depth".into(),
        bounds: standard_bounds(),
        wall_color: [80, 80, 110],
        bricks,
        patrollers: vec![PatrollerSpec {
            center: DVec3::new(150.0, 0.0, 2400.0),
            extents: DVec3::new(80.0, 200.0, 200.0),
            velocity: DVec3::new(0.0, 0.15, 0.0),
            color: [255, 100, 100],
            path: Some(PathBounds {
                min: DVec3::new(150.0, -150.0, 2400.0),
                max: DVec3::new(150.0, 150.0, 2400.0),
            }),
        }],
        ball: standard_ball(),
        initial_velocity: DVec3::new(0.15, 0.2, 1.2),
        paddle: standard_paddle(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_levels_are_well_formed() {
        for level in [level_one(), level_two()] {
            assert!(!level.bricks.is_empty());
            assert!(level.bounds.z_max > level.bounds.z_min);
            for brick in &level.bricks {
                // Bricks fit inside the play volume
                assert!(brick.center.x.abs() + brick.extents.x / 2.0 <= level.bounds.x_max);
                assert!(brick.center.y.abs() + brick.extents.y / 2.0 <= level.bounds.y_max);
                assert!(brick.center.z - brick.extents.z / 2.0 >= level.bounds.z_min);
                assert!(brick.center.z + brick.extents.z / 2.0 <= level.bounds.z_max);
            }
            // The ball starts well clear of the bricks
            assert!(level.ball.center.z < level.bricks[0].center.z - 500.0);
        }
    }

    #[test]
    fn test_level_json_round_trip() {
        let level = level_two();
        let json = serde_json::to_string(&level).unwrap();
        let parsed = Level::from_json(&json).unwrap();
        assert_eq!(parsed.name, level.name);
        assert_eq!(parsed.bricks.len(), level.bricks.len());
        assert_eq!(parsed.patrollers.len(), 1);
        assert_eq!(parsed.patrollers[0].path, level.patrollers[0].path);
        assert_eq!(parsed.initial_velocity, level.initial_velocity);
    }

    #[test]
    fn test_missing_patrollers_defaults_empty() {
        let mut value = serde_json::to_value(level_one()).unwrap();
        value.as_object_mut().unwrap().remove("patrollers");
        let parsed: Level = serde_json::from_value(value).unwrap();
        assert!(parsed.patrollers.is_empty());
    }
}
