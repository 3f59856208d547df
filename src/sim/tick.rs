//! Shared-clock simulation driver
//!
//! All movers share one `next_course_change` horizon: the soonest moment
//! any of them must bounce. Each tick settles everyone at that horizon,
//! resolves the due course changes, re-plans every course (the world just
//! changed), and repeats until the horizon is in the future - then
//! extrapolates all movers to the current time.
//!
//! Collision side-effects are not callbacks: the tick returns the events
//! and applies the game rules (brick removal, win/loss) itself, so the
//! physics stays decoupled from rule bookkeeping.

use glam::DVec3;

use super::collision::Target;
use super::face::Axis;
use super::state::{ObstacleKind, Scene};
use super::trajectory::{MoverKind, bounce_velocity};

/// One face crossing resolved during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub mover: u32,
    pub target: Target,
    pub axis: Axis,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every brick cleared
    Victory,
    /// Ball crossed the near wall outside the paddle
    Defeat,
}

/// Everything that happened in one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<CollisionEvent>,
    /// Set on the tick the session ends; the scene ignores further ticks
    pub outcome: Option<Outcome>,
}

/// Advance the scene to `now` (milliseconds, monotonic).
///
/// Paused scenes and stale frames (delta over `Tuning::stale_frame_ms`,
/// including the very first frame) discard trajectory planning instead of
/// integrating the jump, so a backgrounded session resumes in place.
pub fn tick(scene: &mut Scene, now: f64) -> TickReport {
    let mut report = TickReport::default();
    if !scene.alive {
        return report;
    }

    let dt = scene.last_time.map(|last| now - last);
    let stale = dt.is_none_or(|d| d > scene.tuning.stale_frame_ms);

    if scene.paused || stale {
        if let Some(d) = dt
            && stale
            && !scene.paused
        {
            log::warn!("dropping stale frame (dt = {d:.0} ms); replanning trajectories");
        }
        reset_planning(scene);
    }
    if scene.paused {
        scene.last_time = Some(now);
        return report;
    }

    let mut changes = 0u32;
    while scene.next_course_change.is_none_or(|horizon| now > horizon) {
        changes += 1;
        if changes > scene.tuning.max_course_changes_per_tick {
            log::warn!(
                "course-change budget ({}) exceeded in one tick; replanning",
                scene.tuning.max_course_changes_per_tick
            );
            reset_planning(scene);
            for mover in &mut scene.movers {
                mover.clear_course();
            }
            break;
        }

        if let Some(horizon) = scene.next_course_change {
            if let Some(last) = scene.last_course_change {
                log::trace!("course change after {:.1} ms", horizon - last);
            }
            // Settle just before the change: landing exactly on the
            // collision instant can overshoot into the obstacle through
            // float imprecision.
            let settle_time = horizon - scene.tuning.settle_epsilon_ms;
            for mover in &mut scene.movers {
                mover.settle(settle_time);
            }
            let changers = std::mem::take(&mut scene.course_changers);
            for mover_id in changers {
                resolve_course_change(scene, mover_id, &mut report.events);
            }
        }

        let start = scene.next_course_change.unwrap_or(now);
        scene.last_course_change = Some(start);

        // Re-plan every course and find the soonest change. Open courses
        // still get a check-in after course_check_ms, which also picks up
        // fresh paddle english on the near wall.
        let mut next = start + scene.tuning.course_check_ms;
        let mut changers: Vec<u32> = Vec::new();
        let snapshot = scene.collidable_mover_snapshot();
        let tuning = scene.tuning.clone();
        // Field-split borrow: obstacles stay shared while movers are
        // planned in place.
        let obstacles = &scene.obstacles;
        for mover in scene.movers.iter_mut() {
            let candidates = super::state::candidates(obstacles, &snapshot, mover.id);
            let Some(delta) = mover.start_course(start, &candidates, &tuning) else {
                continue;
            };
            let when = start + delta;
            if when < next {
                changers.clear();
                changers.push(mover.id);
                next = when;
            } else if when == next {
                changers.push(mover.id);
            }
        }
        scene.next_course_change = Some(next);
        scene.course_changers = changers;
    }

    scene.compact_obstacles();

    // Paddle motion becomes english on the near wall, doubled to make the
    // effect readable.
    if let (Some(d), Some((old_x, old_y))) = (dt, scene.last_paddle_position)
        && d > 0.0
    {
        let adjustment = DVec3::new(
            2.0 * (scene.paddle.x - old_x) / d,
            2.0 * (scene.paddle.y - old_y) / d,
            0.0,
        );
        scene.set_near_wall_adjustment(adjustment);
    }
    scene.last_paddle_position = Some((scene.paddle.x, scene.paddle.y));

    for mover in &mut scene.movers {
        mover.settle(now);
    }
    scene.last_time = Some(now);

    if !scene.alive {
        report.outcome = Some(if scene.bricks_remaining == 0 {
            Outcome::Victory
        } else {
            Outcome::Defeat
        });
    }
    report
}

fn reset_planning(scene: &mut Scene) {
    scene.next_course_change = None;
    scene.last_course_change = None;
    scene.course_changers.clear();
}

/// Bounce one mover off its stored hit set and apply the game rules the
/// hits imply.
fn resolve_course_change(scene: &mut Scene, mover_id: u32, events: &mut Vec<CollisionEvent>) {
    let Some(index) = scene.movers.iter().position(|m| m.id == mover_id) else {
        return;
    };
    let hits = match &scene.movers[index].segment {
        Some(segment) => segment.hits.clone(),
        None => return,
    };
    let is_ball = scene.movers[index].kind == MoverKind::Ball;

    // Adjustments are read before any removal so a destroyed target still
    // imparts its nudge for this bounce.
    let adjustments: Vec<(Target, DVec3)> = hits
        .iter()
        .map(|h| (h.target, scene.velocity_adjustment_of(h.target)))
        .collect();
    let lookup = |target: Target| {
        adjustments
            .iter()
            .find(|(t, _)| *t == target)
            .map_or(DVec3::ZERO, |(_, a)| *a)
    };
    scene.movers[index].velocity = bounce_velocity(scene.movers[index].velocity, &hits, lookup);

    for hit in &hits {
        events.push(CollisionEvent { mover: mover_id, target: hit.target, axis: hit.axis });
        log::debug!("mover {mover_id} struck {:?} on {:?}", hit.target, hit.axis);

        let Target::Obstacle(obstacle_id) = hit.target else {
            continue;
        };
        let Some(kind) = scene.obstacle(obstacle_id).map(|o| o.kind) else {
            continue; // already destroyed earlier in this batch
        };
        match kind {
            ObstacleKind::Brick => {
                if scene.mark_destroyed(obstacle_id) {
                    scene.bricks_remaining -= 1;
                    log::debug!("brick {obstacle_id} destroyed, {} left", scene.bricks_remaining);
                    if scene.bricks_remaining == 0 {
                        scene.alive = false;
                    }
                }
            }
            ObstacleKind::NearWall if is_ball => {
                // The ball reached the viewer end: it survives only if the
                // paddle is under it.
                let caught = scene.movers[index]
                    .body
                    .vertices()
                    .iter()
                    .any(|v| scene.paddle.contains(*v));
                if !caught {
                    scene.alive = false;
                }
            }
            _ => {}
        }
    }
}
