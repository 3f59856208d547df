//! Play-session wrapper
//!
//! `Session` owns a scene, forwards player input, and reports the final
//! outcome exactly once through an optional completion callback. The host
//! (native loop or embedding shell) talks to this type, not to the scene.

use crate::level::Level;
use crate::sim::{CollisionEvent, Outcome, Scene, tick};
use crate::tuning::Tuning;

pub struct Session {
    scene: Scene,
    level_name: String,
    on_complete: Option<Box<dyn FnOnce(bool)>>,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(level: &Level, tuning: Tuning) -> Self {
        log::info!("starting level \"{}\" ({} bricks)", level.name, level.bricks.len());
        Self {
            scene: Scene::new(level, tuning),
            level_name: level.name.clone(),
            on_complete: None,
            outcome: None,
        }
    }

    /// Register the completion callback: called once with `true` on
    /// victory, `false` on defeat.
    pub fn on_complete(&mut self, callback: impl FnOnce(bool) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn set_paddle_position(&mut self, x: f64, y: f64) {
        self.scene.set_paddle_position(x, y);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.scene.paused() {
            log::info!("session {}", if paused { "paused" } else { "resumed" });
        }
        self.scene.set_paused(paused);
    }

    /// Advance to `now` (milliseconds). Returns the tick's collision
    /// events; after the session ends this is always empty.
    pub fn frame(&mut self, now: f64) -> Vec<CollisionEvent> {
        let report = tick(&mut self.scene, now);
        if let Some(outcome) = report.outcome
            && self.outcome.is_none()
        {
            self.outcome = Some(outcome);
            let won = outcome == Outcome::Victory;
            log::info!(
                "level \"{}\" over: {}",
                self.level_name,
                if won { "cleared" } else { "ball lost" }
            );
            if let Some(callback) = self.on_complete.take() {
                callback(won);
            }
        }
        report.events
    }
}
