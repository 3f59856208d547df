//! Headless autoplay driver
//!
//! Runs a level on a synthetic 16 ms clock with the paddle tracking the
//! ball, the same autopilot a demo attract mode would use. Handy for
//! exercising the simulation end to end from the command line:
//!
//! ```text
//! tunnel-break [1|2|path/to/level.json]
//! ```

use std::process::ExitCode;

use tunnel_break::sim::Outcome;
use tunnel_break::{Level, Session, Tuning, level};

const FRAME_MS: f64 = 16.0;
const MAX_RUN_MS: f64 = 300_000.0;

fn load_level(arg: Option<&str>) -> Result<Level, String> {
    match arg {
        None | Some("1") => Ok(level::level_one()),
        Some("2") => Ok(level::level_two()),
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("reading level file {path}: {e}"))?;
            Level::from_json(&json).map_err(|e| format!("parsing level file {path}: {e}"))
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let arg = std::env::args().nth(1);
    let level = match load_level(arg.as_deref()) {
        Ok(level) => level,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(&level, Tuning::default());
    session.on_complete(|won| {
        println!("{}", if won { "level cleared" } else { "ball lost" });
    });
    session.set_paused(false);

    let mut now = 0.0;
    let mut collisions = 0usize;
    while session.outcome().is_none() && now < MAX_RUN_MS {
        // Autopilot: keep the paddle under the ball
        let ball = session.scene().ball().body.center();
        session.set_paddle_position(ball.x, ball.y);

        collisions += session.frame(now).len();
        now += FRAME_MS;
    }

    log::info!(
        "ran {:.1} s of simulation, {collisions} collisions",
        now / 1000.0
    );
    match session.outcome() {
        Some(Outcome::Victory) => ExitCode::SUCCESS,
        Some(Outcome::Defeat) => ExitCode::FAILURE,
        None => {
            eprintln!("no outcome after {:.0} s", MAX_RUN_MS / 1000.0);
            ExitCode::FAILURE
        }
    }
}
