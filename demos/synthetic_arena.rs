//! A toy duel that exercises a full learning session.
//!
//! The agent circles, advances, retreats or fires at a drifting opponent inside
//! an 800x600 arena. Hits and collisions produce reward events, and a duel ends
//! when either side runs out of energy.
//!
//! ```text
//! RUST_LOG=info cargo run --example synthetic_arena -- [lookup|neural|path/to/config.json]
//! ```

use std::error::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tdlearn::agent::RewardEvent;
use tdlearn::config::EngineConfig;
use tdlearn::quantizer::Observation;
use tdlearn::session::Session;
use tdlearn::types::{Action, MacroAction};
use tracing::info;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const EPISODES: usize = 500;
const MAX_TICKS: usize = 400;

struct Arena {
    me: (f64, f64),
    opponent: (f64, f64),
    my_energy: f64,
    opponent_energy: f64,
    rng: StdRng,
}

impl Arena {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Arena {
            me: (rng.gen_range(50.0..WIDTH - 50.0), rng.gen_range(50.0..HEIGHT - 50.0)),
            opponent: (rng.gen_range(50.0..WIDTH - 50.0), rng.gen_range(50.0..HEIGHT - 50.0)),
            my_energy: 100.0,
            opponent_energy: 100.0,
            rng,
        }
    }

    fn offset(&self) -> (f64, f64) {
        (self.opponent.0 - self.me.0, self.opponent.1 - self.me.1)
    }

    fn observation(&self) -> Observation {
        let (dx, dy) = self.offset();
        Observation::new(
            self.me.0,
            self.me.1,
            dx.hypot(dy),
            dy.atan2(dx).to_degrees(),
            self.my_energy,
        )
    }

    /// Apply one macro action and return the events it caused.
    fn step(&mut self, action: MacroAction) -> Vec<RewardEvent> {
        let mut events = Vec::new();
        let (dx, dy) = self.offset();
        let distance = dx.hypot(dy).max(1.0);
        let (ux, uy) = (dx / distance, dy / distance);

        let (mx, my) = match action {
            MacroAction::CircleClockwise => (-uy * 20.0, ux * 20.0),
            MacroAction::CircleAnticlockwise => (uy * 20.0, -ux * 20.0),
            MacroAction::Advance => (ux * 20.0, uy * 20.0),
            MacroAction::Retreat => (-ux * 20.0, -uy * 20.0),
            MacroAction::Fire => {
                // Closer shots land more often
                if self.rng.gen::<f64>() < (300.0 / distance).min(0.9) {
                    self.opponent_energy -= 12.0;
                    events.push(RewardEvent::BulletHit);
                }
                self.my_energy -= 1.0;
                (0.0, 0.0)
            }
        };

        let (nx, ny) = (self.me.0 + mx, self.me.1 + my);
        if nx <= 0.0 || nx >= WIDTH || ny <= 0.0 || ny >= HEIGHT {
            self.my_energy -= 2.0;
            events.push(RewardEvent::HitWall);
        }
        self.me = (nx.clamp(0.0, WIDTH), ny.clamp(0.0, HEIGHT));

        // The opponent drifts and fires back at a fixed rate
        self.opponent.0 = (self.opponent.0 + self.rng.gen_range(-15.0..15.0)).clamp(0.0, WIDTH);
        self.opponent.1 = (self.opponent.1 + self.rng.gen_range(-15.0..15.0)).clamp(0.0, HEIGHT);
        if self.rng.gen::<f64>() < 0.15 {
            self.my_energy -= 8.0;
            events.push(RewardEvent::HitByBullet);
        }
        if distance < 40.0 {
            self.my_energy -= 3.0;
            events.push(RewardEvent::HitRobot);
        }

        events
    }

    fn outcome(&self) -> Option<RewardEvent> {
        if self.opponent_energy <= 0.0 {
            Some(RewardEvent::Won)
        } else if self.my_energy <= 0.0 {
            Some(RewardEvent::Lost)
        } else {
            None
        }
    }
}

fn play(session: &mut Session, seed: u64) -> Result<(), Box<dyn Error>> {
    let mut arena = Arena::new(seed);
    session.begin_episode()?;

    let mut outcome = RewardEvent::Lost;
    for _ in 0..MAX_TICKS {
        session.observe(&arena.observation());
        let action: Action = session.act()?;
        let behaviour = MacroAction::from_action(action).ok_or("action outside the macro set")?;

        for event in arena.step(behaviour) {
            session.record_event(event)?;
        }
        if let Some(end) = arena.outcome() {
            outcome = end;
            break;
        }
    }

    session.record_event(outcome)?;
    session.end_episode();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1).as_deref() {
        None | Some("lookup") => EngineConfig::lookup_table(),
        Some("neural") => EngineConfig::neural_network(),
        Some(path) => EngineConfig::from_json_file(path)?,
    };
    let mut session = config.build_session()?;

    for episode in 0..EPISODES {
        play(&mut session, episode as u64)?;
    }

    let stats = session.end_session()?;
    for (block, rate) in stats.block_win_rates().iter().enumerate() {
        info!(block, win_rate = rate, "block summary");
    }
    println!(
        "{} episodes, {} wins ({:.1}%), mean reward over last 100: {:.2}",
        stats.episodes,
        stats.wins,
        stats.win_rate() * 100.0,
        stats.mean_reward(100).unwrap_or(0.0)
    );
    Ok(())
}
