//! Headless arena runner.
//!
//! Drives the engine with a simple scripted pilot so the simulation
//! can be watched through its logs and profiled without any frontend.

use std::time::Duration;

use engine::game::Snapshot;
use engine::{Config, Game, GameEvent, TickInput};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Ticks to wait after a death before starting the next round.
const RESPAWN_DELAY_TICKS: u64 = 180;
/// How often the pilot logs a status line.
const STATUS_INTERVAL_TICKS: u64 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("petri v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!(
        arena = config.arena.size,
        bots = config.arena.bot_count,
        food = config.arena.food_count,
        viruses = config.arena.virus_count,
        "loaded configuration"
    );

    let tick_interval = config.tick_interval_ms;
    let mut game = Game::new(config)?;
    let mut pilot = Pilot::new();

    let start = Instant::now() + Duration::from_millis(tick_interval);
    let mut ticker = interval_at(start, Duration::from_millis(tick_interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut respawn_at: Option<u64> = None;
    loop {
        ticker.tick().await;

        let input = if game.player_alive() {
            pilot.decide(&game.snapshot())
        } else {
            TickInput::default()
        };
        game.tick(&input);

        for event in game.events() {
            match event {
                GameEvent::FoodEaten { .. } => {}
                GameEvent::EntityEaten { victim, mass_gained } => {
                    debug!(?victim, mass_gained, "consumed");
                }
                GameEvent::VirusPopped { fragments } => {
                    info!(fragments, "popped a virus");
                }
                GameEvent::PlayerDied => {
                    info!(tick = game.tick_count, "round over");
                    respawn_at = Some(game.tick_count + RESPAWN_DELAY_TICKS);
                }
            }
        }

        if respawn_at.is_some_and(|t| game.tick_count >= t) {
            respawn_at = None;
            game.respawn_player();
            info!(tick = game.tick_count, "new round");
        }

        if game.tick_count % STATUS_INTERVAL_TICKS == 0 {
            info!(
                tick = game.tick_count,
                cells = game.world.cells.len(),
                mass = game.world.total_player_mass(),
                "status"
            );
        }
    }
}

/// A scripted player: chases food, runs from bigger bots, and splits
/// or ejects now and then so every engine path gets exercised.
struct Pilot {
    rng: SmallRng,
    heading: Vec2,
}

impl Pilot {
    fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            heading: Vec2::new(0.0, 1.0),
        }
    }

    fn decide(&mut self, snapshot: &Snapshot<'_>) -> TickInput {
        let Some(cell) = snapshot
            .cells
            .iter()
            .max_by(|a, b| a.radius.total_cmp(&b.radius))
        else {
            return TickInput::default();
        };

        let threat = snapshot
            .bots
            .iter()
            .filter(|b| b.radius > cell.radius && b.position.distance(cell.position) < 300.0)
            .min_by(|a, b| {
                a.position
                    .distance(cell.position)
                    .total_cmp(&b.position.distance(cell.position))
            });

        if let Some(threat) = threat {
            let away = cell.position - threat.position;
            if away.length_squared() > 1e-6 {
                self.heading = away.normalize();
            }
        } else if let Some(food) = snapshot.food.iter().min_by(|a, b| {
            a.position
                .distance(cell.position)
                .total_cmp(&b.position.distance(cell.position))
        }) {
            self.heading = (food.position - cell.position).normalize_or(self.heading);
        }

        TickInput {
            intent: self.heading,
            split: cell.radius > 80.0 && self.rng.random_bool(0.002),
            eject: cell.radius > 60.0 && self.rng.random_bool(0.005),
        }
    }
}
