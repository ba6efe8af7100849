//! Hexax headless runner
//!
//! Plays a session on autopilot (demo mode) at a fixed frame rate and records
//! the high score.
//!
//! Usage: `hexax [config.json] [seed] [max_seconds]`

use std::path::Path;

use hexax::sim::{EntityType, GameEvent, InputAction, Session};
use hexax::{HighScoreStore, JsonFileStore, TunnelConfig};

/// Simulated frame length (ms)
const FRAME_MS: f32 = 16.0;
/// Flash intensity lost per second
const FLASH_DECAY_PER_SEC: f32 = 4.0;
const HIGH_SCORE_FILE: &str = "hexax_highscore.json";
const DEFAULT_MAX_SECONDS: f32 = 600.0;

/// Demo-mode player: dodge walls, turn toward the closest target, keep firing
struct Autopilot;

impl Autopilot {
    /// Signed lane steps from `from` to `to` via the shorter way round
    fn lane_delta(from: usize, to: usize, lanes: usize) -> i64 {
        let lanes = lanes as i64;
        let d = (to as i64 - from as i64).rem_euclid(lanes);
        if d > lanes / 2 { d - lanes } else { d }
    }

    fn turn_toward(from: usize, to: usize, lanes: usize) -> Option<InputAction> {
        match Self::lane_delta(from, to, lanes) {
            0 => None,
            d if d > 0 => Some(InputAction::RotateLeft),
            _ => Some(InputAction::RotateRight),
        }
    }

    fn decide(&self, session: &Session) -> Option<InputAction> {
        if session.is_rotating() {
            return None;
        }
        let lanes = session.config().num_lanes;
        let player = session.state().player_lane();
        let reg = session.registry();

        // Walls one step from the player ring
        let blocked: Vec<usize> = reg
            .walls
            .iter()
            .chain(reg.double_walls.iter())
            .filter(|w| w.alive && w.depth < 2.0)
            .flat_map(|w| w.lanes().collect::<Vec<_>>())
            .collect();
        if blocked.contains(&player) {
            let escape = (1..lanes)
                .flat_map(|d| [(player + d) % lanes, (player + lanes - d) % lanes])
                .find(|lane| !blocked.contains(lane))?;
            return Self::turn_toward(player, escape, lanes);
        }

        let wants_heart = session.state().health < session.config().spawn.heart_health_threshold;
        let target = reg
            .enemies
            .iter()
            .filter(|e| e.is_collidable() && !e.is_shielded())
            .filter(|e| wants_heart || e.entity_type() != EntityType::Heart)
            .filter(|e| !blocked.contains(&e.lane))
            .min_by(|a, b| a.depth.total_cmp(&b.depth))?;

        if target.lane == player {
            Some(InputAction::Fire)
        } else {
            Self::turn_toward(player, target.lane, lanes)
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => TunnelConfig::load_or_default(Path::new(path))?,
        None => TunnelConfig::default(),
    };
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0xC0FFEE);
    let max_ms = args
        .get(2)
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_MAX_SECONDS)
        * 1000.0;

    let mut store = JsonFileStore::new(HIGH_SCORE_FILE);
    let mut high_score = store.load()?;
    let mut session = Session::new(config, seed, high_score.best);
    let pilot = Autopilot;

    let mut played_ms = 0.0;
    while !session.is_game_over() && played_ms < max_ms {
        match pilot.decide(&session) {
            Some(InputAction::Fire) => {
                session.fire();
            }
            Some(InputAction::RotateLeft) => {
                session.rotate_left();
            }
            Some(InputAction::RotateRight) => {
                session.rotate_right();
            }
            None => {}
        }

        session.advance(FRAME_MS);
        session.advance_pending_kills(FRAME_MS);
        session.decay_flashes(FLASH_DECAY_PER_SEC * FRAME_MS / 1000.0);
        played_ms += FRAME_MS;

        for event in session.drain_events() {
            match event {
                GameEvent::WallHit { tier, fatal } => {
                    log::info!("Wall hit tier {} (fatal={})", tier, fatal)
                }
                GameEvent::HeartCollect { .. } => log::info!("Heart collected"),
                GameEvent::SegmentDamage(r) if r.critical => {
                    log::info!("Tunnel critical: {} faces damaged", r.damaged_count)
                }
                GameEvent::GameOver { score, reason, .. } => {
                    log::info!("Game over: {:?}, score {}", reason, score)
                }
                _ => {}
            }
        }
    }

    let state = session.state();
    println!(
        "score={} ticks={} elapsed={:.1}s health={:.0} wall_hits={} best={}",
        state.score,
        state.tick_count,
        state.elapsed_ms / 1000.0,
        state.health,
        state.wall_hits,
        session.best_score()
    );

    if high_score.check(state.score) {
        store.save(high_score)?;
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hexax (headless autopilot) starting...");
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The headless runner is native only
}
