//! Fleet Engine Demo Host
//!
//! Runs a scripted match against the engine and verifies it by replay.
//!
//! Usage: `fleet-engine [config.json] [seed]`

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fleet_engine::{
    VERSION, Vec2,
    game::{
        config::GameConfig,
        events::GameEventData,
        state::{ShipType, World},
        tick::{replay, tick, PlayerTurns},
        turn::TurnContainer,
        wormhole::new_wormholes,
    },
};

const PLAYER_NAMES: [&str; 4] = ["alice", "bob", "carol", "dave"];
const WORMHOLE_PAIRS: usize = 2;
const DEMO_TICKS: u32 = 60;
const DEFAULT_SEED: u64 = 12345;

/// Health lost per tick by a ship outside the map.
const OUT_OF_BOUNDS_DAMAGE: i32 = 25;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Fleet Engine v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::from_json_file(&path).with_context(|| format!("loading {}", path))?,
        None => GameConfig::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed '{}'", raw))?,
        None => DEFAULT_SEED,
    };

    demo_match(config, seed)
}

/// Build the starting world every run shares.
fn setup(config: GameConfig, seed: u64) -> Result<World> {
    let mut world = World::new(config, seed).context("invalid game config")?;
    for name in PLAYER_NAMES {
        let id = world.create_player(name);
        if let Some(player) = world.player(id) {
            info!("Player {} '{}' color {}", id, player.name, player.color);
        }
    }
    for _ in 0..WORMHOLE_PAIRS {
        let (a, b) = new_wormholes(&mut world);
        info!("Wormholes {} <-> {}", a, b);
    }
    Ok(world)
}

/// Scripted orders: buy on the first ticks, then steer every ship toward
/// the map center. Odd players overshoot and burn more fuel.
fn script_batches(world: &World, t: u32) -> Vec<PlayerTurns> {
    let center = Vec2::new(world.config.map_width / 2.0, world.config.map_height / 2.0);

    world
        .players()
        .iter()
        .filter(|p| p.alive)
        .map(|player| {
            let mut turns = Vec::new();
            if t < 2 {
                turns.push(TurnContainer::buy(ShipType::Drill));
            }
            for ship in world.ships_of(player.id).filter(|s| s.is_operable()) {
                let mut heading = center.sub(ship.position);
                if player.id % 2 == 1 {
                    heading = heading.scale(3.0);
                }
                turns.push(TurnContainer::move_ship(ship.id, heading));
            }
            // Always-invalid order, to exercise the rejection log
            if t == 3 {
                turns.push(TurnContainer::new(42, serde_json::json!({})));
            }
            PlayerTurns::new(player.id, turns)
        })
        .collect()
}

/// Host-side step between ticks: consume travel vectors and apply hazard
/// damage outside the map.
fn advance(world: &mut World) {
    let (width, height) = (world.config.map_width, world.config.map_height);
    for id in 0..world.ships().len() {
        let Some(ship) = world.ship_mut(id) else { continue };
        if ship.is_destroyed {
            continue;
        }
        ship.position += ship.vector;
        ship.vector = Vec2::ZERO;

        let p = ship.position;
        if p.x < 0.0 || p.y < 0.0 || p.x > width || p.y > height {
            ship.health -= OUT_OF_BOUNDS_DAMAGE;
        }
    }
}

fn demo_match(config: GameConfig, seed: u64) -> Result<()> {
    info!("=== Starting Demo Match ===");
    info!("RNG Seed: {}", seed);

    let mut world = setup(config.clone(), seed)?;
    let mut recorded: Vec<Vec<PlayerTurns>> = Vec::with_capacity(DEMO_TICKS as usize);
    let mut total_events = 0;

    for t in 0..DEMO_TICKS {
        let batches = script_batches(&world, t);
        let result = tick(&mut world, &batches);
        recorded.push(batches);
        total_events += result.events.len();

        for line in &result.log {
            warn!("Tick {}: {}", world.tick, line);
        }
        for event in &result.events {
            match &event.data {
                GameEventData::ShipDestroyed { ship_id, player_id, .. } => {
                    info!("Tick {}: ship {} of player {} destroyed", event.tick, ship_id, player_id);
                }
                GameEventData::ShipTeleported { ship_id, entry_wormhole, exit_wormhole, .. } => {
                    info!("Tick {}: ship {} jumped {} -> {}", event.tick, ship_id, entry_wormhole, exit_wormhole);
                }
                GameEventData::PlayerEliminated { player_id } => {
                    info!("Tick {}: player {} eliminated", event.tick, player_id);
                }
                _ => {}
            }
        }

        advance(&mut world);
    }

    // Print final results
    info!("=== Match Results ===");
    for view in &world.snapshot().players {
        info!(
            "Player {} '{}': alive={} rock={}",
            view.id, view.name, view.alive, view.rock_amount
        );
    }
    info!("Ships: {}, debris: {}", world.ships().len(), world.debris().len());
    info!("Total events: {}", total_events);

    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(setup(config, seed)?, &recorded, advance);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        anyhow::bail!("determinism failure: replay hash differs")
    }
}
