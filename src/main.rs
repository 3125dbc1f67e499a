//! Road Chase Demo
//!
//! Headless run of one session: loads roads and config (or builds a street
//! grid), drives the session actor with scripted input, then replays the
//! input log and compares state hashes.
//!
//! Usage: `road-chase [ROADS_JSON [CONFIG_JSON]]`

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use road_chase::{
    FRAME_RATE, VERSION,
    config::GameConfig,
    game::{
        events::GameEventData,
        input::Direction,
        road::{Canvas, RoadGeometry},
    },
    replay_session,
    session::{spawn_session, SessionConfig},
};

/// Demo canvas (pixels)
const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;

/// Street spacing for the built-in grid
const GRID_SPACING: f64 = 100.0;

/// Demo length: 30 seconds of frames
const DEMO_FRAMES: u32 = 30 * FRAME_RATE;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Road Chase v{}", VERSION);
    info!("Frame Rate: {} Hz", FRAME_RATE);

    let mut args = std::env::args().skip(1);
    let canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;

    let roads = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading roads from {}", path))?;
            RoadGeometry::from_json_str(&json).with_context(|| format!("parsing roads from {}", path))?
        }
        None => RoadGeometry::grid(canvas, GRID_SPACING),
    };
    let config = match args.next() {
        Some(path) => GameConfig::from_json_file(&path)?,
        None => GameConfig::default(),
    };

    info!("Roads: {} polylines, {} vertices", roads.len(), roads.vertex_count());
    info!("Road digest: {}", hex::encode(roads.digest()));

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(demo_session(config, Arc::new(roads), canvas))
}

/// Drive one session with a scripted input pattern, then verify replay.
async fn demo_session(config: GameConfig, roads: Arc<RoadGeometry>, canvas: Canvas) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let handle = spawn_session(config.clone(), Arc::clone(&roads), canvas, SessionConfig::default())?;
    info!("Session ID: {}", hex::encode(handle.id()));

    let mut events = handle.subscribe();
    let logger = tokio::spawn(async move {
        let mut consumed = 0u32;
        while let Ok(event) = events.recv().await {
            match event.data {
                GameEventData::ScoreChanged { category, points, score } => {
                    consumed += 1;
                    info!("Tick {}: ate {} dot (+{}), score {}", event.tick, category, points, score.total);
                }
                GameEventData::GameOver { final_score } => {
                    info!("Tick {}: caught! final score {}", event.tick, final_score.total);
                }
            }
        }
        consumed
    });

    // Turn every half second, cycling through the four directions
    let script = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
    for frame in 0..DEMO_FRAMES {
        if frame % 5 == 0 {
            let turn = (frame / (FRAME_RATE / 2)) as usize % script.len();
            handle.input(script[turn]).await?;
        }
        handle.frame().await?;
    }

    let snapshot = handle.snapshot().await?;
    let engine = handle.shutdown().await?;
    let consumed = logger.await?;

    info!("=== Session Results ===");
    info!("Phase: {:?} at tick {}", snapshot.phase, snapshot.tick);
    info!(
        "Score: {} (orange {}, red {}, purple {}, green {}, blue {})",
        snapshot.score.total,
        snapshot.score.orange,
        snapshot.score.red,
        snapshot.score.purple,
        snapshot.score.green,
        snapshot.score.blue
    );
    info!("Dots eaten: {}, remaining: {}", consumed, snapshot.collectibles_remaining);
    info!("Inputs recorded: {}", engine.input_log().len());
    let hash = engine.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let replayed = replay_session(config, roads, canvas, engine.state().seed, engine.input_log(), DEMO_FRAMES)?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        anyhow::bail!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}
