//! Maze Stalker headless driver
//!
//! Runs a scripted walk through a level, logs what the stalker did and can
//! dump the last frame as a PPM image. A windowed frontend drives `Game` the
//! same way, feeding real input and presenting its own `Surface`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use log::{error, info};

use maze_stalker::renderer::{Framebuffer, PixelSprite};
use maze_stalker::sim::{GameEvent, GridMap, Intent};
use maze_stalker::{ConfigError, Game, Settings, Tuning};

const FRAME_MS: f32 = 1000.0 / 60.0;

/// Headless Maze Stalker session
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// ASCII map file (built-in level when omitted)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Gameplay tuning JSON
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Display settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Session RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of 60 Hz ticks to simulate
    #[arg(long, default_value_t = 1800)]
    ticks: u32,

    /// Write the last frame to this PPM file
    #[arg(long)]
    frame: Option<PathBuf>,
}

/// Walk, glance around, and occasionally spin to catch the stalker
fn scripted_intent(tick: u32) -> Intent {
    match tick % 240 {
        0..=119 => Intent {
            forward: 1,
            ..Default::default()
        },
        120..=159 => Intent {
            strafe: 1,
            look_delta: Vec2::new(6.0, 0.0),
            ..Default::default()
        },
        160..=199 => Intent {
            look_delta: Vec2::new(-26.0, 0.5),
            ..Default::default()
        },
        _ => Intent {
            forward: -1,
            look_delta: Vec2::new(0.0, -0.5),
            ..Default::default()
        },
    }
}

fn run(args: Args) -> Result<(), ConfigError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let map = match &args.map {
        Some(path) => GridMap::parse(&std::fs::read_to_string(path)?, tuning.geometry.tile_size)?,
        None => GridMap::default_level(tuning.geometry.tile_size)?,
    };

    let mut surface = Framebuffer::new(settings.screen_width, settings.screen_height);
    let sprite = PixelSprite::pending(32, 64);
    let mut game = Game::new(map, tuning, settings, args.seed)?;

    for t in 0..args.ticks {
        game.tick(&scripted_intent(t), FRAME_MS, &mut surface, &sprite);
        for event in game.events() {
            if let GameEvent::StalkerRelocated { placement, to, .. } = event {
                info!("tick {t}: stalker reappeared {placement:?} at ({:.0}, {:.0})", to.x, to.y);
            }
        }
    }

    let telemetry = game.telemetry();
    info!(
        "{} ticks, frozen {:.0}% (longest stare {}), relocations {} far / {} near / {} failed",
        telemetry.ticks,
        telemetry.frozen_ratio() * 100.0,
        telemetry.longest_stare,
        telemetry.relocations_far,
        telemetry.relocations_near,
        telemetry.relocations_failed
    );
    if let Some(d) = telemetry.closest_approach {
        info!("Closest approach: {d:.1} units");
    }
    if let Ok(summary) = serde_json::to_string_pretty(telemetry) {
        println!("{summary}");
    }

    if let Some(path) = &args.frame {
        surface.write_ppm(path)?;
        info!("Wrote last frame to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Maze Stalker (headless) starting...");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
