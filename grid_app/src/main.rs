//! Spatial Grid Demo
//!
//! Runs a headless ship simulation on top of the quadrant tree:
//! - Ships drift and bounce inside a fixed world
//! - Every step re-indexes each ship and runs a broad-phase pass
//! - Hull trails and contacts are recorded in the debug draw system
//! - The final tree is drawn on top and summarized
//!
//! Usage: `grid_demo [config.toml|config.ron]`

mod simulation;

use simulation::{AppConfig, Simulation};
use spatial_grid::config::{Config, ConfigError};
use spatial_grid::foundation::logging;
use spatial_grid::prelude::*;
use std::time::Instant;
use thiserror::Error;

/// Errors that abort the demo
#[derive(Error, Debug)]
enum AppError {
    #[error("failed to load configuration from {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },
}

fn load_config() -> Result<AppConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            AppConfig::load_from_file(&path).map_err(|source| AppError::Config { path, source })
        }
        None => {
            log::info!("No configuration given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    println!("=== Spatial Grid Demo ===");

    let config = load_config()?;
    println!(
        "World {}x{}, {} ships, {} steps, max {} elements per node",
        config.simulation.world_width,
        config.simulation.world_height,
        config.simulation.ship_count,
        config.simulation.steps,
        config.grid.max_elements_per_node
    );

    let mut simulation = Simulation::new(config);
    let started = Instant::now();
    let stats = simulation.run();
    let elapsed = started.elapsed();

    let candidates: usize = stats.iter().map(|s| s.candidates).sum();
    let contacts: usize = stats.iter().map(|s| s.contacts).sum();
    let lost: usize = stats.iter().map(|s| s.lost).sum();

    simulation.draw_grid(DrawOrder::LeavesFirst);
    let shapes = simulation.shape_counts();
    let grid = simulation.grid();

    println!("Simulated {} steps in {:.2?}", stats.len(), elapsed);
    println!("  candidate pairs: {candidates}");
    println!("  contacts:        {contacts}");
    println!("  ships lost:      {lost}");
    println!(
        "Final tree: height {}, {} nodes, {} leaves, {} elements",
        grid.height(),
        grid.node_count(),
        grid.leaf_count(),
        grid.element_count()
    );
    println!(
        "Debug shapes: {} total ({} rects, {} hull trails, {} contacts)",
        simulation.debug_draw().shape_count(),
        shapes.rects,
        shapes.circles,
        shapes.points
    );

    if lost > 0 {
        log::warn!("{lost} ship updates fell outside the grid");
    }

    Ok(())
}
