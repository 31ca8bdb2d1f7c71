//! Procedural level-map generation split into coherent submodules.

pub mod model;
pub mod progression;

mod carver;
mod consistency;
mod generator;
mod graph;
mod grid;
mod seed;
mod specials;

pub use generator::MapGenerator;
pub use model::{Connections, GameMap, GridSize, MapConfig, PathGraph, Special, SpecialTile, Tile};
pub use progression::{DEFAULT_MAX_LEVEL, GenerationRules, LevelScaling};
pub use seed::runtime_seed;

use crate::error::MapGenError;

/// Generates a map for `level` from fresh runtime entropy; two calls almost
/// never produce the same topology.
pub fn generate_map(level: u32) -> Result<GameMap, MapGenError> {
    generate_map_seeded(level, runtime_seed())
}

/// Reproducible variant: the same `(level, run_seed)` always yields the same map.
pub fn generate_map_seeded(level: u32, run_seed: u64) -> Result<GameMap, MapGenError> {
    generate_map_with_rules(level, run_seed, GenerationRules::default())
}

/// Seeded generation under custom rules. Uses the same per-level seed
/// derivation as [`generate_map_seeded`], so default rules give the same map.
pub fn generate_map_with_rules(
    level: u32,
    run_seed: u64,
    rules: GenerationRules,
) -> Result<GameMap, MapGenError> {
    MapGenerator::with_rules(seed::derive_level_seed(run_seed, level), rules)?.generate(level)
}
