//! High-level map generation orchestration: sizing, carving, endpoint
//! selection, encounter placement, and graph derivation.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::error::MapGenError;
use crate::types::{Pos, TileKind};

use super::carver::{CarveContext, carve_paths};
use super::consistency::check_consistency;
use super::graph::build_path_graph;
use super::grid::{TileGrid, farthest_path_tile};
use super::model::{GameMap, GridSize, MapConfig};
use super::progression::{GenerationRules, LevelScaling};
use super::specials::{SpecialContext, place_special_tiles};

/// Owns the random stream and rules; every `generate` call returns a fresh,
/// independent map and leaves no other state behind.
pub struct MapGenerator {
    rules: GenerationRules,
    rng: ChaCha8Rng,
}

impl MapGenerator {
    pub fn new(seed: u64) -> Self {
        Self { rules: GenerationRules::default(), rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn with_rules(seed: u64, rules: GenerationRules) -> Result<Self, MapGenError> {
        rules.validate()?;
        Ok(Self { rules, rng: ChaCha8Rng::seed_from_u64(seed) })
    }

    pub fn rules(&self) -> &GenerationRules {
        &self.rules
    }

    pub fn generate(&mut self, level: u32) -> Result<GameMap, MapGenError> {
        let scaling = LevelScaling::for_level(&self.rules, level)?;
        let mut grid = TileGrid::new(scaling.width, scaling.height);

        let start = Pos { y: (scaling.height / 2) as i32, x: 0 };
        let start_tile = grid.tile_mut(start);
        start_tile.kind = TileKind::Start;
        start_tile.visited = true;

        let mut path_tiles = vec![start];
        let branches = carve_paths(
            &mut CarveContext {
                grid: &mut grid,
                rng: &mut self.rng,
                path_tiles: &mut path_tiles,
                branch_chance: scaling.branch_chance,
            },
            start,
            scaling.min_path_length,
        );
        if path_tiles.len() == 1 {
            tracing::warn!(level, "carving dead-ended at the start tile");
        }

        // A lone start tile doubles as the end and keeps its Start kind.
        let end = farthest_path_tile(&path_tiles, start);
        if end != start {
            grid.tile_mut(end).kind = TileKind::End;
        }

        let special_tiles = place_special_tiles(&mut SpecialContext {
            grid: &mut grid,
            rng: &mut self.rng,
            rules: &self.rules,
            level,
            special_budget: scaling.special_budget,
            path_tiles: &path_tiles,
            start,
            end,
        });

        let path_graph = build_path_graph(&grid);
        let map = GameMap {
            grid: grid.into_tiles(),
            path_graph,
            level_config: MapConfig {
                level,
                size: GridSize { width: scaling.width, height: scaling.height },
                start_position: start,
                end_position: end,
                special_tiles,
                difficulty: level,
            },
            path_tiles,
        };
        check_consistency(&map)?;

        tracing::debug!(
            level,
            width = scaling.width,
            height = scaling.height,
            path_tiles = map.path_tiles.len(),
            branches,
            special_tiles = map.level_config.special_tiles.len(),
            end_x = end.x,
            end_y = end.y,
            "generated level map"
        );
        Ok(map)
    }
}
