//! Combat and treasure placement along the carved path.

use rand_chacha::ChaCha8Rng;

use crate::types::{Pos, TileKind};

use super::grid::TileGrid;
use super::model::{Special, SpecialTile};
use super::progression::GenerationRules;
use super::seed::{random_unit, shuffle};

pub(super) struct SpecialContext<'a> {
    pub(super) grid: &'a mut TileGrid,
    pub(super) rng: &'a mut ChaCha8Rng,
    pub(super) rules: &'a GenerationRules,
    pub(super) level: u32,
    pub(super) special_budget: usize,
    pub(super) path_tiles: &'a [Pos],
    pub(super) start: Pos,
    pub(super) end: Pos,
}

/// Converts up to `special_budget` carved tiles into encounters. Start and end
/// are never candidates.
pub(super) fn place_special_tiles(context: &mut SpecialContext<'_>) -> Vec<SpecialTile> {
    let special_count = context.special_budget.min(context.path_tiles.len().saturating_sub(2));

    let mut candidates: Vec<Pos> = context
        .path_tiles
        .iter()
        .copied()
        .filter(|&pos| pos != context.start && pos != context.end)
        .collect();
    shuffle(context.rng, &mut candidates);

    let level = f64::from(context.level);
    let mut special_tiles = Vec::with_capacity(special_count);
    for pos in candidates.into_iter().take(special_count) {
        let (kind, special) = if random_unit(context.rng) < context.rules.combat_chance {
            let difficulty =
                level * context.rules.combat_difficulty_factor + random_unit(context.rng) * level;
            (TileKind::Combat, Special::Combat { difficulty })
        } else {
            let spread =
                f64::from(context.level.saturating_mul(context.rules.treasure_value_growth));
            let value =
                (f64::from(context.rules.treasure_base_value) + spread * random_unit(context.rng))
                    .floor() as u32;
            (TileKind::Treasure, Special::Treasure { value })
        };

        let tile = context.grid.tile_mut(pos);
        tile.kind = kind;
        tile.special = special;
        special_tiles.push(SpecialTile { kind, pos });
    }

    special_tiles
}
