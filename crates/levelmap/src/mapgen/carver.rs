//! Randomized path carving: one self-avoiding main walk from the start tile,
//! with optional single-step-at-a-time side branches.
//!
//! The walk runs on an explicit frame stack so stack depth does not grow with
//! the level. Frame order reproduces depth-first carving: the main path is
//! carved to its full length first, then branch rolls resolve from the deepest
//! main-path tile back towards the start, each spawned branch being carved to
//! completion before the next roll.

use rand_chacha::ChaCha8Rng;

use crate::types::{Direction, Pos, TileKind};

use super::grid::TileGrid;
use super::seed::{random_unit, shuffle};

enum Frame {
    Carve { pos: Pos, remaining: u32, main_path: bool },
    /// Branch roll owed by a main-path step that had `remaining` steps left
    /// before it moved onto `pos`.
    BranchRoll { pos: Pos, remaining: u32 },
}

pub(super) struct CarveContext<'a> {
    pub(super) grid: &'a mut TileGrid,
    pub(super) rng: &'a mut ChaCha8Rng,
    pub(super) path_tiles: &'a mut Vec<Pos>,
    pub(super) branch_chance: f64,
}

/// Carves from `start` (already claimed by the caller) and returns how many
/// branches were spawned.
pub(super) fn carve_paths(context: &mut CarveContext<'_>, start: Pos, length: u32) -> usize {
    let mut branches = 0;
    let mut stack = vec![Frame::Carve { pos: start, remaining: length, main_path: true }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Carve { pos, remaining, main_path } => {
                if remaining == 0 {
                    continue;
                }
                let Some(next) = step_to_open_neighbor(context, pos) else {
                    continue;
                };
                // Pushed first so it resolves after everything carved below `next`.
                if main_path && remaining > 2 {
                    stack.push(Frame::BranchRoll { pos: next, remaining });
                }
                stack.push(Frame::Carve { pos: next, remaining: remaining - 1, main_path });
            }
            Frame::BranchRoll { pos, remaining } => {
                if random_unit(context.rng) < context.branch_chance {
                    branches += 1;
                    tracing::trace!(x = pos.x, y = pos.y, steps = remaining / 2, "spawning branch");
                    stack.push(Frame::Carve { pos, remaining: remaining / 2, main_path: false });
                }
            }
        }
    }

    branches
}

/// Tries directions in a fresh random order and takes the first open one.
fn step_to_open_neighbor(context: &mut CarveContext<'_>, from: Pos) -> Option<Pos> {
    let mut directions = Direction::ALL;
    shuffle(context.rng, &mut directions);

    let direction =
        directions.into_iter().find(|&direction| context.grid.is_open(from.step(direction)))?;
    let next = context.grid.connect(from, direction);
    let tile = context.grid.tile_mut(next);
    tile.visited = true;
    tile.kind = TileKind::Path;
    context.path_tiles.push(next);
    Some(next)
}
