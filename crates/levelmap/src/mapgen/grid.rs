//! Working tile grid plus the tile-space helpers shared by the pipeline stages.

use crate::types::{Direction, Pos};

use super::model::Tile;

pub(super) fn in_bounds(width: usize, height: usize, pos: Pos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
}

pub(super) fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub(super) fn tile_index(pos: Pos, width: usize) -> usize {
    (pos.y as usize) * width + (pos.x as usize)
}

/// Mutable grid the generator stages write into before it is frozen into a
/// `GameMap`.
pub(super) struct TileGrid {
    pub(super) width: usize,
    pub(super) height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub(super) fn new(width: usize, height: usize) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::empty(Pos { y: y as i32, x: x as i32 }));
            }
        }
        Self { width, height, tiles }
    }

    pub(super) fn contains(&self, pos: Pos) -> bool {
        in_bounds(self.width, self.height, pos)
    }

    pub(super) fn tile(&self, pos: Pos) -> &Tile {
        &self.tiles[tile_index(pos, self.width)]
    }

    pub(super) fn tile_mut(&mut self, pos: Pos) -> &mut Tile {
        &mut self.tiles[tile_index(pos, self.width)]
    }

    /// True when `pos` is on the grid and not yet claimed by a carve.
    pub(super) fn is_open(&self, pos: Pos) -> bool {
        self.contains(pos) && !self.tile(pos).visited
    }

    /// Opens the passage between `from` and its neighbour in `direction` on
    /// both tiles and returns the neighbour.
    pub(super) fn connect(&mut self, from: Pos, direction: Direction) -> Pos {
        let to = from.step(direction);
        self.tile_mut(from).connections.open(direction);
        self.tile_mut(to).connections.open(direction.opposite());
        to
    }

    pub(super) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(super) fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

/// Path tile farthest from `start` by Manhattan distance. Ties keep the
/// earliest tile in visit order.
pub(super) fn farthest_path_tile(path_tiles: &[Pos], start: Pos) -> Pos {
    let mut best = path_tiles.first().copied().unwrap_or(start);
    let mut best_distance = manhattan(start, best);
    for &pos in path_tiles {
        let distance = manhattan(start, pos);
        if distance > best_distance {
            best = pos;
            best_distance = distance;
        }
    }
    best
}
