//! Adjacency view over occupied tiles, read straight off connection flags.

use super::grid::TileGrid;
use super::model::PathGraph;

pub(super) fn build_path_graph(grid: &TileGrid) -> PathGraph {
    let mut graph = PathGraph::default();
    for tile in grid.tiles() {
        if !tile.kind.is_occupied() {
            continue;
        }
        let neighbors = tile
            .connections
            .open_directions()
            .map(|direction| tile.pos.step(direction))
            .filter(|&neighbor| grid.contains(neighbor))
            .collect();
        graph.insert(tile.pos, neighbors);
    }
    graph
}
