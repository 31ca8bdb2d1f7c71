//! Structural self-check run on every map before it leaves the generator.

use crate::error::MapGenError;
use crate::types::{Pos, TileKind};

use super::grid::in_bounds;
use super::model::GameMap;

pub(super) fn check_consistency(map: &GameMap) -> Result<(), MapGenError> {
    let (width, height) = (map.width(), map.height());
    if map.grid.len() != width * height {
        return Err(fault(Pos { y: 0, x: 0 }, "grid size does not match configured dimensions"));
    }

    let mut start_tiles = 0_usize;
    let mut end_tiles = 0_usize;

    for tile in &map.grid {
        match tile.kind {
            TileKind::Start => {
                start_tiles += 1;
                if tile.pos != map.start() {
                    return Err(fault(tile.pos, "start tile away from recorded start position"));
                }
            }
            TileKind::End => {
                end_tiles += 1;
                if tile.pos != map.end() {
                    return Err(fault(tile.pos, "end tile away from recorded end position"));
                }
            }
            _ => {}
        }

        let mut expected_neighbors = Vec::new();
        for direction in tile.connections.open_directions() {
            let neighbor = tile.pos.step(direction);
            if !in_bounds(width, height, neighbor) {
                return Err(fault(tile.pos, &format!("{direction:?} connection leaves the grid")));
            }
            let reciprocal = map
                .tile_at(neighbor)
                .is_some_and(|other| other.connections.is_open(direction.opposite()));
            if !reciprocal {
                return Err(fault(tile.pos, &format!("{direction:?} connection is one-sided")));
            }
            expected_neighbors.push(neighbor);
        }

        match (tile.kind.is_occupied(), map.path_graph.neighbors(tile.pos)) {
            (true, Some(neighbors)) if neighbors == expected_neighbors.as_slice() => {}
            (true, Some(_)) => {
                return Err(fault(tile.pos, "graph neighbours disagree with connections"));
            }
            (true, None) => return Err(fault(tile.pos, "occupied tile missing from graph")),
            (false, Some(_)) => return Err(fault(tile.pos, "empty tile present in graph")),
            (false, None) if tile.connections.any() => {
                return Err(fault(tile.pos, "empty tile has open connections"));
            }
            (false, None) => {}
        }
    }

    if map.path_graph.len() != map.grid.iter().filter(|tile| tile.kind.is_occupied()).count() {
        return Err(fault(map.start(), "graph holds keys outside the grid"));
    }

    let degenerate = map.start() == map.end();
    let expected_end_tiles = usize::from(!degenerate);
    if start_tiles != 1 || end_tiles != expected_end_tiles {
        return Err(fault(
            map.start(),
            &format!("found {start_tiles} start and {end_tiles} end tiles"),
        ));
    }

    Ok(())
}

fn fault(pos: Pos, reason: &str) -> MapGenError {
    MapGenError::InternalInconsistency { pos, reason: reason.to_string() }
}
