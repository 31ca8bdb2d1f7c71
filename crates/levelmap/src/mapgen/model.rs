//! Public data models for generated level maps.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Serialize, Serializer};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Direction, Pos, TileKind};

/// Traversability flags, one per [`Direction`]. Always set in matched pairs on
/// two neighbouring tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Connections([bool; 4]);

impl Connections {
    pub fn is_open(self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub(super) fn open(&mut self, direction: Direction) {
        self.0[direction.index()] = true;
    }

    /// Open directions in N, E, S, W order.
    pub fn open_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&direction| self.is_open(direction))
    }

    pub fn any(self) -> bool {
        self.0.iter().any(|&open| open)
    }

    fn bits(self) -> u8 {
        self.0.iter().enumerate().fold(0, |acc, (index, &open)| acc | (u8::from(open) << index))
    }
}

/// Encounter payload. Only Combat and Treasure tiles carry one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Special {
    #[default]
    None,
    Combat {
        difficulty: f64,
    },
    Treasure {
        value: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tile {
    pub kind: TileKind,
    pub connections: Connections,
    /// Set once the carver has claimed the tile.
    pub visited: bool,
    pub pos: Pos,
    pub special: Special,
}

impl Tile {
    pub(super) fn empty(pos: Pos) -> Self {
        Self {
            kind: TileKind::Empty,
            connections: Connections::default(),
            visited: false,
            pos,
            special: Special::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SpecialTile {
    pub kind: TileKind,
    pub pos: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapConfig {
    pub level: u32,
    pub size: GridSize,
    pub start_position: Pos,
    pub end_position: Pos,
    pub special_tiles: Vec<SpecialTile>,
    /// Mirrors `level`.
    pub difficulty: u32,
}

/// Adjacency over occupied tiles, derived from tile connections. Neighbour
/// lists follow N, E, S, W order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathGraph {
    adjacency: BTreeMap<Pos, Vec<Pos>>,
}

impl PathGraph {
    pub(super) fn insert(&mut self, pos: Pos, neighbors: Vec<Pos>) {
        self.adjacency.insert(pos, neighbors);
    }

    pub fn neighbors(&self, pos: Pos) -> Option<&[Pos]> {
        self.adjacency.get(&pos).map(Vec::as_slice)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.adjacency.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &[Pos])> {
        self.adjacency.iter().map(|(&pos, neighbors)| (pos, neighbors.as_slice()))
    }

    /// Breadth-first closure of `from` over graph edges.
    pub fn reachable_from(&self, from: Pos) -> BTreeSet<Pos> {
        let mut seen = BTreeSet::new();
        if !self.contains(from) {
            return seen;
        }
        seen.insert(from);
        let mut open = VecDeque::from([from]);
        while let Some(pos) = open.pop_front() {
            for &next in self.neighbors(pos).unwrap_or_default() {
                if seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen
    }
}

#[derive(Serialize)]
struct GraphEntry<'a> {
    pos: Pos,
    neighbors: &'a [Pos],
}

impl Serialize for PathGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(pos, neighbors)| GraphEntry { pos, neighbors }))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameMap {
    /// Row-major, `height * width` tiles.
    pub grid: Vec<Tile>,
    pub path_graph: PathGraph,
    pub level_config: MapConfig,
    /// Carved tiles in visit order, start first.
    pub path_tiles: Vec<Pos>,
}

impl GameMap {
    pub fn width(&self) -> usize {
        self.level_config.size.width
    }

    pub fn height(&self) -> usize {
        self.level_config.size.height
    }

    pub fn start(&self) -> Pos {
        self.level_config.start_position
    }

    pub fn end(&self) -> Pos {
        self.level_config.end_position
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let x = pos.x as usize;
        let y = pos.y as usize;
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.grid.get(y * self.width() + x)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.grid.chunks(self.width().max(1))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.level_config.level.to_le_bytes());
        bytes.extend((self.width() as u32).to_le_bytes());
        bytes.extend((self.height() as u32).to_le_bytes());
        for tile in &self.grid {
            bytes.push(kind_code(tile.kind));
            bytes.push(tile.connections.bits());
            bytes.push(u8::from(tile.visited));
            match tile.special {
                Special::None => bytes.push(0),
                Special::Combat { difficulty } => {
                    bytes.push(1);
                    bytes.extend(difficulty.to_bits().to_le_bytes());
                }
                Special::Treasure { value } => {
                    bytes.push(2);
                    bytes.extend(value.to_le_bytes());
                }
            }
        }

        push_pos(&mut bytes, self.start());
        push_pos(&mut bytes, self.end());

        bytes.extend((self.level_config.special_tiles.len() as u32).to_le_bytes());
        for special in &self.level_config.special_tiles {
            bytes.push(kind_code(special.kind));
            push_pos(&mut bytes, special.pos);
        }

        bytes.extend((self.path_tiles.len() as u32).to_le_bytes());
        for &pos in &self.path_tiles {
            push_pos(&mut bytes, pos);
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_pos(bytes: &mut Vec<u8>, pos: Pos) {
    bytes.extend(pos.y.to_le_bytes());
    bytes.extend(pos.x.to_le_bytes());
}

fn kind_code(kind: TileKind) -> u8 {
    match kind {
        TileKind::Empty => 0,
        TileKind::Start => 1,
        TileKind::End => 2,
        TileKind::Path => 3,
        TileKind::Combat => 4,
        TileKind::Treasure => 5,
    }
}
