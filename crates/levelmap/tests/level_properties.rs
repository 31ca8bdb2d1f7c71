use std::collections::BTreeSet;

use levelmap::mapgen::{LevelScaling, Special};
use levelmap::{GameMap, GenerationRules, MapGenError, MapGenerator, Pos, TileKind};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

fn check_map(map: &GameMap, level: u32) -> Result<(), String> {
    let side = 5 + (level as usize) / 2;
    if map.grid.len() != side * side {
        return Err(format!("expected {} tiles, got {}", side * side, map.grid.len()));
    }

    let starts: Vec<Pos> =
        map.grid.iter().filter(|tile| tile.kind == TileKind::Start).map(|tile| tile.pos).collect();
    if starts != vec![Pos { y: (side / 2) as i32, x: 0 }] {
        return Err(format!("unexpected start tiles {starts:?}"));
    }
    let ends: Vec<Pos> =
        map.grid.iter().filter(|tile| tile.kind == TileKind::End).map(|tile| tile.pos).collect();
    let expected_ends = if map.end() == map.start() { vec![] } else { vec![map.end()] };
    if ends != expected_ends {
        return Err(format!("unexpected end tiles {ends:?}"));
    }

    for tile in &map.grid {
        for direction in tile.connections.open_directions() {
            let reciprocal = map
                .tile_at(tile.pos.step(direction))
                .is_some_and(|other| other.connections.is_open(direction.opposite()));
            if !reciprocal {
                return Err(format!("one-sided {direction:?} connection at {:?}", tile.pos));
            }
        }
        if map.path_graph.contains(tile.pos) == (tile.kind == TileKind::Empty) {
            return Err(format!("graph membership wrong for {:?} ({:?})", tile.pos, tile.kind));
        }
    }
    for (pos, neighbors) in map.path_graph.iter() {
        if let Some(missing) = neighbors.iter().find(|&&next| !map.path_graph.contains(next)) {
            return Err(format!("{pos:?} lists {missing:?} which is not a graph key"));
        }
    }

    let brute_force_max =
        map.path_tiles.iter().map(|&pos| manhattan(pos, map.start())).max().unwrap_or(0);
    if manhattan(map.end(), map.start()) != brute_force_max {
        return Err(format!("end {:?} is not the farthest path tile", map.end()));
    }
    let first_farthest =
        map.path_tiles.iter().copied().find(|&pos| manhattan(pos, map.start()) == brute_force_max);
    if first_farthest != Some(map.end()) {
        return Err("end tile does not follow the first-in-visit-order tie break".to_string());
    }
    if !map.path_graph.reachable_from(map.start()).contains(&map.end()) {
        return Err("end is unreachable from start".to_string());
    }

    let unique: BTreeSet<Pos> = map.path_tiles.iter().copied().collect();
    if unique.len() != map.path_tiles.len() || map.path_tiles.first() != Some(&map.start()) {
        return Err("path tiles must be unique and start with the start tile".to_string());
    }

    let expected_specials = ((level as usize * 3) / 2).min(map.path_tiles.len().saturating_sub(2));
    let specials = &map.level_config.special_tiles;
    if specials.len() != expected_specials {
        return Err(format!("expected {expected_specials} specials, got {}", specials.len()));
    }
    for special in specials {
        if special.pos == map.start() || special.pos == map.end() {
            return Err(format!("special tile placed on endpoint {:?}", special.pos));
        }
        let payload_matches = match map.tile_at(special.pos).map(|tile| tile.special) {
            Some(Special::Combat { difficulty }) => {
                special.kind == TileKind::Combat
                    && difficulty >= f64::from(level) * 0.5
                    && difficulty < f64::from(level) * 1.5
            }
            Some(Special::Treasure { value }) => {
                special.kind == TileKind::Treasure && value >= 10 && value < 10 + 5 * level
            }
            _ => false,
        };
        if !payload_matches {
            return Err(format!("special tile {special:?} has a mismatched payload"));
        }
    }

    Ok(())
}

#[test]
fn test_generated_maps_satisfy_level_properties() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(256));
    let inputs = (any::<u64>(), 1_u32..=40);

    runner
        .run(&inputs, |(seed, level)| {
            let map = MapGenerator::new(seed)
                .generate(level)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;
            check_map(&map, level).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("generated maps should satisfy every level property");
}

#[test]
fn test_level_one_example() {
    let scaling = LevelScaling::for_level(&GenerationRules::default(), 1).unwrap();
    assert_eq!((scaling.width, scaling.height, scaling.min_path_length), (5, 5, 7));
    assert!((scaling.branch_chance - 0.13).abs() < 1e-9);

    let map = MapGenerator::new(1).generate(1).unwrap();
    assert_eq!(map.grid.len(), 25);
    assert_eq!(map.start(), Pos { y: 2, x: 0 });
    assert_eq!(map.rows().count(), 5);
    assert!(map.rows().all(|row| row.len() == 5));
    check_map(&map, 1).unwrap();
}

#[test]
fn test_level_ten_example() {
    let scaling = LevelScaling::for_level(&GenerationRules::default(), 10).unwrap();
    assert_eq!((scaling.width, scaling.height, scaling.min_path_length), (10, 10, 25));
    assert!((scaling.branch_chance - 0.4).abs() < 1e-9);

    let map = MapGenerator::new(10).generate(10).unwrap();
    let expected = 15_usize.min(map.path_tiles.len() - 2);
    assert_eq!(map.level_config.special_tiles.len(), expected);
    check_map(&map, 10).unwrap();
}

#[test]
fn test_level_zero_is_rejected() {
    let error = MapGenerator::new(3).generate(0).err().expect("level 0 must fail");
    assert!(matches!(error, MapGenError::InvalidLevel { level: 0, .. }));
    assert!(error.to_string().contains("level 0"));
}

#[test]
fn test_serialized_map_uses_structured_graph_entries() {
    let map = MapGenerator::new(8).generate(2).unwrap();
    let json = serde_json::to_value(&map).unwrap();

    let entries = json["path_graph"].as_array().expect("graph serializes as a list");
    assert_eq!(entries.len(), map.path_graph.len());
    assert!(entries.iter().all(|entry| entry["pos"].is_object() && entry["neighbors"].is_array()));
    assert_eq!(json["level_config"]["start_position"]["x"], 0);
    assert_eq!(json["grid"].as_array().unwrap().len(), 36);
}
