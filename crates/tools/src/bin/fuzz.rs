use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use levelmap::mapgen::{DEFAULT_MAX_LEVEL, MapGenerator};
use levelmap::{GameMap, Pos, TileKind};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    runs: u32,
    #[arg(short, long, default_value_t = 30)]
    max_level: u32,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(env_filter).with(fmt::layer()).init();

    let args = Args::parse();
    validate_args(&args)?;

    println!("Starting map fuzz on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for run in 0..args.runs {
        let map_seed = rng.next_u64();
        let level = 1 + (rng.next_u64() % u64::from(args.max_level)) as u32;

        let map = MapGenerator::new(map_seed).generate(level).with_context(|| {
            format!("run {run}: generation failed (seed {map_seed}, level {level})")
        })?;
        check_invariants(&map, level)
            .map_err(|reason| anyhow!("run {run} (seed {map_seed}, level {level}): {reason}"))?;
        tracing::debug!(run, map_seed, level, fingerprint = map.fingerprint(), "map ok");
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

fn validate_args(args: &Args) -> Result<()> {
    ensure!(
        (1..=DEFAULT_MAX_LEVEL).contains(&args.max_level),
        "--max-level must lie in 1..={DEFAULT_MAX_LEVEL}"
    );
    Ok(())
}

fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

fn check_invariants(map: &GameMap, level: u32) -> Result<(), String> {
    let side = 5 + (level as usize) / 2;
    if map.grid.len() != side * side {
        return Err(format!("Invariant failed: grid has {} tiles", map.grid.len()));
    }

    let start_count = map.grid.iter().filter(|tile| tile.kind == TileKind::Start).count();
    let end_count = map.grid.iter().filter(|tile| tile.kind == TileKind::End).count();
    if start_count != 1 || end_count != usize::from(map.start() != map.end()) {
        return Err(format!("Invariant failed: {start_count} start / {end_count} end tiles"));
    }

    for tile in &map.grid {
        for direction in tile.connections.open_directions() {
            let reciprocal = map
                .tile_at(tile.pos.step(direction))
                .is_some_and(|other| other.connections.is_open(direction.opposite()));
            if !reciprocal {
                return Err(format!("Invariant failed: one-sided connection at {:?}", tile.pos));
            }
        }
        if map.path_graph.contains(tile.pos) != (tile.kind != TileKind::Empty) {
            return Err(format!("Invariant failed: graph membership at {:?}", tile.pos));
        }
    }

    let farthest = map.path_tiles.iter().map(|&pos| manhattan(pos, map.start())).max();
    if farthest != Some(manhattan(map.end(), map.start())) {
        return Err("Invariant failed: end is not the farthest path tile".to_string());
    }
    if !map.path_graph.reachable_from(map.start()).contains(&map.end()) {
        return Err("Invariant failed: end unreachable from start".to_string());
    }

    let expected_specials = ((level as usize * 3) / 2).min(map.path_tiles.len().saturating_sub(2));
    let specials = &map.level_config.special_tiles;
    if specials.len() != expected_specials
        || specials.iter().any(|special| special.pos == map.start() || special.pos == map.end())
    {
        return Err("Invariant failed: special tile count or placement".to_string());
    }

    Ok(())
}
