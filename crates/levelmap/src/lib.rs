pub mod error;
pub mod mapgen;
pub mod types;

pub use error::MapGenError;
pub use mapgen::{
    GameMap, GenerationRules, MapGenerator, generate_map, generate_map_seeded,
    generate_map_with_rules,
};
pub use types::*;
