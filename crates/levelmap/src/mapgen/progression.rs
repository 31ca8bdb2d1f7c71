//! Level progression rules: how grid size, path length, branching, and
//! encounter density scale with the requested level.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::MapGenError;

pub const DEFAULT_MAX_LEVEL: u32 = 1_000;

/// Largest grid side any rule set may produce at its `max_level`.
const MAX_GRID_SIDE: usize = 2_048;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationRules {
    pub base_size: usize,
    pub size_growth: f64,
    pub base_path_length: u32,
    pub path_growth: u32,
    pub branch_chance_base: f64,
    pub branch_chance_growth: f64,
    pub branch_chance_cap: f64,
    pub special_ratio: f64,
    pub combat_chance: f64,
    pub combat_difficulty_factor: f64,
    pub treasure_base_value: u32,
    pub treasure_value_growth: u32,
    pub max_level: u32,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            base_size: 5,
            size_growth: 0.5,
            base_path_length: 5,
            path_growth: 2,
            branch_chance_base: 0.1,
            branch_chance_growth: 0.03,
            branch_chance_cap: 0.4,
            special_ratio: 1.5,
            combat_chance: 0.7,
            combat_difficulty_factor: 0.5,
            treasure_base_value: 10,
            treasure_value_growth: 5,
            max_level: DEFAULT_MAX_LEVEL,
        }
    }
}

impl GenerationRules {
    pub fn from_toml_str(source: &str) -> Result<Self, MapGenError> {
        let rules: Self = toml::from_str(source)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: &Path) -> Result<Self, MapGenError> {
        let source = fs::read_to_string(path)
            .map_err(|source| MapGenError::RulesIo { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.base_size == 0 {
            return Err(invalid("base_size must be at least 1"));
        }
        if self.max_level == 0 {
            return Err(invalid("max_level must be at least 1"));
        }
        for (name, value) in [
            ("size_growth", self.size_growth),
            ("branch_chance_growth", self.branch_chance_growth),
            ("special_ratio", self.special_ratio),
            ("combat_difficulty_factor", self.combat_difficulty_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{name} must be a finite non-negative number")));
            }
        }
        for (name, value) in [
            ("branch_chance_base", self.branch_chance_base),
            ("branch_chance_cap", self.branch_chance_cap),
            ("combat_chance", self.combat_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!("{name} must lie in [0, 1]")));
            }
        }

        let largest_side = self.side_for_level(self.max_level);
        if largest_side > MAX_GRID_SIDE {
            return Err(invalid(&format!(
                "grid side {largest_side} at max_level {} exceeds {MAX_GRID_SIDE}",
                self.max_level
            )));
        }
        Ok(())
    }

    fn side_for_level(&self, level: u32) -> usize {
        self.base_size.saturating_add(scaled_floor(level, self.size_growth))
    }
}

/// Everything about a level that does not depend on random draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelScaling {
    pub level: u32,
    pub width: usize,
    pub height: usize,
    /// Steps the main path attempts to carve beyond the start tile.
    pub min_path_length: u32,
    pub branch_chance: f64,
    /// Desired special-tile count before clamping to the carved path.
    pub special_budget: usize,
}

impl LevelScaling {
    pub fn for_level(rules: &GenerationRules, level: u32) -> Result<Self, MapGenError> {
        if level == 0 || level > rules.max_level {
            return Err(MapGenError::InvalidLevel { level, max_level: rules.max_level });
        }

        let side = rules.side_for_level(level);
        let branch_chance = (rules.branch_chance_base
            + f64::from(level) * rules.branch_chance_growth)
            .min(rules.branch_chance_cap);

        Ok(Self {
            level,
            width: side,
            height: side,
            min_path_length: rules
                .base_path_length
                .saturating_add(level.saturating_mul(rules.path_growth)),
            branch_chance,
            special_budget: scaled_floor(level, rules.special_ratio),
        })
    }
}

fn scaled_floor(level: u32, factor: f64) -> usize {
    (f64::from(level) * factor).floor() as usize
}

fn invalid(reason: &str) -> MapGenError {
    MapGenError::InvalidRules { reason: reason.to_string() }
}
