//! Tunable constants bundle and its JSON persistence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CrawlerError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Constants {
    pub scale: f32,
    pub tile_scale: f32,

    pub player_base_health: f32,
    pub player_base_damage: f32,
    pub player_weapon_swing_speed: f32,
    pub weapon_scale: f32,

    pub attack_ttl: f32,
    pub damage_ttl: f32,
    pub death_ttl: f32,
    pub door_open_delay: f32,
    pub game_over_delay: f32,

    pub pathfinding_range: f32,

    pub trinket_movement_speed: f32,
    pub trinket_scatter_delay_range: (f32, f32),
    pub trinket_duration: f32,
    pub mob_healing_drop_chance: f32,
    pub potion_speed_increase: f32,
    pub potion_health_increase: f32,
    pub potion_damage_increase: f32,

    pub generator_grid_size: usize,
    pub generator_room_size: usize,
    pub generator_passage_size: usize,
    pub generator_probability_decay: f64,
    pub generator_max_mobs: usize,
    pub generator_max_chests: usize,
    pub room_chest_chance: f64,
    pub special_wall_chance: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            scale: 2.0,
            tile_scale: 0.35,
            player_base_health: 20.0,
            player_base_damage: 5.0,
            player_weapon_swing_speed: 1.5,
            weapon_scale: 0.25,
            attack_ttl: 0.2,
            damage_ttl: 0.12,
            death_ttl: 0.5,
            door_open_delay: 0.6,
            game_over_delay: 1.5,
            pathfinding_range: 3.0,
            trinket_movement_speed: 5.0,
            trinket_scatter_delay_range: (0.1, 0.3),
            trinket_duration: 30.0,
            mob_healing_drop_chance: 0.3,
            potion_speed_increase: 0.8,
            potion_health_increase: 0.3,
            potion_damage_increase: 0.3,
            generator_grid_size: 25,
            generator_room_size: 9,
            generator_passage_size: 3,
            generator_probability_decay: 0.7,
            generator_max_mobs: 5,
            generator_max_chests: 1,
            room_chest_chance: 0.3,
            special_wall_chance: 0.35,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub resolution: (u32, u32),
    pub music_volume: f32,
    pub constants: Constants,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { resolution: (1920, 1080), music_volume: 0.2, constants: Constants::default() }
    }
}

impl GameConfig {
    /// Converts abstract distance points into pixels for the configured resolution.
    pub fn pts_to_px(&self, pts: f32) -> f32 {
        self.resolution.0 as f32 / 10.0 * pts * self.constants.scale
    }

    pub fn tile_size_px(&self) -> f32 {
        self.pts_to_px(self.constants.tile_scale)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.constants;
        if c.generator_grid_size < 3 {
            return Err(CrawlerError::Config("generator_grid_size must be at least 3".into()));
        }
        if c.generator_room_size < 3 {
            return Err(CrawlerError::Config("generator_room_size must be at least 3".into()));
        }
        if c.generator_passage_size >= c.generator_room_size {
            return Err(CrawlerError::Config(format!(
                "generator_passage_size ({}) must be smaller than generator_room_size ({})",
                c.generator_passage_size, c.generator_room_size
            )));
        }
        if !(0.0..=1.0).contains(&c.generator_probability_decay) {
            return Err(CrawlerError::Config(
                "generator_probability_decay must be within [0, 1]".into(),
            ));
        }
        let (low, high) = c.trinket_scatter_delay_range;
        if low > high {
            return Err(CrawlerError::Config("trinket_scatter_delay_range is inverted".into()));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| CrawlerError::malformed(&path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json =
            serde_json::to_string_pretty(self).map_err(|e| CrawlerError::Config(e.to_string()))?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
