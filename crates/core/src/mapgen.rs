//! Procedural level generation split into coherent submodules.

pub mod model;

mod generator;
mod grid;
mod room;

pub use generator::LevelGenerator;
pub use grid::{Cell, Occupancy, place_rooms, select_door_pair};
pub use model::{GeneratedLevel, LevelLayout, RoomConnection, RoomSummary, Tile};
pub use room::{PopulateContext, Room};

use crate::assets::AssetRepository;
use crate::config::GameConfig;
use crate::error::Result;
use crate::rng::GameRng;

pub fn generate_level(
    level: u32,
    config: &GameConfig,
    assets: &AssetRepository,
    rng: GameRng,
) -> Result<GeneratedLevel> {
    LevelGenerator::new(level, config, assets).with_rng(rng).generate()
}
