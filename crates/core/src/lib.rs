pub mod assets;
pub mod combat;
pub mod config;
pub mod content;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod mapgen;
pub mod physics;
pub mod rng;
pub mod timer;
pub mod types;
pub mod world;

pub use assets::AssetRepository;
pub use config::{Constants, GameConfig};
pub use entity::{Entity, EntityKind};
pub use error::{AssetKind, CrawlerError, Result};
pub use mapgen::{GeneratedLevel, LevelGenerator, LevelLayout, RoomConnection, generate_level};
pub use rng::GameRng;
pub use timer::TimerScheduler;
pub use types::*;
pub use world::{TimedAction, World, WorldEvent};
