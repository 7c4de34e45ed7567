//! Level generation orchestration: placement, build, world shift, doors, population.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::assets::AssetRepository;
use crate::config::GameConfig;
use crate::entity::Entity;
use crate::error::{CrawlerError, Result};
use crate::rng::GameRng;
use crate::types::Vec2;

use super::grid::{Cell, place_rooms, select_door_pair};
use super::model::{GeneratedLevel, LevelLayout, RoomConnection, RoomSummary};
use super::room::{PopulateContext, Room};

pub struct LevelGenerator<'a> {
    level: u32,
    config: &'a GameConfig,
    assets: &'a AssetRepository,
    rng: GameRng,
}

impl<'a> LevelGenerator<'a> {
    pub fn new(level: u32, config: &'a GameConfig, assets: &'a AssetRepository) -> Self {
        Self { level, config, assets, rng: GameRng::from_entropy() }
    }

    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    /// Fails with [`CrawlerError::Config`] before drawing anything if the constants are invalid.
    pub fn generate(&mut self) -> Result<GeneratedLevel> {
        self.config.validate()?;
        let constants = &self.config.constants;
        let occupancy =
            place_rooms(constants.generator_grid_size, constants.generator_probability_decay, &mut self.rng);

        let mut rooms = BTreeMap::new();
        for cell in occupancy.occupied_cells() {
            let mut room =
                Room::new(self.level, constants.generator_room_size, constants.generator_passage_size);
            room.connections = occupancy.connections(cell);
            room.build(self.assets, self.config, &mut self.rng)?;
            rooms.insert(cell, room);
        }

        shift_rooms(&mut rooms, occupancy.center());

        let (entry, exit) = pick_door_rooms(&rooms)?;

        let mut doors = Vec::with_capacity(2);
        let mut player_start = Vec2::ZERO;
        if let Some(room) = rooms.get_mut(&entry) {
            doors.push(room.make_entry(self.assets, self.config)?);
            player_start = room.center() + Vec2::new(0.0, room.dim_px() / 3.0);
        }
        if let Some(room) = rooms.get_mut(&exit) {
            doors.push(room.make_exit(self.assets, self.config)?);
        }
        debug!(?entry, ?exit, "doors_placed");

        let hostile_names = self.assets.hostile_template_names();
        let context = PopulateContext {
            hostile_names: &hostile_names,
            max_mobs: constants.generator_max_mobs,
            max_chests: constants.generator_max_chests,
            assets: self.assets,
            config: self.config,
        };
        for room in rooms.values_mut() {
            room.populate(&context, &mut self.rng)?;
        }

        let level = flatten(self.level, occupancy.size(), rooms, doors, player_start, (entry, exit));
        info!(
            level = level.level,
            rooms = level.room_count(),
            mobs = level.mobs.len(),
            chests = level.chests.len(),
            entry = ?entry,
            exit = ?exit,
            player_start_x = level.player_start.x,
            player_start_y = level.player_start.y,
            "level_generated"
        );
        Ok(level)
    }
}

/// Entry and exit cells among the rooms with a free top wall.
fn pick_door_rooms(rooms: &BTreeMap<Cell, Room>) -> Result<(Cell, Cell)> {
    let candidates: Vec<Cell> = rooms
        .iter()
        .filter(|(_, room)| !room.has(RoomConnection::Top))
        .map(|(&cell, _)| cell)
        .collect();
    select_door_pair(&candidates)
        .ok_or(CrawlerError::GenerationFailure { candidates: candidates.len() })
}

/// Moves every room from local tile space onto a regular world grid with the center
/// room at the origin and neighbours exactly one room dimension apart.
fn shift_rooms(rooms: &mut BTreeMap<Cell, Room>, center: Cell) {
    for (&(x, y), room) in rooms.iter_mut() {
        let dim = room.dim_px();
        let target = Vec2::new(
            (x as f32 - center.0 as f32) * dim,
            (y as f32 - center.1 as f32) * dim,
        );
        let delta = target - room.center();
        room.shift(delta);
    }
}

fn flatten(
    level: u32,
    grid_size: usize,
    rooms: BTreeMap<Cell, Room>,
    doors: Vec<Entity>,
    player_start: Vec2,
    (entry, exit): (Cell, Cell),
) -> GeneratedLevel {
    let mut floor_tiles = Vec::new();
    let mut wall_tiles = Vec::new();
    let mut mobs = Vec::new();
    let mut chests = Vec::new();
    let mut summaries = Vec::with_capacity(rooms.len());

    for (cell, room) in rooms {
        floor_tiles.extend(room.floor_tiles().cloned());
        wall_tiles.extend(room.wall_tiles().cloned());
        summaries.push(RoomSummary {
            cell,
            connections: room.connections.clone(),
            mobs: room.mobs.len(),
            chests: room.chests.len(),
        });
        mobs.extend(room.mobs);
        chests.extend(room.chests);
    }

    GeneratedLevel {
        level,
        floor_tiles,
        wall_tiles,
        mobs,
        chests,
        doors,
        player_start,
        layout: LevelLayout { grid_size, rooms: summaries, entry, exit },
    }
}
