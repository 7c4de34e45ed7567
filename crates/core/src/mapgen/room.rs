//! A single dungeon cell: floor grid, walls with passages, doors and spawned content.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::assets::AssetRepository;
use crate::config::GameConfig;
use crate::content::keys;
use crate::entity::Entity;
use crate::error::{AssetKind, CrawlerError, Result};
use crate::rng::GameRng;
use crate::types::{TextureRef, Vec2};

use super::model::{RoomConnection, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WallSlot {
    Corner,
    Mid(usize),
    Cap,
}

#[derive(Clone, Debug)]
struct BackWallTile {
    tile: Tile,
    slot: WallSlot,
}

/// Everything `populate` needs besides the room itself.
pub struct PopulateContext<'a> {
    pub hostile_names: &'a [String],
    pub max_mobs: usize,
    pub max_chests: usize,
    pub assets: &'a AssetRepository,
    pub config: &'a GameConfig,
}

/// Room geometry lives in local tile-index space until [`Room::shift`] moves it into
/// world space. Floor tiles are indexed `[x][y]`, with `y` growing towards the back wall.
#[derive(Clone, Debug)]
pub struct Room {
    pub level: u32,
    pub size: usize,
    pub passage_size: usize,
    pub connections: BTreeSet<RoomConnection>,
    pub spawn_mobs: bool,
    tile_size: f32,
    floor: Vec<Vec<Tile>>,
    passage_floor: Vec<Tile>,
    back_walls: Vec<BackWallTile>,
    side_walls: Vec<Tile>,
    pub chests: Vec<Entity>,
    pub mobs: Vec<Entity>,
}

impl Room {
    pub fn new(level: u32, size: usize, passage_size: usize) -> Self {
        Self {
            level,
            size,
            passage_size,
            connections: BTreeSet::new(),
            spawn_mobs: true,
            tile_size: 0.0,
            floor: Vec::new(),
            passage_floor: Vec::new(),
            back_walls: Vec::new(),
            side_walls: Vec::new(),
            chests: Vec::new(),
            mobs: Vec::new(),
        }
    }

    /// Tile indices left open where a connection passes through a wall.
    pub fn passage_range(&self) -> Range<usize> {
        let start = (self.size - self.passage_size) / 2;
        start..start + self.passage_size
    }

    pub fn has(&self, connection: RoomConnection) -> bool {
        self.connections.contains(&connection)
    }

    pub fn build(
        &mut self,
        assets: &AssetRepository,
        config: &GameConfig,
        rng: &mut GameRng,
    ) -> Result<()> {
        let floor_textures = keys::FLOOR_VARIANTS
            .iter()
            .map(|name| assets.static_texture(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        let Some(reference) = floor_textures.first() else {
            return Err(CrawlerError::not_found(AssetKind::Texture, keys::FLOOR_VARIANTS[0]));
        };
        self.tile_size = config.tile_size_px();
        // Every room sprite shares the floor's scale factor.
        let scale = if reference.width == 0 { 1.0 } else { self.tile_size / reference.width as f32 };

        self.build_floor(&floor_textures, scale, rng);
        self.back_walls.clear();
        self.side_walls.clear();
        self.build_back_wall(assets, config, scale, rng)?;
        self.build_side_walls(assets, scale)?;
        Ok(())
    }

    fn tile(&self, texture: TextureRef, column: usize, row: usize, scale: f32) -> Tile {
        let width = texture.width as f32 * scale;
        Tile {
            texture,
            position: Vec2::new(column as f32 * self.tile_size, row as f32 * self.tile_size),
            width,
        }
    }

    fn build_floor(&mut self, textures: &[TextureRef], scale: f32, rng: &mut GameRng) {
        let mut floor = Vec::with_capacity(self.size);
        for x in 0..self.size {
            let mut column = Vec::with_capacity(self.size);
            for y in 0..self.size {
                let texture = textures[rng.index(textures.len())].clone();
                column.push(self.tile(texture, x, y, scale));
            }
            floor.push(column);
        }
        self.floor = floor;

        self.passage_floor.clear();
        if self.has(RoomConnection::Top) {
            for index in self.passage_range() {
                let texture = textures[rng.index(textures.len())].clone();
                let tile = self.tile(texture, index, self.size, scale);
                self.passage_floor.push(tile);
            }
        }
    }

    fn build_back_wall(
        &mut self,
        assets: &AssetRepository,
        config: &GameConfig,
        scale: f32,
        rng: &mut GameRng,
    ) -> Result<()> {
        let max = self.size - 1;
        let row = self.size;
        let mid = assets.static_texture(keys::WALL_MID)?;
        let cap = assets.static_texture(keys::WALL_TOP_MID)?;
        let left = if self.has(RoomConnection::Left) {
            mid
        } else {
            assets.static_texture(keys::WALL_CORNER_LEFT)?
        };
        let right = assets.static_texture(keys::WALL_CORNER_RIGHT)?;
        let top_left = assets.static_texture(keys::WALL_CORNER_TOP_LEFT)?;
        let top_right = assets.static_texture(keys::WALL_CORNER_TOP_RIGHT)?;

        let mut walls = vec![
            BackWallTile { tile: self.tile(left.clone(), 0, row, scale), slot: WallSlot::Corner },
            BackWallTile { tile: self.tile(top_left.clone(), 0, row + 1, scale), slot: WallSlot::Corner },
            BackWallTile { tile: self.tile(right.clone(), max, row, scale), slot: WallSlot::Corner },
            BackWallTile {
                tile: self.tile(top_right.clone(), max, row + 1, scale),
                slot: WallSlot::Corner,
            },
        ];

        let passage = self.passage_range();
        for index in 0..max {
            if self.has(RoomConnection::Top) && passage.contains(&index) {
                continue;
            }
            let texture = if rng.chance(config.constants.special_wall_chance) {
                let name = keys::SPECIAL_WALL_VARIANTS[rng.index(keys::SPECIAL_WALL_VARIANTS.len())];
                assets.static_texture(name)?
            } else {
                mid
            };
            walls.push(BackWallTile {
                tile: self.tile(texture.clone(), index, row, scale),
                slot: WallSlot::Mid(index),
            });
            walls.push(BackWallTile { tile: self.tile(cap.clone(), index, row + 1, scale), slot: WallSlot::Cap });
        }

        self.back_walls = walls;
        Ok(())
    }

    fn build_side_walls(&mut self, assets: &AssetRepository, scale: f32) -> Result<()> {
        let max = self.size - 1;
        let mut walls = Vec::new();

        if !self.has(RoomConnection::Bottom) {
            let texture = assets.static_texture(keys::WALL_TOP_MID)?;
            for index in 0..=max {
                walls.push(self.tile(texture.clone(), index, 0, scale));
            }
        }

        let texture = assets.static_texture(keys::WALL_SIDE_MID_LEFT)?;
        let passage = self.passage_range();
        for index in 0..=max {
            if self.has(RoomConnection::Right) && passage.contains(&index) {
                continue;
            }
            walls.push(self.tile(texture.clone(), max, index, scale));
        }

        if !self.has(RoomConnection::Left) {
            let texture = assets.static_texture(keys::WALL_SIDE_MID_RIGHT)?;
            for index in 0..=max {
                walls.push(self.tile(texture.clone(), 0, index, scale));
            }
        }

        self.side_walls = walls;
        Ok(())
    }

    pub fn shift(&mut self, delta: Vec2) {
        let tiles = self
            .floor
            .iter_mut()
            .flatten()
            .chain(self.passage_floor.iter_mut())
            .chain(self.back_walls.iter_mut().map(|wall| &mut wall.tile))
            .chain(self.side_walls.iter_mut());
        for tile in tiles {
            tile.position += delta;
        }
    }

    /// Position of the floor tile just above the middle one; placement math is anchored here.
    pub fn center(&self) -> Vec2 {
        let index = self.size / 2;
        self.floor
            .get(index)
            .and_then(|column| column.get(index + 1))
            .map_or(Vec2::ZERO, |tile| tile.position)
    }

    pub fn dim_px(&self) -> f32 {
        self.size as f32 * self.tile_size
    }

    pub fn floor_position(&self, x: usize, y: usize) -> Option<Vec2> {
        self.floor.get(x).and_then(|column| column.get(y)).map(|tile| tile.position)
    }

    /// Entry rooms never spawn mobs.
    pub fn make_entry(&mut self, assets: &AssetRepository, config: &GameConfig) -> Result<Entity> {
        self.spawn_mobs = false;
        self.make_door(false, assets, config)
    }

    pub fn make_exit(&mut self, assets: &AssetRepository, config: &GameConfig) -> Result<Entity> {
        self.make_door(true, assets, config)
    }

    /// Places a door above the middle of the back row and knocks out the wall piece behind it.
    fn make_door(&mut self, is_exit: bool, assets: &AssetRepository, config: &GameConfig) -> Result<Entity> {
        let mut door = Entity::door(is_exit, self.level, assets, config)?;
        let anchor = self.floor_position(self.size / 2, self.size - 1).unwrap_or(Vec2::ZERO);
        door.position = anchor + Vec2::new(0.0, door.height);

        let column = self.size / 2;
        if let Some(index) = self.back_walls.iter().position(|wall| wall.slot == WallSlot::Mid(column)) {
            self.back_walls.remove(index);
        }
        Ok(door)
    }

    /// Fills interior tiles with at most `max_chests` chests and `max_mobs` mobs of a single
    /// type picked for the whole room. Must run after the room reached its world position.
    pub fn populate(&mut self, context: &PopulateContext<'_>, rng: &mut GameRng) -> Result<()> {
        self.chests.clear();
        self.mobs.clear();

        let mob_type = rng.choose(context.hostile_names).cloned();
        let spawn_chests = rng.chance(context.config.constants.room_chest_chance);

        let inner = self.size.saturating_sub(2);
        let cells: Vec<(usize, usize)> =
            (0..inner).flat_map(|x| (0..inner).map(move |y| (x + 1, y + 1))).collect();
        if cells.is_empty() {
            return Ok(());
        }
        let cell_count = cells.len() as f64;

        let max_mobs = if self.spawn_mobs && mob_type.is_some() { context.max_mobs } else { 0 };
        let chest_chance = context.max_chests as f64 / cell_count;
        let mob_chance = max_mobs as f64 / cell_count;

        for (x, y) in cells {
            let position = self.floor_position(x, y).unwrap_or(Vec2::ZERO);

            if spawn_chests && self.chests.len() < context.max_chests && rng.chance(chest_chance) {
                let mut chest = Entity::chest(self.level, context.assets, context.config)?;
                chest.position = position;
                self.chests.push(chest);
                continue;
            }

            if self.mobs.len() < max_mobs && rng.chance(mob_chance) {
                let Some(name) = mob_type.as_deref() else {
                    continue;
                };
                let mut mob = context.assets.entity_template(name)?.instantiate(context.config);
                mob.set_level(self.level, &context.config.constants);
                mob.position = position;
                self.mobs.push(mob);
            }
        }
        Ok(())
    }

    pub fn floor_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.floor.iter().flatten().chain(self.passage_floor.iter())
    }

    pub fn wall_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.back_walls.iter().map(|wall| &wall.tile).chain(self.side_walls.iter())
    }
}
