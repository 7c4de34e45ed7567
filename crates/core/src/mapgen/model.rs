//! Public data models for generated levels: tiles, layout summary and spawned content.

use std::collections::BTreeSet;

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::entity::{Entity, EntityKind, sprite_size};
use crate::types::{Rect, TextureRef, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomConnection {
    Top,
    Right,
    Bottom,
    Left,
}

impl RoomConnection {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];
}

/// A floor or wall sprite: texture, world position of its center and drawn width.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub texture: TextureRef,
    pub position: Vec2,
    pub width: f32,
}

impl Tile {
    /// Collision box; height follows the texture's aspect ratio.
    pub fn bounds(&self) -> Rect {
        let (width, height) = sprite_size(&self.texture, self.width);
        Rect::new(self.position, width, height)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub cell: (usize, usize),
    pub connections: BTreeSet<RoomConnection>,
    pub mobs: usize,
    pub chests: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevelLayout {
    pub grid_size: usize,
    /// Occupied cells, x-major.
    pub rooms: Vec<RoomSummary>,
    pub entry: (usize, usize),
    pub exit: (usize, usize),
}

impl LevelLayout {
    pub fn room(&self, cell: (usize, usize)) -> Option<&RoomSummary> {
        self.rooms.iter().find(|room| room.cell == cell)
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    pub level: u32,
    pub floor_tiles: Vec<Tile>,
    pub wall_tiles: Vec<Tile>,
    pub mobs: Vec<Entity>,
    pub chests: Vec<Entity>,
    /// Entry door first, exit door second.
    pub doors: Vec<Entity>,
    pub player_start: Vec2,
    pub layout: LevelLayout,
}

impl GeneratedLevel {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.level.to_le_bytes());
        bytes.extend((self.layout.grid_size as u32).to_le_bytes());
        for room in &self.layout.rooms {
            bytes.extend((room.cell.0 as u32).to_le_bytes());
            bytes.extend((room.cell.1 as u32).to_le_bytes());
            for connection in RoomConnection::ALL {
                bytes.push(u8::from(room.connections.contains(&connection)));
            }
        }
        for cell in [self.layout.entry, self.layout.exit] {
            bytes.extend((cell.0 as u32).to_le_bytes());
            bytes.extend((cell.1 as u32).to_le_bytes());
        }

        for tiles in [&self.floor_tiles, &self.wall_tiles] {
            bytes.extend((tiles.len() as u32).to_le_bytes());
            for tile in tiles.iter() {
                push_str(&mut bytes, &tile.texture.name);
                push_vec(&mut bytes, tile.position);
            }
        }

        for entities in [&self.mobs, &self.chests, &self.doors] {
            bytes.extend((entities.len() as u32).to_le_bytes());
            for entity in entities.iter() {
                bytes.push(match entity.kind {
                    EntityKind::Player(_) => 0,
                    EntityKind::HostileMob => 1,
                    EntityKind::Chest => 2,
                    EntityKind::Door { is_exit: false } => 3,
                    EntityKind::Door { is_exit: true } => 4,
                    EntityKind::Trinket(_) => 5,
                });
                bytes.extend(entity.level.to_le_bytes());
                push_vec(&mut bytes, entity.position);
                if let Some(texture) = entity.current_texture() {
                    push_str(&mut bytes, &texture.name);
                }
            }
        }

        push_vec(&mut bytes, self.player_start);
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn room_count(&self) -> usize {
        self.layout.rooms.len()
    }
}

fn push_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}

fn push_vec(bytes: &mut Vec<u8>, value: Vec2) {
    bytes.extend(value.x.to_bits().to_le_bytes());
    bytes.extend(value.y.to_bits().to_le_bytes());
}
