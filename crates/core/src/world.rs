//! Scene context that owns a level's entities, timers and physics, and drives them per frame.
//! This file holds the state and level lifecycle; the frame loop and timed actions live in
//! focused submodules.

use std::mem;
use std::sync::Arc;

use slotmap::SlotMap;
use tracing::{debug, info};

use crate::assets::AssetRepository;
use crate::combat::WeaponSwing;
use crate::config::GameConfig;
use crate::content::keys;
use crate::entity::{AppliedEffect, Entity};
use crate::error::Result;
use crate::mapgen::{GeneratedLevel, LevelGenerator, LevelLayout, Tile};
use crate::physics::{PhysicsBodies, PhysicsBody};
use crate::rng::GameRng;
use crate::timer::TimerScheduler;
use crate::types::{EntityId, EntityState, Rect, SoundRef, Tint, Vec2};

mod actions;
mod frame;

#[cfg(test)]
mod tests;

/// Deferred world mutation carried by a timer. Targets are generational ids, so an
/// action whose entity is gone by the time it fires does nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum TimedAction {
    RestoreAfterDamage { target: EntityId, previous_state: EntityState, previous_tint: Tint },
    Despawn(EntityId),
    ClearAttacking(EntityId),
    MobAttackEnd(EntityId),
    DepositLoot(EntityId),
    PickUp(EntityId),
    ExpireTrinket { target: EntityId, effect: AppliedEffect },
    AdvanceLevel,
    GameOver,
}

/// Notifications for the presentation layer, drained once per frame.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    Sound(SoundRef),
    LevelAdvanced { level: u32 },
    PlayerDied,
    GameOver,
}

/// Sounds the world itself plays, resolved once so a missing one fails at startup.
#[derive(Clone, Debug)]
struct WorldSounds {
    chest_open: SoundRef,
    door_open: SoundRef,
    weapon_swing: SoundRef,
    level_up: SoundRef,
    trinket_pickup: SoundRef,
}

impl WorldSounds {
    fn resolve(assets: &AssetRepository) -> Result<Self> {
        Ok(Self {
            chest_open: assets.sound_effect(keys::SOUND_CHEST_OPEN)?.clone(),
            door_open: assets.sound_effect(keys::SOUND_DOOR_OPEN)?.clone(),
            weapon_swing: assets.sound_effect(keys::SOUND_WEAPON_SWING)?.clone(),
            level_up: assets.sound_effect(keys::SOUND_LEVEL_UP)?.clone(),
            trinket_pickup: assets.sound_effect(keys::SOUND_TRINKET_PICKUP)?.clone(),
        })
    }
}

pub struct World {
    config: GameConfig,
    assets: Arc<AssetRepository>,
    rng: GameRng,
    level: u32,
    entities: SlotMap<EntityId, Entity>,
    player: EntityId,
    mobs: Vec<EntityId>,
    chests: Vec<EntityId>,
    doors: Vec<EntityId>,
    trinkets: Vec<EntityId>,
    floor_tiles: Vec<Tile>,
    wall_tiles: Vec<Tile>,
    walls: Vec<Rect>,
    layout: Option<LevelLayout>,
    bodies: PhysicsBodies,
    timers: TimerScheduler<TimedAction>,
    swings: Vec<WeaponSwing>,
    aim: Option<Vec2>,
    sounds: WorldSounds,
    events: Vec<WorldEvent>,
    game_over: bool,
}

impl World {
    /// Creates the world with its player. No level is loaded until [`World::load_level`].
    pub fn new(config: GameConfig, assets: Arc<AssetRepository>, rng: GameRng) -> Result<Self> {
        config.validate()?;
        let sounds = WorldSounds::resolve(&assets)?;
        let player = assets.entity_template(keys::PLAYER)?.instantiate(&config);

        let mut entities = SlotMap::with_key();
        let player = entities.insert(player);
        let mut bodies = PhysicsBodies::new();
        bodies.insert(player);

        Ok(Self {
            config,
            assets,
            rng,
            level: 0,
            entities,
            player,
            mobs: Vec::new(),
            chests: Vec::new(),
            doors: Vec::new(),
            trinkets: Vec::new(),
            floor_tiles: Vec::new(),
            wall_tiles: Vec::new(),
            walls: Vec::new(),
            layout: None,
            bodies,
            timers: TimerScheduler::new(),
            swings: Vec::new(),
            aim: None,
            sounds,
            events: Vec::new(),
            game_over: false,
        })
    }

    /// Generates level `level` and swaps it in. On failure the current level is left intact.
    pub fn load_level(&mut self, level: u32) -> Result<()> {
        let generated = LevelGenerator::new(level, &self.config, &self.assets)
            .with_rng(self.rng.fork())
            .generate()?;
        self.clear_level();
        self.install(generated);
        Ok(())
    }

    pub fn start_next_level(&mut self) -> Result<()> {
        let next = self.level + 1;
        self.load_level(next)?;
        info!(level = next, "level_advanced");
        self.events.push(WorldEvent::LevelAdvanced { level: next });
        Ok(())
    }

    fn clear_level(&mut self) {
        let player = self.player;
        self.entities.retain(|id, _| id == player);
        self.bodies.clear();
        self.bodies.insert(player);
        self.mobs.clear();
        self.chests.clear();
        self.doors.clear();
        self.trinkets.clear();
        self.floor_tiles.clear();
        self.wall_tiles.clear();
        self.walls.clear();
        self.swings.clear();
        self.layout = None;
    }

    fn install(&mut self, generated: GeneratedLevel) {
        let GeneratedLevel { level, floor_tiles, wall_tiles, mobs, chests, doors, player_start, layout } =
            generated;

        self.level = level;
        self.walls = wall_tiles.iter().map(Tile::bounds).collect();
        self.floor_tiles = floor_tiles;
        self.wall_tiles = wall_tiles;
        for mob in mobs {
            let id = self.entities.insert(mob);
            self.bodies.insert(id);
            self.mobs.push(id);
        }
        self.chests = chests.into_iter().map(|chest| self.entities.insert(chest)).collect();
        self.doors = doors.into_iter().map(|door| self.entities.insert(door)).collect();

        if let Some(player) = self.entities.get_mut(self.player) {
            player.position = player_start;
        }
        self.bodies.set_velocity(self.player, Vec2::ZERO);
        self.bodies.set_knockback(self.player, Vec2::ZERO);

        info!(
            level,
            rooms = layout.rooms.len(),
            mobs = self.mobs.len(),
            chests = self.chests.len(),
            "level_loaded"
        );
        self.layout = Some(layout);
    }

    /// Spawns a fresh copy of a hostile template, leveled to the current level.
    pub fn spawn_mob(&mut self, name: &str, position: Vec2) -> Result<EntityId> {
        let mut mob = self.assets.entity_template(name)?.instantiate(&self.config);
        mob.set_level(self.level.max(1), &self.config.constants);
        mob.position = position;
        let id = self.entities.insert(mob);
        self.bodies.insert(id);
        self.mobs.push(id);
        Ok(id)
    }

    pub fn spawn_chest(&mut self, position: Vec2) -> Result<EntityId> {
        let mut chest = Entity::chest(self.level.max(1), &self.assets, &self.config)?;
        chest.position = position;
        let id = self.entities.insert(chest);
        self.chests.push(id);
        Ok(id)
    }

    /// Removes an entity together with its physics body.
    fn despawn(&mut self, id: EntityId) {
        if id == self.player || self.entities.remove(id).is_none() {
            return;
        }
        self.bodies.remove(id);
        self.mobs.retain(|&other| other != id);
        self.chests.retain(|&other| other != id);
        self.doors.retain(|&other| other != id);
        self.trinkets.retain(|&other| other != id);
        debug!(?id, "entity_despawned");
    }

    pub fn set_player_movement(&mut self, vector: Vec2) {
        if let Some(player) = self.entities.get_mut(self.player) {
            player.set_movement_vector(vector);
        }
    }

    /// While an aim point is held, the player swings at it every frame the swing is ready.
    pub fn set_aim(&mut self, target: Option<Vec2>) {
        self.aim = target;
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        mem::take(&mut self.events)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.get(self.player)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn mobs(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.collection(&self.mobs)
    }

    pub fn chests(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.collection(&self.chests)
    }

    /// Entry door first, exit door second.
    pub fn doors(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.collection(&self.doors)
    }

    pub fn trinkets(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.collection(&self.trinkets)
    }

    fn collection<'a>(&'a self, ids: &'a [EntityId]) -> impl Iterator<Item = (EntityId, &'a Entity)> {
        ids.iter().filter_map(|&id| self.entities.get(id).map(|entity| (id, entity)))
    }

    pub fn floor_tiles(&self) -> &[Tile] {
        &self.floor_tiles
    }

    pub fn wall_tiles(&self) -> &[Tile] {
        &self.wall_tiles
    }

    pub fn layout(&self) -> Option<&LevelLayout> {
        self.layout.as_ref()
    }

    pub fn swings(&self) -> &[WeaponSwing] {
        &self.swings
    }

    pub fn body(&self, id: EntityId) -> Option<&PhysicsBody> {
        self.bodies.get(id)
    }

    /// Bodies exist for the player and every live mob.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
