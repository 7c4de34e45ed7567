//! Canonical entity templates held by the asset registry.
//!
//! Prototypes are plain values. Every spawn goes through [`EntityPrototype::instantiate`],
//! so spawned entities never share mutable state with the template or with each other.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::types::{Direction, EntityState, SoundRef};

use super::{AnimationSet, Entity, EntityKind, Motion, PlayerProgress, Vitals, sprite_size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityClass {
    Player,
    HostileMob,
}

#[derive(Clone, Debug)]
pub struct EntityPrototype {
    pub name: String,
    pub class: EntityClass,
    pub sprite_scale: f32,
    pub animations: Arc<AnimationSet>,
    pub health: f32,
    pub damage: f32,
    pub movement_speed: f32,
    pub sounds: BTreeMap<String, SoundRef>,
}

impl EntityPrototype {
    pub fn is_hostile(&self) -> bool {
        self.class == EntityClass::HostileMob
    }

    pub fn instantiate(&self, config: &GameConfig) -> Entity {
        let idle = self.animations.resolve(EntityState::Idle, Direction::Right);
        let width_px = config.pts_to_px(self.sprite_scale);
        let (width, height) = match idle.frames.first() {
            Some(frame) => sprite_size(frame, width_px),
            None => (width_px, width_px),
        };

        let kind = match self.class {
            EntityClass::Player => {
                EntityKind::Player(PlayerProgress { current_exp: 0, exp_to_next_level: 0 })
            }
            EntityClass::HostileMob => EntityKind::HostileMob,
        };

        let mut entity = Entity::new(kind, Arc::clone(&self.animations), width, height);
        entity.motion = Some(Motion::new(self.movement_speed, true, true));
        entity.vitals = Some(Vitals::new(self.health, self.damage));
        entity.sounds = self.sounds.clone();
        if self.class == EntityClass::Player {
            entity.set_level(1, &config.constants);
        }
        entity
    }
}
