//! Chests and doors: static props that react to weapon hits.

use std::sync::Arc;

use crate::assets::AssetRepository;
use crate::config::GameConfig;
use crate::content::keys;
use crate::error::{AssetKind, CrawlerError, Result};
use crate::types::EntityState;

use super::{Animation, AnimationSet, DirectionalAnimation, Entity, EntityKind, sprite_size};

const CHEST_SCALE: f32 = 0.3;
const CHEST_OPENING_RATE: f32 = 0.2;

impl Entity {
    pub fn chest(level: u32, assets: &AssetRepository, config: &GameConfig) -> Result<Self> {
        let frames = assets.animated_texture(keys::CHEST_FULL_OPEN_ANIM)?;
        let (Some(closed), Some(open)) = (frames.first(), frames.last()) else {
            return Err(CrawlerError::not_found(AssetKind::Animation, keys::CHEST_FULL_OPEN_ANIM));
        };

        let animations = AnimationSet::new(DirectionalAnimation::facing_right(Animation::still(
            closed.clone(),
        )))
        .with(
            EntityState::Opening,
            DirectionalAnimation::facing_right(Animation::new(frames.to_vec(), CHEST_OPENING_RATE)),
        )
        .with(EntityState::Opened, DirectionalAnimation::facing_right(Animation::still(open.clone())));

        let (width, height) = sprite_size(closed, config.pts_to_px(CHEST_SCALE));
        let mut chest = Self::new(EntityKind::Chest, Arc::new(animations), width, height);
        chest.level = level;
        Ok(chest)
    }

    /// Doors are sized to exactly one floor tile wide.
    pub fn door(
        is_exit: bool,
        level: u32,
        assets: &AssetRepository,
        config: &GameConfig,
    ) -> Result<Self> {
        let closed = assets.static_texture(keys::DOORS_LEAF_CLOSED)?;
        let open = assets.static_texture(keys::DOORS_LEAF_OPEN)?;

        let animations =
            AnimationSet::new(DirectionalAnimation::facing_right(Animation::still(closed.clone())))
                .with(
                    EntityState::Opened,
                    DirectionalAnimation::facing_right(Animation::still(open.clone())),
                );

        let (width, height) = sprite_size(closed, config.tile_size_px());
        let mut door = Self::new(EntityKind::Door { is_exit }, Arc::new(animations), width, height);
        door.level = level;
        Ok(door)
    }

    /// Starts opening an idle chest and returns how long the opening animation runs.
    /// Anything else, including a chest already opening, is left alone.
    pub fn unlock(&mut self) -> Option<f32> {
        if self.kind != EntityKind::Chest || self.state != EntityState::Idle {
            return None;
        }
        self.set_state(EntityState::Opening, None);
        Some(self.animations.resolve(EntityState::Opening, self.direction).duration())
    }

    pub fn finish_opening(&mut self) {
        if self.kind == EntityKind::Chest {
            self.set_state(EntityState::Opened, None);
        }
    }

    /// Opens the exit door. Entry doors and already open doors ignore the call.
    pub fn open(&mut self) -> bool {
        let EntityKind::Door { is_exit: true } = self.kind else {
            return false;
        };
        if self.state == EntityState::Opened {
            return false;
        }
        self.set_state(EntityState::Opened, None);
        true
    }
}
