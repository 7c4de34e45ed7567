//! Flat actor model shared by the player, mobs, chests, doors and trinkets.

pub mod animation;
pub mod living;
pub mod motion;
pub mod props;
pub mod prototype;
pub mod trinket;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{Direction, EntityState, Rect, SoundRef, TextureRef, Tint, Vec2};

pub use animation::{Animation, AnimationCursor, AnimationSet, DirectionalAnimation};
pub use living::{DamageOutcome, Strike};
pub use motion::MotionStep;
pub use prototype::{EntityClass, EntityPrototype};
pub use trinket::{AppliedEffect, TrinketKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerProgress {
    pub current_exp: u32,
    pub exp_to_next_level: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player(PlayerProgress),
    HostileMob,
    Chest,
    Door { is_exit: bool },
    Trinket(TrinketKind),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Points per second.
    pub speed: f32,
    pub vector: Vec2,
    pub has_direction: bool,
    pub has_physics: bool,
}

impl Motion {
    pub fn new(speed: f32, has_direction: bool, has_physics: bool) -> Self {
        Self { speed, vector: Vec2::ZERO, has_direction, has_physics }
    }
}

/// Health and damage of a living entity. `base_*` are the unscaled level 1 stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vitals {
    pub max_health: f32,
    pub health: f32,
    pub damage: f32,
    pub base_health: f32,
    pub base_damage: f32,
}

impl Vitals {
    pub fn new(health: f32, damage: f32) -> Self {
        Self { max_health: health, health, damage, base_health: health, base_damage: damage }
    }
}

/// Free-form behaviour flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BehaviorMeta(BTreeMap<String, bool>);

impl BehaviorMeta {
    pub const ATTACKING: &'static str = "attacking";

    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: bool) {
        self.0.insert(key.to_string(), value);
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    state: EntityState,
    direction: Direction,
    pub level: u32,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub rotation_degrees: f32,
    pub tint: Tint,
    animations: Arc<AnimationSet>,
    animation_key: EntityState,
    cursor: AnimationCursor,
    pub motion: Option<Motion>,
    pub vitals: Option<Vitals>,
    pub behavior: BehaviorMeta,
    pub sounds: BTreeMap<String, SoundRef>,
}

impl Entity {
    pub fn new(kind: EntityKind, animations: Arc<AnimationSet>, width: f32, height: f32) -> Self {
        Self {
            kind,
            state: EntityState::Idle,
            direction: Direction::Right,
            level: 1,
            position: Vec2::ZERO,
            width,
            height,
            rotation_degrees: 0.0,
            tint: Tint::NONE,
            animations,
            animation_key: EntityState::Idle,
            cursor: AnimationCursor::default(),
            motion: None,
            vitals: None,
            behavior: BehaviorMeta::default(),
            sounds: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    /// Re-entering the current state is a no-op. The animation key defaults to the
    /// state itself and falls back to idle when nothing is registered for it.
    pub fn set_state(&mut self, state: EntityState, animation_key: Option<EntityState>) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.animation_key = self.animations.resolve_key(animation_key.unwrap_or(state));
        self.cursor = AnimationCursor::default();
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction == direction {
            return;
        }
        self.direction = direction;
        self.cursor = AnimationCursor::default();
    }

    pub fn animation_key(&self) -> EntityState {
        self.animation_key
    }

    pub fn current_animation(&self) -> &Animation {
        self.animations.resolve(self.animation_key, self.direction)
    }

    pub fn current_texture(&self) -> Option<&TextureRef> {
        let animation = self.current_animation();
        animation.frames.get(self.cursor.frame).or_else(|| animation.frames.first())
    }

    pub fn update_animation(&mut self, delta_seconds: f32) {
        let animation = self.animations.resolve(self.animation_key, self.direction);
        self.cursor.advance(animation, delta_seconds);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.width, self.height)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_living(&self) -> bool {
        self.vitals.is_some()
    }

    pub fn health(&self) -> Option<f32> {
        self.vitals.map(|vitals| vitals.health)
    }

    pub fn max_health(&self) -> Option<f32> {
        self.vitals.map(|vitals| vitals.max_health)
    }

    pub fn damage(&self) -> Option<f32> {
        self.vitals.map(|vitals| vitals.damage)
    }

    pub fn progress(&self) -> Option<PlayerProgress> {
        match self.kind {
            EntityKind::Player(progress) => Some(progress),
            _ => None,
        }
    }

    pub fn sound(&self, trigger: &str) -> Option<&SoundRef> {
        self.sounds.get(trigger)
    }
}

/// Sprite size for a texture scaled to `width_px`, keeping the aspect ratio.
pub fn sprite_size(texture: &TextureRef, width_px: f32) -> (f32, f32) {
    if texture.width == 0 {
        return (width_px, width_px);
    }
    (width_px, width_px * texture.height as f32 / texture.width as f32)
}
