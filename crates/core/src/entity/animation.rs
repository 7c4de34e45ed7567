//! Animation tables keyed by entity state and facing, plus frame playback.

use std::collections::BTreeMap;

use crate::types::{Direction, EntityState, TextureRef};

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub frames: Vec<TextureRef>,
    /// Seconds per frame.
    pub rate: f32,
}

impl Animation {
    pub fn new(frames: Vec<TextureRef>, rate: f32) -> Self {
        Self { frames, rate }
    }

    pub fn still(frame: TextureRef) -> Self {
        Self { frames: vec![frame], rate: 1.0 }
    }

    /// Time needed to show every frame once.
    pub fn duration(&self) -> f32 {
        self.rate * self.frames.len() as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalAnimation {
    pub right: Animation,
    pub left: Option<Animation>,
}

impl DirectionalAnimation {
    pub fn facing_right(right: Animation) -> Self {
        Self { right, left: None }
    }

    pub fn get(&self, direction: Direction) -> &Animation {
        match direction {
            Direction::Right => &self.right,
            Direction::Left => self.left.as_ref().unwrap_or(&self.right),
        }
    }
}

/// Total mapping from `(state, direction)` to an animation.
///
/// An unregistered state resolves to the idle animation, and a missing left-facing
/// variant resolves to the right-facing one. The idle entry always exists.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSet {
    idle: DirectionalAnimation,
    by_state: BTreeMap<EntityState, DirectionalAnimation>,
}

impl AnimationSet {
    pub fn new(idle: DirectionalAnimation) -> Self {
        Self { idle, by_state: BTreeMap::new() }
    }

    pub fn with(mut self, state: EntityState, animation: DirectionalAnimation) -> Self {
        self.insert(state, animation);
        self
    }

    pub fn insert(&mut self, state: EntityState, animation: DirectionalAnimation) {
        if state == EntityState::Idle {
            self.idle = animation;
        } else {
            self.by_state.insert(state, animation);
        }
    }

    pub fn contains(&self, state: EntityState) -> bool {
        state == EntityState::Idle || self.by_state.contains_key(&state)
    }

    pub fn resolve_key(&self, key: EntityState) -> EntityState {
        if self.contains(key) { key } else { EntityState::Idle }
    }

    pub fn resolve(&self, key: EntityState, direction: Direction) -> &Animation {
        self.by_state.get(&key).unwrap_or(&self.idle).get(direction)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationCursor {
    pub frame: usize,
    pub since_last_frame: f32,
}

impl AnimationCursor {
    pub fn advance(&mut self, animation: &Animation, delta_seconds: f32) {
        self.since_last_frame += delta_seconds;
        if self.since_last_frame >= animation.rate {
            self.since_last_frame = 0.0;
            self.frame = if self.frame + 1 < animation.frames.len() { self.frame + 1 } else { 0 };
        }
    }
}
