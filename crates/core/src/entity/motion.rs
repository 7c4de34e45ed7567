//! Per-frame steering and movement along the entity's movement vector.

use crate::config::GameConfig;
use crate::geometry::{angle_between, vector_from_angle, within_epsilon};
use crate::types::{Direction, EntityState, Vec2};

use super::{Entity, EntityKind};

/// Facing flips to the left once the heading leaves this band around zero.
const FACING_RIGHT_LIMIT: f32 = 1.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionStep {
    /// The entity has no movement component.
    Stationary,
    /// Movement vector was zero; the entity went idle and its velocity must be cleared.
    Idle,
    /// Physics-bound entity: assign this per-frame velocity to its body.
    Velocity(Vec2),
    /// Free entity: already moved by this delta.
    Displaced(Vec2),
}

impl Entity {
    pub fn set_movement_vector(&mut self, vector: Vec2) {
        if let Some(motion) = self.motion.as_mut() {
            motion.vector = vector;
        }
    }

    pub fn movement_speed(&self) -> Option<f32> {
        self.motion.map(|motion| motion.speed)
    }

    /// Kind-specific steering. Mobs run straight at a player inside the pursuit box;
    /// picked-up trinkets home in on the player.
    pub fn steer(&mut self, player_position: Vec2, config: &GameConfig) {
        let position = self.position;
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        match self.kind {
            EntityKind::HostileMob => {
                let range = config.pts_to_px(config.constants.pathfinding_range);
                motion.vector = if within_epsilon(position, player_position, range) {
                    player_position - position
                } else {
                    Vec2::ZERO
                };
            }
            EntityKind::Trinket(_) if self.state == EntityState::PickedUp => {
                motion.vector = vector_from_angle(angle_between(position, player_position));
            }
            _ => {}
        }
    }

    pub fn step_motion(&mut self, delta_seconds: f32, config: &GameConfig) -> MotionStep {
        let Some(motion) = self.motion else {
            return MotionStep::Stationary;
        };

        if motion.vector.is_zero() {
            self.set_state(EntityState::Idle, None);
            return MotionStep::Idle;
        }

        let angle = motion.vector.y.atan2(motion.vector.x);
        if self.state == EntityState::Idle {
            self.set_state(EntityState::Moving, None);
        }
        if motion.has_direction {
            self.set_direction(if angle.abs() < FACING_RIGHT_LIMIT {
                Direction::Right
            } else {
                Direction::Left
            });
        }

        let delta = vector_from_angle(angle) * (config.pts_to_px(motion.speed) * delta_seconds);
        if motion.has_physics {
            MotionStep::Velocity(delta)
        } else {
            self.position += delta;
            MotionStep::Displaced(delta)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entity::{Animation, AnimationSet, DirectionalAnimation, Motion, TrinketKind};
    use crate::types::TextureRef;

    fn idle_only() -> Arc<AnimationSet> {
        Arc::new(AnimationSet::new(DirectionalAnimation::facing_right(Animation::still(
            TextureRef { name: "idle".into(), width: 16, height: 16 },
        ))))
    }

    fn mover(kind: EntityKind, has_physics: bool) -> Entity {
        let mut entity = Entity::new(kind, idle_only(), 10.0, 10.0);
        entity.motion = Some(Motion::new(1.0, true, has_physics));
        entity
    }

    #[test]
    fn zero_vector_goes_idle() {
        let config = GameConfig::default();
        let mut mob = mover(EntityKind::HostileMob, true);
        mob.set_state(EntityState::Moving, None);
        assert_eq!(mob.step_motion(0.1, &config), MotionStep::Idle);
        assert_eq!(mob.state(), EntityState::Idle);
    }

    #[test]
    fn moving_left_flips_facing_and_yields_velocity() {
        let config = GameConfig::default();
        let mut mob = mover(EntityKind::HostileMob, true);
        mob.set_movement_vector(Vec2::new(-3.0, 0.0));

        let MotionStep::Velocity(velocity) = mob.step_motion(0.5, &config) else {
            panic!("physics entities report velocity");
        };
        assert_eq!(mob.state(), EntityState::Moving);
        assert_eq!(mob.direction(), Direction::Left);
        assert!((velocity.x + config.pts_to_px(1.0) * 0.5).abs() < 1e-3);
        assert_eq!(mob.position, Vec2::ZERO);
    }

    #[test]
    fn free_entities_move_themselves() {
        let config = GameConfig::default();
        let mut trinket = mover(EntityKind::Trinket(TrinketKind::Exp), false);
        trinket.set_movement_vector(Vec2::new(0.0, 1.0));
        assert!(matches!(trinket.step_motion(1.0, &config), MotionStep::Displaced(_)));
        assert!((trinket.position.y - config.pts_to_px(1.0)).abs() < 1e-2);
    }

    #[test]
    fn mob_only_pursues_inside_pursuit_box() {
        let config = GameConfig::default();
        let range = config.pts_to_px(config.constants.pathfinding_range);
        let mut mob = mover(EntityKind::HostileMob, true);

        mob.steer(Vec2::new(range - 1.0, range - 1.0), &config);
        assert_eq!(mob.motion.map(|m| m.vector), Some(Vec2::new(range - 1.0, range - 1.0)));

        mob.steer(Vec2::new(range + 1.0, 0.0), &config);
        assert_eq!(mob.motion.map(|m| m.vector), Some(Vec2::ZERO));
    }

    #[test]
    fn dropping_trinket_keeps_its_scatter_heading() {
        let config = GameConfig::default();
        let mut trinket = mover(EntityKind::Trinket(TrinketKind::Healing), false);
        trinket.set_state(EntityState::Dropping, None);
        trinket.set_movement_vector(Vec2::new(1.0, 0.0));
        trinket.steer(Vec2::new(0.0, 50.0), &config);
        assert_eq!(trinket.motion.map(|m| m.vector), Some(Vec2::new(1.0, 0.0)));

        trinket.set_state(EntityState::PickedUp, None);
        trinket.steer(Vec2::new(0.0, 50.0), &config);
        let heading = trinket.motion.map(|m| m.vector).unwrap_or(Vec2::ZERO);
        assert!(heading.x.abs() < 1e-6 && (heading.y - 1.0).abs() < 1e-6);
    }
}
