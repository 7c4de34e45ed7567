//! Damage, death, healing and level scaling for entities that carry vitals.

use crate::config::Constants;
use crate::geometry::angle_between;
use crate::types::{EntityState, Tint, Vec2};

use super::{Entity, EntityKind};

const KNOCKBACK_FACTOR: f32 = 0.05;

/// What a hit carries: the attacker's damage and where it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub damage: f32,
    pub origin: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    Ignored,
    Hurt { previous_state: EntityState, previous_tint: Tint, knockback: Vec2 },
    Killed { knockback: Vec2 },
}

pub fn player_exp_to_next_level(level: u32) -> u32 {
    4 * level * level + 8 * level + 20
}

impl Entity {
    pub fn strike(&self) -> Option<Strike> {
        self.vitals.map(|vitals| Strike { damage: vitals.damage, origin: self.position })
    }

    /// Applies a hit. Entities already flinching or dying ignore it, so health
    /// changes at most once per damage window.
    pub fn take_damage(&mut self, strike: Strike) -> DamageOutcome {
        if matches!(self.state, EntityState::Attacked | EntityState::Dying) {
            return DamageOutcome::Ignored;
        }
        let Some(vitals) = self.vitals.as_mut() else {
            return DamageOutcome::Ignored;
        };

        vitals.health -= strike.damage;
        let health = vitals.health;

        let angle = angle_between(strike.origin, self.position);
        let knockback = Vec2::new(
            angle.cos() * self.width * KNOCKBACK_FACTOR,
            angle.sin() * self.height * KNOCKBACK_FACTOR,
        );

        if health <= 0.0 {
            self.die();
            return DamageOutcome::Killed { knockback };
        }

        let previous_state = self.state;
        let previous_tint = self.tint;
        self.set_state(EntityState::Attacked, Some(EntityState::Idle));
        self.tint = Tint::DAMAGED;
        DamageOutcome::Hurt { previous_state, previous_tint, knockback }
    }

    pub fn die(&mut self) {
        self.set_state(EntityState::Dying, Some(EntityState::Idle));
        self.tint = Tint::DAMAGED;
    }

    /// Ends the flinch window unless the entity died in the meantime. An interrupted attack
    /// stance is not resumed; its own timer may already have fired.
    pub fn restore_after_damage(&mut self, previous_state: EntityState, previous_tint: Tint) {
        if self.state != EntityState::Attacked {
            return;
        }
        let state = match previous_state {
            EntityState::Attacking => EntityState::Idle,
            other => other,
        };
        self.set_state(state, None);
        self.tint = previous_tint;
    }

    pub fn rotate_while_dying(&mut self, delta_seconds: f32, constants: &Constants) {
        if self.state == EntityState::Dying {
            self.rotation_degrees += 90.0 * delta_seconds / (constants.death_ttl * constants.scale);
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if let Some(vitals) = self.vitals.as_mut() {
            vitals.health = (vitals.health + amount).min(vitals.max_health);
        }
    }

    /// Changes max health and rescales current health by the same factor, rounding up.
    pub fn set_max_health(&mut self, new_max: f32) {
        let Some(vitals) = self.vitals.as_mut() else {
            return;
        };
        if vitals.max_health > 0.0 {
            let factor = new_max / vitals.max_health;
            vitals.health = (vitals.health * factor).ceil();
        } else {
            vitals.health = new_max;
        }
        vitals.max_health = new_max;
    }

    pub fn set_level(&mut self, level: u32, constants: &Constants) {
        self.level = level;
        self.scale_stats(constants);
    }

    fn scale_stats(&mut self, constants: &Constants) {
        let level = self.level as f32;
        if let EntityKind::Player(progress) = &mut self.kind {
            progress.exp_to_next_level = player_exp_to_next_level(self.level);
        }
        match self.kind {
            EntityKind::Player(_) => {
                let factor = 1.0 + level * 0.5;
                self.set_max_health(constants.player_base_health * factor);
                if let Some(vitals) = self.vitals.as_mut() {
                    vitals.damage = constants.player_base_damage * factor;
                }
            }
            EntityKind::HostileMob => {
                // Mobs scale multiplicatively from their base stats.
                let Some(vitals) = self.vitals else {
                    return;
                };
                self.set_max_health(vitals.base_health * level);
                if let Some(vitals) = self.vitals.as_mut() {
                    vitals.damage = vitals.base_damage * level;
                }
            }
            _ => {}
        }
    }

    /// Adds experience to the player; returns true when it caused a level-up.
    pub fn add_exp(&mut self, exp: u32, constants: &Constants) -> bool {
        let EntityKind::Player(progress) = &mut self.kind else {
            return false;
        };
        progress.current_exp += exp;
        if progress.current_exp < progress.exp_to_next_level {
            return false;
        }
        progress.current_exp -= progress.exp_to_next_level;
        let next = self.level + 1;
        self.set_level(next, constants);
        true
    }
}
