//! Per-frame simulation: entity updates, timers, swings, physics and animation.

use super::*;

use crate::entity::{BehaviorMeta, EntityKind, MotionStep};
use crate::physics::{Obstacle, slide};

impl World {
    /// Advances the simulation by one frame. Does nothing once the game is over.
    pub fn update(&mut self, delta_seconds: f32) -> Result<()> {
        if self.game_over {
            return Ok(());
        }

        self.update_entities(delta_seconds)?;

        for action in self.timers.tick(delta_seconds) {
            self.dispatch(action)?;
            if self.game_over {
                return Ok(());
            }
        }

        if let Some(target) = self.aim {
            self.swing_weapon(target)?;
        }
        self.update_swings(delta_seconds)?;

        self.integrate_physics();
        for entity in self.entities.values_mut() {
            entity.update_animation(delta_seconds);
        }
        Ok(())
    }

    /// Starts a swing towards `target`. Returns `false` when the player cannot swing yet.
    pub fn swing_weapon(&mut self, target: Vec2) -> Result<bool> {
        if self.game_over {
            return Ok(false);
        }
        let Some(player) = self.entities.get_mut(self.player) else {
            return Ok(false);
        };
        if !player.can_swing() {
            return Ok(false);
        }

        let swing = WeaponSwing::new(self.player, player.position, target, &self.assets, &self.config)?;
        player.behavior.set(BehaviorMeta::ATTACKING, true);
        self.timers.schedule(self.config.constants.attack_ttl, TimedAction::ClearAttacking(self.player));
        self.events.push(WorldEvent::Sound(self.sounds.weapon_swing.clone()));
        self.swings.push(swing);
        Ok(true)
    }

    fn update_entities(&mut self, delta_seconds: f32) -> Result<()> {
        self.update_entity(self.player, delta_seconds)?;
        for id in self.mobs.clone() {
            self.update_entity(id, delta_seconds)?;
        }
        for id in self.trinkets.clone() {
            self.update_entity(id, delta_seconds)?;
        }
        Ok(())
    }

    fn update_entity(&mut self, id: EntityId, delta_seconds: f32) -> Result<()> {
        let Some(player_bounds) = self.player().map(Entity::bounds) else {
            return Ok(());
        };
        let Some(entity) = self.entities.get_mut(id) else {
            return Ok(());
        };

        entity.rotate_while_dying(delta_seconds, &self.config.constants);

        // Living entities only walk while idle or already walking; trinkets always move.
        let roams = match entity.kind {
            EntityKind::Trinket(_) => true,
            _ => matches!(entity.state(), EntityState::Idle | EntityState::Moving),
        };
        if !roams {
            self.bodies.set_velocity(id, Vec2::ZERO);
            return Ok(());
        }

        entity.steer(player_bounds.center, &self.config);
        match entity.step_motion(delta_seconds, &self.config) {
            MotionStep::Velocity(velocity) => self.bodies.set_velocity(id, velocity),
            MotionStep::Idle => {
                self.bodies.set_velocity(id, Vec2::ZERO);
                return Ok(());
            }
            MotionStep::Stationary | MotionStep::Displaced(_) => {}
        }

        if id == self.player || !entity.bounds().overlaps(&player_bounds) {
            return Ok(());
        }
        let kind = entity.kind.clone();
        match kind {
            EntityKind::HostileMob => self.mob_attack(id),
            EntityKind::Trinket(kind) => {
                self.collect_trinket(id, kind);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn update_swings(&mut self, delta_seconds: f32) -> Result<()> {
        let mut swings = mem::take(&mut self.swings);
        swings.retain(|swing| self.entities.contains_key(swing.wielder()));
        let live: Vec<bool> = swings
            .iter_mut()
            .map(|swing| {
                self.entities
                    .get(swing.wielder())
                    .is_some_and(|wielder| swing.advance(wielder, delta_seconds, &self.config))
            })
            .collect();

        // Expiring swings get one last contact test at full reach before they are dropped.
        let result = self.resolve_swing_contacts(&mut swings);
        let mut live = live.into_iter();
        swings.retain(|_| live.next().unwrap_or(false));
        self.swings = swings;
        result
    }

    fn resolve_swing_contacts(&mut self, swings: &mut [WeaponSwing]) -> Result<()> {
        for swing in swings.iter_mut() {
            let contacts = swing.contacts(
                self.collection(&self.mobs).map(|(id, mob)| (id, mob.bounds())),
                self.collection(&self.chests).map(|(id, chest)| (id, chest.bounds())),
                self.collection(&self.doors).map(|(id, door)| (id, door.bounds())),
            );

            if let Some(strike) = self.entities.get(swing.wielder()).and_then(Entity::strike) {
                for id in contacts.mobs {
                    self.apply_damage(id, strike)?;
                }
            }
            for id in contacts.chests {
                self.unlock_chest(id);
            }
            for id in contacts.doors {
                self.open_door(id);
            }
        }
        Ok(())
    }

    fn integrate_physics(&mut self) {
        let mut obstacles: Vec<Obstacle> =
            self.walls.iter().map(|&bounds| Obstacle { owner: None, bounds }).collect();
        for &id in self.doors.iter().chain(&self.chests).chain(&self.mobs) {
            if let Some(entity) = self.entities.get(id) {
                obstacles.push(Obstacle { owner: Some(id), bounds: entity.bounds() });
            }
        }

        for id in self.bodies.ids() {
            let Some(delta) = self.bodies.get(id).map(PhysicsBody::displacement) else {
                continue;
            };
            if delta.is_zero() {
                continue;
            }
            if let Some(entity) = self.entities.get_mut(id) {
                entity.position = slide(id, entity.bounds(), delta, &obstacles);
            }
        }
    }
}
