//! Damage resolution, loot and the handlers behind every timed action.

use super::*;

use crate::entity::{BehaviorMeta, DamageOutcome, EntityKind, Strike, TrinketKind};

impl World {
    /// Hits `target` with `strike` and schedules whatever the outcome sets in motion.
    pub fn apply_damage(&mut self, target: EntityId, strike: Strike) -> Result<DamageOutcome> {
        let constants = &self.config.constants;
        let Some(entity) = self.entities.get_mut(target) else {
            return Ok(DamageOutcome::Ignored);
        };

        let outcome = entity.take_damage(strike);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt { previous_state, previous_tint, knockback } => {
                if let Some(sound) = entity.sound(keys::TRIGGER_HURT) {
                    self.events.push(WorldEvent::Sound(sound.clone()));
                }
                self.bodies.set_knockback(target, knockback);
                self.timers.schedule(
                    constants.damage_ttl,
                    TimedAction::RestoreAfterDamage { target, previous_state, previous_tint },
                );
            }
            DamageOutcome::Killed { knockback } => {
                let (is_player, is_mob) = (entity.is_player(), entity.kind == EntityKind::HostileMob);
                let (position, level) = (entity.position, entity.level);
                if let Some(sound) = entity.sound(keys::TRIGGER_DEATH) {
                    self.events.push(WorldEvent::Sound(sound.clone()));
                }
                self.bodies.set_knockback(target, knockback);

                if is_player {
                    info!(level = self.level, "player_died");
                    self.events.push(WorldEvent::PlayerDied);
                    self.timers.schedule(constants.game_over_delay, TimedAction::GameOver);
                } else {
                    self.timers.schedule(constants.death_ttl, TimedAction::Despawn(target));
                    if is_mob {
                        self.drop_mob_loot(position, level)?;
                    }
                }
            }
        }
        Ok(outcome)
    }

    pub(super) fn dispatch(&mut self, action: TimedAction) -> Result<()> {
        match action {
            TimedAction::RestoreAfterDamage { target, previous_state, previous_tint } => {
                if let Some(entity) = self.entities.get_mut(target) {
                    entity.restore_after_damage(previous_state, previous_tint);
                    self.bodies.set_knockback(target, Vec2::ZERO);
                }
            }
            TimedAction::Despawn(target) => self.despawn(target),
            TimedAction::ClearAttacking(target) => {
                if let Some(entity) = self.entities.get_mut(target) {
                    entity.behavior.set(BehaviorMeta::ATTACKING, false);
                }
            }
            TimedAction::MobAttackEnd(target) => {
                if let Some(mob) = self.entities.get_mut(target)
                    && mob.state() == EntityState::Attacking
                {
                    mob.set_state(EntityState::Idle, None);
                }
            }
            TimedAction::DepositLoot(chest) => self.deposit_loot(chest)?,
            TimedAction::PickUp(trinket) => {
                if let Some(entity) = self.entities.get_mut(trinket) {
                    entity.pick_up(&self.config.constants);
                }
            }
            TimedAction::ExpireTrinket { target, effect } => {
                if let Some(entity) = self.entities.get_mut(target) {
                    effect.revert(entity);
                }
            }
            TimedAction::AdvanceLevel => self.start_next_level()?,
            TimedAction::GameOver => {
                info!(level = self.level, "game_over");
                self.game_over = true;
                self.events.push(WorldEvent::GameOver);
            }
        }
        Ok(())
    }

    /// A mob touching the player strikes once and holds its stance for the attack TTL.
    pub(super) fn mob_attack(&mut self, mob: EntityId) -> Result<()> {
        let Some(entity) = self.entities.get_mut(mob) else {
            return Ok(());
        };
        entity.set_state(EntityState::Attacking, Some(EntityState::Idle));
        if let Some(sound) = entity.sound(keys::TRIGGER_ATTACK) {
            self.events.push(WorldEvent::Sound(sound.clone()));
        }
        let strike = entity.strike();

        self.bodies.set_velocity(mob, Vec2::ZERO);
        self.timers.schedule(self.config.constants.attack_ttl, TimedAction::MobAttackEnd(mob));
        if let Some(strike) = strike {
            self.apply_damage(self.player, strike)?;
        }
        Ok(())
    }

    pub(super) fn collect_trinket(&mut self, trinket: EntityId, kind: TrinketKind) {
        let Some(level) = self.entities.get(trinket).map(|entity| entity.level) else {
            return;
        };
        self.despawn(trinket);

        let Some(player) = self.entities.get_mut(self.player) else {
            return;
        };
        let pickup = player.consume_trinket(kind, level, &self.config.constants);
        self.events.push(WorldEvent::Sound(self.sounds.trinket_pickup.clone()));
        if pickup.leveled_up {
            info!(level = player.level, "player_leveled_up");
            self.events.push(WorldEvent::Sound(self.sounds.level_up.clone()));
        }
        if let Some(effect) = pickup.effect {
            self.timers.schedule(
                self.config.constants.trinket_duration,
                TimedAction::ExpireTrinket { target: self.player, effect },
            );
        }
        debug!(?kind, level, "trinket_collected");
    }

    pub(super) fn unlock_chest(&mut self, chest: EntityId) {
        let Some(duration) = self.entities.get_mut(chest).and_then(Entity::unlock) else {
            return;
        };
        self.events.push(WorldEvent::Sound(self.sounds.chest_open.clone()));
        self.timers.schedule(duration, TimedAction::DepositLoot(chest));
    }

    pub(super) fn open_door(&mut self, door: EntityId) {
        if !self.entities.get_mut(door).is_some_and(Entity::open) {
            return;
        }
        info!(level = self.level, "exit_opened");
        self.events.push(WorldEvent::Sound(self.sounds.door_open.clone()));
        self.timers.schedule(self.config.constants.door_open_delay, TimedAction::AdvanceLevel);
    }

    fn deposit_loot(&mut self, chest: EntityId) -> Result<()> {
        let Some(entity) = self.entities.get_mut(chest) else {
            return Ok(());
        };
        entity.finish_opening();
        let (position, level) = (entity.position, entity.level);

        let Some(&kind) = self.rng.choose(&TrinketKind::CHEST_LOOT) else {
            return Ok(());
        };
        self.spawn_trinket(kind, position, level)?;
        Ok(())
    }

    fn drop_mob_loot(&mut self, position: Vec2, level: u32) -> Result<()> {
        self.spawn_trinket(TrinketKind::Exp, position, level)?;
        if self.rng.chance(f64::from(self.config.constants.mob_healing_drop_chance)) {
            self.spawn_trinket(TrinketKind::Healing, position, level)?;
        }
        Ok(())
    }

    /// Drops a trinket that scatters in a random direction, then homes in on the player.
    fn spawn_trinket(&mut self, kind: TrinketKind, origin: Vec2, level: u32) -> Result<EntityId> {
        let constants = &self.config.constants;
        let mut trinket = Entity::trinket(kind, origin, level, &self.assets, &self.config)?;
        trinket.scatter(self.rng.range(0.0, 360.0).to_radians(), constants);

        let (low, high) = constants.trinket_scatter_delay_range;
        let delay = self.rng.range(low, high);
        let id = self.entities.insert(trinket);
        self.trinkets.push(id);
        self.timers.schedule(delay, TimedAction::PickUp(id));
        Ok(id)
    }
}
