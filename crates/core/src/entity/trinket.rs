//! Pickups dropped by mobs and chests, and the stat effects they grant.

use std::sync::Arc;

use crate::assets::AssetRepository;
use crate::config::{Constants, GameConfig};
use crate::content::keys;
use crate::error::Result;
use crate::geometry::vector_from_angle;
use crate::types::{EntityState, Vec2};

use super::{Animation, AnimationSet, DirectionalAnimation, Entity, EntityKind, Motion, sprite_size};

const COIN_FRAME_RATE: f32 = 0.3;
const TIMED_SCALE: f32 = 0.3;
const UNTIMED_SCALE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrinketKind {
    Exp,
    Healing,
    SpeedPotion,
    HealthPotion,
    DamagePotion,
}

impl TrinketKind {
    pub const CHEST_LOOT: [Self; 4] =
        [Self::Exp, Self::DamagePotion, Self::HealthPotion, Self::SpeedPotion];

    /// Potions wear off after the trinket duration; exp and healing are permanent.
    pub fn is_timed(self) -> bool {
        matches!(self, Self::SpeedPotion | Self::HealthPotion | Self::DamagePotion)
    }

    fn sprite_scale(self) -> f32 {
        if self.is_timed() { TIMED_SCALE } else { UNTIMED_SCALE }
    }

    fn animation(self, assets: &AssetRepository) -> Result<Animation> {
        let still = |name: &str| assets.static_texture(name).cloned().map(Animation::still);
        match self {
            Self::Exp => Ok(Animation::new(
                assets.animated_texture(keys::COIN_ANIM)?.to_vec(),
                COIN_FRAME_RATE,
            )),
            Self::Healing => still(keys::UI_HEART_FULL),
            Self::SpeedPotion => still(keys::FLASK_BIG_BLUE),
            Self::HealthPotion => still(keys::FLASK_BIG_RED),
            Self::DamagePotion => still(keys::FLASK_BIG_YELLOW),
        }
    }
}

/// A timed stat bonus that was granted and must be taken back later.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppliedEffect {
    Speed(f32),
    MaxHealth(f32),
    Damage(f32),
}

impl AppliedEffect {
    pub fn revert(self, player: &mut Entity) {
        match self {
            Self::Speed(amount) => {
                if let Some(motion) = player.motion.as_mut() {
                    motion.speed -= amount;
                }
            }
            Self::MaxHealth(amount) => {
                if let Some(max) = player.max_health() {
                    player.set_max_health(max - amount);
                }
            }
            Self::Damage(amount) => {
                if let Some(vitals) = player.vitals.as_mut() {
                    vitals.damage -= amount;
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrinketPickup {
    pub effect: Option<AppliedEffect>,
    pub leveled_up: bool,
}

impl Entity {
    pub fn trinket(
        kind: TrinketKind,
        origin: Vec2,
        level: u32,
        assets: &AssetRepository,
        config: &GameConfig,
    ) -> Result<Self> {
        let animation = kind.animation(assets)?;
        let (width, height) = match animation.frames.first() {
            Some(frame) => sprite_size(frame, config.pts_to_px(kind.sprite_scale())),
            None => (config.pts_to_px(kind.sprite_scale()), config.pts_to_px(kind.sprite_scale())),
        };
        let animations = Arc::new(AnimationSet::new(DirectionalAnimation::facing_right(animation)));

        let mut trinket = Self::new(EntityKind::Trinket(kind), animations, width, height);
        trinket.level = level;
        trinket.position = origin;
        trinket.motion = Some(Motion::new(0.0, false, false));
        Ok(trinket)
    }

    /// Sends a fresh trinket off at half speed along `angle` (radians).
    pub fn scatter(&mut self, angle: f32, constants: &Constants) {
        self.set_state(EntityState::Dropping, None);
        if let Some(motion) = self.motion.as_mut() {
            motion.speed = constants.trinket_movement_speed / 2.0;
            motion.vector = vector_from_angle(angle);
        }
    }

    pub fn pick_up(&mut self, constants: &Constants) {
        if let Some(motion) = self.motion.as_mut() {
            motion.speed = constants.trinket_movement_speed;
        }
        self.set_state(EntityState::PickedUp, None);
    }

    /// Grants a trinket's effect to the player.
    pub fn consume_trinket(
        &mut self,
        kind: TrinketKind,
        trinket_level: u32,
        constants: &Constants,
    ) -> TrinketPickup {
        let mut pickup = TrinketPickup { effect: None, leveled_up: false };
        match kind {
            TrinketKind::Exp => {
                pickup.leveled_up = self.add_exp(trinket_level * 2, constants);
            }
            TrinketKind::Healing => self.heal((trinket_level * 2) as f32),
            TrinketKind::SpeedPotion => {
                if let Some(motion) = self.motion.as_mut() {
                    motion.speed += constants.potion_speed_increase;
                    pickup.effect = Some(AppliedEffect::Speed(constants.potion_speed_increase));
                }
            }
            TrinketKind::HealthPotion => {
                if let Some(max) = self.max_health() {
                    let increase = max * constants.potion_health_increase;
                    self.set_max_health(max + increase);
                    pickup.effect = Some(AppliedEffect::MaxHealth(increase));
                }
            }
            TrinketKind::DamagePotion => {
                if let Some(vitals) = self.vitals.as_mut() {
                    let increase = vitals.damage * constants.potion_damage_increase;
                    vitals.damage += increase;
                    pickup.effect = Some(AppliedEffect::Damage(increase));
                }
            }
        }
        pickup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::placeholder_repository;
    use crate::entity::PlayerProgress;

    fn player(config: &GameConfig) -> Entity {
        let assets = placeholder_repository();
        assets
            .entity_template(keys::PLAYER)
            .map(|prototype| prototype.instantiate(config))
            .expect("placeholder pack has a player")
    }

    #[test]
    fn potions_are_timed_and_larger() {
        let config = GameConfig::default();
        let assets = placeholder_repository();
        let potion =
            Entity::trinket(TrinketKind::SpeedPotion, Vec2::ZERO, 1, &assets, &config).expect("potion");
        let coin = Entity::trinket(TrinketKind::Exp, Vec2::ZERO, 1, &assets, &config).expect("coin");

        assert!(TrinketKind::SpeedPotion.is_timed());
        assert!(!TrinketKind::Exp.is_timed());
        assert!(potion.width > coin.width);
        assert!(coin.current_animation().frames.len() > 1);
    }

    #[test]
    fn scatter_then_pick_up_doubles_speed() {
        let config = GameConfig::default();
        let assets = placeholder_repository();
        let mut coin =
            Entity::trinket(TrinketKind::Exp, Vec2::ZERO, 2, &assets, &config).expect("coin");

        coin.scatter(0.0, &config.constants);
        assert_eq!(coin.state(), EntityState::Dropping);
        assert_eq!(coin.movement_speed(), Some(2.5));

        coin.pick_up(&config.constants);
        assert_eq!(coin.state(), EntityState::PickedUp);
        assert_eq!(coin.movement_speed(), Some(5.0));
    }

    #[test]
    fn damage_potion_reverts_exactly() {
        let config = GameConfig::default();
        let mut hero = player(&config);
        let before = hero.damage();

        let pickup = hero.consume_trinket(TrinketKind::DamagePotion, 1, &config.constants);
        assert!(hero.damage() > before);
        pickup.effect.expect("timed effect").revert(&mut hero);
        assert_eq!(hero.damage(), before);
    }

    #[test]
    fn health_potion_raises_max_health_by_a_third() {
        let config = GameConfig::default();
        let mut hero = player(&config);
        assert_eq!(hero.max_health(), Some(30.0));

        let pickup = hero.consume_trinket(TrinketKind::HealthPotion, 1, &config.constants);
        assert_eq!(pickup.effect, Some(AppliedEffect::MaxHealth(9.0)));
        assert_eq!(hero.max_health(), Some(39.0));
    }

    #[test]
    fn exp_token_grants_twice_its_level() {
        let config = GameConfig::default();
        let mut hero = player(&config);
        let pickup = hero.consume_trinket(TrinketKind::Exp, 3, &config.constants);
        assert!(pickup.effect.is_none());
        assert!(!pickup.leveled_up);
        assert_eq!(
            hero.progress(),
            Some(PlayerProgress { current_exp: 6, exp_to_next_level: 32 })
        );
    }
}
