//! Weapon swings: a short-lived hitbox sweeping outward from the wielder.

use std::collections::BTreeSet;

use crate::assets::AssetRepository;
use crate::config::GameConfig;
use crate::content::keys;
use crate::entity::{BehaviorMeta, Entity, sprite_size};
use crate::error::Result;
use crate::geometry::angle_between;
use crate::types::{EntityId, EntityState, Rect, Vec2};

/// Entities a swing touched during one tick, split by what the hit does to them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwingContacts {
    /// Mobs touched for the first time by this swing.
    pub mobs: Vec<EntityId>,
    pub chests: Vec<EntityId>,
    pub doors: Vec<EntityId>,
}

#[derive(Clone, Debug)]
pub struct WeaponSwing {
    wielder: EntityId,
    angle: f32,
    elapsed: f32,
    width: f32,
    height: f32,
    position: Vec2,
    hit: BTreeSet<EntityId>,
}

impl WeaponSwing {
    /// The heading is fixed at creation and does not follow the target afterwards.
    pub fn new(
        wielder: EntityId,
        origin: Vec2,
        target: Vec2,
        assets: &AssetRepository,
        config: &GameConfig,
    ) -> Result<Self> {
        let texture = assets.static_texture(keys::WEAPON_REGULAR_SWORD)?;
        let (width, height) = sprite_size(texture, config.pts_to_px(config.constants.weapon_scale));
        Ok(Self {
            wielder,
            angle: angle_between(origin, target),
            elapsed: 0.0,
            width,
            height,
            position: origin,
            hit: BTreeSet::new(),
        })
    }

    pub fn wielder(&self) -> EntityId {
        self.wielder
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Sprite rotation; the blade texture points up at zero degrees.
    pub fn rotation_degrees(&self) -> f32 {
        self.angle.to_degrees() - 90.0
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Moves the hitbox out along the swing heading. Returns `false` on the tick the swing
    /// reaches the attack TTL; that tick's position still counts for contacts.
    pub fn advance(&mut self, wielder: &Entity, delta_seconds: f32, config: &GameConfig) -> bool {
        let live = self.elapsed < config.constants.attack_ttl;
        let reach = self.elapsed * config.pts_to_px(config.constants.player_weapon_swing_speed);
        self.position = wielder.position
            + Vec2::new(
                self.angle.cos() * (reach + wielder.width / 3.0),
                self.angle.sin() * (reach + wielder.height / 3.0),
            );
        self.elapsed += delta_seconds;
        live
    }

    /// Axis-aligned box around the rotated blade.
    pub fn hitbox(&self) -> Rect {
        let rotation = self.rotation_degrees().to_radians();
        let (sin, cos) = (rotation.sin().abs(), rotation.cos().abs());
        Rect::new(
            self.position,
            self.width * cos + self.height * sin,
            self.width * sin + self.height * cos,
        )
    }

    pub fn has_hit(&self, target: EntityId) -> bool {
        self.hit.contains(&target)
    }

    /// Collects this tick's contacts. Each mob is reported at most once per swing.
    pub fn contacts(
        &mut self,
        mobs: impl IntoIterator<Item = (EntityId, Rect)>,
        chests: impl IntoIterator<Item = (EntityId, Rect)>,
        doors: impl IntoIterator<Item = (EntityId, Rect)>,
    ) -> SwingContacts {
        let hitbox = self.hitbox();
        let touching = |(id, bounds): (EntityId, Rect)| hitbox.overlaps(&bounds).then_some(id);

        let mut contacts = SwingContacts::default();
        for id in mobs.into_iter().filter_map(touching) {
            if self.hit.insert(id) {
                contacts.mobs.push(id);
            }
        }
        contacts.chests = chests.into_iter().filter_map(touching).collect();
        contacts.doors = doors.into_iter().filter_map(touching).collect();
        contacts
    }
}

impl Entity {
    /// Swings are refused mid-swing and while flinching or dying.
    pub fn can_swing(&self) -> bool {
        !self.behavior.is_set(BehaviorMeta::ATTACKING)
            && !matches!(self.state(), EntityState::Attacked | EntityState::Dying)
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::content::placeholder_repository;

    fn ids(count: usize) -> Vec<EntityId> {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    fn player(config: &GameConfig) -> Entity {
        placeholder_repository()
            .entity_template(keys::PLAYER)
            .map(|prototype| prototype.instantiate(config))
            .expect("player template")
    }

    #[test]
    fn swing_travels_outward_and_expires() {
        let config = GameConfig::default();
        let assets = placeholder_repository();
        let wielder = player(&config);
        let id = ids(1)[0];
        let mut swing =
            WeaponSwing::new(id, wielder.position, Vec2::new(100.0, 0.0), &assets, &config).expect("swing");

        assert!(swing.advance(&wielder, 0.1, &config));
        assert!((swing.position().x - wielder.width / 3.0).abs() < 1e-3);

        assert!(swing.advance(&wielder, 0.1, &config));
        let reach = 0.1 * config.pts_to_px(config.constants.player_weapon_swing_speed);
        assert!((swing.position().x - (reach + wielder.width / 3.0)).abs() < 1e-2);
        assert!(swing.position().y.abs() < 1e-3);

        assert!(!swing.advance(&wielder, 0.1, &config));
        let final_reach = 0.2 * config.pts_to_px(config.constants.player_weapon_swing_speed);
        assert!((swing.position().x - (final_reach + wielder.width / 3.0)).abs() < 1e-2);
    }

    #[test]
    fn expiring_swing_still_reports_contacts_at_full_reach() {
        let config = GameConfig::default();
        let assets = placeholder_repository();
        let wielder = player(&config);
        let all = ids(2);
        let mut swing =
            WeaponSwing::new(all[0], wielder.position, Vec2::new(100.0, 0.0), &assets, &config).expect("swing");
        while swing.advance(&wielder, 0.05, &config) {}

        let tip = Rect::new(swing.position(), 2.0, 2.0);
        let nothing: [(EntityId, Rect); 0] = [];
        assert_eq!(swing.contacts([(all[1], tip)], nothing, nothing).mobs, vec![all[1]]);
    }

    #[test]
    fn horizontal_swing_hitbox_lies_along_the_heading() {
        let config = GameConfig::default();
        let assets = placeholder_repository();
        let id = ids(1)[0];
        let swing =
            WeaponSwing::new(id, Vec2::ZERO, Vec2::new(10.0, 0.0), &assets, &config).expect("swing");
        let hitbox = swing.hitbox();
        assert!(hitbox.width > hitbox.height);
    }

    #[test]
    fn each_mob_is_reported_once_per_swing() {
        let config = GameConfig::default();
        let assets = placeholder_repository();
        let all = ids(4);
        let (wielder, mob, chest, door) = (all[0], all[1], all[2], all[3]);
        let mut swing =
            WeaponSwing::new(wielder, Vec2::ZERO, Vec2::new(10.0, 0.0), &assets, &config).expect("swing");
        let near = Rect::new(Vec2::ZERO, 20.0, 20.0);
        let far = Rect::new(Vec2::new(5000.0, 0.0), 20.0, 20.0);

        let first = swing.contacts([(mob, near)], [(chest, near)], [(door, far)]);
        assert_eq!(first.mobs, vec![mob]);
        assert_eq!(first.chests, vec![chest]);
        assert!(first.doors.is_empty());

        let second = swing.contacts([(mob, near)], [(chest, near)], [(door, near)]);
        assert!(second.mobs.is_empty());
        assert_eq!(second.chests, vec![chest]);
        assert_eq!(second.doors, vec![door]);
        assert!(swing.has_hit(mob));
    }

    #[test]
    fn swinging_is_refused_while_attacking_or_hurt() {
        let config = GameConfig::default();
        let mut hero = player(&config);
        assert!(hero.can_swing());

        hero.behavior.set(BehaviorMeta::ATTACKING, true);
        assert!(!hero.can_swing());

        hero.behavior.set(BehaviorMeta::ATTACKING, false);
        hero.set_state(EntityState::Attacked, Some(EntityState::Idle));
        assert!(!hero.can_swing());
    }
}
