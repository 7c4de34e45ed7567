//! Asset names the simulation looks up, and a built-in placeholder pack that
//! registers all of them so tools and tests can run without an asset directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assets::{AssetRepository, AtlasRegion, TextureEntry};
use crate::entity::{Animation, AnimationSet, DirectionalAnimation, EntityClass, EntityPrototype};
use crate::types::{EntityState, SoundRef, TextureRef};

pub mod keys {
    pub const PLAYER: &str = "player";

    pub const FLOOR_VARIANTS: [&str; 8] =
        ["floor_1", "floor_2", "floor_3", "floor_4", "floor_5", "floor_6", "floor_7", "floor_8"];
    pub const SPECIAL_WALL_VARIANTS: [&str; 7] = [
        "wall_hole_1",
        "wall_hole_2",
        "wall_goo",
        "wall_banner_red",
        "wall_banner_blue",
        "wall_banner_green",
        "wall_banner_yellow",
    ];
    pub const WALL_MID: &str = "wall_mid";
    pub const WALL_TOP_MID: &str = "wall_top_mid";
    pub const WALL_CORNER_LEFT: &str = "wall_corner_left";
    pub const WALL_CORNER_RIGHT: &str = "wall_corner_right";
    pub const WALL_CORNER_TOP_LEFT: &str = "wall_corner_top_left";
    pub const WALL_CORNER_TOP_RIGHT: &str = "wall_corner_top_right";
    pub const WALL_SIDE_MID_LEFT: &str = "wall_side_mid_left";
    pub const WALL_SIDE_MID_RIGHT: &str = "wall_side_mid_right";

    pub const DOORS_LEAF_CLOSED: &str = "doors_leaf_closed";
    pub const DOORS_LEAF_OPEN: &str = "doors_leaf_open";
    pub const CHEST_FULL_OPEN_ANIM: &str = "chest_full_open_anim";
    pub const WEAPON_REGULAR_SWORD: &str = "weapon_regular_sword";

    pub const COIN_ANIM: &str = "coin_anim";
    pub const UI_HEART_FULL: &str = "ui_heart_full";
    pub const FLASK_BIG_BLUE: &str = "flask_big_blue";
    pub const FLASK_BIG_RED: &str = "flask_big_red";
    pub const FLASK_BIG_YELLOW: &str = "flask_big_yellow";

    pub const SOUND_CHEST_OPEN: &str = "chest_open";
    pub const SOUND_DOOR_OPEN: &str = "door_open";
    pub const SOUND_WEAPON_SWING: &str = "player_weapon_swing";
    pub const SOUND_LEVEL_UP: &str = "player_levelup";
    pub const SOUND_TRINKET_PICKUP: &str = "trinket_pickup";

    pub const MUSIC_MAIN_MENU: &str = "main_menu";
    pub const MUSIC_GAMEPLAY: &str = "gameplay";

    /// Per-entity sound triggers.
    pub const TRIGGER_HURT: &str = "hurt";
    pub const TRIGGER_DEATH: &str = "death";
    pub const TRIGGER_ATTACK: &str = "attack";
}

struct StockEntity {
    name: &'static str,
    class: EntityClass,
    sprite: &'static str,
    size: (u32, u32),
    health: f32,
    damage: f32,
    movement_speed: f32,
}

const STOCK_ENTITIES: [StockEntity; 4] = [
    StockEntity {
        name: keys::PLAYER,
        class: EntityClass::Player,
        sprite: "knight_m",
        size: (16, 28),
        health: 20.0,
        damage: 5.0,
        movement_speed: 1.2,
    },
    StockEntity {
        name: "goblin",
        class: EntityClass::HostileMob,
        sprite: "goblin",
        size: (16, 16),
        health: 10.0,
        damage: 2.0,
        movement_speed: 0.8,
    },
    StockEntity {
        name: "imp",
        class: EntityClass::HostileMob,
        sprite: "imp",
        size: (16, 16),
        health: 6.0,
        damage: 3.0,
        movement_speed: 1.0,
    },
    StockEntity {
        name: "skelet",
        class: EntityClass::HostileMob,
        sprite: "skelet",
        size: (16, 16),
        health: 12.0,
        damage: 2.0,
        movement_speed: 0.6,
    },
];

const TILE: (u32, u32) = (16, 16);

/// Registry with a uniformly sized stand-in for every texture, sound and entity
/// the simulation needs.
pub fn placeholder_repository() -> AssetRepository {
    let mut assets = AssetRepository::new();

    let mut statics: Vec<(&str, (u32, u32))> = Vec::new();
    statics.extend(keys::FLOOR_VARIANTS.iter().map(|name| (*name, TILE)));
    statics.extend(keys::SPECIAL_WALL_VARIANTS.iter().map(|name| (*name, TILE)));
    statics.extend(
        [
            keys::WALL_MID,
            keys::WALL_TOP_MID,
            keys::WALL_CORNER_LEFT,
            keys::WALL_CORNER_RIGHT,
            keys::WALL_CORNER_TOP_LEFT,
            keys::WALL_CORNER_TOP_RIGHT,
            keys::WALL_SIDE_MID_LEFT,
            keys::WALL_SIDE_MID_RIGHT,
            keys::UI_HEART_FULL,
            keys::FLASK_BIG_BLUE,
            keys::FLASK_BIG_RED,
            keys::FLASK_BIG_YELLOW,
        ]
        .map(|name| (name, TILE)),
    );
    statics.push((keys::DOORS_LEAF_CLOSED, (32, 32)));
    statics.push((keys::DOORS_LEAF_OPEN, (32, 32)));
    statics.push((keys::WEAPON_REGULAR_SWORD, (10, 21)));

    for (index, (name, (width, height))) in statics.into_iter().enumerate() {
        assets.insert_texture_entry(TextureEntry::Static {
            texture: TextureRef { name: name.to_string(), width, height },
            region: AtlasRegion { x: 0, y: index as u32 * 32, width, height },
        });
    }

    assets.insert_texture_entry(strip(keys::CHEST_FULL_OPEN_ANIM, TILE, 3));
    assets.insert_texture_entry(strip(keys::COIN_ANIM, (8, 8), 4));

    for stock in &STOCK_ENTITIES {
        let idle = format!("{}_idle_anim", stock.sprite);
        let run = format!("{}_run_anim", stock.sprite);
        assets.insert_texture_entry(strip(&idle, stock.size, 4));
        assets.insert_texture_entry(strip(&run, stock.size, 4));
        assets.insert_entity(stock_prototype(stock, &idle, &run));
    }

    for name in [
        keys::SOUND_CHEST_OPEN,
        keys::SOUND_DOOR_OPEN,
        keys::SOUND_WEAPON_SWING,
        keys::SOUND_LEVEL_UP,
        keys::SOUND_TRINKET_PICKUP,
        "mob_hurt",
        "mob_death",
        "mob_attack",
        "player_hurt",
    ] {
        assets.insert_sound_effect(SoundRef { name: name.to_string() });
    }
    assets.insert_music(SoundRef { name: keys::MUSIC_MAIN_MENU.to_string() });
    assets.insert_music(SoundRef { name: keys::MUSIC_GAMEPLAY.to_string() });

    assets
}

fn strip(name: &str, (width, height): (u32, u32), count: u32) -> TextureEntry {
    TextureEntry::Animated {
        name: name.to_string(),
        frames: (0..count)
            .map(|index| TextureRef { name: format!("{name}_{index}"), width, height })
            .collect(),
        regions: (0..count).map(|index| AtlasRegion { x: width * index, y: 0, width, height }).collect(),
    }
}

fn frames(name: &str, (width, height): (u32, u32), flipped: bool) -> Vec<TextureRef> {
    let suffix = if flipped { "_flipped" } else { "" };
    (0..4).map(|index| TextureRef { name: format!("{name}_{index}{suffix}"), width, height }).collect()
}

fn stock_prototype(stock: &StockEntity, idle: &str, run: &str) -> EntityPrototype {
    let directional = |name: &str, rate: f32| DirectionalAnimation {
        right: Animation::new(frames(name, stock.size, false), rate),
        left: Some(Animation::new(frames(name, stock.size, true), rate)),
    };
    let animations =
        AnimationSet::new(directional(idle, 0.2)).with(EntityState::Moving, directional(run, 0.1));

    let mut sounds = BTreeMap::new();
    let prefix = if stock.class == EntityClass::Player { "player" } else { "mob" };
    sounds.insert(keys::TRIGGER_HURT.to_string(), SoundRef { name: format!("{prefix}_hurt") });
    if stock.class == EntityClass::HostileMob {
        sounds.insert(keys::TRIGGER_DEATH.to_string(), SoundRef { name: "mob_death".into() });
        sounds.insert(keys::TRIGGER_ATTACK.to_string(), SoundRef { name: "mob_attack".into() });
    }

    EntityPrototype {
        name: stock.name.to_string(),
        class: stock.class,
        sprite_scale: 0.25,
        animations: Arc::new(animations),
        health: stock.health,
        damage: stock.damage,
        movement_speed: stock.movement_speed,
        sounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_pack_covers_every_key() {
        let assets = placeholder_repository();
        for name in keys::FLOOR_VARIANTS.iter().chain(keys::SPECIAL_WALL_VARIANTS.iter()) {
            assert!(assets.static_texture(name).is_ok(), "{name}");
        }
        assert!(assets.static_texture(keys::WEAPON_REGULAR_SWORD).is_ok());
        assert_eq!(assets.animated_texture(keys::CHEST_FULL_OPEN_ANIM).map(<[_]>::len).ok(), Some(3));
        assert!(assets.sound_effect(keys::SOUND_TRINKET_PICKUP).is_ok());
        assert!(assets.music(keys::MUSIC_GAMEPLAY).is_ok());
    }

    #[test]
    fn stock_sounds_resolve_in_the_same_pack() {
        let assets = placeholder_repository();
        for name in assets.hostile_template_names().iter().chain([keys::PLAYER.to_string()].iter()) {
            let template = assets.entity_template(name).expect("template");
            for sound in template.sounds.values() {
                assert!(assets.sound_effect(&sound.name).is_ok(), "{}", sound.name);
            }
        }
    }

    #[test]
    fn hostile_names_are_sorted_and_exclude_the_player() {
        let assets = placeholder_repository();
        assert_eq!(assets.hostile_template_names(), vec!["goblin", "imp", "skelet"]);
    }
}
