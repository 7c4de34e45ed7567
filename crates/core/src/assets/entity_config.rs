//! JSON entity definitions and their conversion into prototypes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::entity::{Animation, AnimationSet, DirectionalAnimation, EntityClass, EntityPrototype};
use crate::error::{CrawlerError, Result};
use crate::types::EntityState;

use super::AssetRepository;
use super::texture_meta::FLIPPED_SUFFIX;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnimationConfig {
    pub state: EntityState,
    pub name: String,
    pub rate: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct StatsConfig {
    pub health: f32,
    pub damage: f32,
    pub movement_speed: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    pub class: EntityClass,
    pub sprite_scale: f32,
    pub animations: Vec<AnimationConfig>,
    pub stats: StatsConfig,
    /// Trigger name (`hurt`, `death`, `attack`) to sound effect name.
    #[serde(default)]
    pub sounds: BTreeMap<String, String>,
}

pub fn parse_entity_config(text: &str, source_name: &str) -> Result<EntityConfig> {
    serde_json::from_str(text).map_err(|e| CrawlerError::malformed(source_name, e.to_string()))
}

impl EntityConfig {
    /// Resolves animation and sound names against the registry. Animations bind to the
    /// right-facing slot and, when a `_flipped` strip exists, to the left-facing one too.
    pub fn into_prototype(self, assets: &AssetRepository) -> Result<EntityPrototype> {
        let mut by_state = BTreeMap::new();
        for animation in &self.animations {
            let right = Animation::new(assets.animated_texture(&animation.name)?.to_vec(), animation.rate);
            let left = assets
                .animated_texture(&format!("{}{FLIPPED_SUFFIX}", animation.name))
                .ok()
                .map(|frames| Animation::new(frames.to_vec(), animation.rate));
            by_state.insert(animation.state, DirectionalAnimation { right, left });
        }

        let Some(idle) = by_state.remove(&EntityState::Idle) else {
            return Err(CrawlerError::malformed(
                &self.name,
                "entity has no IDLE animation".to_string(),
            ));
        };
        let mut set = AnimationSet::new(idle);
        for (state, animation) in by_state {
            set.insert(state, animation);
        }

        let mut sounds = BTreeMap::new();
        for (trigger, sound_name) in &self.sounds {
            sounds.insert(trigger.clone(), assets.sound_effect(sound_name)?.clone());
        }

        Ok(EntityPrototype {
            name: self.name,
            class: self.class,
            sprite_scale: self.sprite_scale,
            animations: Arc::new(set),
            health: self.stats.health,
            damage: self.stats.damage,
            movement_speed: self.stats.movement_speed,
            sounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetKind;
    use crate::types::{Direction, SoundRef};

    const GOBLIN: &str = r#"{
        "name": "goblin",
        "class": "HostileMob",
        "sprite_scale": 0.25,
        "animations": [
            { "state": "IDLE", "name": "goblin_idle_anim", "rate": 0.2 },
            { "state": "MOVING", "name": "goblin_run_anim", "rate": 0.1 }
        ],
        "stats": { "health": 10, "damage": 2, "movement_speed": 0.8 },
        "sounds": { "hurt": "mob_hurt" }
    }"#;

    fn registry() -> AssetRepository {
        let mut assets = AssetRepository::new();
        assets.load_texture_meta("goblin_idle_anim 0 0 16 16 4\ngoblin_run_anim 0 16 16 16 4\n", "meta");
        assets.insert_sound_effect(SoundRef { name: "mob_hurt".into() });
        assets
    }

    #[test]
    fn config_resolves_into_prototype_with_flipped_frames() {
        let config = parse_entity_config(GOBLIN, "goblin.json").expect("parse");
        let prototype = config.into_prototype(&registry()).expect("prototype");

        assert!(prototype.is_hostile());
        assert_eq!(prototype.health, 10.0);
        let left = prototype.animations.resolve(EntityState::Moving, Direction::Left);
        assert_eq!(left.frames[0].name, "goblin_run_anim_0_flipped");
        assert_eq!(prototype.sounds.get("hurt").map(|s| s.name.as_str()), Some("mob_hurt"));
    }

    #[test]
    fn unknown_animation_is_not_found() {
        let text = GOBLIN.replace("goblin_run_anim", "goblin_fly_anim");
        let config = parse_entity_config(&text, "goblin.json").expect("parse");
        let err = config.into_prototype(&registry()).expect_err("missing animation");
        assert!(matches!(err, CrawlerError::NotFound { kind: AssetKind::Animation, .. }));
    }

    #[test]
    fn missing_idle_animation_is_malformed() {
        let text = GOBLIN.replace("\"IDLE\"", "\"ATTACKING\"");
        let config = parse_entity_config(&text, "goblin.json").expect("parse");
        assert!(matches!(
            config.into_prototype(&registry()),
            Err(CrawlerError::MalformedData { .. })
        ));
    }

    #[test]
    fn unknown_class_is_malformed() {
        let text = GOBLIN.replace("HostileMob", "Dragon");
        assert!(matches!(
            parse_entity_config(&text, "goblin.json"),
            Err(CrawlerError::MalformedData { .. })
        ));
    }
}
