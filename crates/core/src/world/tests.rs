use super::*;

use crate::content::placeholder_repository;
use crate::entity::{DamageOutcome, EntityKind, Strike, TrinketKind};

const FRAME: f32 = 1.0 / 60.0;

/// Small level with no random content, so tests place exactly what they need.
fn quiet_world() -> World {
    let mut config = GameConfig::default();
    config.constants.generator_grid_size = 5;
    config.constants.generator_probability_decay = 0.0;
    config.constants.generator_max_mobs = 0;
    config.constants.room_chest_chance = 0.0;

    let mut world =
        World::new(config, Arc::new(placeholder_repository()), GameRng::seeded(5)).expect("world");
    world.load_level(1).expect("level");
    world
}

fn player_position(world: &World) -> Vec2 {
    world.player().map(|player| player.position).expect("player")
}

fn run(world: &mut World, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        world.update(FRAME).expect("update");
    }
}

#[test]
fn loading_a_level_places_the_player_and_binds_bodies() {
    let world = quiet_world();
    let layout = world.layout().expect("layout");

    assert_eq!(world.level(), 1);
    assert_eq!(layout.rooms.len(), 5);
    assert_eq!(world.doors().count(), 2);
    assert_eq!(world.mobs().count(), 0);
    assert!(world.body(world.player_id()).is_some());
    assert!(!world.wall_tiles().is_empty());
}

#[test]
fn swing_hits_a_mob_once_per_swing() {
    let mut world = quiet_world();
    let origin = player_position(&world);
    let goblin = world.spawn_mob("goblin", origin + Vec2::new(150.0, 0.0)).expect("goblin");

    assert!(world.swing_weapon(origin + Vec2::new(150.0, 0.0)).expect("swing"));
    assert!(!world.swing_weapon(origin).expect("second swing"), "swing is rate limited");

    world.update(FRAME).expect("update");
    let after_hit = world.entity(goblin).and_then(Entity::health).expect("health");
    assert!((after_hit - 2.5).abs() < 1e-4, "goblin at 10 hp takes 7.5 from a level 1 player");

    run(&mut world, 0.3);
    assert_eq!(world.entity(goblin).and_then(Entity::health), Some(after_hit));
    assert!(world.swings().is_empty());
}

#[test]
fn killing_a_mob_drops_exp_that_reaches_the_player() {
    let mut world = quiet_world();
    let origin = player_position(&world);
    let goblin = world.spawn_mob("goblin", origin + Vec2::new(150.0, 0.0)).expect("goblin");
    if let Some(vitals) = world.entity_mut(goblin).and_then(|mob| mob.vitals.as_mut()) {
        vitals.health = 1.0;
    }

    world.swing_weapon(origin + Vec2::new(150.0, 0.0)).expect("swing");
    world.update(FRAME).expect("update");
    assert_eq!(world.entity(goblin).map(Entity::state), Some(EntityState::Dying));
    assert!(world.trinkets().any(|(_, trinket)| trinket.kind == EntityKind::Trinket(TrinketKind::Exp)));
    assert!(world.drain_events().iter().any(|event| matches!(
        event,
        WorldEvent::Sound(sound) if sound.name == "mob_death"
    )));

    run(&mut world, 2.0);
    assert!(world.entity(goblin).is_none());
    assert!(world.body(goblin).is_none());
    assert_eq!(world.trinkets().count(), 0);
    assert_eq!(world.player().and_then(Entity::progress).map(|p| p.current_exp), Some(2));
}

#[test]
fn chest_opens_then_deposits_one_trinket() {
    let mut world = quiet_world();
    let origin = player_position(&world);
    let chest = world.spawn_chest(origin + Vec2::new(120.0, 0.0)).expect("chest");

    world.swing_weapon(origin + Vec2::new(120.0, 0.0)).expect("swing");
    world.update(FRAME).expect("update");
    assert_eq!(world.entity(chest).map(Entity::state), Some(EntityState::Opening));

    world.update(0.7).expect("update");
    assert_eq!(world.entity(chest).map(Entity::state), Some(EntityState::Opened));
    assert_eq!(world.trinkets().count(), 1);
}

#[test]
fn opening_the_exit_advances_the_level() {
    let mut world = quiet_world();
    let (exit, exit_position) =
        world.doors().nth(1).map(|(id, door)| (id, door.position)).expect("exit door");
    let player = world.player_id();
    if let Some(entity) = world.entity_mut(player) {
        entity.position = exit_position - Vec2::new(0.0, 150.0);
    }

    world.swing_weapon(exit_position).expect("swing");
    world.update(FRAME).expect("update");
    assert_eq!(world.entity(exit).map(Entity::state), Some(EntityState::Opened));

    run(&mut world, 0.7);
    assert_eq!(world.level(), 2);
    assert!(world.entity(exit).is_none());
    assert!(world.drain_events().contains(&WorldEvent::LevelAdvanced { level: 2 }));
    assert_eq!(world.body_count(), 1 + world.mobs().count());
    assert_eq!(world.entity_count(), 1 + world.mobs().count() + world.chests().count() + 2);
}

#[test]
fn entry_door_ignores_hits() {
    let mut world = quiet_world();
    let (entry, entry_position) =
        world.doors().next().map(|(id, door)| (id, door.position)).expect("entry door");

    world.swing_weapon(entry_position).expect("swing");
    run(&mut world, 0.3);
    assert_eq!(world.entity(entry).map(Entity::state), Some(EntityState::Idle));
    assert_eq!(world.level(), 1);
}

#[test]
fn mob_contact_can_kill_the_player_and_end_the_game() {
    let mut world = quiet_world();
    let player = world.player_id();
    if let Some(vitals) = world.entity_mut(player).and_then(|hero| hero.vitals.as_mut()) {
        vitals.health = 1.0;
    }
    let origin = player_position(&world);
    let goblin = world.spawn_mob("goblin", origin + Vec2::new(10.0, 0.0)).expect("goblin");

    world.update(FRAME).expect("update");
    assert_eq!(world.entity(goblin).map(Entity::state), Some(EntityState::Attacking));
    assert_eq!(world.player().map(Entity::state), Some(EntityState::Dying));
    assert!(world.drain_events().contains(&WorldEvent::PlayerDied));
    assert!(!world.swing_weapon(origin).expect("swing"));

    run(&mut world, 1.6);
    assert!(world.is_game_over());
    assert!(world.drain_events().contains(&WorldEvent::GameOver));
}

#[test]
fn damage_inside_the_flinch_window_counts_once() {
    let mut world = quiet_world();
    let origin = player_position(&world);
    let goblin = world.spawn_mob("goblin", origin + Vec2::new(600.0, 0.0)).expect("goblin");
    let strike = Strike { damage: 3.0, origin };

    assert!(matches!(world.apply_damage(goblin, strike).expect("hit"), DamageOutcome::Hurt { .. }));
    assert_eq!(world.apply_damage(goblin, strike).expect("hit"), DamageOutcome::Ignored);
    assert_eq!(world.entity(goblin).and_then(Entity::health), Some(7.0));

    run(&mut world, 0.2);
    assert_ne!(world.entity(goblin).map(Entity::state), Some(EntityState::Attacked));
    assert_eq!(world.body(goblin).map(|body| body.knockback), Some(Vec2::ZERO));
}

#[test]
fn expired_potion_is_reverted_on_the_player() {
    let mut world = quiet_world();
    let player = world.player_id();
    let constants = world.config().constants.clone();
    let speed = world.player().and_then(Entity::movement_speed).expect("speed");

    let effect = world
        .entity_mut(player)
        .and_then(|hero| hero.consume_trinket(TrinketKind::SpeedPotion, 1, &constants).effect)
        .expect("timed effect");
    assert!(world.player().and_then(Entity::movement_speed).expect("speed") > speed);

    world.dispatch(TimedAction::ExpireTrinket { target: player, effect }).expect("dispatch");
    let restored = world.player().and_then(Entity::movement_speed).expect("speed");
    assert!((restored - speed).abs() < 1e-5);
}

#[test]
fn stale_actions_do_nothing_after_despawn() {
    let mut world = quiet_world();
    let origin = player_position(&world);
    let goblin = world.spawn_mob("goblin", origin + Vec2::new(600.0, 0.0)).expect("goblin");
    world.despawn(goblin);

    world.dispatch(TimedAction::MobAttackEnd(goblin)).expect("dispatch");
    world.dispatch(TimedAction::PickUp(goblin)).expect("dispatch");
    world.dispatch(TimedAction::Despawn(goblin)).expect("dispatch");
    assert!(world.entity(goblin).is_none());
    assert_eq!(world.mobs().count(), 0);
}

#[test]
fn missing_world_sound_fails_at_startup() {
    let full = placeholder_repository();
    let mut assets = AssetRepository::new();
    assets.insert_entity(full.entity_template(keys::PLAYER).expect("player template"));

    let result = World::new(GameConfig::default(), Arc::new(assets), GameRng::seeded(1));
    assert!(matches!(result, Err(crate::error::CrawlerError::NotFound { .. })));
}
