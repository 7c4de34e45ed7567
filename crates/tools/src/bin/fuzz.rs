use anyhow::{Result, bail};
use clap::Parser;
use crawler_core::content::placeholder_repository;
use crawler_core::{EntityState, GameConfig, GameRng, Vec2, World, WorldEvent};
use std::sync::Arc;

const FRAME: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 6000)]
    frames: u32,
}

fn check_invariants(world: &World) -> Result<()> {
    let Some(player) = world.player() else {
        bail!("Invariant failed: player entity removed");
    };
    if let Some(vitals) = &player.vitals
        && vitals.health > vitals.max_health
    {
        bail!("Invariant failed: player HP {} > max {}", vitals.health, vitals.max_health);
    }
    for (id, mob) in world.mobs() {
        if world.body(id).is_none() {
            bail!("Invariant failed: mob {id:?} has no physics body");
        }
        if let Some(vitals) = &mob.vitals
            && vitals.health > vitals.max_health
        {
            bail!("Invariant failed: mob HP > max HP");
        }
    }
    let listed = 1
        + world.mobs().count()
        + world.chests().count()
        + world.doors().count()
        + world.trinkets().count();
    if listed != world.entity_count() {
        bail!("Invariant failed: {} entities stored, {} listed", world.entity_count(), listed);
    }
    if world.body_count() != 1 + world.mobs().count() {
        bail!("Invariant failed: {} bodies for {} mobs", world.body_count(), world.mobs().count());
    }
    if world.doors().count() > 2 {
        bail!("Invariant failed: more than two doors");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} frames...", args.seed, args.frames);
    let mut world =
        World::new(GameConfig::default(), Arc::new(placeholder_repository()), GameRng::seeded(args.seed))?;
    world.load_level(1)?;
    let mut input = GameRng::seeded(args.seed ^ 0x5eed);

    let mut sounds = 0usize;
    for frame in 0..args.frames {
        if frame % 30 == 0 {
            let angle = input.range(0.0, 360.0).to_radians();
            let moving = input.chance(0.8);
            let movement = if moving { Vec2::new(angle.cos(), angle.sin()) } else { Vec2::ZERO };
            world.set_player_movement(movement);

            let origin = world.player().map(|player| player.position).unwrap_or_default();
            let aim = input.range(0.0, 360.0).to_radians();
            let target = origin + Vec2::new(aim.cos(), aim.sin()) * 120.0;
            world.set_aim(input.chance(0.6).then_some(target));
        }

        world.update(FRAME)?;
        for event in world.drain_events() {
            match event {
                WorldEvent::Sound(_) => sounds += 1,
                WorldEvent::LevelAdvanced { level } => println!("Reached level {level} at frame {frame}"),
                WorldEvent::PlayerDied => println!("Player died at frame {frame}"),
                WorldEvent::GameOver => {}
            }
        }
        check_invariants(&world)?;

        if world.is_game_over() {
            if world.player().map(|player| player.state()) != Some(EntityState::Dying) {
                bail!("Invariant failed: game over without a dying player");
            }
            println!("Game over on level {} after {} frames", world.level(), frame + 1);
            break;
        }
    }

    println!("Fuzz run complete: level {}, {} sounds played.", world.level(), sounds);
    Ok(())
}
