//! corridor — smallest runnable example for the botnav bot controller.
//!
//! Two bots in a five-room corridor.  Bot 0 picks a long-term item goal and
//! walks to it; bot 1 hears gunfire halfway through and goes to look.  The
//! host side is a toy: origins advance along each input's direction and
//! nothing collides.  Set `RUST_LOG=nav_move=debug` to watch the dispatcher.

mod level;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nav_bot::{BotControllerBuilder, BotId, BotInput, BotObserver, ClientSnapshot};
use nav_core::{ClientId, EntityId, NavConfig, TravelFlags, TravelType, Vec3};
use nav_goal::{SoundEmission, SoundInfo, SoundType};
use nav_move::{MoveCommand, MoverCatalogue, MoverKind};

use level::{build_level, level_items, lift, room, LIFT_MODEL};

// ── Constants ─────────────────────────────────────────────────────────────────

const FRAMES:        u32 = 40;
const FRAME_SECS:    f32 = 0.1;
const GUNFIRE_FRAME: u32 = 20;
const LIFT_ENTITY:   EntityId = EntityId(64);
const GUNFIRE_SOUND: &str = "weapons/rocket/rocklf1a.wav";

// ── Observer ──────────────────────────────────────────────────────────────────

/// Counts dispatched and failed commands per travel type.
#[derive(Default)]
struct Tally {
    walked: usize,
    lifted: usize,
    failed: usize,
}

impl BotObserver for Tally {
    fn on_move_dispatched(&mut self, _bot: BotId, command: &MoveCommand) {
        match command.kind() {
            Some(TravelType::Elevator) => self.lifted += 1,
            _ => self.walked += 1,
        }
    }

    fn on_move_failed(&mut self, _bot: BotId, _command: &MoveCommand) {
        self.failed += 1;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== corridor — botnav bot controller ===");

    // 1. Level.
    let world = build_level()?;
    println!("World: {} areas, {} reachabilities", world.num_areas(), world.num_reach());

    // 2. Controller.
    let mut movers = MoverCatalogue::new();
    movers.insert(LIFT_MODEL, MoverKind::Plat);
    let mut bots = BotControllerBuilder::new(NavConfig::default(), world)
        .clients(vec![ClientId(0), ClientId(1)])
        .sound_infos(vec![SoundInfo::new(GUNFIRE_SOUND, SoundType::FiringWeapon, 1.0)])
        .sound_assets([GUNFIRE_SOUND])
        .movers(movers)
        .level_items(level_items())
        .build()?;

    // 3. Spawn: bot 0 in room 1, bot 1 in room 2.
    let mut origins = [room(1), room(2)];
    bots.set_frame_time(0.0);
    bots.update_entity(LIFT_ENTITY, Some(&lift()))?;
    for (i, origin) in origins.iter().enumerate() {
        bots.update_client(BotId(i as u32), &ClientSnapshot { origin: *origin, ..Default::default() })?;
    }

    // 4. Bot 0 wants the best item on the map.
    match bots.choose_ltg_item(BotId(0), TravelFlags::DEFAULT)? {
        Some(goal) => println!("Bot 0 long-term goal: item {} in {}", goal.id, goal.area),
        None => println!("Bot 0 found no item worth the trip"),
    }
    println!();

    // 5. Run.
    let mut tally = Tally::default();
    let mut last: Vec<(BotId, BotInput)> = Vec::new();
    for frame in 1..=FRAMES {
        let now = frame as f32 * FRAME_SECS;
        bots.set_frame_time(now);

        if frame == GUNFIRE_FRAME {
            bots.record_sound(SoundEmission {
                origin:      room(4),
                entity:      EntityId(99),
                channel:     0,
                sound_index: 0,
                volume:      1.0,
                attenuation: 1.0,
                time_offset: 0.0,
            });
            println!("frame {frame:>2}: gunfire in room 4");
        }

        for (i, origin) in origins.iter().enumerate() {
            let velocity = last.get(i).map_or(Vec3::ZERO, |(_, input)| input.dir * input.speed);
            bots.update_client(BotId(i as u32), &ClientSnapshot { origin: *origin, velocity, ..Default::default() })?;
        }

        last = bots.tick(&mut tally)?;
        for (bot, input) in &last {
            let origin = &mut origins[bot.index()];
            *origin += input.dir * (input.speed * FRAME_SECS);
        }
    }

    // 6. Summary.
    println!();
    println!("Ran {FRAMES} frames: {} walk, {} lift, {} failed", tally.walked, tally.lifted, tally.failed);
    println!();
    println!("{:<6} {:<24} {:<10} {:<12}", "Bot", "Origin", "Goal", "Last input");
    println!("{}", "-".repeat(60));
    for (bot, input) in &last {
        let goal = bots
            .selection(*bot)?
            .goal_id()
            .map_or_else(|| "-".to_string(), |g| g.to_string());
        println!("{:<6} {:<24} {:<10} {input}", bot.0, origins[bot.index()].to_string(), goal);
    }

    Ok(())
}
