//! The demo level: a five-room corridor with a lift up to a ledge.
//!
//! ```text
//!   ┌─────┬─────┬─────┬─────┐ ┌─────┐
//!   │  1  │  2  │  3  │  4  │→│  5  │  ledge, reached by the lift in room 4
//!   └─────┴─────┴─────┴─────┘ └─────┘
//! ```

use nav_core::{AreaId, GoalId, TravelType, Vec3};
use nav_goal::{GoalCandidate, LevelItem};
use nav_world::{EntityUpdate, Solid, WorldBuilder, WorldResult, WorldState};

/// Brush model number of the lift.
pub const LIFT_MODEL: i32 = 2;

/// Standing point in the middle of room `i`, just above the floor.
pub fn room(i: u32) -> Vec3 {
    Vec3::new((i - 1) as f32 * 100.0 + 50.0, 50.0, 10.0)
}

/// Rooms 1–4 walkable both ways, one second per doorway; room 5 only by lift.
pub fn build_level() -> WorldResult<WorldState> {
    let mut b = WorldBuilder::new();
    for i in 0..4 {
        let x = i as f32 * 100.0;
        b.add_area(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 100.0, 100.0, 100.0));
    }
    let ledge = b.add_area(Vec3::new(400.0, 0.0, 200.0), Vec3::new(500.0, 100.0, 300.0));

    for i in 1..4 {
        let door = Vec3::new(i as f32 * 100.0, 50.0, 10.0);
        b.add_reach(AreaId(i), AreaId(i + 1), TravelType::Walk, 100, door, door + Vec3::new(10.0, 0.0, 0.0));
        b.add_reach(AreaId(i + 1), AreaId(i), TravelType::Walk, 100, door, door - Vec3::new(10.0, 0.0, 0.0));
    }
    b.add_mover_reach(
        AreaId(4),
        ledge,
        TravelType::Elevator,
        LIFT_MODEL,
        300,
        Vec3::new(350.0, 50.0, 8.0),
        Vec3::new(450.0, 50.0, 210.0),
    );
    b.build()
}

/// The lift, resting on the floor of room 4.
pub fn lift() -> EntityUpdate {
    EntityUpdate {
        origin:      Vec3::new(350.0, 50.0, 8.0),
        mins:        Vec3::new(-30.0, -30.0, -8.0),
        maxs:        Vec3::new(30.0, 30.0, 0.0),
        solid:       Solid::Bsp,
        model_index: LIFT_MODEL + 1,
        ..EntityUpdate::default()
    }
}

/// Armor in room 3, a mega health on the ledge, and a shard behind the bots.
pub fn level_items() -> Vec<LevelItem> {
    vec![
        LevelItem::new(GoalCandidate::new(GoalId(1), room(3), AreaId(3), 40.0)).with_respawn(25.0),
        LevelItem::new(GoalCandidate::new(GoalId(2), Vec3::new(450.0, 50.0, 210.0), AreaId(5), 120.0))
            .with_respawn(35.0),
        LevelItem::new(GoalCandidate::new(GoalId(3), room(1), AreaId(1), 5.0)),
    ]
}
