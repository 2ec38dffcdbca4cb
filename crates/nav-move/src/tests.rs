//! Unit tests for nav-move.

#[cfg(test)]
mod helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use nav_core::{AreaId, ClientId, MoveHandle, NavConfig, Vec3};
    use nav_world::{AreaContents, WorldBuilder, WorldState};

    use crate::{InitMove, MoveDispatcher, MoveHooks};

    pub fn v(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x, y, z)
    }

    pub fn id(n: u32) -> AreaId {
        AreaId(n)
    }

    /// `n` 100-unit cubes in a row along x; area `i` spans
    /// `x ∈ [100(i-1), 100i]`.  `edges` adds reachabilities.
    pub fn row<F>(n: u32, liquid: &[u32], edges: F) -> WorldState
    where
        F: FnOnce(&mut WorldBuilder),
    {
        let mut b = WorldBuilder::new();
        for i in 1..=n {
            let x = (i - 1) as f32 * 100.0;
            let contents = if liquid.contains(&i) { AreaContents::WATER } else { AreaContents::empty() };
            b.add_area_with_contents(v(x, 0.0, 0.0), v(x + 100.0, 100.0, 100.0), contents);
        }
        edges(&mut b);
        b.build().unwrap()
    }

    /// Middle of area `i` in a [`row`] world, 10 units off the floor.
    pub fn inside(i: u32) -> Vec3 {
        v((i - 1) as f32 * 100.0 + 50.0, 50.0, 10.0)
    }

    pub fn hook_config() -> NavConfig {
        NavConfig { use_hook: true, laser_hook: true, ..NavConfig::default() }
    }

    pub fn spawn<H: MoveHooks>(d: &mut MoveDispatcher<H>, world: &WorldState, origin: Vec3) -> MoveHandle {
        let h = d.alloc().unwrap();
        let init = InitMove { origin, client: ClientId(3), ..InitMove::default() };
        d.init(h, &init, world).unwrap();
        h
    }

    /// Counts precache requests.
    #[derive(Default)]
    pub struct Counting {
        pub calls: AtomicUsize,
        pub last:  Mutex<Option<String>>,
    }

    impl Counting {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl MoveHooks for Counting {
        fn precache_model(&self, _client: ClientId, path: &str) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            *self.last.lock().unwrap() = Some(path.to_string());
        }
    }
}

// ── Pool ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use nav_core::{AreaId, MoveHandle};
    use nav_world::{AreaContents, WorldBuilder};
    use super::helpers::{inside, row, v};
    use crate::{InitMove, MoveError, MoveFlags, MovePool};

    #[test]
    fn alloc_returns_lowest_free_handle() {
        let mut p = MovePool::new(4);
        assert_eq!(p.alloc(), Ok(MoveHandle(1)));
        assert_eq!(p.alloc(), Ok(MoveHandle(2)));
        assert_eq!(p.alloc(), Ok(MoveHandle(3)));
        p.free(MoveHandle(2));
        assert_eq!(p.alloc(), Ok(MoveHandle(2)));
        assert_eq!(p.in_use(), 3);
    }

    #[test]
    fn exhaustion_is_an_error() {
        let mut p = MovePool::new(2);
        p.alloc().unwrap();
        p.alloc().unwrap();
        assert_eq!(p.alloc(), Err(MoveError::PoolExhausted { capacity: 2 }));
    }

    #[test]
    fn bad_handles_are_ignored_by_free_and_reset() {
        let mut p = MovePool::new(2);
        let h = p.alloc().unwrap();
        p.free(MoveHandle(0));
        p.free(MoveHandle(9));
        p.free(MoveHandle(2));
        p.reset(MoveHandle(2));
        assert_eq!(p.in_use(), 1);

        p.free(h);
        p.free(h);
        assert_eq!(p.in_use(), 0);
    }

    #[test]
    fn lookups_distinguish_range_from_allocation() {
        let mut p = MovePool::new(2);
        assert_eq!(
            p.get(MoveHandle(0)).unwrap_err(),
            MoveError::InvalidHandle { handle: MoveHandle(0), capacity: 2 }
        );
        assert_eq!(
            p.get(MoveHandle(3)).unwrap_err(),
            MoveError::InvalidHandle { handle: MoveHandle(3), capacity: 2 }
        );
        assert_eq!(p.get(MoveHandle(1)).unwrap_err(), MoveError::NotAllocated(MoveHandle(1)));
        let h = p.alloc().unwrap();
        assert!(p.get(h).is_ok());
    }

    #[test]
    fn reset_clears_but_keeps_the_slot() {
        let world = row(2, &[], |_| {});
        let mut p = MovePool::new(1);
        let h = p.alloc().unwrap();
        p.init(h, &InitMove { origin: inside(2), ..InitMove::default() }, &world).unwrap();
        assert_eq!(p.get(h).unwrap().area, AreaId(2));

        p.reset(h);
        let s = p.get(h).unwrap();
        assert_eq!(s.area, AreaId::INVALID);
        assert_eq!(s.origin, v(0.0, 0.0, 0.0));
    }

    #[test]
    fn init_classifies_liquid_and_ladder() {
        let mut b = WorldBuilder::new();
        b.add_area_with_contents(v(0.0, 0.0, 0.0), v(100.0, 100.0, 100.0), AreaContents::SLIME);
        b.add_area_with_contents(v(200.0, 0.0, 0.0), v(300.0, 100.0, 100.0), AreaContents::LADDER);
        let world = b.build().unwrap();

        let mut p = MovePool::new(2);
        let wet = p.alloc().unwrap();
        let init = InitMove { origin: v(50.0, 50.0, 50.0), or_move_flags: MoveFlags::ONGROUND, ..InitMove::default() };
        p.init(wet, &init, &world).unwrap();
        let s = p.get(wet).unwrap();
        assert!(s.move_flags.contains(MoveFlags::SWIMMING | MoveFlags::ONGROUND));
        assert!(!s.move_flags.contains(MoveFlags::AGAINSTLADDER));

        let climb = p.alloc().unwrap();
        p.init(climb, &InitMove { origin: v(250.0, 50.0, 50.0), ..InitMove::default() }, &world).unwrap();
        let s = p.get(climb).unwrap();
        assert!(s.move_flags.contains(MoveFlags::AGAINSTLADDER));
        assert!(!s.is_swimming());
    }

    #[test]
    fn classify_keeps_area_when_outside_everything() {
        let world = row(2, &[1], |_| {});
        let mut p = MovePool::new(1);
        let h = p.alloc().unwrap();
        p.init(h, &InitMove { origin: inside(1), ..InitMove::default() }, &world).unwrap();

        let s = p.get_mut(h).unwrap();
        s.origin = v(5000.0, 0.0, 0.0);
        s.classify_environment(&world);
        assert_eq!(s.area, AreaId(1));
        assert_eq!(s.last_area, AreaId(1));
        assert!(s.is_swimming());
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use nav_core::{AreaId, MoveHandle, NavConfig, ReachId, TravelFlags, TravelType};
    use super::helpers::{hook_config, id, inside, row, spawn, v};
    use crate::{MoveDispatcher, MoveError, MoveFlags, MoveGoal, MoveResultFlags, MoveType, ResultType};

    fn goal_in(area: u32) -> MoveGoal {
        MoveGoal::new(inside(area), id(area))
    }

    #[test]
    fn missing_goal_fails() {
        let world = row(2, &[], |_| {});
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        let cmd = d.move_to_goal(h, None, TravelFlags::empty(), 1.0, &world, None).unwrap();
        assert!(cmd.failure);
        assert!(cmd.result_type.is_empty());
    }

    #[test]
    fn goal_outside_areas_is_in_solid() {
        let world = row(2, &[], |_| {});
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        for area in [AreaId::INVALID, AreaId(3)] {
            let goal = MoveGoal::new(v(0.0, 0.0, 0.0), area);
            let cmd = d.move_to_goal(h, Some(&goal), TravelFlags::empty(), 1.0, &world, None).unwrap();
            assert!(cmd.failure);
            assert_eq!(cmd.result_type, ResultType::INSOLIDAREA);
        }
    }

    #[test]
    fn bad_handle_is_an_error() {
        let world = row(2, &[], |_| {});
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let goal = goal_in(2);
        let err = d.move_to_goal(MoveHandle(1), Some(&goal), TravelFlags::empty(), 0.0, &world, None);
        assert_eq!(err.unwrap_err(), MoveError::NotAllocated(MoveHandle(1)));
    }

    #[test]
    fn no_edge_into_goal_area_walks_direct() {
        // Edges exist out of area 5, none into 9.
        let world = row(9, &[], |b| {
            b.add_reach(id(5), id(6), TravelType::Walk, 10, v(495.0, 50.0, 0.0), v(505.0, 50.0, 0.0));
            b.add_reach(id(5), id(4), TravelType::Walk, 10, v(405.0, 50.0, 0.0), v(395.0, 50.0, 0.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(5));
        let goal = MoveGoal::new(v(850.0, 50.0, 80.0), id(9));

        let cmd = d.move_to_goal(h, Some(&goal), TravelFlags::empty(), 2.0, &world, None).unwrap();
        assert!(!cmd.failure);
        assert_eq!(cmd.kind(), Some(TravelType::Walk));
        assert_eq!(cmd.dir, v(1.0, 0.0, 0.0));
        assert_eq!(cmd.speed, 400.0);
        assert!(!cmd.has(MoveResultFlags::SWIMVIEW));

        let s = d.state(h).unwrap();
        assert_eq!(s.last_reach, None);
        assert_eq!(s.reach_area, id(9));
        assert_eq!(s.last_goal_area, id(9));
        assert_eq!(s.last_origin, inside(5));
    }

    #[test]
    fn no_edge_from_water_swims_direct() {
        let world = row(9, &[5], |_| {});
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(5));
        let goal = MoveGoal::new(v(850.0, 50.0, 10.0 + 400.0), id(9));

        let cmd = d.move_to_goal(h, Some(&goal), TravelFlags::empty(), 2.0, &world, None).unwrap();
        assert_eq!(cmd.kind(), Some(TravelType::Swim));
        assert!(cmd.has(MoveResultFlags::SWIMVIEW));
        // Not flattened while swimming.
        assert!((cmd.dir.x - cmd.dir.z).abs() < 1e-5);
    }

    #[test]
    fn same_area_goes_direct_without_edges() {
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::Jump, 10, v(95.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, v(10.0, 50.0, 10.0));
        let goal = MoveGoal::new(v(90.0, 50.0, 10.0), id(1));

        let cmd = d.move_to_goal(h, Some(&goal), TravelFlags::empty(), 0.0, &world, None).unwrap();
        assert_eq!(cmd.kind(), Some(TravelType::Walk));
        assert_eq!(d.state(h).unwrap().last_reach, None);
        assert!(!d.state(h).unwrap().jump_reach);
    }

    #[test]
    fn picks_cheapest_edge_by_distance_plus_time() {
        // From (50, 50, 10): A costs 40²+10²+500, B costs 40²+10²+100.
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::Walk, 500, v(90.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
            b.add_reach(id(1), id(2), TravelType::Walk, 100, v(10.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, v(50.0, 50.0, 10.0));

        d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 0.0, &world, None).unwrap();
        let s = d.state(h).unwrap();
        assert_eq!(s.last_reach, Some(ReachId(1)));
        assert_eq!(s.reach_area, id(2));
    }

    #[test]
    fn ties_keep_the_lowest_index() {
        let world = row(2, &[], |b| {
            for _ in 0..3 {
                b.add_reach(id(1), id(2), TravelType::Walk, 100, v(90.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
            }
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 0.0, &world, None).unwrap();
        assert_eq!(d.state(h).unwrap().last_reach, Some(ReachId(0)));
    }

    #[test]
    fn mask_filters_edges() {
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::RocketJump, 50, v(90.0, 50.0, 0.0), v(150.0, 50.0, 60.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));

        // Rocket jumps are not in the default mask.
        let cmd = d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 0.0, &world, None).unwrap();
        assert_eq!(cmd.kind(), Some(TravelType::Walk));
        assert_eq!(d.state(h).unwrap().last_reach, None);

        let mask = TravelFlags::DEFAULT | TravelFlags::ROCKETJUMP;
        let cmd = d.move_to_goal(h, Some(&goal_in(2)), mask, 0.0, &world, None).unwrap();
        assert_eq!(cmd.kind(), Some(TravelType::RocketJump));
        let s = d.state(h).unwrap();
        assert_eq!(s.last_reach, Some(ReachId(0)));
        assert!(s.jump_reach);
    }

    #[test]
    fn timeout_follows_travel_type() {
        for (kind, timeout) in [
            (TravelType::Walk, 5.0),
            (TravelType::Ladder, 6.0),
            (TravelType::Elevator, 6.0),
            (TravelType::FuncBob, 6.0),
            (TravelType::GrappleHook, 10.0),
            (TravelType::Teleport, 5.0),
        ] {
            let world = row(2, &[], |b| {
                b.add_reach(id(1), id(2), kind, 10, v(90.0, 50.0, 0.0), v(150.0, 50.0, 80.0));
            });
            let mut d = MoveDispatcher::new(&hook_config());
            let h = spawn(&mut d, &world, inside(1));
            let mask = TravelFlags::DEFAULT | TravelFlags::GRAPPLEHOOK;
            let cmd = d.move_to_goal(h, Some(&goal_in(2)), mask, 3.0, &world, None).unwrap();
            assert!(!cmd.failure, "{kind:?}");
            assert_eq!(d.state(h).unwrap().reachability_time, 3.0 + timeout, "{kind:?}");
        }
    }

    #[test]
    fn unhandled_travel_type_fails_with_its_value() {
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::StrafeJump, 10, v(90.0, 50.0, 0.0), v(110.0, 50.0, 0.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        let cmd = d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::STRAFEJUMP, 1.0, &world, None).unwrap();
        assert!(cmd.failure);
        assert_eq!(cmd.travel_type, TravelType::StrafeJump.raw());
        assert_eq!(d.state(h).unwrap().last_reach, Some(ReachId(0)));
    }

    #[test]
    fn handlers_set_their_flags() {
        let cases = [
            (TravelType::Walk, MoveFlags::WALK, MoveResultFlags::MOVEMENTVIEW),
            (TravelType::BarrierJump, MoveFlags::BARRIERJUMP, MoveResultFlags::MOVEMENTVIEW),
            (TravelType::Ladder, MoveFlags::AGAINSTLADDER, MoveResultFlags::MOVEMENTVIEW),
            (TravelType::Swim, MoveFlags::SWIMMING, MoveResultFlags::MOVEMENTVIEW | MoveResultFlags::SWIMVIEW),
            (TravelType::WaterJump, MoveFlags::WATERJUMP, MoveResultFlags::MOVEMENTVIEW | MoveResultFlags::SWIMVIEW),
            (TravelType::Elevator, MoveFlags::empty(), MoveResultFlags::MOVEMENTVIEW | MoveResultFlags::ONTOPOF_ELEVATOR),
            (TravelType::FuncBob, MoveFlags::empty(), MoveResultFlags::MOVEMENTVIEW | MoveResultFlags::ONTOPOF_FUNCBOB),
            (TravelType::JumpPad, MoveFlags::empty(), MoveResultFlags::MOVEMENTVIEW),
        ];
        for (kind, move_flags, result_flags) in cases {
            let world = row(2, &[], |b| {
                b.add_reach(id(1), id(2), kind, 10, v(90.0, 50.0, 0.0), v(150.0, 50.0, 30.0));
            });
            let mut d = MoveDispatcher::new(&NavConfig::default());
            let h = spawn(&mut d, &world, inside(1));
            let cmd = d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 0.0, &world, None).unwrap();
            assert_eq!(cmd.kind(), Some(kind));
            assert_eq!(cmd.flags, result_flags, "{kind:?}");
            assert!(d.state(h).unwrap().move_flags.contains(move_flags), "{kind:?}");
            assert!(cmd.ideal_view.is_some());
        }
    }

    #[test]
    fn walk_is_flattened_and_teleport_follows_the_edge() {
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::Walk, 10, v(90.0, 50.0, 0.0), v(150.0, 50.0, 90.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        let cmd = d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 0.0, &world, None).unwrap();
        assert_eq!(cmd.dir, v(1.0, 0.0, 0.0));

        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::Teleport, 10, v(60.0, 60.0, 10.0), v(60.0, 90.0, 10.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        let cmd = d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 0.0, &world, None).unwrap();
        assert_eq!(cmd.dir, v(0.0, 1.0, 0.0));
    }

    #[test]
    fn avoided_edge_is_skipped_until_expiry() {
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::Walk, 10, v(90.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
            b.add_reach(id(1), id(2), TravelType::Walk, 900, v(90.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        d.avoid_reach(h, ReachId(0), 5.0).unwrap();

        d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 1.0, &world, None).unwrap();
        assert_eq!(d.state(h).unwrap().last_reach, Some(ReachId(1)));

        d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 5.0, &world, None).unwrap();
        assert_eq!(d.state(h).unwrap().last_reach, Some(ReachId(0)));
        assert_eq!(d.state(h).unwrap().avoid_reach, None);

        d.avoid_reach(h, ReachId(0), 50.0).unwrap();
        d.reset_avoid_reach(h).unwrap();
        d.move_to_goal(h, Some(&goal_in(2)), TravelFlags::empty(), 6.0, &world, None).unwrap();
        assert_eq!(d.state(h).unwrap().last_reach, Some(ReachId(0)));
    }

    #[test]
    fn dispatch_reclassifies_before_selecting() {
        let world = row(3, &[], |b| {
            b.add_reach(id(2), id(3), TravelType::Walk, 10, v(195.0, 50.0, 0.0), v(205.0, 50.0, 0.0));
        });
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));
        d.state_mut(h).unwrap().origin = inside(2);

        d.move_to_goal(h, Some(&goal_in(3)), TravelFlags::empty(), 0.0, &world, None).unwrap();
        let s = d.state(h).unwrap();
        assert_eq!(s.area, id(2));
        assert_eq!(s.last_area, id(1));
        assert_eq!(s.last_reach, Some(ReachId(0)));
    }

    #[test]
    fn move_in_direction() {
        let world = row(1, &[], |_| {});
        let mut d = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut d, &world, inside(1));

        assert_eq!(d.move_in_direction(h, v(0.0, 0.0, 0.0), 300.0, MoveType::WALK).unwrap(), None);

        let cmd = d.move_in_direction(h, v(0.0, 3.0, 0.0), 300.0, MoveType::JUMP).unwrap().unwrap();
        assert_eq!(cmd.dir, v(0.0, 1.0, 0.0));
        assert_eq!(cmd.speed, 300.0);
        assert!(d.state(h).unwrap().jump_reach);
        assert!(!d.state(h).unwrap().move_flags.contains(MoveFlags::ACTIVEGRAPPLE));

        d.move_in_direction(h, v(1.0, 0.0, 0.0), 300.0, MoveType::GRAPPLE).unwrap();
        assert!(d.state(h).unwrap().move_flags.contains(MoveFlags::ACTIVEGRAPPLE));

        assert!(d.move_in_direction(MoveHandle(7), v(1.0, 0.0, 0.0), 1.0, MoveType::WALK).is_err());
    }
}

// ── Grapple ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grapple {
    use nav_core::{AreaId, NavConfig, TravelFlags, TravelType, Vec3};
    use nav_world::Reachability;
    use super::helpers::{hook_config, id, inside, row, spawn, v, Counting};
    use crate::{ActionFlags, Grapple, MoveDispatcher, MoveFlags, MoveGoal, MoveResultFlags, MoveState, NoopHooks};

    fn hook_edge(end: Vec3) -> Reachability {
        Reachability {
            source: AreaId(1),
            dest: AreaId(2),
            start: v(0.0, 0.0, 0.0),
            end,
            travel_type: TravelType::GrappleHook.raw(),
            travel_time: 100,
            ..Reachability::default()
        }
    }

    fn at(state: &mut MoveState, x: f32, yaw: f32) {
        state.origin = v(x, 0.0, 0.0);
        state.view_angles = [0.0, yaw, 0.0];
    }

    #[test]
    fn disabled_unless_both_capabilities_are_on() {
        for (use_hook, laser_hook) in [(false, false), (true, false), (false, true)] {
            let mut g = Grapple::new(use_hook, laser_hook, "hook.md2");
            let mut s = MoveState::new();
            let cmd = g.travel(&mut s, &hook_edge(v(64.0, 0.0, 0.0)), 0.0, &NoopHooks);
            assert!(cmd.failure);
            assert_eq!(cmd.travel_type, TravelType::GrappleHook.raw());
            assert!(!g.is_precached());
        }
    }

    #[test]
    fn approach_attach_pull_release() {
        let reach = hook_edge(v(64.0, 0.0, 0.0));
        let mut g = Grapple::new(true, true, "hook.md2");
        let mut s = MoveState::new();
        let mut now = 0.0;

        // Misaligned: walk toward the edge start, fast then slowing.
        for (x, speed) in [(-200.0, 400.0), (-150.0, 400.0), (-100.0, 400.0), (-70.0, 400.0), (-50.0, 200.0)] {
            at(&mut s, x, 90.0);
            let cmd = g.travel(&mut s, &reach, now, &NoopHooks);
            assert!(!cmd.failure);
            assert_eq!(cmd.dir, v(1.0, 0.0, 0.0));
            assert_eq!(cmd.speed, speed);
            assert!(cmd.actions.is_empty());
            assert!(cmd.has(MoveResultFlags::MOVEMENTVIEW));
            assert_eq!(s.reachability_time, now + 10.0);
            now += 0.1;
        }

        // Close enough but still looking away.
        at(&mut s, -4.0, 90.0);
        let cmd = g.travel(&mut s, &reach, now, &NoopHooks);
        assert_eq!(cmd.speed, 16.0);
        assert!(!s.move_flags.contains(MoveFlags::ACTIVEGRAPPLE));

        // Aligned: fire.
        now += 0.1;
        at(&mut s, -4.0, 0.0);
        let cmd = g.travel(&mut s, &reach, now, &NoopHooks);
        assert_eq!(cmd.actions, ActionFlags::HOOK_ON | ActionFlags::ATTACK);
        assert_eq!(cmd.weapon, Some(0));
        assert!(cmd.has(MoveResultFlags::MOVEMENTWEAPON));
        assert!(s.move_flags.contains(MoveFlags::ACTIVEGRAPPLE | MoveFlags::GRAPPLEPULL));
        assert_eq!(s.last_grapple_dist, 68.0);

        // Pulled in: keep firing while the distance shrinks.
        for (x, pull) in [(4.0, 60.0), (24.0, 40.0), (44.0, 20.0)] {
            now += 0.1;
            at(&mut s, x, 0.0);
            let cmd = g.travel(&mut s, &reach, now, &NoopHooks);
            assert_eq!(cmd.actions, ActionFlags::ATTACK, "pull {pull}");
            assert_eq!(s.last_grapple_dist, pull);
            assert_eq!(s.reachability_time, now + 10.0);
        }

        // Shrinking by under a unit near the anchor: let go.
        now += 0.1;
        at(&mut s, 44.5, 0.0);
        let cmd = g.travel(&mut s, &reach, now, &NoopHooks);
        assert_eq!(cmd.actions, ActionFlags::HOOK_OFF);
        assert!(cmd.has(MoveResultFlags::MOVEMENTWEAPON));
        assert!(!s.move_flags.intersects(MoveFlags::ACTIVEGRAPPLE | MoveFlags::GRAPPLEPULL));
        assert_eq!(s.last_grapple_dist, 0.0);
        assert_eq!(s.grapple_visible_time, 0.0);
        assert_eq!(s.reachability_time, 0.0);
    }

    #[test]
    fn far_release_after_stalling() {
        let reach = hook_edge(v(200.0, 0.0, 0.0));
        let mut g = Grapple::new(true, true, "hook.md2");
        let mut s = MoveState::new();

        at(&mut s, -4.0, 0.0);
        g.travel(&mut s, &reach, 0.0, &NoopHooks);
        assert_eq!(s.last_grapple_dist, 204.0);

        // Progress resets the stall timer.
        at(&mut s, 50.0, 0.0);
        let cmd = g.travel(&mut s, &reach, 1.0, &NoopHooks);
        assert_eq!(cmd.actions, ActionFlags::ATTACK);
        assert_eq!(s.grapple_visible_time, 1.0);

        // No progress, but not for long enough.
        let cmd = g.travel(&mut s, &reach, 1.3, &NoopHooks);
        assert_eq!(cmd.actions, ActionFlags::ATTACK);

        let cmd = g.travel(&mut s, &reach, 1.5, &NoopHooks);
        assert_eq!(cmd.actions, ActionFlags::HOOK_OFF);
    }

    #[test]
    fn swimming_approach_keeps_height() {
        let reach = hook_edge(v(64.0, 0.0, 0.0));
        let mut g = Grapple::new(true, true, "hook.md2");
        let mut s = MoveState::new();
        s.move_flags.insert(MoveFlags::SWIMMING);
        s.origin = v(-100.0, 0.0, -100.0);

        let cmd = g.travel(&mut s, &reach, 0.0, &NoopHooks);
        assert!(cmd.dir.z > 0.5);
        assert!(cmd.has(MoveResultFlags::SWIMVIEW));
    }

    #[test]
    fn precache_happens_once() {
        let reach = hook_edge(v(64.0, 0.0, 0.0));
        let hooks = Counting::default();
        let mut g = Grapple::new(true, true, "models/hook.md2");
        let mut s = MoveState::new();

        g.travel(&mut s, &reach, 0.0, &hooks);
        g.travel(&mut s, &reach, 0.1, &hooks);
        assert_eq!(hooks.calls(), 1);
        assert_eq!(hooks.last.lock().unwrap().as_deref(), Some("models/hook.md2"));
        assert!(g.is_precached());

        let mut silent = Grapple::new(true, true, "");
        silent.travel(&mut s, &reach, 0.2, &hooks);
        assert_eq!(hooks.calls(), 1);
        assert!(!silent.is_precached());
    }

    #[test]
    fn dispatcher_routes_grapple_edges() {
        let world = row(2, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::GrappleHook, 100, v(60.0, 50.0, 10.0), v(180.0, 50.0, 90.0));
        });
        let mask = TravelFlags::DEFAULT | TravelFlags::GRAPPLEHOOK;
        let goal = MoveGoal::new(inside(2), id(2));

        let mut off = MoveDispatcher::new(&NavConfig::default());
        let h = spawn(&mut off, &world, inside(1));
        let cmd = off.move_to_goal(h, Some(&goal), mask, 0.0, &world, None).unwrap();
        assert!(cmd.failure);
        assert_eq!(cmd.travel_type, TravelType::GrappleHook.raw());

        let mut on = MoveDispatcher::with_hooks(&hook_config(), Counting::default());
        let h = spawn(&mut on, &world, inside(1));
        let cmd = on.move_to_goal(h, Some(&goal), mask, 0.0, &world, None).unwrap();
        assert!(!cmd.failure);
        assert_eq!(cmd.kind(), Some(TravelType::GrappleHook));
        assert_eq!(on.hooks().calls(), 1);
        assert!(on.grapple().is_precached());
    }
}

// ── Ground movers ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod movers {
    use nav_core::{EntityId, NavConfig, TravelFlags, TravelType, Vec3};
    use nav_world::{EntityLinker, EntityUpdate, Solid, WorldState};

    use super::helpers::{id, inside, row, spawn, v};
    use crate::{MoveDispatcher, MoveGoal, MoveResultFlags, MoverCatalogue, MoverKind};

    const PLAT: EntityId = EntityId(7);

    /// Three areas; a walk edge 1 → 2 and, when `ridden`, an elevator edge
    /// 1 → 3 on brush model 4.
    fn lift_world(ridden: bool) -> WorldState {
        row(3, &[], |b| {
            b.add_reach(id(1), id(2), TravelType::Walk, 10, v(95.0, 50.0, 0.0), v(105.0, 50.0, 0.0));
            if ridden {
                b.add_mover_reach(id(1), id(3), TravelType::Elevator, 4, 300, v(50.0, 50.0, 8.0), v(250.0, 50.0, 8.0));
            }
        })
    }

    /// A 40×40 plat for brush model 4 whose top sits at z = 8 under `at`.
    fn plat_linker(world: &WorldState, at: Vec3) -> EntityLinker {
        let mut linker = EntityLinker::new(16, 64);
        let update = EntityUpdate {
            origin:      v(at.x, at.y, 8.0),
            mins:        v(-20.0, -20.0, -8.0),
            maxs:        v(20.0, 20.0, 0.0),
            solid:       Solid::Bsp,
            model_index: 5,
            ..EntityUpdate::default()
        };
        linker.update_entity(world, PLAT, Some(&update), 0.0).unwrap();
        linker
    }

    fn dispatcher(kind: MoverKind) -> MoveDispatcher {
        let mut d = MoveDispatcher::new(&NavConfig::default());
        d.movers_mut().insert(4, kind);
        d
    }

    #[test]
    fn catalogue_finds_the_plat_under_the_bot_only() {
        let world = lift_world(true);
        let linker = plat_linker(&world, inside(1));
        let mut d = dispatcher(MoverKind::Plat);
        let h = spawn(&mut d, &world, inside(1));

        let support = d.movers().support(&linker, d.state(h).unwrap()).unwrap();
        assert_eq!(support.entity, PLAT);
        assert_eq!(support.model, 4);
        assert_eq!(support.kind, MoverKind::Plat);

        // 30 units off to the side, past the 1-unit slack.
        d.state_mut(h).unwrap().origin = v(80.0, 50.0, 10.0);
        assert_eq!(d.movers().support(&linker, d.state(h).unwrap()), None);
        // Far above the top.
        d.state_mut(h).unwrap().origin = v(50.0, 50.0, 60.0);
        assert_eq!(d.movers().support(&linker, d.state(h).unwrap()), None);

        assert_eq!(MoverCatalogue::new().support(&linker, d.state(h).unwrap()), None);
    }

    #[test]
    fn standing_on_a_plat_relinks_to_its_edge() {
        let world = lift_world(true);
        let linker = plat_linker(&world, inside(1));
        let mut d = dispatcher(MoverKind::Plat);
        let h = spawn(&mut d, &world, inside(1));
        let goal = MoveGoal::new(inside(2), id(2));

        let cmd = d.move_to_goal(h, Some(&goal), TravelFlags::empty(), 1.0, &world, Some(&linker)).unwrap();
        assert!(!cmd.failure);
        assert!(!cmd.blocked);
        assert!(cmd.has(MoveResultFlags::ONTOPOF_ELEVATOR));
        assert_eq!(cmd.kind(), Some(TravelType::Elevator));

        let lift = world.model_reach(TravelType::Elevator, 4);
        let s = d.state(h).unwrap();
        assert_eq!(s.last_reach, lift);
        assert_eq!(s.reach_area, id(3));
        assert_eq!(s.reachability_time, 1.0 + 6.0);

        // Next frame it keeps riding the same edge.
        let cmd = d.move_to_goal(h, Some(&goal), TravelFlags::empty(), 1.1, &world, Some(&linker)).unwrap();
        assert_eq!(cmd.kind(), Some(TravelType::Elevator));
        assert_eq!(d.state(h).unwrap().last_reach, lift);
    }

    #[test]
    fn without_entities_the_walk_edge_is_taken() {
        let world = lift_world(true);
        let mut d = dispatcher(MoverKind::Plat);
        let h = spawn(&mut d, &world, inside(1));

        let cmd = d.move_to_goal(h, Some(&MoveGoal::new(inside(2), id(2))), TravelFlags::empty(), 1.0, &world, None).unwrap();
        assert_eq!(cmd.kind(), Some(TravelType::Walk));
        assert!(!cmd.has(MoveResultFlags::ONTOPOF_ELEVATOR));
    }

    #[test]
    fn mover_without_an_edge_blocks() {
        let world = lift_world(false);
        let linker = plat_linker(&world, inside(1));
        let mut d = dispatcher(MoverKind::Bob);
        let h = spawn(&mut d, &world, inside(1));

        let cmd = d
            .move_to_goal(h, Some(&MoveGoal::new(inside(2), id(2))), TravelFlags::empty(), 1.0, &world, Some(&linker))
            .unwrap();
        assert!(cmd.failure);
        assert!(cmd.blocked);
        assert_eq!(cmd.block_entity, Some(PLAT));
        assert_eq!(cmd.flags, MoveResultFlags::ONTOPOF_FUNCBOB | MoveResultFlags::ONTOPOFOBSTACLE);
        assert_eq!(cmd.travel_type, TravelType::FuncBob.raw());

        let s = d.state(h).unwrap();
        assert_eq!(s.last_reach, None);
        assert_eq!(s.last_goal_area, id(2));
    }
}
