//! Unit tests for nav-goal.

#[cfg(test)]
mod helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use nav_core::{AreaId, GoalId, Vec3};
    use nav_world::{WorldBuilder, WorldState};

    use crate::{GoalCandidate, GoalModel, Selection};

    pub fn v(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x, y, z)
    }

    /// Areas 1 and 2: 100-unit cubes side by side along x.
    pub fn two_rooms() -> WorldState {
        let mut b = WorldBuilder::new();
        b.add_area(v(0.0, 0.0, 0.0), v(100.0, 100.0, 100.0));
        b.add_area(v(100.0, 0.0, 0.0), v(200.0, 100.0, 100.0));
        b.build().unwrap()
    }

    pub fn item(id: i32, area: u32, weight: f32) -> GoalCandidate {
        GoalCandidate::new(GoalId(id), v(50.0, 50.0, 50.0), AreaId(area), weight).with_item(id as u32)
    }

    /// Records calls; travel time comes from a fixed table keyed by goal id.
    #[derive(Default)]
    pub struct Recorder {
        pub weights:  AtomicUsize,
        pub changes:  Mutex<Vec<Option<GoalId>>>,
        pub travel:   Vec<(GoalId, f32)>,
        pub area_fix: Option<AreaId>,
    }

    impl Recorder {
        pub fn weight_calls(&self) -> usize {
            self.weights.load(Ordering::Relaxed)
        }

        pub fn changes(&self) -> Vec<Option<GoalId>> {
            self.changes.lock().unwrap().clone()
        }
    }

    impl GoalModel for Recorder {
        fn weight(&self, candidate: &GoalCandidate) -> f32 {
            self.weights.fetch_add(1, Ordering::Relaxed);
            candidate.base_weight
        }

        fn travel_time(&self, _from: AreaId, candidate: &GoalCandidate) -> f32 {
            self.travel.iter().find(|(id, _)| *id == candidate.id).map_or(0.0, |(_, t)| *t)
        }

        fn selection_changed(&self, selection: &Selection) {
            self.changes.lock().unwrap().push(selection.goal_id());
        }

        fn point_area(&self, _origin: Vec3) -> Option<AreaId> {
            self.area_fix
        }
    }
}

// ── Avoid list ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod avoid {
    use nav_core::config::MAX_AVOID_GOALS;
    use nav_core::GoalId;
    use crate::AvoidList;

    #[test]
    fn live_only_before_expiry() {
        let mut a = AvoidList::new();
        a.add(GoalId(7), 10.0);
        assert!(a.contains(GoalId(7), 9.99));
        assert!(!a.contains(GoalId(7), 10.0));
        assert!(!a.contains(GoalId(8), 0.0));
        assert_eq!(a.time_remaining(GoalId(7), 6.0), 4.0);
        assert_eq!(a.time_remaining(GoalId(7), 12.0), 0.0);
        assert_eq!(a.time_remaining(GoalId(9), 0.0), 0.0);
    }

    #[test]
    fn re_adding_updates_in_place() {
        let mut a = AvoidList::new();
        a.add(GoalId(1), 5.0);
        a.add(GoalId(2), 6.0);
        a.add(GoalId(1), 20.0);
        assert_eq!(a.len(), 2);
        assert_eq!(a.entries()[0].expiry, 20.0);
    }

    #[test]
    fn full_list_evicts_soonest_expiry() {
        let mut a = AvoidList::new();
        for i in 0..MAX_AVOID_GOALS as i32 {
            // Entry 5 expires first.
            let expiry = if i == 5 { 1.0 } else { 100.0 + i as f32 };
            a.add(GoalId(i + 1), expiry);
        }
        a.add(GoalId(999), 50.0);
        assert_eq!(a.len(), MAX_AVOID_GOALS);
        assert!(a.contains(GoalId(999), 0.0));
        assert!(!a.entries().iter().any(|e| e.id == GoalId(6)));
    }

    #[test]
    fn prune_keeps_order_of_survivors() {
        let mut a = AvoidList::new();
        a.add(GoalId(1), 3.0);
        a.add(GoalId(2), 9.0);
        a.add(GoalId(3), 4.0);
        a.add(GoalId(4), 8.0);
        a.prune(4.0);
        let ids: Vec<i32> = a.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn remove_and_reset() {
        let mut a = AvoidList::new();
        a.add(GoalId(1), 3.0);
        a.add(GoalId(2), 3.0);
        assert!(a.remove(GoalId(1)));
        assert!(!a.remove(GoalId(1)));
        a.reset();
        assert!(a.is_empty());
    }
}

// ── Selector ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use nav_core::{AreaId, GoalId, NavConfig};
    use super::helpers::{item, two_rooms, v, Recorder};
    use crate::{DefaultGoalModel, GoalError, GoalSelector, SensoryQueues};

    #[test]
    fn avoided_candidate_returns_after_expiry() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let mut s = GoalSelector::new();
        s.add_candidate(item(1, 1, 10.0)).unwrap();
        s.add_candidate(item(2, 1, 5.0)).unwrap();

        let now = 100.0;
        s.avoid_mut().add(GoalId(1), now + 5.0);
        let sel = s.refresh(now, &world, &sensory, &DefaultGoalModel);
        assert_eq!(sel.goal_id(), Some(GoalId(2)));
        assert_eq!(sel.score, 5.0);

        let sel = s.refresh(now + 6.0, &world, &sensory, &DefaultGoalModel);
        assert_eq!(sel.goal_id(), Some(GoalId(1)));
        assert!(s.avoid().is_empty(), "expired entry pruned");
    }

    #[test]
    fn stays_avoided_at_every_time_before_expiry() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let mut s = GoalSelector::new();
        s.add_candidate(item(1, 1, 10.0)).unwrap();
        s.add_candidate(item(2, 1, 5.0)).unwrap();
        s.avoid_mut().add(GoalId(1), 5.0);
        for step in 0..10 {
            let now = step as f32 * 0.5;
            let sel = s.refresh(now, &world, &sensory, &DefaultGoalModel);
            assert_eq!(sel.goal_id(), Some(GoalId(2)), "t = {now}");
        }
        assert_eq!(s.refresh(5.0, &world, &sensory, &DefaultGoalModel).goal_id(), Some(GoalId(1)));
    }

    #[test]
    fn travel_time_is_subtracted_when_both_areas_known() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let model = Recorder { travel: vec![(GoalId(1), 8.0)], ..Default::default() };
        let mut s = GoalSelector::new();
        s.add_candidate(item(1, 2, 10.0)).unwrap();
        s.add_candidate(item(2, 2, 5.0)).unwrap();

        // No current area: raw weights.
        assert_eq!(s.refresh(0.0, &world, &sensory, &model).goal_id(), Some(GoalId(1)));

        // From area 1, goal 1 scores 10 - 8 = 2.
        s.set_current_area(AreaId(1));
        let sel = s.refresh(0.1, &world, &sensory, &model);
        assert_eq!(sel.goal_id(), Some(GoalId(2)));
        assert_eq!((sel.score, sel.travel_time), (5.0, 0.0));
    }

    #[test]
    fn unreachable_goal_is_avoided_for_avoid_duration() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let model = Recorder { travel: vec![(GoalId(1), -1.0)], ..Default::default() };
        let mut s = GoalSelector::new();
        s.set_current_area(AreaId(1));
        s.add_candidate(item(1, 2, 10.0)).unwrap();
        s.add_candidate(item(2, 2, 5.0)).unwrap();

        let sel = s.refresh(10.0, &world, &sensory, &model);
        assert_eq!(sel.goal_id(), Some(GoalId(2)));
        assert!(s.avoid().contains(GoalId(1), 10.0));
        assert_eq!(s.avoid().time_remaining(GoalId(1), 10.0), 5.0);
    }

    #[test]
    fn zero_avoid_duration_falls_back_to_five_seconds() {
        let cfg = NavConfig { avoid_duration: 0.0, ..NavConfig::default() };
        assert_eq!(GoalSelector::from_config(&cfg).avoid_duration(), 5.0);
    }

    #[test]
    fn non_finite_weight_skips_candidate() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let mut s = GoalSelector::new();
        s.add_candidate(item(1, 1, f32::NAN)).unwrap();
        s.add_candidate(item(2, 1, -3.0)).unwrap();
        let sel = s.refresh(0.0, &world, &sensory, &DefaultGoalModel);
        assert_eq!(sel.goal_id(), Some(GoalId(2)));
        assert_eq!(sel.score, -3.0);
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let mut s = GoalSelector::new();
        s.add_candidate(item(4, 1, 7.0)).unwrap();
        s.add_candidate(item(3, 1, 7.0)).unwrap();
        assert_eq!(s.refresh(0.0, &world, &sensory, &DefaultGoalModel).goal_id(), Some(GoalId(4)));
    }

    #[test]
    fn notify_only_on_identity_change() {
        let world = two_rooms();
        let sensory = SensoryQueues::default();
        let model = Recorder::default();
        let mut s = GoalSelector::new();

        s.refresh(0.0, &world, &sensory, &model);
        assert!(model.changes().is_empty(), "empty → empty is no change");

        s.add_candidate(item(1, 1, 3.0)).unwrap();
        s.refresh(0.1, &world, &sensory, &model);
        s.refresh(0.2, &world, &sensory, &model);
        s.add_candidate(item(2, 1, 9.0)).unwrap();
        s.refresh(0.3, &world, &sensory, &model);
        s.clear_candidates();
        s.refresh(0.4, &world, &sensory, &model);

        assert_eq!(model.changes(), vec![Some(GoalId(1)), Some(GoalId(2)), None]);
    }

    #[test]
    fn candidate_capacity_and_ids() {
        let mut s = GoalSelector::new();
        for i in 1..=32 {
            s.add_candidate(item(i, 1, 1.0)).unwrap();
        }
        assert_eq!(s.add_candidate(item(33, 1, 1.0)), Err(GoalError::CandidatesFull { limit: 32 }));
        assert!(s.remove_candidate(GoalId(5)));
        s.add_candidate(item(33, 1, 1.0)).unwrap();
        assert_eq!(
            s.add_candidate(item(-4, 1, 1.0)),
            Err(GoalError::InvalidCandidateId(GoalId(-4)))
        );
    }

    #[test]
    fn configured_candidate_limit() {
        let cfg = NavConfig { max_candidates: 2, ..NavConfig::default() };
        let mut s = GoalSelector::from_config(&cfg);
        s.add_candidate(item(1, 1, 1.0)).unwrap();
        s.add_candidate(item(2, 1, 1.0)).unwrap();
        assert!(s.add_candidate(item(3, 1, 1.0)).is_err());
    }

    #[test]
    fn client_update_prefers_model_then_world() {
        let world = two_rooms();
        let mut s = GoalSelector::new();
        assert_eq!(s.record_client_update(v(150.0, 50.0, 50.0), &world, &DefaultGoalModel), AreaId(2));
        assert_eq!(s.record_client_update(v(999.0, 0.0, 0.0), &world, &DefaultGoalModel), AreaId::INVALID);

        let model = Recorder { area_fix: Some(AreaId(1)), ..Default::default() };
        assert_eq!(s.record_client_update(v(150.0, 50.0, 50.0), &world, &model), AreaId(1));
        let bogus = Recorder { area_fix: Some(AreaId(77)), ..Default::default() };
        assert_eq!(s.record_client_update(v(150.0, 50.0, 50.0), &world, &bogus), AreaId::INVALID);
        assert_eq!(s.current_area(), AreaId::INVALID);
    }
}

// ── Sensory ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sensory {
    use nav_core::{EntityId, GoalId, NavConfig, TravelFlags};
    use super::helpers::{item, two_rooms, v, Recorder};
    use crate::sensory::{light_goal_score, sound_goal_score, sound_is_high_priority, sound_score};
    use crate::{
        DefaultGoalModel, GoalSelector, LightEmission, SensoryQueues, SensorySerial, SoundEmission, SoundInfo,
        SoundType, LIGHT_GOAL_TAG, SOUND_GOAL_TAG,
    };

    fn shot(x: f32, sound_index: i32) -> SoundEmission {
        SoundEmission {
            origin: v(x, 50.0, 50.0),
            entity: EntityId(3),
            channel: 1,
            sound_index,
            volume: 1.0,
            attenuation: 1.0,
            time_offset: 0.0,
        }
    }

    fn flash(x: f32, radius: f32) -> LightEmission {
        LightEmission {
            origin: v(x, 50.0, 50.0),
            entity: EntityId(4),
            radius,
            color: [1.0, 0.5, -1.0],
            lifetime: 0.5,
            decay: 2.0,
        }
    }

    /// Sound index 0 is a rocket launch, 1 a door, 2 unknown.
    fn queues() -> SensoryQueues {
        let mut q = SensoryQueues::new(64, 32);
        q.set_sound_infos(vec![
            SoundInfo::new("weapons/rocket.wav", SoundType::FiringWeapon, 0.0),
            SoundInfo::new("doors/open.wav", SoundType::Door, 40.0),
        ]);
        let resolved = q.register_assets(&["sound\\Weapons\\Rocket.WAV", "doors/open.wav", "misc/unknown.wav"]);
        assert_eq!(resolved, 2);
        q
    }

    #[test]
    fn asset_names_are_normalized() {
        let q = queues();
        assert_eq!(q.info_for_sound_index(0).map(|i| i.kind()), Some(Some(SoundType::FiringWeapon)));
        assert!(q.info_for_sound_index(2).is_none());
        assert!(q.info_for_sound_index(-1).is_none());
    }

    #[test]
    fn timestamp_is_frame_time_plus_offset() {
        let mut q = queues();
        q.set_frame_time(20.0);
        q.record_sound(SoundEmission { time_offset: 0.25, ..shot(10.0, 0) });
        let ev = q.sounds().next().unwrap();
        assert_eq!(ev.timestamp, 20.25);
        assert_eq!(ev.info, Some(0));
    }

    #[test]
    fn full_ring_drops_oldest() {
        let mut q = SensoryQueues::new(3, 1);
        for i in 0..5 {
            q.record_sound(shot(i as f32, 0));
        }
        let xs: Vec<f32> = q.sounds().map(|e| e.origin.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        q.record_light(flash(1.0, 80.0));
        q.record_light(flash(2.0, 80.0));
        assert_eq!(q.light_count(), 1);
        q.reset_frame_events();
        assert_eq!((q.sound_count(), q.light_count()), (0, 0));
        assert!(!SensoryQueues::new(0, 0).record_sound(shot(0.0, 0)));
    }

    #[test]
    fn high_priority_rules() {
        let q = queues();
        let mut q2 = q.clone();
        q2.record_sound(shot(10.0, 1));
        let ev = *q2.sounds().next().unwrap();

        let door = q.info(1);
        assert!(sound_is_high_priority(door, &ev), "loud door");
        let loud = crate::SoundEvent { volume: 0.75, ..ev };
        assert!(sound_is_high_priority(door, &loud));
        let quiet = crate::SoundEvent { volume: 0.5, ..ev };
        assert!(!sound_is_high_priority(door, &quiet));

        let recognised = SoundInfo::new("doors/open.wav", SoundType::Door, 40.0).with_recognition(0.5);
        assert!(sound_is_high_priority(Some(&recognised), &quiet));
        let ignored = SoundInfo::new("x", SoundType::Ignore, 40.0).with_recognition(1.0);
        assert!(!sound_is_high_priority(Some(&ignored), &loud));
        assert!(!sound_is_high_priority(None, &loud));
    }

    #[test]
    fn sound_score_terms() {
        let mut q = queues();
        q.record_sound(SoundEmission { attenuation: 0.5, ..shot(10.0, 0) });
        let ev = *q.sounds().next().unwrap();
        let info = q.info(0);
        // 250 + 75 (default info volume) * 1 + 300 + 37.5 (attenuation).
        assert_eq!(sound_score(info, &ev, 0.0), 662.5);
        assert_eq!(sound_score(info, &ev, 0.5), 512.5);
        assert_eq!(sound_score(info, &ev, 10.0), 1.0);
    }

    #[test]
    fn old_sounds_are_rejected_and_future_ones_clamped() {
        let mut q = queues();
        q.set_frame_time(5.0);
        q.record_sound(shot(10.0, 0));
        let ev = *q.sounds().next().unwrap();
        let info = q.info(0);
        assert!(sound_goal_score(info, &ev, 6.0).is_some());
        assert!(sound_goal_score(info, &ev, 6.01).is_none());
        assert_eq!(sound_goal_score(info, &ev, 4.0), Some(sound_score(info, &ev, 0.0)));
    }

    #[test]
    fn light_threshold_and_score() {
        let mut q = SensoryQueues::new(1, 4);
        q.record_light(flash(0.0, 63.9));
        q.record_light(flash(0.0, 64.0));
        let lights: Vec<_> = q.lights().copied().collect();
        assert!(light_goal_score(&lights[0]).is_none());
        // 200 + 64 + (1 + 0.5) * 80 + 50 / 2.
        assert_eq!(light_goal_score(&lights[1]), Some(409.0));
    }

    #[test]
    fn serial_wraps_and_skips_zero() {
        let mut s = SensorySerial::default();
        assert_eq!(s.next(SOUND_GOAL_TAG), GoalId(-0x0100_0001));
        let mut s = SensorySerial::starting_at(0xFF_FFFF);
        let id = s.next(LIGHT_GOAL_TAG);
        assert_eq!(s.current(), 1);
        assert_eq!(id, GoalId(-0x0200_0001));
        assert!(id.is_sensory());
    }

    #[test]
    fn sound_becomes_tagged_candidate() {
        let world = two_rooms();
        let mut q = queues();
        q.set_frame_time(3.0);
        q.record_sound(shot(150.0, 0));
        let mut s = GoalSelector::new();
        s.add_candidate(item(1, 1, 100.0)).unwrap();

        let sel = s.refresh(3.2, &world, &q, &DefaultGoalModel);
        let c = sel.candidate.unwrap();
        assert!(c.id.is_sensory());
        assert_eq!((-c.id.0) as u32 & 0xFF00_0000, SOUND_GOAL_TAG);
        assert_eq!(c.area, nav_core::AreaId(2));
        assert_eq!(c.travel_flags, TravelFlags::DEFAULT);
        assert!(c.item.is_none());
        // 625 - 300 * 0.2
        assert!((sel.score - 565.0).abs() < 1e-3);
    }

    #[test]
    fn events_outside_the_world_are_dropped() {
        let world = two_rooms();
        let mut q = queues();
        q.record_sound(shot(5000.0, 0));
        q.record_light(flash(5000.0, 200.0));
        let mut s = GoalSelector::new();
        assert!(!s.refresh(0.0, &world, &q, &DefaultGoalModel).is_valid());
        assert_eq!(s.sensory_serial().current(), 2, "ids are minted before the area check");
    }

    #[test]
    fn per_refresh_caps() {
        let world = two_rooms();
        let mut q = SensoryQueues::new(64, 32);
        q.set_sound_infos(vec![SoundInfo::new("w", SoundType::FiringWeapon, 10.0)]);
        q.register_assets(&["w"]);
        for i in 0..20 {
            q.record_sound(shot(10.0 + i as f32, 0));
            q.record_light(flash(10.0 + i as f32, 100.0));
        }
        let model = Recorder::default();
        let mut s = GoalSelector::new();
        s.refresh(0.0, &world, &q, &model);
        assert_eq!(model.weight_calls(), 16 + 8);

        let cfg = NavConfig { max_sound_candidates: 2, max_light_candidates: 0, ..NavConfig::default() };
        let model = Recorder::default();
        GoalSelector::from_config(&cfg).refresh(0.0, &world, &q, &model);
        assert_eq!(model.weight_calls(), 2);
    }
}

// ── Goal stack ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stack {
    use nav_core::GoalId;
    use super::helpers::item;
    use crate::{GoalError, GoalStack, MAX_GOALSTACK};

    #[test]
    fn push_pop_top_second() {
        let mut s = GoalStack::new();
        assert!(s.top().is_none());
        s.push(item(1, 1, 1.0)).unwrap();
        assert!(s.second().is_none());
        s.push(item(2, 1, 1.0)).unwrap();
        assert_eq!(s.top().map(|g| g.id), Some(GoalId(2)));
        assert_eq!(s.second().map(|g| g.id), Some(GoalId(1)));
        assert_eq!(s.pop().map(|g| g.id), Some(GoalId(2)));
        s.empty();
        assert!(s.is_empty());
        assert!(s.pop().is_none());
    }

    #[test]
    fn overflow_leaves_stack_unchanged() {
        let mut s = GoalStack::new();
        for i in 1..=MAX_GOALSTACK as i32 {
            s.push(item(i, 1, 1.0)).unwrap();
        }
        assert_eq!(s.push(item(99, 1, 1.0)), Err(GoalError::StackOverflow { capacity: 8 }));
        assert_eq!(s.len(), 8);
        assert_eq!(s.top().map(|g| g.id), Some(GoalId(8)));
    }
}

// ── Item choice ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod items {
    use nav_core::{AreaId, GoalId, TravelFlags, TravelType, Vec3};
    use nav_world::{RouteCache, WorldBuilder, WorldState};
    use super::helpers::v;
    use crate::items::{AVOID_DEFAULT_TIME, AVOID_DROPPED_TIME, AVOID_MINIMUM_TIME};
    use crate::{
        DefaultGoalModel, GameType, GoalCandidate, GoalSelector, GoalStack, ItemFlags, ItemQuery, LevelItem,
    };

    /// Centre of area `i` in [`hall`].
    fn center(i: u32) -> Vec3 {
        v((i - 1) as f32 * 100.0 + 50.0, 50.0, 50.0)
    }

    /// Four 100-unit cubes along x, walkable both ways, one second per hop.
    fn hall() -> WorldState {
        let mut b = WorldBuilder::new();
        for i in 0..4 {
            let x = i as f32 * 100.0;
            b.add_area(v(x, 0.0, 0.0), v(x + 100.0, 100.0, 100.0));
        }
        for i in 1..4 {
            let wall = v(i as f32 * 100.0, 50.0, 0.0);
            b.add_reach(AreaId(i), AreaId(i + 1), TravelType::Walk, 100, wall, wall);
            b.add_reach(AreaId(i + 1), AreaId(i), TravelType::Walk, 100, wall, wall);
        }
        b.build().unwrap()
    }

    fn level_item(id: i32, area: u32, weight: f32) -> LevelItem {
        LevelItem::new(GoalCandidate::new(GoalId(id), center(area), AreaId(area), weight))
    }

    fn query<'a>(world: &'a WorldState, routes: &'a RouteCache, area: u32) -> ItemQuery<'a> {
        ItemQuery {
            world,
            routes,
            area:         AreaId(area),
            origin:       center(area),
            travel_flags: TravelFlags::DEFAULT,
            game:         GameType::FreeForAll,
            now:          10.0,
        }
    }

    #[test]
    fn weight_per_second_decides() {
        let world = hall();
        let routes = RouteCache::new();
        let q = query(&world, &routes, 1);

        // 10 / 1 s beats 20 / 3 s.
        let items = [level_item(1, 2, 10.0), level_item(2, 4, 20.0)];
        let mut s = GoalSelector::new();
        let mut stack = GoalStack::new();
        let goal = s.choose_ltg_item(&items, &q, &DefaultGoalModel, &mut stack).unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(1)));
        assert_eq!(stack.top().map(|g| g.id), Some(GoalId(1)));
        assert_eq!(s.avoid().time_remaining(GoalId(1), 10.0), AVOID_DEFAULT_TIME);

        // 40 / 3 s beats 10 / 1 s.
        let items = [level_item(1, 2, 10.0), level_item(2, 4, 40.0)];
        let mut s = GoalSelector::new();
        let goal = s.choose_ltg_item(&items, &q, &DefaultGoalModel, &mut GoalStack::new()).unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(2)));
    }

    #[test]
    fn avoided_item_is_skipped() {
        let world = hall();
        let routes = RouteCache::new();
        let q = query(&world, &routes, 1);
        let items = [level_item(1, 2, 10.0), level_item(2, 4, 20.0)];

        let mut s = GoalSelector::new();
        s.avoid_mut().add(GoalId(1), 15.0);
        let mut stack = GoalStack::new();
        let goal = s.choose_ltg_item(&items, &q, &DefaultGoalModel, &mut stack).unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(2)));

        // Both avoided now: nothing left.
        assert_eq!(s.choose_ltg_item(&items, &q, &DefaultGoalModel, &mut stack).unwrap(), None);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn unusable_and_weightless_items_are_skipped() {
        let world = hall();
        let routes = RouteCache::new();
        let mut q = query(&world, &routes, 1);
        let items = [
            level_item(1, 2, 50.0).with_flags(ItemFlags::NOTBOT),
            level_item(2, 2, 50.0).with_flags(ItemFlags::NOTFREE),
            level_item(3, 3, 0.0),
            level_item(4, 4, 1.0),
        ];
        let goal = GoalSelector::new().choose_ltg_item(&items, &q, &DefaultGoalModel, &mut GoalStack::new()).unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(4)));

        q.game = GameType::Team;
        let goal = GoalSelector::new().choose_ltg_item(&items, &q, &DefaultGoalModel, &mut GoalStack::new()).unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(2)));
    }

    #[test]
    fn roam_scale_applies() {
        let world = hall();
        let routes = RouteCache::new();
        let q = query(&world, &routes, 1);
        let items = [level_item(1, 2, 10.0).roam(0.1), level_item(2, 3, 10.0)];
        let goal = GoalSelector::new().choose_ltg_item(&items, &q, &DefaultGoalModel, &mut GoalStack::new()).unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(2)));
    }

    #[test]
    fn nearby_goal_respects_max_time() {
        let world = hall();
        let routes = RouteCache::new();
        let q = query(&world, &routes, 1);
        let items = [level_item(1, 2, 1.0), level_item(2, 4, 100.0)];

        let mut stack = GoalStack::new();
        let goal = GoalSelector::new()
            .choose_nbg_item(&items, &q, &DefaultGoalModel, None, 2.0, &mut stack)
            .unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(1)), "three seconds away is past the bound");

        let goal = GoalSelector::new()
            .choose_nbg_item(&items, &q, &DefaultGoalModel, None, 0.5, &mut stack)
            .unwrap();
        assert_eq!(goal, None);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn nearby_goal_must_not_lengthen_the_trip() {
        let world = hall();
        let routes = RouteCache::new();
        let q = query(&world, &routes, 2);
        let ltg = GoalCandidate::new(GoalId(9), center(3), AreaId(3), 1.0);

        // Area 1 is behind the bot; area 4 is past the long-term goal but
        // just as close to it.
        let items = [level_item(1, 1, 100.0), level_item(2, 4, 10.0)];
        let goal = GoalSelector::new()
            .choose_nbg_item(&items, &q, &DefaultGoalModel, Some(&ltg), 10.0, &mut GoalStack::new())
            .unwrap();
        assert_eq!(goal.map(|g| g.id), Some(GoalId(2)));
    }

    #[test]
    fn avoid_time_follows_respawn() {
        let item = level_item(1, 1, 1.0);
        assert_eq!(item.avoid_time(), AVOID_DEFAULT_TIME);
        assert_eq!(item.with_respawn(25.0).avoid_time(), 25.0);
        assert_eq!(item.with_respawn(3.0).avoid_time(), AVOID_MINIMUM_TIME);
        assert_eq!(item.with_respawn(25.0).dropped(30.0).avoid_time(), AVOID_DROPPED_TIME);
        assert_eq!(GameType::from_raw(4), GameType::Team);
        assert_eq!(GameType::from_raw(-1), GameType::FreeForAll);
    }
}
