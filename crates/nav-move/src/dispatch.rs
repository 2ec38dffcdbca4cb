//! Movement dispatch: pick the edge toward a goal and turn it into a command.
//!
//! [`MoveDispatcher::move_to_goal`] runs once per bot per frame:
//!
//! 1. reject a missing goal or a goal outside every area;
//! 2. drop an expired avoided edge and re-classify the bot's area;
//! 3. check for a registered mover under the bot: stay on its edge, switch
//!    to its edge, or report the bot stuck on it;
//! 4. in the goal area, or with no usable edge into it, head straight for
//!    the goal;
//! 5. otherwise run the handler for the chosen edge's travel type and arm
//!    the traversal timeout.

use tracing::{debug, trace, warn};

use nav_core::travel::TRAVELTYPE_MASK;
use nav_core::{MoveHandle, NavConfig, ReachId, Seconds, TravelFlags, TravelType, Vec3};
use nav_world::{EntityLinker, Reachability, WorldState};

use crate::grapple::Grapple;
use crate::mover::{ground_mover, GroundMover};
use crate::{
    InitMove, MoveCommand, MoveFlags, MoveGoal, MoveHooks, MovePool, MoveResult, MoveResultFlags, MoveState,
    MoveType, MoverCatalogue, NoopHooks, ResultType,
};

pub struct MoveDispatcher<H: MoveHooks = NoopHooks> {
    pool:       MovePool,
    grapple:    Grapple,
    movers:     MoverCatalogue,
    move_speed: f32,
    hooks:      H,
}

impl MoveDispatcher<NoopHooks> {
    pub fn new(config: &NavConfig) -> Self {
        Self::with_hooks(config, NoopHooks)
    }
}

impl<H: MoveHooks> MoveDispatcher<H> {
    pub fn with_hooks(config: &NavConfig, hooks: H) -> Self {
        Self {
            pool:       MovePool::from_config(config),
            grapple:    Grapple::from_config(config),
            movers:     MoverCatalogue::new(),
            move_speed: config.default_move_speed,
            hooks,
        }
    }

    // ── Pool ─────────────────────────────────────────────────────────────

    pub fn alloc(&mut self) -> MoveResult<MoveHandle> {
        self.pool.alloc()
    }

    pub fn free(&mut self, handle: MoveHandle) {
        self.pool.free(handle);
    }

    pub fn reset(&mut self, handle: MoveHandle) {
        self.pool.reset(handle);
    }

    pub fn init(&mut self, handle: MoveHandle, init: &InitMove, world: &WorldState) -> MoveResult<()> {
        self.pool.init(handle, init, world)
    }

    pub fn state(&self, handle: MoveHandle) -> MoveResult<&MoveState> {
        self.pool.get(handle)
    }

    pub fn state_mut(&mut self, handle: MoveHandle) -> MoveResult<&mut MoveState> {
        self.pool.get_mut(handle)
    }

    pub fn pool(&self) -> &MovePool {
        &self.pool
    }

    pub fn grapple(&self) -> &Grapple {
        &self.grapple
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn movers(&self) -> &MoverCatalogue {
        &self.movers
    }

    /// Register platforms and bobbing platforms here before the first frame.
    pub fn movers_mut(&mut self) -> &mut MoverCatalogue {
        &mut self.movers
    }

    // ── Avoid-reach ──────────────────────────────────────────────────────

    /// Skip edge `reach` in edge selection until `expiry`.
    pub fn avoid_reach(&mut self, handle: MoveHandle, reach: ReachId, expiry: Seconds) -> MoveResult<()> {
        self.pool.get_mut(handle)?.avoid(reach, expiry);
        Ok(())
    }

    pub fn reset_avoid_reach(&mut self, handle: MoveHandle) -> MoveResult<()> {
        self.pool.get_mut(handle)?.reset_avoid_reach();
        Ok(())
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    /// One frame of movement toward `goal`.
    ///
    /// `mask` filters edges by travel type; an empty mask means
    /// [`TravelFlags::DEFAULT`].  `entities` supplies the per-area entity
    /// lists the mover check reads; `None` skips that check.  Errors only for
    /// a bad handle or a broken world; an unusable goal, an unknown travel
    /// type or a bot stuck on a mover is reported on the returned command.
    pub fn move_to_goal(
        &mut self,
        handle:   MoveHandle,
        goal:     Option<&MoveGoal>,
        mask:     TravelFlags,
        now:      Seconds,
        world:    &WorldState,
        entities: Option<&EntityLinker>,
    ) -> MoveResult<MoveCommand> {
        let state = self.pool.get_mut(handle)?;

        let Some(goal) = goal else {
            return Ok(MoveCommand::failed(0));
        };
        if !world.in_range(goal.area) {
            let mut cmd = MoveCommand::failed(0);
            cmd.result_type = ResultType::INSOLIDAREA;
            return Ok(cmd);
        }

        state.refresh_avoid_reach(now);
        state.classify_environment(world);

        let mut riding = MoveResultFlags::empty();
        let mut relinked = None;
        match entities.and_then(|linker| ground_mover(&self.movers, world, linker, state)) {
            None => {}
            Some(GroundMover::Riding(support, reach)) => {
                riding = support.kind.on_top_flag();
                relinked = Some(reach);
            }
            Some(GroundMover::Relink(support, reach)) => {
                debug!(client = %state.client, entity = %support.entity, %reach, "relinking brush model ent");
                riding = support.kind.on_top_flag();
                relinked = Some(reach);
            }
            Some(GroundMover::Stuck(support)) => {
                warn!(client = %state.client, entity = %support.entity, "on {} without reachability", support.kind.as_str());
                state.last_goal_area = goal.area;
                state.last_origin = state.origin;
                let mut cmd = MoveCommand::failed(support.kind.travel_type().raw());
                cmd.blocked = true;
                cmd.block_entity = Some(support.entity);
                cmd.flags = support.kind.on_top_flag() | MoveResultFlags::ONTOPOFOBSTACLE;
                return Ok(cmd);
            }
        }

        if state.area == goal.area {
            let mut cmd = direct_to_goal(state, goal, self.move_speed);
            cmd.flags |= riding;
            return Ok(cmd);
        }

        let Some(reach_id) = relinked.or_else(|| best_reach(world, state, goal, mask, now)) else {
            trace!(from = %state.area, to = %goal.area, "no edge into goal area, moving direct");
            let mut cmd = direct_to_goal(state, goal, self.move_speed);
            cmd.flags |= riding;
            return Ok(cmd);
        };
        let reach = world.reach(reach_id)?;

        let mut cmd = match reach.kind() {
            Some(TravelType::GrappleHook) => self.grapple.travel(state, reach, now, &self.hooks),
            kind => travel(state, reach, kind, self.move_speed),
        };

        let timeout = reach.kind().map_or(5.0, TravelType::timeout_secs);
        state.reachability_time = now + timeout;
        state.last_reach = Some(reach_id);
        state.reach_area = reach.dest;
        state.last_goal_area = goal.area;
        state.last_origin = state.origin;
        cmd.flags |= riding;
        Ok(cmd)
    }

    /// Command along `dir` at `speed`.  `None` for a zero direction.
    pub fn move_in_direction(
        &mut self,
        handle: MoveHandle,
        dir:    Vec3,
        speed:  f32,
        kind:   MoveType,
    ) -> MoveResult<Option<MoveCommand>> {
        let state = self.pool.get_mut(handle)?;
        let (dir, len) = dir.normalize_len();
        if len <= 0.0 {
            return Ok(None);
        }
        if kind.contains(MoveType::JUMP) {
            state.jump_reach = true;
        }
        if kind.contains(MoveType::GRAPPLE) {
            state.move_flags.insert(MoveFlags::ACTIVEGRAPPLE);
        }

        let travel = if state.is_swimming() { TravelType::Swim } else { TravelType::Walk };
        Ok(Some(MoveCommand::along(dir, speed, travel, state.is_swimming())))
    }
}

// ── Edge selection ────────────────────────────────────────────────────────────

/// Edge out of the bot's area into `goal.area` minimising
/// `|start - origin|² + travel_time`.  Ties keep the lowest edge index.
pub fn best_reach(
    world: &WorldState,
    state: &MoveState,
    goal:  &MoveGoal,
    mask:  TravelFlags,
    now:   Seconds,
) -> Option<ReachId> {
    let mut best: Option<(ReachId, f32)> = None;
    for (id, r) in world.edges_from(state.area) {
        if r.dest != goal.area || !world.edge_allowed(r, mask) || state.is_avoiding(id, now) {
            continue;
        }
        let cost = r.start.distance_squared(state.origin) + f32::from(r.travel_time);
        if best.is_none_or(|(_, c)| cost < c) {
            best = Some((id, cost));
        }
    }
    best.map(|(id, _)| id)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

fn direct_to_goal(state: &mut MoveState, goal: &MoveGoal, speed: f32) -> MoveCommand {
    let swimming = state.is_swimming();
    let mut delta = goal.origin - state.origin;
    if !swimming {
        delta = delta.flattened();
    }
    let dir = delta.normalized();

    state.last_reach = None;
    state.reach_area = goal.area;
    state.last_goal_area = goal.area;
    state.last_origin = state.origin;

    let mut cmd = MoveCommand {
        dir,
        speed,
        travel_type: (if swimming { TravelType::Swim } else { TravelType::Walk }).raw(),
        ..MoveCommand::default()
    };
    if swimming {
        cmd.flags |= MoveResultFlags::SWIMVIEW;
    }
    cmd
}

/// Every travel type except the grapple.
fn travel(state: &mut MoveState, reach: &Reachability, kind: Option<TravelType>, speed: f32) -> MoveCommand {
    use TravelType::*;

    let Some(kind) = kind.filter(|k| is_handled(*k)) else {
        let raw = reach.travel_type & TRAVELTYPE_MASK;
        warn!(travel_type = raw, client = %state.client, "travel type {raw} not implemented yet");
        return MoveCommand::failed(raw);
    };

    let toward_end = reach.end - state.origin;
    let (dir, swimming) = match kind {
        Walk => {
            state.move_flags.insert(MoveFlags::WALK);
            (toward_end.flattened().normalized(), false)
        }
        Crouch => (toward_end.flattened().normalized(), false),
        BarrierJump => {
            state.move_flags.insert(MoveFlags::BARRIERJUMP);
            (toward_end.normalized(), false)
        }
        Ladder => {
            state.move_flags.insert(MoveFlags::AGAINSTLADDER);
            (toward_end.normalized(), false)
        }
        Jump | RocketJump | BfgJump => {
            state.jump_reach = true;
            (toward_end.normalized(), false)
        }
        Swim => {
            state.move_flags.insert(MoveFlags::SWIMMING);
            (toward_end.normalized(), true)
        }
        WaterJump => {
            state.move_flags.insert(MoveFlags::WATERJUMP);
            (toward_end.normalized(), true)
        }
        Teleport => ((reach.end - reach.start).normalized(), false),
        _ => (toward_end.normalized(), false),
    };

    let mut cmd = MoveCommand::along(dir, speed, kind, swimming);
    match kind {
        Elevator => cmd.flags |= MoveResultFlags::ONTOPOF_ELEVATOR,
        FuncBob => cmd.flags |= MoveResultFlags::ONTOPOF_FUNCBOB,
        _ => {}
    }
    cmd
}

fn is_handled(kind: TravelType) -> bool {
    use TravelType::*;
    matches!(
        kind,
        Walk | Crouch
            | BarrierJump
            | Ladder
            | WalkOffLedge
            | Jump
            | RocketJump
            | BfgJump
            | Swim
            | WaterJump
            | Teleport
            | Elevator
            | JumpPad
            | FuncBob
    )
}
