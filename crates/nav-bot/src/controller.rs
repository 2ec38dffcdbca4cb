//! `BotController`, its builder, and the per-frame tick.

use std::fmt;

use tracing::{debug, trace, warn};

use nav_core::{
    AreaId, BotRng, ClientId, EntityId, FrameClock, GoalId, MoveHandle, NavConfig, Seconds, TravelFlags, Vec3,
};
use nav_goal::{
    GameType, GoalCandidate, GoalSelector, GoalStack, ItemQuery, LevelItem, LightEmission, Selection, SensoryQueues,
    SoundEmission, SoundInfo,
};
use nav_move::{InitMove, MoveCommand, MoveDispatcher, MoveGoal, MoveHooks, MoverCatalogue, NoopHooks};
use nav_weight::WeightRegistry;
use nav_world::{EntityLinker, EntityUpdate, RouteCache, UpdateOutcome, WorldState};

use crate::{
    BotError, BotGoalModel, BotInput, BotObserver, BotResult, ClientSnapshot, ItemWeights, RouteTravelTime,
};

/// Inventory slots given to each bot unless the builder says otherwise.
pub const DEFAULT_INVENTORY_SIZE: usize = 256;

// ── BotId ─────────────────────────────────────────────────────────────────────

/// Index of a bot in the controller, in builder order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BotId(pub u32);

impl BotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BotId({})", self.0)
    }
}

// ── BotSlot ───────────────────────────────────────────────────────────────────

/// Everything the controller keeps for one bot.
pub struct BotSlot {
    pub client:      ClientId,
    pub entity:      EntityId,
    pub move_handle: MoveHandle,
    /// Origin from the last client update.
    pub origin:      Vec3,
    pub selector:    GoalSelector,
    /// Goals pushed by the host take precedence over the selector's pick.
    pub stack:       GoalStack,
    pub inventory:   Vec<i32>,
    pub rng:         BotRng,
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`BotController`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                            |
/// |---------------------|------------------------------------|
/// | `.entities(v)`      | `EntityId(client + 1)` per bot     |
/// | `.weights(r, w)`    | No item weights; base weights only |
/// | `.sound_infos(v)`   | Empty sound info table             |
/// | `.sound_assets(v)`  | No engine sound indices resolved   |
/// | `.movers(c)`        | No rideable movers                 |
/// | `.level_items(v)`   | No level items                     |
/// | `.game_type(g)`     | [`GameType::FreeForAll`]           |
/// | `.inventory_size(n)`| [`DEFAULT_INVENTORY_SIZE`]         |
/// | `.hooks(h)`         | [`NoopHooks`]                      |
///
/// # Example
///
/// ```rust,ignore
/// let mut bots = BotControllerBuilder::new(config, world)
///     .clients(vec![ClientId(0), ClientId(1)])
///     .build()?;
/// bots.set_frame_time(0.1);
/// let inputs = bots.tick(&mut NoopObserver)?;
/// ```
pub struct BotControllerBuilder<H: MoveHooks = NoopHooks> {
    config:         NavConfig,
    world:          WorldState,
    clients:        Vec<ClientId>,
    entities:       Option<Vec<EntityId>>,
    weights:        WeightRegistry,
    item_weights:   Option<ItemWeights>,
    sound_infos:    Vec<SoundInfo>,
    sound_assets:   Vec<String>,
    movers:         MoverCatalogue,
    level_items:    Vec<LevelItem>,
    game:           GameType,
    inventory_size: usize,
    hooks:          H,
}

impl BotControllerBuilder<NoopHooks> {
    pub fn new(config: NavConfig, world: WorldState) -> Self {
        Self {
            config,
            world,
            clients:        Vec::new(),
            entities:       None,
            weights:        WeightRegistry::new(),
            item_weights:   None,
            sound_infos:    Vec::new(),
            sound_assets:   Vec::new(),
            movers:         MoverCatalogue::new(),
            level_items:    Vec::new(),
            game:           GameType::FreeForAll,
            inventory_size: DEFAULT_INVENTORY_SIZE,
            hooks:          NoopHooks,
        }
    }
}

impl<H: MoveHooks> BotControllerBuilder<H> {
    /// One bot per client slot, in this order.
    pub fn clients(mut self, clients: Vec<ClientId>) -> Self {
        self.clients = clients;
        self
    }

    /// Game entity of each bot (must be length `clients.len()`).
    pub fn entities(mut self, entities: Vec<EntityId>) -> Self {
        self.entities = Some(entities);
        self
    }

    /// Weight registry and the item mapping goal scoring reads from it.
    pub fn weights(mut self, registry: WeightRegistry, item_weights: ItemWeights) -> Self {
        self.weights = registry;
        self.item_weights = Some(item_weights);
        self
    }

    pub fn sound_infos(mut self, infos: Vec<SoundInfo>) -> Self {
        self.sound_infos = infos;
        self
    }

    /// Engine sound names; entry `i` is sound index `i`.  Resolved against
    /// the sound info table at build time.
    pub fn sound_assets<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.sound_assets = names.into_iter().map(Into::into).collect();
        self
    }

    /// Brush models bots can ride.
    pub fn movers(mut self, catalogue: MoverCatalogue) -> Self {
        self.movers = catalogue;
        self
    }

    /// Items placed in the level, for item goal choice.
    pub fn level_items(mut self, items: Vec<LevelItem>) -> Self {
        self.level_items = items;
        self
    }

    pub fn game_type(mut self, game: GameType) -> Self {
        self.game = game;
        self
    }

    pub fn inventory_size(mut self, size: usize) -> Self {
        self.inventory_size = size;
        self
    }

    /// Replace the host callbacks the movement dispatcher uses.
    pub fn hooks<H2: MoveHooks>(self, hooks: H2) -> BotControllerBuilder<H2> {
        BotControllerBuilder {
            config:         self.config,
            world:          self.world,
            clients:        self.clients,
            entities:       self.entities,
            weights:        self.weights,
            item_weights:   self.item_weights,
            sound_infos:    self.sound_infos,
            sound_assets:   self.sound_assets,
            movers:         self.movers,
            level_items:    self.level_items,
            game:           self.game,
            inventory_size: self.inventory_size,
            hooks,
        }
    }

    /// Validate inputs, allocate a move handle per bot, and return a ready
    /// controller.
    pub fn build(self) -> BotResult<BotController<H>> {
        self.config.validate()?;
        let bot_count = self.clients.len();

        // ── Validate and resolve optional inputs ──────────────────────────
        if bot_count > self.config.max_clients {
            return Err(BotError::Config(format!(
                "{bot_count} bots exceed max_clients {}",
                self.config.max_clients
            )));
        }
        for (i, c) in self.clients.iter().enumerate() {
            if !c.is_valid() {
                return Err(BotError::Config(format!("bot {i} has an invalid client")));
            }
            if self.clients[..i].contains(c) {
                return Err(BotError::Config(format!("{c} is assigned to more than one bot")));
            }
        }

        let entities = match self.entities {
            Some(e) => {
                if e.len() != bot_count {
                    return Err(BotError::BotCountMismatch {
                        expected: bot_count,
                        got:      e.len(),
                        what:     "entities",
                    });
                }
                e
            }
            None => self.clients.iter().map(|c| EntityId(c.0 + 1)).collect(),
        };

        // ── Shared subsystems ─────────────────────────────────────────────
        let mut sensory = SensoryQueues::from_config(&self.config);
        sensory.set_sound_infos(self.sound_infos);
        if !self.sound_assets.is_empty() {
            let resolved = sensory.register_assets(&self.sound_assets);
            debug!(assets = self.sound_assets.len(), resolved, "sound assets registered");
        }
        let mut mover = MoveDispatcher::with_hooks(&self.config, self.hooks);
        *mover.movers_mut() = self.movers;

        // ── Per-bot slots ─────────────────────────────────────────────────
        let mut bots = Vec::with_capacity(bot_count);
        for (&client, &entity) in self.clients.iter().zip(&entities) {
            let move_handle = mover.alloc()?;
            let init = InitMove { entity, client, ..InitMove::default() };
            mover.init(move_handle, &init, &self.world)?;
            bots.push(BotSlot {
                client,
                entity,
                move_handle,
                origin: Vec3::ZERO,
                selector: GoalSelector::from_config(&self.config),
                stack: GoalStack::new(),
                inventory: vec![0; self.inventory_size],
                rng: BotRng::new(self.config.seed, client),
            });
        }
        debug!(bots = bot_count, "bot controller built");

        Ok(BotController {
            linker:       EntityLinker::from_config(&self.config),
            routes:       RouteCache::new(),
            config:       self.config,
            world:        self.world,
            weights:      self.weights,
            item_weights: self.item_weights,
            level_items:  self.level_items,
            game:         self.game,
            sensory,
            mover,
            clock:        FrameClock::new(),
            bots,
        })
    }
}

// ── BotController ─────────────────────────────────────────────────────────────

/// Per-frame driver for a set of bots sharing one world.
///
/// Each frame the host:
///
/// 1. calls [`set_frame_time`](Self::set_frame_time),
/// 2. feeds entity, client and sensory updates,
/// 3. calls [`tick`](Self::tick) and applies the returned [`BotInput`]s.
///
/// Create via [`BotControllerBuilder`].
pub struct BotController<H: MoveHooks = NoopHooks> {
    pub config:       NavConfig,
    pub world:        WorldState,
    pub linker:       EntityLinker,
    /// Shared by every bot's goal scoring.  Invalidated when a BSP mover
    /// changes position.
    pub routes:       RouteCache,
    pub weights:      WeightRegistry,
    pub item_weights: Option<ItemWeights>,
    pub level_items:  Vec<LevelItem>,
    pub game:         GameType,
    sensory:          SensoryQueues,
    pub mover:        MoveDispatcher<H>,
    pub clock:        FrameClock,
    bots:             Vec<BotSlot>,
}

impl<H: MoveHooks> BotController<H> {
    // ── Bots ──────────────────────────────────────────────────────────────

    pub fn bot_count(&self) -> usize {
        self.bots.len()
    }

    pub fn bot(&self, bot: BotId) -> BotResult<&BotSlot> {
        self.bots.get(bot.index()).ok_or(BotError::UnknownBot(bot))
    }

    fn bot_mut(&mut self, bot: BotId) -> BotResult<&mut BotSlot> {
        self.bots.get_mut(bot.index()).ok_or(BotError::UnknownBot(bot))
    }

    pub fn bot_for_client(&self, client: ClientId) -> Option<BotId> {
        self.bots.iter().position(|b| b.client == client).map(|i| BotId(i as u32))
    }

    /// Last selection made for `bot`.
    pub fn selection(&self, bot: BotId) -> BotResult<&Selection> {
        Ok(self.bot(bot)?.selector.active())
    }

    pub fn inventory_mut(&mut self, bot: BotId) -> BotResult<&mut Vec<i32>> {
        Ok(&mut self.bot_mut(bot)?.inventory)
    }

    pub fn goal_stack_mut(&mut self, bot: BotId) -> BotResult<&mut GoalStack> {
        Ok(&mut self.bot_mut(bot)?.stack)
    }

    pub fn add_candidate(&mut self, bot: BotId, candidate: GoalCandidate) -> BotResult<()> {
        self.bot_mut(bot)?.selector.add_candidate(candidate)?;
        Ok(())
    }

    pub fn remove_candidate(&mut self, bot: BotId, id: GoalId) -> BotResult<bool> {
        Ok(self.bot_mut(bot)?.selector.remove_candidate(id))
    }

    /// Forget goals, avoid entries and movement memory for `bot`.
    pub fn reset_bot(&mut self, bot: BotId) -> BotResult<()> {
        let slot = self.bots.get_mut(bot.index()).ok_or(BotError::UnknownBot(bot))?;
        slot.selector.reset();
        slot.stack.empty();
        self.mover.reset(slot.move_handle);
        Ok(())
    }

    /// Item weight for `bot` with balance nodes drawn from its RNG.
    pub fn undecided_item_weight(&mut self, bot: BotId, item: u32) -> BotResult<Option<f32>> {
        let slot = self.bots.get_mut(bot.index()).ok_or(BotError::UnknownBot(bot))?;
        Ok(self
            .item_weights
            .as_ref()
            .and_then(|w| w.evaluate_undecided(item, &slot.inventory, &mut slot.rng)))
    }

    /// Look up `item` by weight name in the loaded item weights.
    pub fn item_weight_index(&self, name: &str) -> BotResult<usize> {
        self.item_weights
            .as_ref()
            .and_then(|w| w.config().find_index(name))
            .ok_or_else(|| BotError::UnknownWeight(name.to_string()))
    }

    // ── Frame input ───────────────────────────────────────────────────────

    /// Synchronise the controller and the sensory queues to the host's frame
    /// time.
    pub fn set_frame_time(&mut self, now: Seconds) {
        self.clock.set_time(now);
        self.sensory.set_frame_time(now);
    }

    /// Drop every recorded sound and light.
    pub fn reset_sensory(&mut self) {
        self.sensory.reset_frame_events();
    }

    pub fn sensory(&self) -> &SensoryQueues {
        &self.sensory
    }

    /// Replace the sound info table.  Registered assets must be registered
    /// again afterwards.
    pub fn set_sound_infos(&mut self, infos: Vec<SoundInfo>) {
        self.sensory.set_sound_infos(infos);
    }

    /// Map engine sound indices to sound infos by name.  Returns how many
    /// names resolved.
    pub fn register_sound_assets<S: AsRef<str>>(&mut self, assets: &[S]) -> usize {
        self.sensory.register_assets(assets)
    }

    pub fn record_sound(&mut self, emission: SoundEmission) -> bool {
        self.sensory.record_sound(emission)
    }

    pub fn record_light(&mut self, emission: LightEmission) -> bool {
        self.sensory.record_light(emission)
    }

    /// Apply one entity snapshot.  A BSP mover that moved invalidates cached
    /// route times.
    pub fn update_entity(&mut self, ent: EntityId, update: Option<&EntityUpdate>) -> BotResult<UpdateOutcome> {
        let outcome = self.linker.update_entity(&self.world, ent, update, self.clock.now)?;
        if outcome.routes_stale {
            self.routes.invalidate();
        }
        Ok(outcome)
    }

    /// Swap in a new world.  Entity links and cached routes are dropped; move
    /// states are re-initialised from their last snapshot.
    pub fn replace_world(&mut self, world: WorldState) -> BotResult<()> {
        self.world = world;
        self.routes.invalidate();
        self.linker.reset();
        for slot in &mut self.bots {
            let state = self.mover.state(slot.move_handle)?;
            let init = InitMove {
                origin:      state.origin,
                velocity:    state.velocity,
                view_offset: state.view_offset,
                entity:      slot.entity,
                client:      slot.client,
                view_angles: state.view_angles,
                ..InitMove::default()
            };
            self.mover.init(slot.move_handle, &init, &self.world)?;
            slot.selector.set_current_area(AreaId::INVALID);
        }
        debug!(areas = self.world.num_areas(), "world replaced");
        Ok(())
    }

    /// Record a bot's client state.  Returns the area it now stands in, which
    /// is invalid when it is outside the world.
    pub fn update_client(&mut self, bot: BotId, snapshot: &ClientSnapshot) -> BotResult<AreaId> {
        let slot = self.bots.get_mut(bot.index()).ok_or(BotError::UnknownBot(bot))?;
        let state = self.mover.state_mut(slot.move_handle)?;
        state.origin = snapshot.origin;
        state.velocity = snapshot.velocity;
        state.view_angles = snapshot.view_angles;
        state.view_offset = snapshot.view_offset;
        state.think_time = self.clock.frame_delta();
        slot.origin = snapshot.origin;

        let BotSlot { selector, inventory, .. } = slot;
        let model = BotGoalModel {
            weights:   self.item_weights.as_ref(),
            inventory: inventory.as_slice(),
            travel:    RouteTravelTime { world: &self.world, routes: &self.routes, origin: snapshot.origin },
        };
        Ok(selector.record_client_update(snapshot.origin, &self.world, &model))
    }

    // ── Item goals ────────────────────────────────────────────────────────

    /// Choose the best level item as `bot`'s long-term goal and push it onto
    /// its goal stack.
    pub fn choose_ltg_item(&mut self, bot: BotId, travel_flags: TravelFlags) -> BotResult<Option<GoalCandidate>> {
        self.choose_item(bot, travel_flags, None)
    }

    /// Choose a level item within `max_time` seconds that does not lengthen
    /// the trip to `ltg`, and push it onto `bot`'s goal stack.
    pub fn choose_nbg_item(
        &mut self,
        bot:          BotId,
        travel_flags: TravelFlags,
        ltg:          Option<&GoalCandidate>,
        max_time:     Seconds,
    ) -> BotResult<Option<GoalCandidate>> {
        self.choose_item(bot, travel_flags, Some((ltg, max_time)))
    }

    fn choose_item(
        &mut self,
        bot:          BotId,
        travel_flags: TravelFlags,
        nearby:       Option<(Option<&GoalCandidate>, Seconds)>,
    ) -> BotResult<Option<GoalCandidate>> {
        let slot = self.bots.get_mut(bot.index()).ok_or(BotError::UnknownBot(bot))?;
        let BotSlot { selector, stack, inventory, origin, .. } = slot;
        let model = BotGoalModel {
            weights:   self.item_weights.as_ref(),
            inventory: inventory.as_slice(),
            travel:    RouteTravelTime { world: &self.world, routes: &self.routes, origin: *origin },
        };
        let query = ItemQuery {
            world:        &self.world,
            routes:       &self.routes,
            area:         selector.current_area(),
            origin:       *origin,
            travel_flags: travel_flags.or_default_mask(),
            game:         self.game,
            now:          self.clock.now,
        };
        let goal = match nearby {
            None => selector.choose_ltg_item(&self.level_items, &query, &model, stack)?,
            Some((ltg, max_time)) => selector.choose_nbg_item(&self.level_items, &query, &model, ltg, max_time, stack)?,
        };
        if let Some(g) = &goal {
            debug!(%bot, goal = %g.id, "item goal pushed");
        }
        Ok(goal)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Run one frame for every bot: refresh goals, then dispatch movement
    /// toward the goal stack's top or else the selected goal.
    ///
    /// Returns one input per bot in `BotId` order.
    pub fn tick<O: BotObserver>(&mut self, observer: &mut O) -> BotResult<Vec<(BotId, BotInput)>> {
        let now = self.clock.now;
        observer.on_tick_start(now);

        // ── Phase 1: goal refresh (read-only world, per-bot selectors) ────
        let previous: Vec<Selection> = self.bots.iter().map(|b| *b.selector.active()).collect();
        let selections = self.refresh_goals(now);
        for (i, (before, after)) in previous.iter().zip(&selections).enumerate() {
            if !before.same_identity(after) {
                observer.on_goal_changed(BotId(i as u32), after);
            }
        }

        // ── Phase 2: movement (sequential, ascending BotId) ───────────────
        let mut inputs = Vec::with_capacity(self.bots.len());
        for (i, selection) in selections.iter().enumerate() {
            let bot = BotId(i as u32);
            let slot = &self.bots[i];
            let Some(goal) = slot.stack.top().copied().or(selection.candidate) else {
                trace!(%bot, "no goal");
                inputs.push((bot, BotInput::idle()));
                continue;
            };

            let target = MoveGoal::new(goal.origin, goal.area);
            let cmd = self.mover.move_to_goal(
                slot.move_handle,
                Some(&target),
                goal.travel_flags,
                now,
                &self.world,
                Some(&self.linker),
            )?;
            report(observer, bot, &cmd);
            inputs.push((bot, BotInput::from(&cmd)));
        }

        observer.on_tick_end(now, self.bots.len());
        Ok(inputs)
    }

    /// Refresh every bot's selector.  With the `parallel` Cargo feature the
    /// bots run on Rayon's thread pool.
    fn refresh_goals(&mut self, now: Seconds) -> Vec<Selection> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let world   = &self.world;
        let routes  = &self.routes;
        let sensory = &self.sensory;
        let weights = self.item_weights.as_ref();

        let refresh = |slot: &mut BotSlot| {
            let BotSlot { selector, inventory, origin, .. } = slot;
            let model = BotGoalModel {
                weights,
                inventory: inventory.as_slice(),
                travel: RouteTravelTime { world, routes, origin: *origin },
            };
            selector.refresh(now, world, sensory, &model)
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.bots.iter_mut().map(refresh).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.bots.par_iter_mut().map(refresh).collect()
        }
    }
}

fn report<O: BotObserver>(observer: &mut O, bot: BotId, cmd: &MoveCommand) {
    if cmd.failure {
        warn!(%bot, travel_type = cmd.travel_type, result = ?cmd.result_type, "movement failed");
        observer.on_move_failed(bot, cmd);
    } else {
        trace!(%bot, %cmd, "movement dispatched");
        observer.on_move_dispatched(bot, cmd);
    }
}
