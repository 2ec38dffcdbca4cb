//! Controller observer trait for progress reporting and data collection.

use nav_core::Seconds;
use nav_goal::Selection;
use nav_move::MoveCommand;

use crate::BotId;

/// Callbacks invoked by [`BotController::tick`][crate::BotController::tick].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: goal logger
///
/// ```rust,ignore
/// struct GoalLog(Vec<(BotId, Option<GoalId>)>);
///
/// impl BotObserver for GoalLog {
///     fn on_goal_changed(&mut self, bot: BotId, selection: &Selection) {
///         self.0.push((bot, selection.goal_id()));
///     }
/// }
/// ```
pub trait BotObserver {
    /// Called before any bot is processed.
    fn on_tick_start(&mut self, _now: Seconds) {}

    /// A bot's selected goal changed identity this tick.
    fn on_goal_changed(&mut self, _bot: BotId, _selection: &Selection) {}

    /// A movement command was produced.
    fn on_move_dispatched(&mut self, _bot: BotId, _command: &MoveCommand) {}

    /// Dispatch returned a failed command, e.g. for a disabled grapple or an
    /// unknown travel type.
    fn on_move_failed(&mut self, _bot: BotId, _command: &MoveCommand) {}

    /// Called after every bot was processed.  `bots` is the bot count.
    fn on_tick_end(&mut self, _now: Seconds, _bots: usize) {}
}

/// A [`BotObserver`] that does nothing.
pub struct NoopObserver;

impl BotObserver for NoopObserver {}
