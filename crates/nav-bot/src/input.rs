//! Engine-bridge inputs and the per-bot actuator output.

use std::fmt;

use nav_core::{TravelType, Vec3};
use nav_move::{ActionFlags, MoveCommand, MoveResultFlags};

/// A bot's client state as reported by the engine this frame.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientSnapshot {
    pub origin:      Vec3,
    pub velocity:    Vec3,
    pub view_angles: [f32; 3],
    pub view_offset: Vec3,
}

/// What the actuator should do for one bot this frame.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotInput {
    pub dir:     Vec3,
    pub speed:   f32,
    pub actions: ActionFlags,
    pub weapon:  Option<i32>,
    /// View angles to turn to, when the command asks for a movement view.
    pub view:    Option<[f32; 3]>,
}

impl BotInput {
    /// Stand still.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.speed == 0.0 && self.actions.is_empty()
    }
}

impl From<&MoveCommand> for BotInput {
    fn from(cmd: &MoveCommand) -> Self {
        let mut actions = cmd.actions;
        if cmd.has(MoveResultFlags::MOVEMENTWEAPON) {
            actions |= ActionFlags::ATTACK;
        }
        match cmd.kind() {
            Some(TravelType::Jump | TravelType::RocketJump | TravelType::BfgJump | TravelType::WaterJump) => {
                actions |= ActionFlags::JUMP;
            }
            Some(TravelType::Crouch) => actions |= ActionFlags::CROUCH,
            _ => {}
        }

        let speed = if cmd.has(MoveResultFlags::WAITING) { 0.0 } else { cmd.speed };
        let view = if cmd.has(MoveResultFlags::MOVEMENTVIEW) { cmd.ideal_view } else { None };

        BotInput { dir: cmd.dir, speed, actions, weapon: cmd.weapon, view }
    }
}

impl fmt::Display for BotInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move {} at {:.0}", self.dir, self.speed)?;
        if !self.actions.is_empty() {
            write!(f, " {:?}", self.actions)?;
        }
        Ok(())
    }
}
