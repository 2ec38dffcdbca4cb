//! The movement command handed to the actuator.

use std::fmt;

use nav_core::{AreaId, EntityId, TravelType, Vec3};

use crate::{ActionFlags, MoveResultFlags, ResultType};

/// Destination of a movement request.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveGoal {
    pub origin: Vec3,
    pub area:   AreaId,
}

impl MoveGoal {
    pub fn new(origin: Vec3, area: AreaId) -> Self {
        Self { origin, area }
    }
}

/// One frame of movement for one bot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    /// Unit direction, or zero when the bot should not move.
    pub dir:          Vec3,
    pub speed:        f32,
    pub actions:      ActionFlags,
    pub weapon:       Option<i32>,
    /// `[pitch, yaw, roll]` to look along; only set with `MOVEMENTVIEW`.
    pub ideal_view:   Option<[f32; 3]>,
    /// Raw travel type, including values the dispatcher does not know.
    pub travel_type:  u32,
    pub flags:        MoveResultFlags,
    pub result_type:  ResultType,
    pub failure:      bool,
    pub blocked:      bool,
    pub block_entity: Option<EntityId>,
}

impl MoveCommand {
    /// A failed command for `travel_type`.
    pub fn failed(travel_type: u32) -> Self {
        Self { travel_type, failure: true, ..Self::default() }
    }

    /// Move along `dir` at `speed`, looking along it.
    pub(crate) fn along(dir: Vec3, speed: f32, kind: TravelType, swimming: bool) -> Self {
        let mut flags = MoveResultFlags::MOVEMENTVIEW;
        if swimming {
            flags |= MoveResultFlags::SWIMVIEW;
        }
        Self {
            dir,
            speed,
            ideal_view: (dir != Vec3::ZERO).then(|| dir.to_angles()),
            travel_type: kind.raw(),
            flags,
            ..Self::default()
        }
    }

    /// The decoded travel type, if known.
    pub fn kind(&self) -> Option<TravelType> {
        TravelType::from_raw(self.travel_type)
    }

    #[inline]
    pub fn has(&self, flag: MoveResultFlags) -> bool {
        self.flags.contains(flag)
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().map_or("unknown", TravelType::as_str);
        if self.failure {
            write!(f, "{kind} (failed)")
        } else {
            write!(f, "{kind} toward {} at {:.0}", self.dir, self.speed)
        }
    }
}
