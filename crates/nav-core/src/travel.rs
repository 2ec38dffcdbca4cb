//! Travel types and travel flags shared by the world, move, and goal crates.
//!
//! A reachability edge stores its travel type as a raw `u32`: the low 24 bits
//! are the [`TravelType`] value and bits 24/25 mark edges that team 1 / team 2
//! may not use.  Movement requests carry a [`TravelFlags`] mask naming which
//! kinds of traversal the bot accepts; [`TravelFlagTable`] converts one into
//! the other.

use bitflags::bitflags;

/// Low bits of a raw travel type that hold the [`TravelType`] value.
pub const TRAVELTYPE_MASK: u32 = 0x00FF_FFFF;
/// Raw travel-type bit: the edge is closed to team 1.
pub const TRAVELFLAG_NOTTEAM1: u32 = 1 << 24;
/// Raw travel-type bit: the edge is closed to team 2.
pub const TRAVELFLAG_NOTTEAM2: u32 = 1 << 25;
/// Number of slots in the travel-type → flag table.
pub const MAX_TRAVELTYPES: usize = 32;

// ── TravelType ────────────────────────────────────────────────────────────────

/// How a reachability edge is traversed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum TravelType {
    Invalid      = 1,
    Walk         = 2,
    Crouch       = 3,
    BarrierJump  = 4,
    Jump         = 5,
    Ladder       = 6,
    WalkOffLedge = 7,
    Swim         = 8,
    WaterJump    = 9,
    Teleport     = 10,
    Elevator     = 11,
    RocketJump   = 12,
    BfgJump      = 13,
    GrappleHook  = 14,
    DoubleJump   = 15,
    RampJump     = 16,
    StrafeJump   = 17,
    JumpPad      = 18,
    FuncBob      = 19,
}

impl TravelType {
    /// Decode the type bits of a raw edge travel type.  Returns `None` for
    /// values outside the known set.
    pub fn from_raw(raw: u32) -> Option<TravelType> {
        use TravelType::*;
        Some(match raw & TRAVELTYPE_MASK {
            1 => Invalid,
            2 => Walk,
            3 => Crouch,
            4 => BarrierJump,
            5 => Jump,
            6 => Ladder,
            7 => WalkOffLedge,
            8 => Swim,
            9 => WaterJump,
            10 => Teleport,
            11 => Elevator,
            12 => RocketJump,
            13 => BfgJump,
            14 => GrappleHook,
            15 => DoubleJump,
            16 => RampJump,
            17 => StrafeJump,
            18 => JumpPad,
            19 => FuncBob,
            _ => return None,
        })
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Seconds a bot may spend on an edge of this type before the caller
    /// should consider the traversal stuck.
    pub fn timeout_secs(self) -> f32 {
        match self {
            TravelType::Ladder | TravelType::Elevator | TravelType::FuncBob => 6.0,
            TravelType::GrappleHook => 10.0,
            _ => 5.0,
        }
    }

    /// The travel flag naming this type.
    pub fn flag(self) -> TravelFlags {
        use TravelType::*;
        match self {
            Invalid      => TravelFlags::INVALID,
            Walk         => TravelFlags::WALK,
            Crouch       => TravelFlags::CROUCH,
            BarrierJump  => TravelFlags::BARRIERJUMP,
            Jump         => TravelFlags::JUMP,
            Ladder       => TravelFlags::LADDER,
            WalkOffLedge => TravelFlags::WALKOFFLEDGE,
            Swim         => TravelFlags::SWIM,
            WaterJump    => TravelFlags::WATERJUMP,
            Teleport     => TravelFlags::TELEPORT,
            Elevator     => TravelFlags::ELEVATOR,
            RocketJump   => TravelFlags::ROCKETJUMP,
            BfgJump      => TravelFlags::BFGJUMP,
            GrappleHook  => TravelFlags::GRAPPLEHOOK,
            DoubleJump   => TravelFlags::DOUBLEJUMP,
            RampJump     => TravelFlags::RAMPJUMP,
            StrafeJump   => TravelFlags::STRAFEJUMP,
            JumpPad      => TravelFlags::JUMPPAD,
            FuncBob      => TravelFlags::FUNCBOB,
        }
    }

    pub fn as_str(self) -> &'static str {
        use TravelType::*;
        match self {
            Invalid      => "invalid",
            Walk         => "walk",
            Crouch       => "crouch",
            BarrierJump  => "barrier jump",
            Jump         => "jump",
            Ladder       => "ladder",
            WalkOffLedge => "walk off ledge",
            Swim         => "swim",
            WaterJump    => "water jump",
            Teleport     => "teleport",
            Elevator     => "elevator",
            RocketJump   => "rocket jump",
            BfgJump      => "bfg jump",
            GrappleHook  => "grapple hook",
            DoubleJump   => "double jump",
            RampJump     => "ramp jump",
            StrafeJump   => "strafe jump",
            JumpPad      => "jump pad",
            FuncBob      => "func bob",
        }
    }
}

impl std::fmt::Display for TravelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TravelFlags ───────────────────────────────────────────────────────────────

bitflags! {
    /// Mask of traversal kinds a movement request accepts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TravelFlags: u32 {
        const INVALID      = 0x0000_0001;
        const WALK         = 0x0000_0002;
        const CROUCH       = 0x0000_0004;
        const BARRIERJUMP  = 0x0000_0008;
        const JUMP         = 0x0000_0010;
        const LADDER       = 0x0000_0020;
        const WALKOFFLEDGE = 0x0000_0080;
        const SWIM         = 0x0000_0100;
        const WATERJUMP    = 0x0000_0200;
        const TELEPORT     = 0x0000_0400;
        const ELEVATOR     = 0x0000_0800;
        const ROCKETJUMP   = 0x0000_1000;
        const BFGJUMP      = 0x0000_2000;
        const GRAPPLEHOOK  = 0x0000_4000;
        const DOUBLEJUMP   = 0x0000_8000;
        const RAMPJUMP     = 0x0001_0000;
        const STRAFEJUMP   = 0x0002_0000;
        const JUMPPAD      = 0x0004_0000;
        const AIR          = 0x0008_0000;
        const WATER        = 0x0010_0000;
        const SLIME        = 0x0020_0000;
        const LAVA         = 0x0040_0000;
        const DONOTENTER   = 0x0080_0000;
        const FUNCBOB      = 0x0100_0000;
        const FLIGHT       = 0x0200_0000;
        const BRIDGE       = 0x0400_0000;
        const NOTTEAM1     = 0x0800_0000;
        const NOTTEAM2     = 0x1000_0000;

        /// What a bot accepts when the caller passes an empty mask.
        const DEFAULT = Self::WALK.bits()
            | Self::CROUCH.bits()
            | Self::BARRIERJUMP.bits()
            | Self::JUMP.bits()
            | Self::LADDER.bits()
            | Self::WALKOFFLEDGE.bits()
            | Self::SWIM.bits()
            | Self::WATERJUMP.bits()
            | Self::TELEPORT.bits()
            | Self::ELEVATOR.bits()
            | Self::AIR.bits()
            | Self::WATER.bits()
            | Self::JUMPPAD.bits()
            | Self::FUNCBOB.bits();
    }
}

impl TravelFlags {
    /// `self`, or [`TravelFlags::DEFAULT`] when empty.
    #[inline]
    pub fn or_default_mask(self) -> TravelFlags {
        if self.is_empty() { TravelFlags::DEFAULT } else { self }
    }
}

// ── TravelFlagTable ───────────────────────────────────────────────────────────

/// Maps a raw travel type to the flag that must be present in a request mask
/// for an edge of that type to be usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TravelFlagTable {
    flags: [TravelFlags; MAX_TRAVELTYPES],
}

impl TravelFlagTable {
    /// Required flag for a raw edge travel type, including the not-team bits.
    /// Out-of-table types map to [`TravelFlags::INVALID`].
    pub fn flag_for(&self, raw: u32) -> TravelFlags {
        let ty = (raw & TRAVELTYPE_MASK) as usize;
        let mut flag = self.flags.get(ty).copied().unwrap_or(TravelFlags::INVALID);
        if raw & TRAVELFLAG_NOTTEAM1 != 0 {
            flag |= TravelFlags::NOTTEAM1;
        }
        if raw & TRAVELFLAG_NOTTEAM2 != 0 {
            flag |= TravelFlags::NOTTEAM2;
        }
        flag
    }

    /// Whether a request mask accepts an edge of this raw type.  An empty
    /// mask is treated as [`TravelFlags::DEFAULT`].
    #[inline]
    pub fn allows(&self, raw: u32, mask: TravelFlags) -> bool {
        self.flag_for(raw).intersects(mask.or_default_mask())
    }

    /// Stricter test used by route search: every bit the edge requires must
    /// be present in `mask`.
    #[inline]
    pub fn permits_all(&self, raw: u32, mask: TravelFlags) -> bool {
        mask.contains(self.flag_for(raw))
    }
}

impl Default for TravelFlagTable {
    fn default() -> Self {
        const ALL: [TravelType; 19] = [
            TravelType::Invalid,
            TravelType::Walk,
            TravelType::Crouch,
            TravelType::BarrierJump,
            TravelType::Jump,
            TravelType::Ladder,
            TravelType::WalkOffLedge,
            TravelType::Swim,
            TravelType::WaterJump,
            TravelType::Teleport,
            TravelType::Elevator,
            TravelType::RocketJump,
            TravelType::BfgJump,
            TravelType::GrappleHook,
            TravelType::DoubleJump,
            TravelType::RampJump,
            TravelType::StrafeJump,
            TravelType::JumpPad,
            TravelType::FuncBob,
        ];
        let mut flags = [TravelFlags::INVALID; MAX_TRAVELTYPES];
        for ty in ALL {
            flags[ty.raw() as usize] = ty.flag();
        }
        Self { flags }
    }
}
