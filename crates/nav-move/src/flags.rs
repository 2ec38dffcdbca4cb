//! Bit sets carried by move states and move commands.

use bitflags::bitflags;

// ── Move state ────────────────────────────────────────────────────────────────

bitflags! {
    /// What the bot is currently doing or standing in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MoveFlags: u32 {
        const BARRIERJUMP   = 1;
        const ONGROUND      = 2;
        const SWIMMING      = 4;
        const AGAINSTLADDER = 8;
        const WATERJUMP     = 16;
        const TELEPORTED    = 32;
        const GRAPPLEPULL   = 64;
        const ACTIVEGRAPPLE = 128;
        const GRAPPLERESET  = 256;
        const WALK          = 512;
    }
}

// ── Move command ──────────────────────────────────────────────────────────────

bitflags! {
    /// Hints attached to a [`MoveCommand`][crate::MoveCommand].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MoveResultFlags: u32 {
        /// The command carries a view to look along while moving.
        const MOVEMENTVIEW       = 1;
        const SWIMVIEW           = 2;
        const WAITING            = 4;
        const MOVEMENTVIEWSET    = 8;
        /// The command selected a weapon for the movement itself.
        const MOVEMENTWEAPON     = 16;
        const ONTOPOFOBSTACLE    = 32;
        const ONTOPOF_FUNCBOB    = 64;
        const ONTOPOF_ELEVATOR   = 128;
        const BLOCKEDBYAVOIDSPOT = 256;
    }
}

bitflags! {
    /// Why a command needs special handling by the caller.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ResultType: u32 {
        const ELEVATORUP          = 1;
        const WAITFORFUNCBOBBING  = 2;
        const BADGRAPPLEPATH      = 4;
        const INSOLIDAREA         = 8;
    }
}

bitflags! {
    /// Discrete inputs the actuator should press this frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionFlags: u32 {
        const ATTACK   = 1;
        const JUMP     = 2;
        const CROUCH   = 4;
        const HOOK_ON  = 8;
        const HOOK_OFF = 16;
    }
}

bitflags! {
    /// Movement style requested through
    /// [`MoveDispatcher::move_in_direction`][crate::MoveDispatcher::move_in_direction].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MoveType: u32 {
        const WALK       = 1;
        const CROUCH     = 2;
        const JUMP       = 4;
        const GRAPPLE    = 8;
        const ROCKETJUMP = 16;
        const BFGJUMP    = 32;
    }
}
