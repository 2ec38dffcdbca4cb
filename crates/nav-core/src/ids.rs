//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every ID is `Copy + Ord + Hash`.  The inner integer is `pub` so hot loops
//! can index SoA `Vec`s directly, but callers should prefer `.index()`.
//!
//! Each wrapper names its own "no valid ID" sentinel.  Areas and handles are
//! 1-based (0 is the null area / null handle), so their sentinel is `0`;
//! array indices such as reachability edges use `MAX`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer with the given
/// invalid sentinel.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty), invalid = $invalid:expr;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name($invalid);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A navigation area.  Areas are numbered `1..=num_areas`; `AreaId(0)`
    /// is the null area and doubles as the invalid sentinel.
    pub struct AreaId(u32), invalid = 0;
}

typed_id! {
    /// Index of a reachability edge in the world's edge array.
    pub struct ReachId(u32), invalid = u32::MAX;
}

typed_id! {
    /// Engine entity number tracked by the entity-area linker.
    pub struct EntityId(u32), invalid = u32::MAX;
}

typed_id! {
    /// Handle into the move-state pool (`1..=max_clients`, 0 = none).
    pub struct MoveHandle(u32), invalid = 0;
}

typed_id! {
    /// Handle into the weight-config registry (`1..=32`, 0 = none).
    pub struct WeightHandle(u32), invalid = 0;
}

typed_id! {
    /// Engine client slot driven by a bot.
    pub struct ClientId(u32), invalid = u32::MAX;
}

// ── GoalId ────────────────────────────────────────────────────────────────────

/// Identity of a goal candidate.
///
/// Registered (static) goals use positive ids.  Goals synthesized from
/// sensory events are negative: `-(source_tag | serial)`, so the two id
/// spaces never collide.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalId(pub i32);

impl GoalId {
    /// `true` for ids minted from a sound or light event.
    #[inline]
    pub fn is_sensory(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GoalId({})", self.0)
    }
}
