//! Frame time model.
//!
//! The host drives time: once per server frame it hands the core the current
//! game time in seconds.  Everything in the core that expires (avoid-list
//! entries, reachability timeouts, grapple visibility timers, sensory event
//! ages) is compared against that value, so there is exactly one clock.

use std::fmt;

/// Game time in seconds, as reported by the host.
pub type Seconds = f32;

/// Current and previous frame time.
///
/// `FrameClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameClock {
    /// Time of the current frame.
    pub now: Seconds,
    /// Time of the frame before; equals `now` after the first sync.
    pub previous: Seconds,
    initialised: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronise to the host's frame time.
    ///
    /// The first call sets both `now` and `previous`; later calls shift the
    /// old `now` into `previous`.
    pub fn set_time(&mut self, time: Seconds) {
        self.previous = if self.initialised { self.now } else { time };
        self.initialised = true;
        self.now = time;
    }

    /// Advance by `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: Seconds) {
        self.set_time(self.now + dt);
    }

    /// Seconds between the previous and current frame.
    #[inline]
    pub fn frame_delta(&self) -> Seconds {
        self.now - self.previous
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}s (dt {:.3}s)", self.now, self.frame_delta())
    }
}
