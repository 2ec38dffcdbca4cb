//! Deterministic per-bot RNG.
//!
//! Each bot gets its own `SmallRng` seeded by
//!
//!   seed = global_seed XOR (client * MIXING_CONSTANT)
//!
//! so balance-node draws in the weight evaluator are reproducible per run and
//! independent of the order in which bots are ticked.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ClientId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-bot deterministic RNG.  Owned by the bot's slot; never shared.
pub struct BotRng(SmallRng);

impl BotRng {
    /// Seed from the run's global seed and the bot's client slot.
    pub fn new(global_seed: u64, client: ClientId) -> Self {
        let seed = global_seed ^ (client.0 as u64).wrapping_mul(MIXING_CONSTANT);
        BotRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform draw in `[lo, hi]`.  Returns `lo` when the range is empty or
    /// inverted.
    #[inline]
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if !(hi > lo) {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
