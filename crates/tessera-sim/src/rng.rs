//! Per-shot random streams.
//!
//! Every shot draws from its own generator seeded from `(seed, shot)`, so
//! shots can run in any order, on any thread, and still reproduce exactly.

use rand::SeedableRng;
use rand::rngs::StdRng;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of the stream for `shot` under the execution seed `seed`.
pub fn shot_seed(seed: u64, shot: u64) -> u64 {
    splitmix64(splitmix64(seed) ^ shot.wrapping_mul(GOLDEN_GAMMA))
}

/// The generator for `shot` under `seed`.
pub fn shot_rng(seed: u64, shot: u64) -> StdRng {
    StdRng::seed_from_u64(shot_seed(seed, shot))
}
