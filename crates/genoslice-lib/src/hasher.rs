//! Content seeding and deterministic random draws
//!
//! Seeds are derived from sequence content with SHA-256, and random draws
//! come from a counter-based SplitMix64 stream keyed by such a seed. Both
//! are fully specified, so results are identical across processes,
//! platforms and crate versions:
//!
//! - key = first 8 bytes of `SHA-256(seed)`, little endian
//! - draw `i` = `splitmix64(key + (i + 1) * 0x9E3779B97F4A7C15)`

use sha2::{Digest, Sha256};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Lower-case hex SHA-256 digest of `data`
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Reproducible partitioning seed for a sequence
///
/// The content hash of the full sequence text with the user seed appended.
/// Identical inputs always give the identical seed.
pub fn content_seed(sequence: &str, user_seed: &str) -> String {
    let mut seed = content_hash(sequence.as_bytes());
    seed.push_str(user_seed);
    seed
}

/// SplitMix64 finalizer
#[inline]
pub const fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Counter-based random stream keyed by a seed string
///
/// Draw `i` depends only on the key and `i`, so any draw can be recomputed
/// without replaying the ones before it.
#[derive(Clone, Debug)]
pub struct SeededStream {
    key: u64,
}

impl SeededStream {
    /// Create a stream keyed by the SHA-256 of `seed`
    pub fn new(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut key = [0u8; 8];
        key.copy_from_slice(&digest[..8]);
        Self {
            key: u64::from_le_bytes(key),
        }
    }

    /// Create a stream from a raw 64-bit key
    pub fn from_key(key: u64) -> Self {
        Self { key }
    }

    /// The 64-bit key
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The `index`-th 64-bit draw
    #[inline]
    pub fn draw(&self, index: u64) -> u64 {
        splitmix64(self.key.wrapping_add(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
    }

    /// The `index`-th draw reduced to `[0, bound)`
    ///
    /// Uses multiply-shift range reduction. Returns 0 when `bound` is 0.
    #[inline]
    pub fn draw_below(&self, index: u64, bound: u64) -> u64 {
        ((self.draw(index) as u128 * bound as u128) >> 64) as u64
    }
}
