//! Constants and defaults for genoslice
//!
//! This module defines the default preparation parameters and the
//! limits that configuration validation checks against.

/// Default upper bound on the length of a single slice, in bases
pub const DEFAULT_MAX_LEN: usize = 2_000_000;

/// Default number of characters per stored run of slice text
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default smallest k-mer length profiled at ingestion
pub const DEFAULT_SMALLEST_MER: usize = 2;

/// Default largest k-mer length profiled at ingestion
pub const DEFAULT_LARGEST_MER: usize = 2;

/// Default delimiter separating the sequence id from the rest of a FASTA header
pub const DEFAULT_ID_DELIM: char = ' ';

/// Smallest supported k-mer length
pub const MIN_PROFILE_K: usize = 1;

/// Largest k-mer length accepted by configuration validation.
///
/// Profiling allocates a dense table of `4^k` counters, so this caps the
/// table at 16 Mi entries.
pub const MAX_PROFILE_K: usize = 12;

/// Serialized name of the catch-all bucket for unrecognized k-mer windows
pub const AMBIGUOUS_KEY: &str = "ambiguous_mers";

/// Width of the zero-padded counter in generated slice ids
pub const SLICE_ID_WIDTH: usize = 6;

/// Unambiguous bases counted by the k-mer profiler, in encoding order
pub const KNOWN_BASES: [u8; 4] = [b'a', b'c', b'g', b't'];

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Check if a k-mer length can be profiled under configuration limits
#[inline]
pub const fn is_valid_k(k: usize) -> bool {
    k >= MIN_PROFILE_K && k <= MAX_PROFILE_K
}
