//! K-mer profiling and canonicalization
//!
//! [`KmerProfiler`] slides a window of width `k` over lower-case sequence
//! text and counts every window into a dense table of `4^k` counters plus
//! one ambiguous bucket. The table is indexed by the 2-bit rolling encoding
//! of the window:
//!
//! - a -> 00
//! - c -> 01
//! - g -> 10
//! - t -> 11
//!
//! With this encoding, numeric order of the index equals lexicographic
//! order of the k-mer string.
//!
//! [`canonicalize`] then folds each k-mer into the lexicographically
//! smaller of itself and its reverse complement.

use crate::complement::{reverse_complement, ComplementError};
use crate::constants::{is_valid_k, AMBIGUOUS_KEY, KNOWN_BASES, MAX_PROFILE_K, MIN_PROFILE_K};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while profiling k-mers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KmerError {
    /// Word length outside the range the dense table supports
    #[error(
        "unsupported k-mer length {0}, expected {min}..={max}",
        min = MIN_PROFILE_K,
        max = MAX_PROFILE_K
    )]
    UnsupportedK(usize),
    /// A key could not be reverse complemented
    #[error(transparent)]
    Complement(#[from] ComplementError),
}

/// Key of a k-mer histogram
///
/// Windows made only of `a/c/g/t` are counted under their own string;
/// every other window lands in the single [`KmerKey::Ambiguous`] bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum KmerKey {
    /// A k-mer over the unambiguous alphabet
    Recognized(String),
    /// Catch-all for windows containing any other character
    Ambiguous,
}

impl KmerKey {
    /// Shorthand for a recognized key
    pub fn recognized(kmer: impl Into<String>) -> Self {
        Self::Recognized(kmer.into())
    }

    /// The k-mer string, or `None` for the ambiguous bucket
    pub fn as_kmer(&self) -> Option<&str> {
        match self {
            Self::Recognized(kmer) => Some(kmer),
            Self::Ambiguous => None,
        }
    }
}

impl fmt::Display for KmerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized(kmer) => f.write_str(kmer),
            Self::Ambiguous => f.write_str(AMBIGUOUS_KEY),
        }
    }
}

impl From<KmerKey> for String {
    fn from(key: KmerKey) -> Self {
        match key {
            KmerKey::Recognized(kmer) => kmer,
            KmerKey::Ambiguous => AMBIGUOUS_KEY.to_string(),
        }
    }
}

impl TryFrom<String> for KmerKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == AMBIGUOUS_KEY {
            return Ok(Self::Ambiguous);
        }
        if s.is_empty() || !s.bytes().all(|b| KNOWN_BASES.contains(&b)) {
            return Err(format!("invalid k-mer key {s:?}: expected a non-empty a/c/g/t string"));
        }
        Ok(Self::Recognized(s))
    }
}

/// Occurrence counts keyed by k-mer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KmerHistogram(BTreeMap<KmerKey, u64>);

impl KmerHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a recognized k-mer (0 if absent)
    pub fn get(&self, kmer: &str) -> u64 {
        self.get_key(&KmerKey::recognized(kmer))
    }

    /// Count for any key (0 if absent)
    pub fn get_key(&self, key: &KmerKey) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Count in the ambiguous bucket
    pub fn ambiguous(&self) -> u64 {
        self.get_key(&KmerKey::Ambiguous)
    }

    /// Whether the key is present, even with a zero count
    pub fn contains(&self, key: &KmerKey) -> bool {
        self.0.contains_key(key)
    }

    /// Set the count of a key, returning the previous one
    pub fn insert(&mut self, key: KmerKey, count: u64) -> Option<u64> {
        self.0.insert(key, count)
    }

    /// Add to the count of a key, inserting it if absent
    pub fn add(&mut self, key: KmerKey, count: u64) {
        *self.0.entry(key).or_insert(0) += count;
    }

    /// Remove a key, returning its count
    pub fn remove(&mut self, key: &KmerKey) -> Option<u64> {
        self.0.remove(key)
    }

    /// Key-wise sum of `other` into `self`
    ///
    /// Keys present on only one side are carried through unchanged.
    pub fn accumulate(&mut self, other: &KmerHistogram) {
        for (key, &count) in &other.0 {
            self.add(key.clone(), count);
        }
    }

    /// Sum of all counts, ambiguous bucket included
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the histogram has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate keys and counts in key order (ambiguous bucket last)
    pub fn iter(&self) -> btree_map::Iter<'_, KmerKey, u64> {
        self.0.iter()
    }

    /// Iterate the recognized k-mers only
    pub fn kmers(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0
            .iter()
            .filter_map(|(key, &count)| key.as_kmer().map(|kmer| (kmer, count)))
    }
}

impl FromIterator<(KmerKey, u64)> for KmerHistogram {
    fn from_iter<I: IntoIterator<Item = (KmerKey, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KmerHistogram {
    type Item = (&'a KmerKey, &'a u64);
    type IntoIter = btree_map::Iter<'a, KmerKey, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 2-bit code of an unambiguous lower-case base
#[inline]
const fn encode_base(base: u8) -> Option<u64> {
    match base {
        b'a' => Some(0b00),
        b'c' => Some(0b01),
        b'g' => Some(0b10),
        b't' => Some(0b11),
        _ => None,
    }
}

/// Decode a packed k-mer index back to its string
pub fn decode_kmer(index: usize, k: usize) -> String {
    (0..k)
        .map(|pos| {
            let shift = 2 * (k - 1 - pos);
            KNOWN_BASES[(index >> shift) & 0b11] as char
        })
        .collect()
}

/// Sliding-window k-mer counter
///
/// Counts windows of width `k` with step 1. A window is recognized only if
/// every character is one of `a/c/g/t` (lower case, as produced by
/// normalization); anything else, including upper-case bases, counts as
/// ambiguous.
///
/// # Example
/// ```
/// use genoslice_lib::kmer::KmerProfiler;
///
/// let mut profiler = KmerProfiler::new(2).unwrap();
/// profiler.add_sequence(b"aaaa");
/// let raw = profiler.into_histogram();
/// assert_eq!(raw.get("aa"), 3);
/// assert_eq!(raw.len(), 17); // 16 k-mers + ambiguous bucket
/// ```
#[derive(Debug, Clone)]
pub struct KmerProfiler {
    k: usize,
    counts: Vec<u64>,
    ambiguous: u64,
}

impl KmerProfiler {
    /// Create a profiler with every counter at zero
    ///
    /// The table holds `4^k` counters, so `k` is limited to
    /// `MIN_PROFILE_K..=MAX_PROFILE_K` (1 to 12).
    ///
    /// # Errors
    /// [`KmerError::UnsupportedK`] for any other `k`.
    pub fn new(k: usize) -> Result<Self, KmerError> {
        if !is_valid_k(k) {
            return Err(KmerError::UnsupportedK(k));
        }
        Ok(Self {
            k,
            counts: vec![0; 1usize << (2 * k)],
            ambiguous: 0,
        })
    }

    /// Word length
    pub fn k(&self) -> usize {
        self.k
    }

    /// Count every window of `seq`
    ///
    /// Windows never span two calls. Produces `max(0, len - k + 1)` counts.
    pub fn add_sequence(&mut self, seq: &[u8]) {
        let k = self.k;
        let mask: u64 = (1u64 << (2 * k)) - 1;
        let mut code = 0u64;
        let mut run = 0usize;

        for (i, &base) in seq.iter().enumerate() {
            match encode_base(base) {
                Some(bits) => {
                    code = ((code << 2) | bits) & mask;
                    run += 1;
                }
                None => run = 0,
            }
            if i + 1 < k {
                continue;
            }
            if run >= k {
                self.counts[code as usize] += 1;
            } else {
                self.ambiguous += 1;
            }
        }
    }

    /// Count of a packed k-mer index
    pub fn count(&self, index: usize) -> u64 {
        self.counts[index]
    }

    /// Count of the ambiguous bucket
    pub fn ambiguous(&self) -> u64 {
        self.ambiguous
    }

    /// Export the raw histogram: all `4^k` keys plus the ambiguous bucket
    pub fn into_histogram(self) -> KmerHistogram {
        let k = self.k;
        let ambiguous = self.ambiguous;
        self.counts
            .into_iter()
            .enumerate()
            .map(|(index, count)| (KmerKey::Recognized(decode_kmer(index, k)), count))
            .chain(std::iter::once((KmerKey::Ambiguous, ambiguous)))
            .collect()
    }
}

/// Collapse a raw histogram onto canonical k-mers
///
/// For each recognized key whose reverse complement sorts before it, its
/// count is added to the reverse complement's entry and the key is dropped.
/// Palindromes and keys that already sort first are kept as they are. The
/// ambiguous bucket passes through.
///
/// # Errors
/// Propagates [`ComplementError::InvalidCharacter`] if a key holds a
/// character outside the complement table.
pub fn canonicalize(raw: &KmerHistogram) -> Result<KmerHistogram, ComplementError> {
    let mut out = raw.clone();
    for (key, &count) in raw {
        let KmerKey::Recognized(kmer) = key else {
            continue;
        };
        let rc = reverse_complement(kmer)?;
        if rc < *kmer {
            out.add(KmerKey::Recognized(rc), count);
            out.remove(key);
        }
    }
    Ok(out)
}

/// Profile `seq` at word length `k` and return the canonical histogram
///
/// # Errors
/// [`KmerError::UnsupportedK`] outside `1..=12`. Canonicalization cannot
/// fail for histograms built by the profiler.
pub fn profile_canonical(seq: &[u8], k: usize) -> Result<KmerHistogram, KmerError> {
    let mut profiler = KmerProfiler::new(k)?;
    profiler.add_sequence(seq);
    Ok(canonicalize(&profiler.into_histogram())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_kmer() {
        assert_eq!(decode_kmer(0, 3), "aaa");
        assert_eq!(decode_kmer(0b00_01_10, 3), "acg");
        assert_eq!(decode_kmer(0b11_11, 2), "tt");
        assert_eq!(decode_kmer(0b10, 1), "g");
    }

    #[test]
    fn test_raw_histogram_has_all_keys() {
        let profiler = KmerProfiler::new(3).unwrap();
        let raw = profiler.into_histogram();
        assert_eq!(raw.len(), 64 + 1);
        assert!(raw.contains(&KmerKey::Ambiguous));
        assert_eq!(raw.total(), 0);
    }

    #[test]
    fn test_example_atcg_k1() {
        let mut profiler = KmerProfiler::new(1).unwrap();
        profiler.add_sequence(b"atcg");
        let raw = profiler.into_histogram();
        assert_eq!(raw.get("a"), 1);
        assert_eq!(raw.get("t"), 1);
        assert_eq!(raw.get("c"), 1);
        assert_eq!(raw.get("g"), 1);
        assert_eq!(raw.ambiguous(), 0);

        let canonical = canonicalize(&raw).unwrap();
        assert_eq!(canonical.get("a"), 2);
        assert_eq!(canonical.get("c"), 2);
        assert!(!canonical.contains(&KmerKey::recognized("t")));
        assert!(!canonical.contains(&KmerKey::recognized("g")));
        assert_eq!(canonical.len(), 3);
    }

    #[test]
    fn test_example_aaaa_k2() {
        let mut profiler = KmerProfiler::new(2).unwrap();
        profiler.add_sequence(b"aaaa");
        let raw = profiler.into_histogram();
        assert_eq!(raw.get("aa"), 3);
        assert_eq!(raw.total(), 3);

        let canonical = canonicalize(&raw).unwrap();
        assert_eq!(canonical.get("aa"), 3);
        assert!(!canonical.contains(&KmerKey::recognized("tt")));
        // 16 k-mers: 4 palindromes + 6 pairs, plus the ambiguous bucket
        assert_eq!(canonical.len(), 4 + 6 + 1);
    }

    #[test]
    fn test_example_atcgn_k1() {
        let canonical = profile_canonical(b"atcgn", 1).unwrap();
        assert_eq!(canonical.get("a"), 2);
        assert_eq!(canonical.get("c"), 2);
        assert_eq!(canonical.ambiguous(), 1);
    }

    #[test]
    fn test_unsupported_k() {
        assert_eq!(KmerProfiler::new(0).unwrap_err(), KmerError::UnsupportedK(0));
        assert_eq!(KmerProfiler::new(13).unwrap_err(), KmerError::UnsupportedK(13));
        assert_eq!(profile_canonical(b"acgt", 32), Err(KmerError::UnsupportedK(32)));
        assert!(KmerProfiler::new(8).is_ok());
    }

    #[test]
    fn test_window_count() {
        let seq = b"acgtnacgtacgggt";
        for k in 1..=5 {
            let mut profiler = KmerProfiler::new(k).unwrap();
            profiler.add_sequence(seq);
            let raw = profiler.into_histogram();
            assert_eq!(raw.total(), (seq.len() - k + 1) as u64, "k={}", k);
        }
    }

    #[test]
    fn test_short_sequence_is_zero() {
        let mut profiler = KmerProfiler::new(4).unwrap();
        profiler.add_sequence(b"acg");
        assert_eq!(profiler.into_histogram().total(), 0);
    }

    #[test]
    fn test_ambiguous_windows() {
        // every window touching the n is ambiguous
        let mut profiler = KmerProfiler::new(3).unwrap();
        profiler.add_sequence(b"acnta");
        assert_eq!(profiler.ambiguous(), 3);

        // upper case is not normalized text
        let mut profiler = KmerProfiler::new(2).unwrap();
        profiler.add_sequence(b"ACgt");
        assert_eq!(profiler.ambiguous(), 2);
        let raw = profiler.into_histogram();
        assert_eq!(raw.get("gt"), 1);
    }

    #[test]
    fn test_run_resumes_after_ambiguous() {
        let mut profiler = KmerProfiler::new(2).unwrap();
        profiler.add_sequence(b"acnacg");
        let raw = profiler.into_histogram();
        assert_eq!(raw.get("ac"), 2);
        assert_eq!(raw.get("cg"), 1);
        assert_eq!(raw.ambiguous(), 2);
    }

    #[test]
    fn test_canonical_palindrome_untouched() {
        let canonical = profile_canonical(b"acgt", 4).unwrap();
        assert_eq!(canonical.get("acgt"), 1);
    }

    #[test]
    fn test_canonicalize_partial_map() {
        // Reverse complement missing from the input map is created
        let raw: KmerHistogram = [(KmerKey::recognized("tt"), 5)].into_iter().collect();
        let canonical = canonicalize(&raw).unwrap();
        assert_eq!(canonical.get("aa"), 5);
        assert_eq!(canonical.len(), 1);
    }

    #[test]
    fn test_canonicalize_invalid_key() {
        let raw: KmerHistogram = [(KmerKey::Recognized("ax".to_string()), 1)]
            .into_iter()
            .collect();
        assert_eq!(
            canonicalize(&raw),
            Err(ComplementError::InvalidCharacter('x'))
        );
    }

    #[test]
    fn test_key_string_conversion() {
        assert_eq!(String::from(KmerKey::Ambiguous), "ambiguous_mers");
        assert_eq!(KmerKey::try_from("acg".to_string()), Ok(KmerKey::recognized("acg")));
        assert_eq!(
            KmerKey::try_from("ambiguous_mers".to_string()),
            Ok(KmerKey::Ambiguous)
        );
        assert!(KmerKey::try_from("ACG".to_string()).is_err());
        assert!(KmerKey::try_from(String::new()).is_err());
    }

    #[test]
    fn test_histogram_json_keys() {
        let canonical = profile_canonical(b"atcgn", 1).unwrap();
        let json = serde_json::to_string(&canonical).unwrap();
        assert_eq!(json, r#"{"a":2,"c":2,"ambiguous_mers":1}"#);
        let back: KmerHistogram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, canonical);
    }

    #[test]
    fn test_accumulate() {
        let mut a: KmerHistogram = [(KmerKey::recognized("aa"), 2), (KmerKey::Ambiguous, 1)]
            .into_iter()
            .collect();
        let b: KmerHistogram = [(KmerKey::recognized("aa"), 3), (KmerKey::recognized("ac"), 4)]
            .into_iter()
            .collect();
        a.accumulate(&b);
        assert_eq!(a.get("aa"), 5);
        assert_eq!(a.get("ac"), 4);
        assert_eq!(a.ambiguous(), 1);
    }
}
