//! Composition statistics and their accumulation
//!
//! [`MetaInfo`] holds the base-pair, GC and ambiguous-base counts of a
//! sequence or genome plus its canonical k-mer histograms, one per word
//! length. Genome statistics are the sum of sequence statistics under
//! [`MetaInfo::accumulate`], which is commutative and associative and can
//! therefore be evaluated as a parallel reduction.

use crate::constants::KNOWN_BASES;
use crate::kmer::{canonicalize, KmerError, KmerHistogram, KmerProfiler};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Canonical k-mer histograms keyed by word length
pub type KmerContent = BTreeMap<usize, KmerHistogram>;

/// Composition statistics of a sequence or genome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    /// Number of bases
    pub total_bp: u64,
    /// Number of `g`/`c` bases
    pub gc_content: u64,
    /// Number of bases other than `a/c/g/t`
    pub ambiguous_content: u64,
    /// Canonical k-mer histogram per word length
    pub canonical_kmer_content: KmerContent,
}

impl MetaInfo {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the composition of raw sequence text
    ///
    /// The text is lower-cased first; k-mer histograms are built for every
    /// k in `mers` and canonicalized.
    ///
    /// # Errors
    /// [`KmerError::UnsupportedK`] if `mers` reaches outside `1..=12`.
    pub fn from_sequence(
        sequence: &[u8],
        mers: RangeInclusive<usize>,
    ) -> Result<Self, KmerError> {
        let lower = sequence.to_ascii_lowercase();

        let mut gc_content = 0;
        let mut ambiguous_content = 0;
        for base in &lower {
            if matches!(base, b'g' | b'c') {
                gc_content += 1;
            }
            if !KNOWN_BASES.contains(base) {
                ambiguous_content += 1;
            }
        }

        let mut canonical_kmer_content = KmerContent::new();
        for k in mers {
            let mut profiler = KmerProfiler::new(k)?;
            profiler.add_sequence(&lower);
            canonical_kmer_content.insert(k, canonicalize(&profiler.into_histogram())?);
        }

        Ok(Self {
            total_bp: sequence.len() as u64,
            gc_content,
            ambiguous_content,
            canonical_kmer_content,
        })
    }

    /// Add `other` into `self`
    ///
    /// Numeric fields are summed and histograms merged key-wise per k.
    pub fn accumulate(&mut self, other: &MetaInfo) {
        self.total_bp += other.total_bp;
        self.gc_content += other.gc_content;
        self.ambiguous_content += other.ambiguous_content;
        for (&k, histogram) in &other.canonical_kmer_content {
            self.canonical_kmer_content
                .entry(k)
                .or_default()
                .accumulate(histogram);
        }
    }

    /// By-value merge, usable as a reduction operator
    pub fn merged(mut a: MetaInfo, b: MetaInfo) -> MetaInfo {
        a.accumulate(&b);
        a
    }

    /// GC fraction over all bases, 0 for an empty record
    pub fn gc_fraction(&self) -> f64 {
        if self.total_bp == 0 {
            0.0
        } else {
            self.gc_content as f64 / self.total_bp as f64
        }
    }
}

/// Key-wise sum of two histograms
///
/// Keys present on only one side are carried through unchanged. The
/// operation is commutative and associative.
pub fn merge_histograms(a: &KmerHistogram, b: &KmerHistogram) -> KmerHistogram {
    let mut out = a.clone();
    out.accumulate(b);
    out
}

impl<'a> FromIterator<&'a MetaInfo> for MetaInfo {
    fn from_iter<I: IntoIterator<Item = &'a MetaInfo>>(iter: I) -> Self {
        let mut total = MetaInfo::new();
        for meta in iter {
            total.accumulate(meta);
        }
        total
    }
}
