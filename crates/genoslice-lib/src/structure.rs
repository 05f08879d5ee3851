//! Genome, sequence and slice entities
//!
//! A [`Genome`] owns its [`Sequence`]s, and each sequence owns the
//! [`Slice`]s that tile its coordinate range. Sequences are ingested from
//! `(header, text)` pairs; partitioning then replaces a sequence's slices
//! with bounded, labeled ones.

use crate::complement::ComplementError;
use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_ID_DELIM};
use crate::hasher::{content_hash, content_seed};
use crate::ids::SliceIdAllocator;
use crate::kmer::{KmerError, KmerKey};
use crate::meta_info::MetaInfo;
use crate::partition::{CoordinatePartitioner, ProcessingSet, Segment, SplitWeights};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building or checking genome entities
#[derive(Error, Debug)]
pub enum GenomeError {
    /// Sequence text that cannot be ingested
    #[error("Invalid sequence {seqid}: {reason}")]
    InvalidSequence {
        /// Id of the offending sequence
        seqid: String,
        /// What is wrong with it
        reason: String,
    },
    /// A reverse complement hit a character outside the IUPAC table
    #[error(transparent)]
    Complement(#[from] ComplementError),
    /// K-mer profiling failed
    #[error(transparent)]
    Kmer(#[from] KmerError),
    /// Capability owned by a collaborator that does not exist yet
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    /// An entity breaks one of its structural invariants
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Split text into runs of at most `size` characters
///
/// The text must be ASCII, which ingestion guarantees.
pub fn chunk_str(text: &str, size: usize) -> Vec<String> {
    assert!(size > 0, "chunk size must be positive");
    text.as_bytes()
        .chunks(size)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Parameters of one partitioning run
#[derive(Debug, Clone)]
pub struct DivvyOptions<'a> {
    /// User-chosen seed mixed into the content seed
    pub user_seed: &'a str,
    /// Upper bound on slice length
    pub max_len: usize,
    /// Processing set proportions
    pub split_weights: SplitWeights,
    /// Characters per stored run of slice text
    pub chunk_size: usize,
}

impl<'a> DivvyOptions<'a> {
    /// Options with default weights and chunking
    pub fn new(user_seed: &'a str, max_len: usize) -> Self {
        Self {
            user_seed,
            max_len,
            split_weights: SplitWeights::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Contiguous range `[start, end)` of a sequence with its own text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Text of the slice, stored in runs of `chunk_size` characters
    pub sequence: Vec<String>,
    /// First coordinate (inclusive)
    pub start: usize,
    /// Last coordinate (exclusive)
    pub end: usize,
    /// Processing set, `None` for the initial unsliced slice
    pub processing_set: Option<ProcessingSet>,
    /// Identifier, unique within the owning sequence
    pub slice_id: String,
}

impl Slice {
    /// Slice covering all of `text`, as created at ingestion
    pub fn unsliced(text: &str, seqid: &str, chunk_size: usize) -> Self {
        Self {
            sequence: chunk_str(text, chunk_size),
            start: 0,
            end: text.len(),
            processing_set: None,
            slice_id: seqid.to_string(),
        }
    }

    /// Labeled slice produced by partitioning
    pub fn new(
        text: &str,
        slice_id: String,
        start: usize,
        end: usize,
        processing_set: ProcessingSet,
        chunk_size: usize,
    ) -> Self {
        Self {
            sequence: chunk_str(text, chunk_size),
            start,
            end,
            processing_set: Some(processing_set),
            slice_id,
        }
    }

    /// Number of bases covered, 0 for an inverted range
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the slice covers no bases
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The stored runs joined back into one string
    pub fn text(&self) -> String {
        self.sequence.concat()
    }

    /// Convert to a training-ready example
    ///
    /// # Errors
    /// Always [`GenomeError::NotImplemented`]: example encoding belongs to
    /// the downstream training pipeline.
    pub fn to_example(&self) -> Result<(), GenomeError> {
        Err(GenomeError::NotImplemented(
            "converting a slice to a training example",
        ))
    }
}

/// One named sequence: its slices and composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Slices tiling `[0, total_bp)`, ascending by `start`
    pub slices: Vec<Slice>,
    /// Composition of the full sequence
    pub meta_info: MetaInfo,
    /// Full FASTA header line
    pub deprecated_header: String,
    /// Sequence id, the header token before the id delimiter
    pub seqid: String,
}

impl Sequence {
    /// Ingest a sequence from its FASTA header and text
    ///
    /// Computes the composition for every k in `mers` and creates the single
    /// unsliced slice.
    ///
    /// # Errors
    /// [`GenomeError::InvalidSequence`] if the text is not ASCII.
    pub fn from_record(
        header: &str,
        text: &str,
        id_delim: char,
        mers: RangeInclusive<usize>,
        chunk_size: usize,
    ) -> Result<Self, GenomeError> {
        let seqid = seqid_from_header(header, id_delim).to_string();
        if !text.is_ascii() {
            return Err(GenomeError::InvalidSequence {
                seqid,
                reason: "sequence text contains non-ASCII characters".to_string(),
            });
        }
        let meta_info = MetaInfo::from_sequence(text.as_bytes(), mers)?;
        debug!(
            "Ingested {}: {} bp, {} GC, {} ambiguous",
            seqid, meta_info.total_bp, meta_info.gc_content, meta_info.ambiguous_content
        );
        Ok(Self {
            slices: vec![Slice::unsliced(text, &seqid, chunk_size)],
            meta_info,
            deprecated_header: header.to_string(),
            seqid,
        })
    }

    /// Ingest with the default delimiter, k range 2..=2 and chunk size
    ///
    /// # Errors
    /// See [`Sequence::from_record`].
    pub fn from_header_and_text(header: &str, text: &str) -> Result<Self, GenomeError> {
        Self::from_record(header, text, DEFAULT_ID_DELIM, 2..=2, DEFAULT_CHUNK_SIZE)
    }

    /// Total length in bases
    pub fn total_bp(&self) -> usize {
        self.meta_info.total_bp as usize
    }

    /// The full text, reassembled from the current slices
    pub fn full_sequence(&self) -> String {
        self.slices.iter().flat_map(|s| s.sequence.iter()).map(String::as_str).collect()
    }

    /// Content hash of the full text
    pub fn seq_hash(&self) -> String {
        content_hash(self.full_sequence().as_bytes())
    }

    /// Labeled segments for this sequence, without touching its slices
    pub fn divvy_up_coords(
        &self,
        user_seed: &str,
        max_len: usize,
        weights: SplitWeights,
    ) -> Vec<Segment> {
        let seed = content_seed(&self.full_sequence(), user_seed);
        CoordinatePartitioner::new(&seed, max_len, weights)
            .divvy_coordinates(self.total_bp())
            .collect()
    }

    /// Replace the slices with a fresh bounded, labeled partition
    ///
    /// Any previous slicing is discarded. Slices come out ascending by
    /// `start` with ids `{seqid}_000000`, `{seqid}_000001`, ...
    ///
    /// # Errors
    /// [`GenomeError::InvalidSequence`] if the stored text is not ASCII or
    /// its length differs from `meta_info.total_bp`, as can happen for a
    /// sequence loaded from a record. The slices are left untouched.
    pub fn divvy_up_sequence(&mut self, options: &DivvyOptions<'_>) -> Result<(), GenomeError> {
        let text = self.full_sequence();
        let total_bp = self.total_bp();
        if !text.is_ascii() {
            return Err(GenomeError::InvalidSequence {
                seqid: self.seqid.clone(),
                reason: "sequence text contains non-ASCII characters".to_string(),
            });
        }
        if text.len() != total_bp {
            return Err(GenomeError::InvalidSequence {
                seqid: self.seqid.clone(),
                reason: format!("stored text is {} bp but total_bp is {}", text.len(), total_bp),
            });
        }

        let seed = content_seed(&text, options.user_seed);
        let partitioner =
            CoordinatePartitioner::new(&seed, options.max_len, options.split_weights);
        let mut ids = SliceIdAllocator::for_sequence(&self.seqid);

        let slices: Vec<Slice> = partitioner
            .divvy_coordinates(total_bp)
            .map(|segment| {
                Slice::new(
                    &text[segment.begin..segment.end],
                    ids.next_unique_id(),
                    segment.begin,
                    segment.end,
                    segment.processing_set,
                    options.chunk_size,
                )
            })
            .collect();

        debug!("Divvied {} into {} slices", self.seqid, slices.len());
        self.slices = slices;
        Ok(())
    }

    /// Check tiling, slice lengths and composition bounds
    ///
    /// With `max_len` set, every slice must be at most that long.
    ///
    /// # Errors
    /// [`GenomeError::InvariantViolation`] describing the first problem.
    pub fn validate(&self, max_len: Option<usize>) -> Result<(), GenomeError> {
        let fail = |msg: String| -> Result<(), GenomeError> {
            Err(GenomeError::InvariantViolation(format!("{}: {}", self.seqid, msg)))
        };
        let meta = &self.meta_info;

        if meta.gc_content > meta.total_bp {
            return fail(format!(
                "gc_content {} exceeds total_bp {}",
                meta.gc_content, meta.total_bp
            ));
        }
        if meta.ambiguous_content > meta.total_bp {
            return fail(format!(
                "ambiguous_content {} exceeds total_bp {}",
                meta.ambiguous_content, meta.total_bp
            ));
        }

        // only the unsliced slice of an empty sequence may be empty
        let empty_allowed = self.total_bp() == 0 && self.slices.len() == 1;
        let mut expected_start = 0;
        for slice in &self.slices {
            if slice.start != expected_start {
                return fail(format!(
                    "slice {} starts at {} but the previous one ended at {}",
                    slice.slice_id, slice.start, expected_start
                ));
            }
            if slice.end < slice.start {
                return fail(format!(
                    "slice {} ends at {} before its start {}",
                    slice.slice_id, slice.end, slice.start
                ));
            }
            if slice.end == slice.start && !empty_allowed {
                return fail(format!("slice {} is empty", slice.slice_id));
            }
            if let Some(max_len) = max_len {
                if slice.len() > max_len {
                    return fail(format!(
                        "slice {} is {} bp, above max_len {}",
                        slice.slice_id,
                        slice.len(),
                        max_len
                    ));
                }
            }
            if slice.sequence.iter().any(|run| !run.is_ascii()) {
                return fail(format!("slice {} holds non-ASCII text", slice.slice_id));
            }
            let stored: usize = slice.sequence.iter().map(String::len).sum();
            if stored != slice.len() {
                return fail(format!(
                    "slice {} stores {} bp for range [{}, {})",
                    slice.slice_id, stored, slice.start, slice.end
                ));
            }
            expected_start = slice.end;
        }
        if expected_start != self.total_bp() {
            return fail(format!(
                "slices end at {} but total_bp is {}",
                expected_start,
                self.total_bp()
            ));
        }

        for (k, histogram) in &meta.canonical_kmer_content {
            for (key, _) in histogram {
                if let KmerKey::Recognized(kmer) = key {
                    if kmer.len() != *k {
                        return fail(format!("k-mer {kmer:?} stored under k={k}"));
                    }
                    if crate::complement::reverse_complement(kmer)? < *kmer {
                        return fail(format!("k-mer {kmer:?} is not canonical"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Sequence id: the header token before the first `id_delim`
pub fn seqid_from_header(header: &str, id_delim: char) -> &str {
    header.split(id_delim).next().unwrap_or(header)
}

/// Species name derived from a FASTA path
///
/// Takes the last `/` component and strips a trailing `.fasta` or `.fa`.
pub fn species_from_path(fasta_path: &str) -> String {
    let name = fasta_path.rsplit('/').next().unwrap_or(fasta_path);
    name.strip_suffix(".fasta")
        .or_else(|| name.strip_suffix(".fa"))
        .unwrap_or(name)
        .to_string()
}

/// A genome: its sequences and their aggregated composition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    /// Sequences in input order
    pub sequences: Vec<Sequence>,
    /// Sum of the sequences' composition
    pub meta_info: MetaInfo,
    /// Species label
    pub species: String,
    /// Assembly accession
    pub accession: String,
    /// Assembly version
    pub version: String,
    /// Source of the assembly
    pub acquired_from: String,
}

impl Genome {
    /// Create an empty genome
    pub fn new() -> Self {
        Self::default()
    }

    /// Default the species from a FASTA path if none is set yet
    pub fn maybe_add_info_from_fasta(&mut self, fasta_path: &str) {
        if self.species.is_empty() {
            self.species = species_from_path(fasta_path);
        }
    }

    /// Append a sequence and add its composition to the genome's
    pub fn add_sequence(&mut self, sequence: Sequence) {
        self.meta_info.accumulate(&sequence.meta_info);
        self.sequences.push(sequence);
    }

    /// Recompute the genome composition from its sequences
    ///
    /// Runs as a parallel reduction; the merge is commutative and
    /// associative, so the result does not depend on scheduling.
    pub fn recompute_meta_info(&mut self) {
        self.meta_info = self
            .sequences
            .par_iter()
            .map(|s| s.meta_info.clone())
            .reduce(MetaInfo::new, MetaInfo::merged);
    }

    /// Partition every sequence, in parallel
    ///
    /// # Errors
    /// The first [`GenomeError::InvalidSequence`] from
    /// [`Sequence::divvy_up_sequence`].
    pub fn divvy_each_sequence(&mut self, options: &DivvyOptions<'_>) -> Result<(), GenomeError> {
        self.sequences
            .par_iter_mut()
            .try_for_each(|seq| seq.divvy_up_sequence(options))
    }

    /// Number of slices over all sequences
    pub fn num_slices(&self) -> usize {
        self.sequences.iter().map(|s| s.slices.len()).sum()
    }

    /// Check every sequence and that the genome composition is their sum
    ///
    /// # Errors
    /// [`GenomeError::InvariantViolation`] describing the first problem.
    pub fn validate(&self, max_len: Option<usize>) -> Result<(), GenomeError> {
        for seq in &self.sequences {
            seq.validate(max_len)?;
        }
        let expected: MetaInfo = self.sequences.iter().map(|s| &s.meta_info).collect();
        if expected != self.meta_info {
            return Err(GenomeError::InvariantViolation(
                "genome meta_info is not the sum of its sequences".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(header: &str, text: &str) -> Sequence {
        Sequence::from_header_and_text(header, text).unwrap()
    }

    #[test]
    fn test_chunk_str() {
        assert_eq!(chunk_str("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(chunk_str("abc", 3), vec!["abc"]);
        assert!(chunk_str("", 3).is_empty());
    }

    #[test]
    fn test_seqid_from_header() {
        assert_eq!(seqid_from_header("chr1 some description", ' '), "chr1");
        assert_eq!(seqid_from_header("chr1", ' '), "chr1");
        assert_eq!(seqid_from_header("a|b|c", '|'), "a");
        assert_eq!(seqid_from_header("", ' '), "");
    }

    #[test]
    fn test_species_from_path() {
        assert_eq!(species_from_path("/data/genomes/Athaliana.fasta"), "Athaliana");
        assert_eq!(species_from_path("Osativa.fa"), "Osativa");
        assert_eq!(species_from_path("dir/Zmays.fa.gz"), "Zmays.fa.gz");
        assert_eq!(species_from_path("plain"), "plain");
    }

    #[test]
    fn test_from_record() {
        let s = seq("chr1 test sequence", "ACGTNacgt");
        assert_eq!(s.seqid, "chr1");
        assert_eq!(s.deprecated_header, "chr1 test sequence");
        assert_eq!(s.meta_info.total_bp, 9);
        assert_eq!(s.slices.len(), 1);
        let unsliced = &s.slices[0];
        assert_eq!(unsliced.slice_id, "chr1");
        assert_eq!((unsliced.start, unsliced.end), (0, 9));
        assert_eq!(unsliced.processing_set, None);
        assert_eq!(s.full_sequence(), "ACGTNacgt");
    }

    #[test]
    fn test_from_record_rejects_non_ascii() {
        let err = Sequence::from_header_and_text("x", "AC\u{e9}T").unwrap_err();
        assert!(matches!(err, GenomeError::InvalidSequence { .. }));
    }

    #[test]
    fn test_chunked_storage() {
        let text = "A".repeat(250);
        let s = Sequence::from_record("s", &text, ' ', 1..=1, 100).unwrap();
        let lens: Vec<usize> = s.slices[0].sequence.iter().map(String::len).collect();
        assert_eq!(lens, vec![100, 100, 50]);
    }

    #[test]
    fn test_divvy_up_sequence() {
        let mut s = seq("chr2", "ACGTACGTAC");
        s.divvy_up_sequence(&DivvyOptions::new("seed", 4)).unwrap();

        let ranges: Vec<(usize, usize)> = s.slices.iter().map(|x| (x.start, x.end)).collect();
        assert_eq!(ranges, vec![(0, 4), (4, 8), (8, 10)]);
        let ids: Vec<&str> = s.slices.iter().map(|x| x.slice_id.as_str()).collect();
        assert_eq!(ids, vec!["chr2_000000", "chr2_000001", "chr2_000002"]);
        assert_eq!(s.slices[2].text(), "AC");
        assert!(s.slices.iter().all(|x| x.processing_set.is_some()));
        assert_eq!(s.full_sequence(), "ACGTACGTAC");
        s.validate(Some(4)).unwrap();
    }

    #[test]
    fn test_divvy_replaces_previous_slicing() {
        let mut s = seq("c", "ACGTACGTAC");
        s.divvy_up_sequence(&DivvyOptions::new("seed", 3)).unwrap();
        assert_eq!(s.slices.len(), 4);
        s.divvy_up_sequence(&DivvyOptions::new("seed", 5)).unwrap();
        assert_eq!(s.slices.len(), 2);
        assert_eq!(s.slices[0].slice_id, "c_000000");
        s.validate(Some(5)).unwrap();
    }

    #[test]
    fn test_divvy_single_and_empty() {
        let mut s = seq("short", "ACG");
        s.divvy_up_sequence(&DivvyOptions::new("seed", 10)).unwrap();
        assert_eq!(s.slices.len(), 1);
        assert_eq!((s.slices[0].start, s.slices[0].end), (0, 3));

        let mut empty = seq("empty", "");
        empty.divvy_up_sequence(&DivvyOptions::new("seed", 10)).unwrap();
        assert!(empty.slices.is_empty());
        empty.validate(Some(10)).unwrap();
    }

    #[test]
    fn test_divvy_matches_coords() {
        let mut s = seq("c", "ACGTTGCAACGTAGGA");
        let coords = s.divvy_up_coords("u", 5, SplitWeights::default());
        s.divvy_up_sequence(&DivvyOptions::new("u", 5)).unwrap();
        let from_slices: Vec<(usize, usize, Option<ProcessingSet>)> = s
            .slices
            .iter()
            .map(|x| (x.start, x.end, x.processing_set))
            .collect();
        let from_coords: Vec<(usize, usize, Option<ProcessingSet>)> = coords
            .iter()
            .map(|c| (c.begin, c.end, Some(c.processing_set)))
            .collect();
        assert_eq!(from_slices, from_coords);
    }

    #[test]
    fn test_seq_hash_independent_of_slicing() {
        let mut s = seq("c", "ACGTACGTAC");
        let before = s.seq_hash();
        s.divvy_up_sequence(&DivvyOptions::new("seed", 3)).unwrap();
        assert_eq!(s.seq_hash(), before);
    }

    #[test]
    fn test_to_example_not_implemented() {
        let s = seq("c", "ACGT");
        assert!(matches!(
            s.slices[0].to_example(),
            Err(GenomeError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_validate_detects_gap() {
        let mut s = seq("c", "ACGTACGTAC");
        s.divvy_up_sequence(&DivvyOptions::new("seed", 4)).unwrap();
        s.slices.remove(1);
        assert!(matches!(
            s.validate(None),
            Err(GenomeError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_validate_detects_oversized() {
        let s = seq("c", "ACGTACGTAC");
        assert!(s.validate(Some(20)).is_ok());
        assert!(s.validate(Some(5)).is_err());
    }

    #[test]
    fn test_genome_accumulation() {
        let mut genome = Genome::new();
        genome.maybe_add_info_from_fasta("/tmp/Mus_musculus.fa");
        genome.maybe_add_info_from_fasta("/tmp/other.fa");
        assert_eq!(genome.species, "Mus_musculus");

        genome.add_sequence(seq("a", "AAAA"));
        genome.add_sequence(seq("b", "GGNC"));
        assert_eq!(genome.meta_info.total_bp, 8);
        assert_eq!(genome.meta_info.gc_content, 3);
        assert_eq!(genome.meta_info.ambiguous_content, 1);

        let incremental = genome.meta_info.clone();
        genome.recompute_meta_info();
        assert_eq!(genome.meta_info, incremental);
        genome.validate(None).unwrap();
    }

    #[test]
    fn test_genome_divvy_each_sequence() {
        let mut genome = Genome::new();
        genome.add_sequence(seq("a", &"ACGT".repeat(10)));
        genome.add_sequence(seq("b", "ACG"));
        genome.divvy_each_sequence(&DivvyOptions::new("s", 16)).unwrap();
        assert_eq!(genome.sequences[0].slices.len(), 3);
        assert_eq!(genome.sequences[1].slices.len(), 1);
        assert_eq!(genome.num_slices(), 4);
        genome.validate(Some(16)).unwrap();
    }

    fn raw_slice(text: &str, start: usize, end: usize, id: &str) -> Slice {
        Slice {
            sequence: vec![text.to_string()],
            start,
            end,
            processing_set: None,
            slice_id: id.to_string(),
        }
    }

    #[test]
    fn test_divvy_rejects_non_ascii_text() {
        // as a sequence read back from a record could hold
        let mut s = seq("c", "AAAA");
        s.slices = vec![raw_slice("a\u{e9}a", 0, 4, "c")];
        let before = s.slices.clone();

        let err = s.divvy_up_sequence(&DivvyOptions::new("x", 2)).unwrap_err();
        assert!(matches!(err, GenomeError::InvalidSequence { .. }));
        assert_eq!(s.slices, before);
        assert!(s.validate(None).is_err());
    }

    #[test]
    fn test_divvy_rejects_length_mismatch() {
        let mut s = seq("c", "ACGT");
        s.slices = vec![raw_slice("ACGTACGT", 0, 8, "c")];
        assert!(matches!(
            s.divvy_up_sequence(&DivvyOptions::new("x", 3)),
            Err(GenomeError::InvalidSequence { .. })
        ));

        let mut genome = Genome::new();
        genome.add_sequence(seq("ok", "ACGT"));
        genome.add_sequence(s);
        assert!(genome.divvy_each_sequence(&DivvyOptions::new("x", 3)).is_err());
    }

    #[test]
    fn test_validate_inverted_slice_on_empty_sequence() {
        let mut s = seq("e", "");
        s.slices = vec![raw_slice("", 0, 5, "e_000000"), raw_slice("", 5, 2, "e_000001")];
        assert!(matches!(
            s.validate(None),
            Err(GenomeError::InvariantViolation(_))
        ));

        let mut genome = Genome::new();
        genome.add_sequence(s);
        assert!(genome.validate(None).is_err());
    }

    #[test]
    fn test_validate_inverted_slice() {
        let mut s = seq("c", "AC");
        s.slices = vec![raw_slice("AC", 0, 2, "c_000000"), raw_slice("", 2, 1, "c_000001")];
        let err = s.validate(None).unwrap_err();
        assert!(err.to_string().contains("before its start"));
        assert_eq!(s.slices[1].len(), 0);
    }

    #[test]
    fn test_validate_empty_slices() {
        // the unsliced slice of an empty sequence is fine
        let s = seq("e", "");
        s.validate(None).unwrap();

        let mut s = seq("e", "");
        s.slices = vec![raw_slice("", 0, 0, "e_000000"), raw_slice("", 0, 0, "e_000001")];
        assert!(s.validate(None).is_err());
    }

    #[test]
    fn test_genome_validate_detects_bad_sum() {
        let mut genome = Genome::new();
        genome.add_sequence(seq("a", "AAAA"));
        genome.meta_info.total_bp += 1;
        assert!(genome.validate(None).is_err());
    }
}
