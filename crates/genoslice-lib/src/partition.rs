//! Deterministic coordinate partitioning
//!
//! Splits the coordinate range `[0, total_bp)` of a sequence into ordered,
//! non-overlapping segments of at most `max_len` bases and labels each with
//! a processing set.
//!
//! Segments use a fixed stride: segment `i` covers
//! `[i * max_len, min(total_bp, (i + 1) * max_len))`. Segment `i` is then
//! labeled by draw `i` of a [`SeededStream`] keyed by the partitioning seed,
//! mapped onto the cumulative [`SplitWeights`].

use crate::hasher::SeededStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Downstream usage split of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingSet {
    /// Training data
    Train,
    /// Validation data
    Validate,
    /// Held-out test data
    Test,
}

impl ProcessingSet {
    /// All labels in draw order
    pub const ALL: [ProcessingSet; 3] = [Self::Train, Self::Validate, Self::Test];

    /// Label as written in records
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validate => "validate",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for ProcessingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Self::Train),
            "validate" => Ok(Self::Validate),
            "test" => Ok(Self::Test),
            other => Err(format!("unknown processing set {other:?}")),
        }
    }
}

/// Relative weights of the processing sets
///
/// Labels are drawn independently per segment with probability
/// proportional to these weights. The default is 8/1/1 (80/10/10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitWeights {
    /// Weight of [`ProcessingSet::Train`]
    pub train: u32,
    /// Weight of [`ProcessingSet::Validate`]
    pub validate: u32,
    /// Weight of [`ProcessingSet::Test`]
    pub test: u32,
}

impl Default for SplitWeights {
    fn default() -> Self {
        Self {
            train: 8,
            validate: 1,
            test: 1,
        }
    }
}

impl SplitWeights {
    /// Create weights from their three components
    pub const fn new(train: u32, validate: u32, test: u32) -> Self {
        Self {
            train,
            validate,
            test,
        }
    }

    /// Equal weights: an unconstrained seed-determined choice
    pub const fn uniform() -> Self {
        Self::new(1, 1, 1)
    }

    /// Sum of the weights
    pub fn total(&self) -> u64 {
        self.train as u64 + self.validate as u64 + self.test as u64
    }

    /// Label for a value in `[0, total)`
    fn pick(&self, value: u64) -> ProcessingSet {
        if value < self.train as u64 {
            ProcessingSet::Train
        } else if value < self.train as u64 + self.validate as u64 {
            ProcessingSet::Validate
        } else {
            ProcessingSet::Test
        }
    }
}

impl fmt::Display for SplitWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.train, self.validate, self.test)
    }
}

impl FromStr for SplitWeights {
    type Err = String;

    /// Parse `train:validate:test`, e.g. `8:1:1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(format!("split weights must look like train:validate:test, got {s:?}"));
        }
        let mut values = [0u32; 3];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .trim()
                .parse()
                .map_err(|e| format!("invalid split weight {part:?}: {e}"))?;
        }
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

/// One labeled segment `[begin, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First coordinate (inclusive)
    pub begin: usize,
    /// Last coordinate (exclusive)
    pub end: usize,
    /// Processing set label
    pub processing_set: ProcessingSet,
}

impl Segment {
    /// Number of bases covered
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the segment is empty (never true for generated segments)
    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }
}

/// Splits coordinate ranges into bounded, labeled segments
///
/// # Example
/// ```
/// use genoslice_lib::partition::{CoordinatePartitioner, SplitWeights};
///
/// let partitioner = CoordinatePartitioner::new("seed", 4, SplitWeights::default());
/// let segments: Vec<_> = partitioner.divvy_coordinates(10).collect();
/// let ranges: Vec<_> = segments.iter().map(|s| (s.begin, s.end)).collect();
/// assert_eq!(ranges, vec![(0, 4), (4, 8), (8, 10)]);
/// ```
#[derive(Debug, Clone)]
pub struct CoordinatePartitioner {
    stream: SeededStream,
    max_len: usize,
    weights: SplitWeights,
}

impl CoordinatePartitioner {
    /// Create a partitioner for a seed
    ///
    /// # Panics
    /// Panics if `max_len` is 0 or the weights sum to 0; configuration
    /// validation rejects both.
    pub fn new(seed: &str, max_len: usize, weights: SplitWeights) -> Self {
        assert!(max_len > 0, "max_len must be positive");
        assert!(weights.total() > 0, "split weights must not all be zero");
        Self {
            stream: SeededStream::new(seed),
            max_len,
            weights,
        }
    }

    /// Maximum segment length
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Label of the `index`-th segment
    pub fn label(&self, index: usize) -> ProcessingSet {
        let value = self.stream.draw_below(index as u64, self.weights.total());
        self.weights.pick(value)
    }

    /// Ordered segments tiling `[0, total_bp)`
    ///
    /// Empty for `total_bp == 0`; a single segment when
    /// `total_bp <= max_len`.
    pub fn divvy_coordinates(&self, total_bp: usize) -> impl Iterator<Item = Segment> + '_ {
        (0..total_bp)
            .step_by(self.max_len)
            .enumerate()
            .map(move |(index, begin)| Segment {
                begin,
                end: begin.saturating_add(self.max_len).min(total_bp),
                processing_set: self.label(index),
            })
    }
}
