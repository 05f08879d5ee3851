// genoslice: deterministic genome partitioning and k-mer profiling
//
// Prepares genome assemblies for machine learning: sequences are profiled
// (GC, ambiguous bases, canonical k-mer histograms) and cut into bounded
// slices labeled train/validate/test by a content-derived seed.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod complement;
pub mod hasher;
pub mod kmer;
pub mod partition;
pub mod ids;
pub mod meta_info;
pub mod structure;
pub mod builder;
pub mod serialization;

// Re-export common types at crate root
pub use complement::{reverse_complement, ComplementError};
pub use kmer::{canonicalize, profile_canonical, KmerHistogram, KmerKey, KmerProfiler};
pub use partition::{CoordinatePartitioner, ProcessingSet, Segment, SplitWeights};
pub use meta_info::MetaInfo;
pub use structure::{DivvyOptions, Genome, GenomeError, Sequence, Slice};
pub use serialization::{EntityKind, EntityRecord, FieldSpec, RecordError};
pub use builder::{GenomeBuilder, PrepConfiguration};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}
