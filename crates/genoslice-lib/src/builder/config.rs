//! Preparation configuration
//!
//! Parameters for ingesting, profiling and partitioning a genome.

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_ID_DELIM, DEFAULT_LARGEST_MER, DEFAULT_MAX_LEN,
    DEFAULT_SMALLEST_MER, MAX_PROFILE_K, MIN_PROFILE_K,
};
use crate::partition::SplitWeights;
use crate::structure::DivvyOptions;
use std::ops::RangeInclusive;

/// Configuration parameters for preparing a genome
#[derive(Debug, Clone)]
pub struct PrepConfiguration {
    /// Smallest k-mer length profiled
    pub smallest_mer: usize,

    /// Largest k-mer length profiled (inclusive)
    pub largest_mer: usize,

    /// Upper bound on slice length
    pub max_len: usize,

    /// User seed mixed into every sequence's content seed
    pub user_seed: String,

    /// Characters per stored run of slice text
    pub chunk_size: usize,

    /// Header delimiter separating the sequence id from its description
    pub id_delim: char,

    /// Processing set proportions
    pub split_weights: SplitWeights,

    /// Number of threads for parallel operations (0 = all available cores)
    pub num_threads: usize,

    /// Verbose output during preparation
    pub verbose: bool,
}

impl Default for PrepConfiguration {
    fn default() -> Self {
        Self {
            smallest_mer: DEFAULT_SMALLEST_MER,
            largest_mer: DEFAULT_LARGEST_MER,
            max_len: DEFAULT_MAX_LEN,
            user_seed: String::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            id_delim: DEFAULT_ID_DELIM,
            split_weights: SplitWeights::default(),
            num_threads: 0, // 0 = use all available cores
            verbose: true,
        }
    }
}

impl PrepConfiguration {
    /// Create a configuration with the given seed and slice bound
    pub fn new(user_seed: impl Into<String>, max_len: usize) -> Result<Self, String> {
        let config = Self {
            user_seed: user_seed.into(),
            max_len,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.smallest_mer < MIN_PROFILE_K || self.largest_mer > MAX_PROFILE_K {
            return Err(format!(
                "k-mer lengths must be in range [{}, {}], got {}..={}",
                MIN_PROFILE_K, MAX_PROFILE_K, self.smallest_mer, self.largest_mer
            ));
        }
        if self.smallest_mer > self.largest_mer {
            return Err(format!(
                "smallest_mer must not exceed largest_mer, got {} > {}",
                self.smallest_mer, self.largest_mer
            ));
        }
        if self.max_len == 0 {
            return Err("max_len must be positive".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be positive".to_string());
        }
        if self.split_weights.total() == 0 {
            return Err(format!(
                "split weights must not all be zero, got {}",
                self.split_weights
            ));
        }
        Ok(())
    }

    /// Profiled k-mer lengths
    pub fn mers(&self) -> RangeInclusive<usize> {
        self.smallest_mer..=self.largest_mer
    }

    /// Partitioning options borrowed from this configuration
    pub fn divvy_options(&self) -> DivvyOptions<'_> {
        DivvyOptions {
            user_seed: &self.user_seed,
            max_len: self.max_len,
            split_weights: self.split_weights,
            chunk_size: self.chunk_size,
        }
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Prep Configuration:");
        tracing::info!("  mers = {}..={}", self.smallest_mer, self.largest_mer);
        tracing::info!("  max_len = {}", self.max_len);
        tracing::info!("  user_seed = {:?}", self.user_seed);
        tracing::info!("  split_weights = {}", self.split_weights);
        if self.num_threads == 0 {
            tracing::info!("  num_threads = all available cores");
        } else {
            tracing::info!("  num_threads = {}", self.num_threads);
        }
        tracing::debug!("  chunk_size = {}", self.chunk_size);
        tracing::debug!("  id_delim = {:?}", self.id_delim);
        tracing::debug!("  verbose = {}", self.verbose);
    }
}
