//! Builder module for preparing genomes
//!
//! This module implements the preparation pipeline:
//! 1. Parse `(header, text)` records (FASTA/FASTQ)
//! 2. Ingest and profile sequences in parallel
//! 3. Accumulate genome composition
//! 4. Partition sequences into labeled slices

pub mod config;
pub mod parse;
pub mod genome_builder;

pub use config::PrepConfiguration;
pub use genome_builder::GenomeBuilder;
