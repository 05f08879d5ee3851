//! Genome preparation orchestration
//!
//! Coordinates the pipeline that turns raw records into a partitioned
//! genome:
//! 1. Ingest records and profile each sequence
//! 2. Accumulate the genome composition
//! 3. Partition every sequence into labeled slices

use crate::builder::config::PrepConfiguration;
use crate::builder::parse::read_records;
use crate::partition::ProcessingSet;
use crate::structure::{Genome, GenomeError, Sequence};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Builder for preparing genomes
pub struct GenomeBuilder {
    config: PrepConfiguration,
}

impl GenomeBuilder {
    /// Create a new genome builder with the given configuration
    pub fn new(config: PrepConfiguration) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &PrepConfiguration {
        &self.config
    }

    /// Build a genome from `(header, text)` records
    ///
    /// # Parallelism
    /// The number of threads is controlled by `config.num_threads`:
    /// - `0`: use all available CPU cores (rayon default)
    /// - `N`: use exactly N threads
    ///
    /// The result does not depend on the thread count.
    pub fn build_from_records(
        &self,
        species_hint: Option<&str>,
        records: Vec<(String, String)>,
    ) -> Result<Genome> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
            .context("Failed to create thread pool")?;

        let mut genome = pool.install(|| self.build_from_records_inner(records))?;
        if let Some(species) = species_hint {
            genome.species = species.to_string();
        }
        Ok(genome)
    }

    /// Build a genome from a FASTA/FASTQ file
    ///
    /// Without a species hint the species is derived from the file name.
    pub fn build_from_fasta<P: AsRef<Path>>(
        &self,
        path: P,
        species_hint: Option<&str>,
    ) -> Result<Genome> {
        let path = path.as_ref();
        info!("Reading records from {}", path.display());
        let records = read_records(path)?;
        let mut genome = self
            .build_from_records(species_hint, records)
            .with_context(|| format!("Failed to prepare genome from {}", path.display()))?;
        genome.maybe_add_info_from_fasta(&path.to_string_lossy());
        Ok(genome)
    }

    /// Inner build logic, runs inside the rayon thread pool
    fn build_from_records_inner(
        &self,
        records: Vec<(String, String)>,
    ) -> Result<Genome, GenomeError> {
        if self.config.verbose {
            self.config.print();
        }
        info!("Preparing Genome");

        // Step 1: Ingest and profile
        info!("Step 1: Ingesting and profiling {} records...", records.len());
        let sequences = self.ingest(&records)?;
        drop(records);

        // Step 2: Accumulate
        info!("Step 2: Accumulating composition...");
        let mut genome = Genome::new();
        genome.sequences = sequences;
        genome.recompute_meta_info();
        info!("  Total bases: {}", genome.meta_info.total_bp);
        info!("  GC fraction: {:.4}", genome.meta_info.gc_fraction());
        info!("  Ambiguous bases: {}", genome.meta_info.ambiguous_content);

        // Step 3: Partition
        info!("Step 3: Partitioning sequences...");
        genome.divvy_each_sequence(&self.config.divvy_options())?;
        log_split_summary(&genome);

        info!("Genome Preparation Complete");
        Ok(genome)
    }

    /// Ingest records in parallel, keeping input order
    fn ingest(&self, records: &[(String, String)]) -> Result<Vec<Sequence>, GenomeError> {
        let mers = self.config.mers();
        records
            .par_iter()
            .map(|(header, text)| {
                Sequence::from_record(
                    header,
                    text,
                    self.config.id_delim,
                    mers.clone(),
                    self.config.chunk_size,
                )
            })
            .collect()
    }
}

fn log_split_summary(genome: &Genome) {
    info!("  Slices: {}", genome.num_slices());
    for set in ProcessingSet::ALL {
        let (count, bases) = genome
            .sequences
            .iter()
            .flat_map(|s| &s.slices)
            .filter(|s| s.processing_set == Some(set))
            .fold((0usize, 0usize), |(n, bp), s| (n + 1, bp + s.len()));
        info!("  {}: {} slices, {} bp", set, count, bases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn records() -> Vec<(String, String)> {
        vec![
            ("chr1 first".to_string(), "ACGTACGTACGTNNNN".to_string()),
            ("chr2".to_string(), "GGCCAATT".to_string()),
        ]
    }

    fn config(max_len: usize) -> PrepConfiguration {
        PrepConfiguration {
            verbose: false,
            ..PrepConfiguration::new("seed", max_len).unwrap()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = PrepConfiguration { max_len: 0, ..PrepConfiguration::default() };
        assert!(GenomeBuilder::new(bad).is_err());
    }

    #[test]
    fn test_build_from_records() {
        let builder = GenomeBuilder::new(config(5)).unwrap();
        let genome = builder.build_from_records(Some("Test_species"), records()).unwrap();

        assert_eq!(genome.species, "Test_species");
        assert_eq!(genome.sequences.len(), 2);
        assert_eq!(genome.sequences[0].seqid, "chr1");
        assert_eq!(genome.sequences[1].seqid, "chr2");
        assert_eq!(genome.meta_info.total_bp, 24);
        assert_eq!(genome.sequences[0].slices.len(), 4);
        assert_eq!(genome.sequences[1].slices.len(), 2);
        genome.validate(Some(5)).unwrap();
    }

    #[test]
    fn test_thread_count_does_not_matter() {
        let one = GenomeBuilder::new(PrepConfiguration { num_threads: 1, ..config(3) })
            .unwrap()
            .build_from_records(None, records())
            .unwrap();
        let four = GenomeBuilder::new(PrepConfiguration { num_threads: 4, ..config(3) })
            .unwrap()
            .build_from_records(None, records())
            .unwrap();
        assert_eq!(one, four);
    }

    #[test]
    fn test_non_ascii_record_fails() {
        let builder = GenomeBuilder::new(config(5)).unwrap();
        let records = vec![("x".to_string(), "AC\u{e9}".to_string())];
        let result = builder.build_from_records(None, records);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenomeError>(),
            Some(GenomeError::InvalidSequence { .. })
        ));
    }

    #[test]
    fn test_build_from_fasta() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Danio_rerio.fa");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, ">chrA desc\nACGTACGT\n>chrB\nTTTT")?;
        drop(file);

        let builder = GenomeBuilder::new(config(4)).unwrap();
        let genome = builder.build_from_fasta(&path, None)?;
        assert_eq!(genome.species, "Danio_rerio");
        assert_eq!(genome.sequences[0].deprecated_header, "chrA desc");
        assert_eq!(genome.num_slices(), 3);

        let hinted = builder.build_from_fasta(&path, Some("zebrafish"))?;
        assert_eq!(hinted.species, "zebrafish");
        Ok(())
    }

    #[test]
    fn test_build_from_fasta_bad_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "this is not fasta")?;
        file.flush()?;
        let builder = GenomeBuilder::new(config(4)).unwrap();
        assert!(builder.build_from_fasta(file.path(), None).is_err());
        Ok(())
    }
}
