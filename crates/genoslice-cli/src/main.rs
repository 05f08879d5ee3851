use anyhow::Context;
use clap::{Parser, Subcommand};
use genoslice_lib::{Genome, GenomeBuilder, PrepConfiguration, ProcessingSet, SplitWeights};
use std::path::Path;
use tracing::info;

#[derive(Parser)]
#[command(name = "genoslice")]
#[command(version = "0.1.0")]
#[command(
    about = "genoslice: deterministic genome partitioning and k-mer profiling",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile and partition a genome from a FASTA/FASTQ file
    Prepare {
        /// Input FASTA/FASTQ file (may be gzipped)
        #[arg(short, long)]
        input: String,

        /// Output genome file
        #[arg(short, long)]
        output: Option<String>,

        /// User seed mixed into every sequence's partitioning seed
        #[arg(long, default_value = "")]
        seed: String,

        /// Maximum slice length in bases
        #[arg(long, default_value = "2000000")]
        max_len: usize,

        /// Smallest profiled k-mer length
        #[arg(long, default_value = "2")]
        smallest_mer: usize,

        /// Largest profiled k-mer length
        #[arg(long, default_value = "2")]
        largest_mer: usize,

        /// Characters per stored run of slice text
        #[arg(long, default_value = "100")]
        chunk_size: usize,

        /// Species label (default: derived from the input file name)
        #[arg(long)]
        species: Option<String>,

        /// Processing set weights as train:validate:test
        #[arg(long, default_value = "8:1:1")]
        split: SplitWeights,

        /// Number of threads (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the composition of a prepared genome
    Stats {
        /// Genome file
        #[arg(short, long)]
        input: String,
    },

    /// Check the structural invariants of a prepared genome
    Check {
        /// Genome file
        #[arg(short, long)]
        input: String,

        /// Also require every slice to be at most this long
        #[arg(long)]
        max_len: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            input,
            output,
            seed,
            max_len,
            smallest_mer,
            largest_mer,
            chunk_size,
            species,
            split,
            threads,
            verbose,
        } => {
            let config = PrepConfiguration {
                smallest_mer,
                largest_mer,
                max_len,
                user_seed: seed,
                chunk_size,
                split_weights: split,
                num_threads: threads,
                verbose,
                ..PrepConfiguration::default()
            };
            prepare_command(input, output, species, config)?;
        }
        Commands::Stats { input } => {
            stats_command(input)?;
        }
        Commands::Check { input, max_len } => {
            check_command(input, max_len)?;
        }
    }

    Ok(())
}

/// Build, partition and save a genome
fn prepare_command(
    input: String,
    output: Option<String>,
    species: Option<String>,
    config: PrepConfiguration,
) -> anyhow::Result<()> {
    info!("Preparing genome...");
    info!("  Input: {}", input);

    let builder = GenomeBuilder::new(config).map_err(|e| anyhow::anyhow!("{}", e))?;
    let genome = builder.build_from_fasta(&input, species.as_deref())?;

    // Determine output filename
    let output_path = output.unwrap_or_else(|| {
        let stem = Path::new(&input)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("genome");
        format!("{}.genoslice", stem)
    });

    genome
        .save(&output_path)
        .with_context(|| format!("Failed to save genome to {}", output_path))?;
    info!("Genome prepared successfully!");
    Ok(())
}

/// Print genome and per-sequence composition
fn stats_command(input: String) -> anyhow::Result<()> {
    let genome = Genome::load(&input).with_context(|| format!("Failed to load {}", input))?;
    let meta = &genome.meta_info;

    println!("species: {}", genome.species);
    println!("sequences: {}", genome.sequences.len());
    println!("total_bp: {}", meta.total_bp);
    println!("gc_content: {} ({:.4})", meta.gc_content, meta.gc_fraction());
    println!("ambiguous_content: {}", meta.ambiguous_content);
    for (k, histogram) in &meta.canonical_kmer_content {
        println!(
            "k={}: {} canonical k-mers, {} counted, {} ambiguous",
            k,
            histogram.len().saturating_sub(1),
            histogram.total(),
            histogram.ambiguous()
        );
    }

    println!("slices: {}", genome.num_slices());
    for set in ProcessingSet::ALL {
        let bases: usize = genome
            .sequences
            .iter()
            .flat_map(|s| &s.slices)
            .filter(|s| s.processing_set == Some(set))
            .map(|s| s.len())
            .sum();
        println!("  {}: {} bp", set, bases);
    }

    println!("\nseqid\ttotal_bp\tgc_content\tambiguous_content\tslices");
    for seq in &genome.sequences {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            seq.seqid,
            seq.meta_info.total_bp,
            seq.meta_info.gc_content,
            seq.meta_info.ambiguous_content,
            seq.slices.len()
        );
    }
    Ok(())
}

/// Load a genome and verify its invariants
fn check_command(input: String, max_len: Option<usize>) -> anyhow::Result<()> {
    let genome = Genome::load(&input).with_context(|| format!("Failed to load {}", input))?;
    info!(
        "Checking {} sequences, {} slices...",
        genome.sequences.len(),
        genome.num_slices()
    );

    genome
        .validate(max_len)
        .with_context(|| format!("Genome in {} failed validation", input))?;

    println!("OK: {} sequences, {} slices", genome.sequences.len(), genome.num_slices());
    Ok(())
}
