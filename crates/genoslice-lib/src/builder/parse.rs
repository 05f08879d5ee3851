//! FASTA/FASTQ parsing with automatic decompression
//!
//! Reads `(header, text)` records from FASTA or FASTQ files, with
//! transparent gzip decompression. Sequence text is passed through as-is:
//! ambiguity codes and soft-masked (lower-case) bases are kept, since the
//! composition statistics count them.

use anyhow::{Context, Result};
use needletail::parse_fastx_file;
use std::path::Path;

/// Parse a FASTA/FASTQ file and call a function for each record
///
/// # Arguments
/// * `path` - Path to input file (may be gzipped)
/// * `callback` - Function called for each record, receives (header, text)
///
/// # Errors
/// Returns error if:
/// - File cannot be opened
/// - File format is invalid
/// - Header or text is not valid UTF-8
pub fn parse_records<P, F>(path: P, mut callback: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&str, &str) -> Result<()>,
{
    let path = path.as_ref();

    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("Failed to open sequence file: {}", path.display()))?;

    let mut index = 0usize;
    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;

        let header = std::str::from_utf8(record.id()).with_context(|| {
            format!("Header of record {} in {} is not UTF-8", index, path.display())
        })?;
        let seq = record.seq();
        let text = std::str::from_utf8(&seq).with_context(|| {
            format!("Sequence {:?} in {} is not UTF-8", header, path.display())
        })?;

        callback(header, text)?;
        index += 1;
    }

    Ok(())
}

/// Read all records of a file into memory
///
/// # Errors
/// See [`parse_records`].
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>> {
    let mut records = Vec::new();
    parse_records(path, |header, text| {
        records.push((header.to_string(), text.to_string()));
        Ok(())
    })?;
    Ok(records)
}

/// Count sequences and total bases in a file
///
/// # Returns
/// `(num_sequences, total_bases)`
pub fn count_sequences<P: AsRef<Path>>(path: P) -> Result<(usize, usize)> {
    let mut num_sequences = 0;
    let mut total_bases = 0;

    parse_records(path, |_header, text| {
        num_sequences += 1;
        total_bases += text.len();
        Ok(())
    })?;

    Ok((num_sequences, total_bases))
}
