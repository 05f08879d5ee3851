//! IUPAC reverse complement
//!
//! Complement table covering the four unambiguous bases and the eleven
//! IUPAC ambiguity codes, in both cases:
//!
//! ```text
//! forward  A C G T M R W S Y K V H D B N
//! reverse  T G C A K Y W S R M B D H V N
//! ```
//!
//! Case is preserved. Anything outside the table is rejected.

use thiserror::Error;

/// Error type for complement operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComplementError {
    /// The input contains a character with no IUPAC complement
    #[error("Invalid character {0:?}: not a DNA or IUPAC ambiguity code")]
    InvalidCharacter(char),
}

/// Complement a single base, or `None` if it is outside the table
#[inline]
pub const fn complement_base(base: u8) -> Option<u8> {
    let out = match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'M' => b'K',
        b'R' => b'Y',
        b'W' => b'W',
        b'S' => b'S',
        b'Y' => b'R',
        b'K' => b'M',
        b'V' => b'B',
        b'H' => b'D',
        b'D' => b'H',
        b'B' => b'V',
        b'N' => b'N',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        b'm' => b'k',
        b'r' => b'y',
        b'w' => b'w',
        b's' => b's',
        b'y' => b'r',
        b'k' => b'm',
        b'v' => b'b',
        b'h' => b'd',
        b'd' => b'h',
        b'b' => b'v',
        b'n' => b'n',
        _ => return None,
    };
    Some(out)
}

/// Reverse complement of a string
///
/// # Errors
/// Returns [`ComplementError::InvalidCharacter`] for the first character
/// (scanning from the 3' end) that has no complement.
pub fn reverse_complement(seq: &str) -> Result<String, ComplementError> {
    let mut out = String::with_capacity(seq.len());
    for c in seq.chars().rev() {
        let base = u8::try_from(c)
            .ok()
            .and_then(complement_base)
            .ok_or(ComplementError::InvalidCharacter(c))?;
        out.push(base as char);
    }
    Ok(out)
}

/// Reverse complement of a byte sequence
///
/// # Errors
/// Same as [`reverse_complement`], reporting the offending byte as a char.
pub fn reverse_complement_bytes(seq: &[u8]) -> Result<Vec<u8>, ComplementError> {
    seq.iter()
        .rev()
        .map(|&b| complement_base(b).ok_or(ComplementError::InvalidCharacter(b as char)))
        .collect()
}
