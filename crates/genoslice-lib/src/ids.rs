//! Slice identifier allocation

use crate::constants::SLICE_ID_WIDTH;

/// Hands out `{prefix}{counter}` identifiers with a zero-based counter
///
/// The counter is zero-padded to [`SLICE_ID_WIDTH`] digits (wider once it
/// outgrows them). Ids are unique only within one allocator, so a fresh
/// allocator is used for every sequence.
#[derive(Debug, Clone)]
pub struct SliceIdAllocator {
    prefix: String,
    counter: usize,
}

impl SliceIdAllocator {
    /// Create an allocator with the counter at zero
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Allocator for the slices of one sequence: prefix `"{seqid}_"`
    pub fn for_sequence(seqid: &str) -> Self {
        Self::new(format!("{seqid}_"))
    }

    /// The fixed prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> usize {
        self.counter
    }

    /// Allocate the next id
    pub fn next_unique_id(&mut self) -> String {
        let id = format!("{}{:0width$}", self.prefix, self.counter, width = SLICE_ID_WIDTH);
        self.counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format() {
        let mut ids = SliceIdAllocator::for_sequence("chr1");
        assert_eq!(ids.next_unique_id(), "chr1_000000");
        assert_eq!(ids.next_unique_id(), "chr1_000001");
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn test_unique() {
        let mut ids = SliceIdAllocator::new("x");
        let seen: HashSet<String> = (0..5000).map(|_| ids.next_unique_id()).collect();
        assert_eq!(seen.len(), 5000);
    }

    #[test]
    fn test_fresh_allocator_restarts() {
        let mut a = SliceIdAllocator::for_sequence("s");
        let mut b = SliceIdAllocator::for_sequence("s");
        a.next_unique_id();
        assert_eq!(b.next_unique_id(), "s_000000");
    }

    #[test]
    fn test_counter_outgrows_width() {
        let mut ids = SliceIdAllocator::new("p");
        ids.counter = 1_000_000;
        assert_eq!(ids.next_unique_id(), "p1000000");
    }
}
