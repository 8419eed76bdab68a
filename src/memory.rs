//! Short-term recall memory.
//!
//! A bounded, oldest-first store of recent `(input, output)` exchanges used
//! to notice when the user repeats themselves. Recall is fuzzy: a stored
//! input matches a query when their edit distance is below 20% of the
//! *query's* length.
//!
//! ```text
//! remember("hallo", "hoi")
//! recall("hallo")  -> Some("hoi")   distance 0, threshold 1.0
//! recall("halloo") -> Some("hoi")   distance 1, threshold 1.2
//! recall("halo")   -> None          distance 1, threshold 0.8
//! ```

use std::collections::VecDeque;
use tracing::trace;

/// Default number of exchanges kept.
pub const DEFAULT_CAPACITY: usize = 1;

/// Fraction of the query length the edit distance must stay strictly below.
pub const RECALL_THRESHOLD: f64 = 0.2;

/// One remembered exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct RecallMemory {
    capacity: usize,
    entries: VecDeque<MemoryEntry>,
}

impl Default for RecallMemory {
    fn default() -> Self {
        RecallMemory::with_capacity(DEFAULT_CAPACITY)
    }
}

impl RecallMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RecallMemory { capacity, entries: VecDeque::with_capacity(capacity.saturating_add(1)) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    /// Store an exchange, forgetting the oldest one when over capacity.
    pub fn remember(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.entries.push_back(MemoryEntry { input: input.into(), output: output.into() });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The output of the most recent exchange whose input is close to `input`.
    ///
    /// Two empty strings are never considered a repeat.
    pub fn recall(&self, input: &str) -> Option<&str> {
        let threshold = input.chars().count() as f64 * RECALL_THRESHOLD;

        let found = self
            .entries
            .iter()
            .filter(|entry| !(entry.input.is_empty() && input.is_empty()))
            .filter(|entry| {
                let distance = edit_distance(input, &entry.input);
                trace!(query = input, stored = %entry.input, distance, threshold, "recall comparison");
                (distance as f64) < threshold
            })
            .last();

        found.map(|entry| entry.output.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Levenshtein distance over characters (unit cost insert, delete, substitute).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_classic_cases() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("hallo", "halo"), 1);
        assert_eq!(edit_distance("hallo", "hallo"), 0);
    }

    #[test]
    fn edit_distance_counts_characters_not_bytes() {
        assert_eq!(edit_distance("café", "cafe"), 1);
        assert_eq!(edit_distance("één", "een"), 2);
    }

    #[test]
    fn exact_repeat_is_recalled() {
        let mut memory = RecallMemory::new();
        memory.remember("hallo", "hoi");
        assert_eq!(memory.recall("hallo"), Some("hoi"));
    }

    #[test]
    fn threshold_uses_query_length() {
        let mut memory = RecallMemory::new();
        memory.remember("hallo", "hoi");

        // Distance 1; query length 4 gives threshold 0.8.
        assert_eq!(memory.recall("halo"), None);
        // Distance 1; query length 6 gives threshold 1.2.
        assert_eq!(memory.recall("halloo"), Some("hoi"));
        assert_eq!(memory.recall("totaal andere zin"), None);
    }

    #[test]
    fn longer_sentences_tolerate_typos() {
        let mut memory = RecallMemory::new();
        memory.remember("ik ben vandaag erg moe", "Waarom ben je moe?");
        // 22 chars, threshold 4.4.
        assert_eq!(memory.recall("ik ben vandag erg moe!"), Some("Waarom ben je moe?"));
    }

    #[test]
    fn empty_strings_are_not_a_repeat() {
        let mut memory = RecallMemory::new();
        memory.remember("", "Zeg eens iets.");
        assert_eq!(memory.recall(""), None);
    }

    #[test]
    fn empty_query_never_matches_non_empty_entry() {
        let mut memory = RecallMemory::new();
        memory.remember("a", "b");
        assert_eq!(memory.recall(""), None);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut memory = RecallMemory::with_capacity(2);
        memory.remember("een", "1");
        memory.remember("twee", "2");
        memory.remember("drie", "3");

        let inputs: Vec<&str> = memory.entries().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, vec!["twee", "drie"]);
        assert_eq!(memory.recall("een"), None);
    }

    #[test]
    fn most_recent_match_wins() {
        let mut memory = RecallMemory::with_capacity(3);
        memory.remember("ik ben moe", "eerste");
        memory.remember("iets anders", "tweede");
        memory.remember("ik ben moe", "derde");
        assert_eq!(memory.recall("ik ben moe"), Some("derde"));
    }

    #[test]
    fn zero_capacity_remembers_nothing() {
        let mut memory = RecallMemory::with_capacity(0);
        memory.remember("hallo", "hoi");
        assert!(memory.is_empty());
        assert_eq!(memory.recall("hallo"), None);
    }
}
