//! Keyword ranking.
//!
//! Before any decomposition is attempted, the whole input is scanned for
//! every keyword in the catalog. The hits are ordered by rank, highest first;
//! rules with equal rank keep their script order. An empty result means the
//! input has no keyword path at all and the engine falls back to a neutral
//! reply.
//!
//! Keywords match as whole words (`fiets` does not hit `fietsen`), and a
//! keyword written as `@word` hits any member of that word's synonym set.

use super::compiled_rules::CompiledRule;

/// Rules whose keyword occurs in `sentence`, by descending rank.
pub fn rank_keywords<'r>(rules: &'r [CompiledRule], sentence: &str) -> Vec<&'r CompiledRule> {
    let mut hits: Vec<&CompiledRule> = rules.iter().filter(|rule| rule.occurs_in(sentence)).collect();
    // `sort_by` is stable: equal ranks keep script order.
    hits.sort_by(|a, b| b.rank.cmp(&a.rank));
    hits
}
