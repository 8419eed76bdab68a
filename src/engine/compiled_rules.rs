//! Script compilation.
//!
//! This module holds the *static* side of the engine: the structures derived
//! from a loaded [`Script`] that make a parse run cheap and predictable.
//!
//! Parsing is split into two phases:
//!
//! 1. **Compile** (this module): build one keyword matcher per entry, one
//!    anchored matcher per decomposition, and the `pre`/`post` substitutors.
//!    This happens once per locale load.
//! 2. **Run** (see `parser.rs`): rank keywords for the input, then search
//!    lines, rules and decompositions for a reply.
//!
//! ## Invariants
//!
//! - `CompiledScript::rules` is aligned with `Script::entries`: rule `i` was
//!   compiled from entry `i`, and ranking ties fall back to that order.
//! - A pattern that does not compile is kept with no matcher. It never
//!   matches, and the rest of the script stays usable.

use super::decompose::Decomposer;
use super::pattern::{expand_synonyms, whole_word_matches, whole_word_regex};
use super::substitute::Substitutor;
use crate::script::{KeywordRule, Script, SynonymSet};
use regex::Regex;
use tracing::{debug, warn};

/// A keyword entry with its matchers built.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub keyword: String,
    pub rank: i32,
    matcher: Option<Regex>,
    pub decompositions: Vec<CompiledDecomposition>,
}

impl CompiledRule {
    fn new(entry: &KeywordRule, synonyms: &[SynonymSet]) -> Self {
        let source = expand_synonyms(&entry.keyword, synonyms);
        let matcher = match whole_word_regex(&source) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(keyword = %entry.keyword, error = %err, "keyword pattern does not compile");
                None
            }
        };

        let decompositions = entry
            .decompositions
            .iter()
            .map(|d| CompiledDecomposition {
                decomposer: Decomposer::compile(&d.pattern, synonyms),
                replies: d.replies.iter().map(|r| r.template.clone()).collect(),
            })
            .collect();

        CompiledRule { keyword: entry.keyword.clone(), rank: entry.rank, matcher, decompositions }
    }

    /// Whether the keyword (or one of its synonyms) occurs in `sentence` as a
    /// whole word.
    pub fn occurs_in(&self, sentence: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| !whole_word_matches(re, sentence).is_empty())
    }

    pub fn matcher_source(&self) -> Option<&str> {
        self.matcher.as_ref().map(Regex::as_str)
    }
}

/// A decomposition matcher and the reply templates that belong to it.
#[derive(Debug, Clone)]
pub struct CompiledDecomposition {
    pub decomposer: Decomposer,
    pub replies: Vec<String>,
}

/// A loaded script with all of its patterns compiled.
#[derive(Debug)]
pub struct CompiledScript {
    script: Script,
    pub rules: Vec<CompiledRule>,
    pub pre: Substitutor,
    pub post: Substitutor,
}

impl CompiledScript {
    pub fn new(script: Script) -> Self {
        let rules: Vec<CompiledRule> =
            script.entries.iter().map(|entry| CompiledRule::new(entry, &script.synonyms)).collect();
        let pre = Substitutor::new(&script.transformations.pre);
        let post = Substitutor::new(&script.transformations.post);

        debug!(
            entries = rules.len(),
            decompositions = rules.iter().map(|r| r.decompositions.len()).sum::<usize>(),
            synonym_sets = script.synonyms.len(),
            "compiled script"
        );

        CompiledScript { script, rules, pre, post }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Decomposition, ReplyTemplate};

    fn entry(keyword: &str, rank: i32, pattern: &str) -> KeywordRule {
        KeywordRule {
            keyword: keyword.to_string(),
            rank,
            decompositions: vec![Decomposition {
                pattern: pattern.to_string(),
                replies: vec![ReplyTemplate::from("(1)")],
            }],
        }
    }

    #[test]
    fn rules_stay_aligned_with_entries() {
        let script = Script {
            entries: vec![entry("ik", 1, "ik *"), entry("jij", 3, "jij *")],
            ..Script::default()
        };
        let compiled = CompiledScript::new(script);

        let keywords: Vec<&str> = compiled.rules.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["ik", "jij"]);
        assert_eq!(compiled.rules[1].decompositions[0].replies, vec!["(1)"]);
    }

    #[test]
    fn keyword_matcher_uses_synonyms() {
        let script = Script {
            synonyms: vec![["moeder", "vader"].into_iter().collect()],
            entries: vec![entry("@moeder", 2, "*")],
            ..Script::default()
        };
        let compiled = CompiledScript::new(script);
        let rule = &compiled.rules[0];

        assert!(rule.occurs_in("mijn vader is lang"));
        assert!(rule.occurs_in("Moeder belt"));
        assert!(!rule.occurs_in("grootvader"));
        assert_eq!(rule.matcher_source(), Some(r"(?:^|[^\w])((moeder|vader))(?:[^\w]|$)"));
    }
}
