//! Keyword search and reply assembly.
//!
//! This module is the operational core of the engine. Given a loaded script
//! and an input sentence it walks a fallback ladder:
//!
//! ```text
//! (0) no script loaded        -> NOT_READY sentinel
//! (1) rank keywords           -> none found: random `neutral` line
//! (2) pre-transform + split   -> candidate lines (on `.` and `,`)
//! (3) for each line, for each ranked rule whose keyword is in the line:
//!       shuffle its decompositions, and for each one
//!         pick a reply template at random
//!         decompose the line  -> no match: next decomposition
//!         post-transform each fragment
//!         reassemble          -> too many leftovers: next decomposition
//!                             -> success: done
//! (4) nothing succeeded       -> "..."
//! ```
//!
//! Every failure inside the ladder is an ordinary negative result that moves
//! the search on; nothing is surfaced to the caller as an error.
//!
//! ## Pre-transformation
//!
//! The `pre` substitutions are always computed, but by default the searched
//! text is the untransformed (lower cased) input and the substituted string is
//! discarded. Enable [`RuleEngine::set_apply_pre_transform`] to search the
//! substituted text instead.
//!
//! ## Randomness
//!
//! Every random choice is drawn from the [`RandomSource`] passed to the parse
//! call, in a fixed order: the decomposition permutation for a (line, rule)
//! pair first, then one reply pick per decomposition visited.

use super::compiled_rules::{CompiledRule, CompiledScript};
use super::metrics::{Attempt, AttemptOutcome, Parse, ParseDetails, ParsePath, record};
use super::random::RandomSource;
use super::ranking::rank_keywords;
use super::reassemble::fill;
use crate::NOT_READY;
use crate::script::Script;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Reply used when keywords were found but no rule produced a reply.
pub const UNRESOLVED: &str = "...";

/// The rule engine for one loaded script.
///
/// The compiled script sits behind an `Arc`: [`load_script`](Self::load_script)
/// compiles the new script completely and then swaps the pointer, and every
/// parse reads the pointer once at its start.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    script: Option<Arc<CompiledScript>>,
    apply_pre_transform: bool,
}

impl RuleEngine {
    /// An engine with no script; every parse answers [`NOT_READY`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Script) -> Self {
        let mut engine = Self::new();
        engine.load_script(script);
        engine
    }

    /// Compile `script` and make it the active script, replacing any previous
    /// one as a whole.
    pub fn load_script(&mut self, script: Script) {
        self.load_compiled(Arc::new(CompiledScript::new(script)));
    }

    /// Activate an already compiled script (it may be shared between engines).
    pub fn load_compiled(&mut self, compiled: Arc<CompiledScript>) {
        self.script = Some(compiled);
    }

    pub fn is_ready(&self) -> bool {
        self.script.is_some()
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_deref().map(CompiledScript::script)
    }

    pub fn compiled(&self) -> Option<Arc<CompiledScript>> {
        self.script.clone()
    }

    pub fn set_apply_pre_transform(&mut self, apply: bool) {
        self.apply_pre_transform = apply;
    }

    pub fn applies_pre_transform(&self) -> bool {
        self.apply_pre_transform
    }

    /// Produce a reply for `input`. Never fails; the worst case is `"..."`.
    pub fn parse<R: RandomSource>(&self, input: &str, rng: &mut R) -> String {
        self.parse_detailed(input, rng).text
    }

    /// Like [`parse`](Self::parse), also reporting which path produced the reply.
    pub fn parse_detailed<R: RandomSource>(&self, input: &str, rng: &mut R) -> Parse {
        self.run(input, rng, None)
    }

    /// Parse and record a full trace of the search.
    pub fn parse_verbose<R: RandomSource>(&self, input: &str, rng: &mut R) -> (Parse, ParseDetails) {
        let started = Instant::now();
        let mut details = ParseDetails::default();
        let parse = self.run(input, rng, Some(&mut details));
        details.elapsed = started.elapsed();
        (parse, details)
    }

    fn run<R: RandomSource>(&self, input: &str, rng: &mut R, mut trace: Option<&mut ParseDetails>) -> Parse {
        let Some(compiled) = self.script.as_deref() else {
            return Parse { text: NOT_READY.to_string(), path: ParsePath::NotReady };
        };

        let input = input.to_lowercase();
        let ranked = rank_keywords(&compiled.rules, &input);
        if let Some(details) = trace.as_deref_mut() {
            details.ranked = ranked.iter().map(|rule| rule.keyword.clone()).collect();
        }

        if ranked.is_empty() {
            debug!(input = %input, "no keywords found, answering neutrally");
            let text = rng.pick(&compiled.script().neutral).cloned().unwrap_or_else(|| UNRESOLVED.to_string());
            return Parse { text, path: ParsePath::Neutral };
        }
        debug!(keywords = ?ranked.iter().map(|r| r.keyword.as_str()).collect::<Vec<_>>(), "keywords found");

        let transformed = compiled.pre.substitute(&input);
        let searched = if self.apply_pre_transform {
            transformed
        } else {
            trace!(discarded = %transformed, "pre transformation not applied");
            input
        };

        let lines: Vec<&str> = searched.split(['.', ',']).map(str::trim).collect();
        if let Some(details) = trace.as_deref_mut() {
            details.searched = searched.clone();
            details.lines = lines.iter().map(|line| line.to_string()).collect();
        }

        for line in &lines {
            for rule in &ranked {
                if !rule.occurs_in(line) {
                    continue;
                }
                debug!(keyword = %rule.keyword, line, "keyword found in line");
                if let Some(text) = transform(compiled, line, rule, rng, &mut trace) {
                    return Parse { text, path: ParsePath::Reassembled };
                }
            }
        }

        debug!("no rule produced a reply");
        Parse { text: UNRESOLVED.to_string(), path: ParsePath::Unresolved }
    }
}

/// Try the decompositions of `rule` against `line` in random order.
fn transform<R: RandomSource>(
    compiled: &CompiledScript,
    line: &str,
    rule: &CompiledRule,
    rng: &mut R,
    trace: &mut Option<&mut ParseDetails>,
) -> Option<String> {
    let order = rng.permutation(rule.decompositions.len());
    let line = line.trim_end_matches(['!', '?', '.']);

    for index in order {
        let decomposition = &rule.decompositions[index];
        let template = rng.pick(&decomposition.replies);
        let decomposer = &decomposition.decomposer;
        trace!(pattern = decomposer.pattern(), template = ?template, "trying decomposition");

        let attempt = |fragments: &[String], outcome: AttemptOutcome| Attempt {
            line: line.to_string(),
            keyword: rule.keyword.clone(),
            decomposition: index,
            pattern: decomposer.pattern().to_string(),
            regex: decomposer.regex_source().map(str::to_string),
            template: template.cloned(),
            fragments: fragments.to_vec(),
            outcome,
        };

        let Some(fragments) = decomposer.decompose(line) else {
            record(trace, || attempt(&[], AttemptOutcome::NoMatch));
            continue;
        };
        let fragments: Vec<String> = fragments.iter().map(|fragment| compiled.post.substitute(fragment)).collect();
        debug!(pattern = decomposer.pattern(), fragments = ?fragments, "decomposed");

        let Some(template) = template else {
            record(trace, || attempt(&fragments, AttemptOutcome::NoReplies));
            continue;
        };

        let filled = fill(&fragments, template);
        if filled.accepted() {
            debug!(reply = %filled.text, "reassembled");
            record(trace, || attempt(&fragments, AttemptOutcome::Accepted));
            return Some(filled.text);
        }
        record(trace, || attempt(&fragments, AttemptOutcome::Incomplete { unresolved: filled.unresolved }));
    }

    None
}
