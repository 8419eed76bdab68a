//! Whole-word substitution.
//!
//! Transformations (`pre` / `post` in a script) swap words such as `mijn` for
//! `jouw`. Occurrences are located first and collected as spans, then applied
//! from the end of the sentence toward the start, so every offset that has not
//! been applied yet still points into unchanged text:
//!
//! ```text
//! "ik zie mijn fiets"      spans: (7, "mijn" -> "jouw"), (0, "ik" -> "jij")
//!  ^      ^                apply 7 first, then 0
//! "jij zie jouw fiets"
//! ```
//!
//! Replacements may be longer or shorter than the word they replace. When two
//! spans overlap, the one starting later wins; for equal starts the word
//! registered first in the map wins. The loser is dropped.

use super::pattern::{escape, whole_word_matches, whole_word_regex};
use crate::script::Substitutions;
use regex::Regex;
use tracing::{trace, warn};

/// A pending replacement of `len` bytes at byte offset `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
    pub replacement: String,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A substitution map compiled to case-insensitive matchers.
#[derive(Debug, Clone, Default)]
pub struct Substitutor {
    words: Vec<(Regex, String)>,
}

impl Substitutor {
    pub fn new(substitutions: &Substitutions) -> Self {
        if substitutions.is_empty() {
            return Substitutor::default();
        }
        let words = substitutions
            .iter()
            .filter(|(word, _)| !word.is_empty())
            .filter_map(|(word, replacement)| match whole_word_regex(&escape(word)) {
                Ok(re) => Some((re, replacement.to_string())),
                Err(err) => {
                    warn!(word, error = %err, "skipping substitution that does not compile");
                    None
                }
            })
            .collect();
        Substitutor { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Every whole-word occurrence of every trigger word, sorted by start
    /// offset descending (ties keep registration order).
    pub fn find_spans(&self, sentence: &str) -> Vec<Span> {
        let mut spans: Vec<Span> = self
            .words
            .iter()
            .flat_map(|(re, replacement)| {
                whole_word_matches(re, sentence).into_iter().map(move |m| Span {
                    start: m.start(),
                    len: m.len(),
                    replacement: replacement.clone(),
                })
            })
            .collect();
        spans.sort_by(|a, b| b.start.cmp(&a.start));
        spans
    }

    /// Apply the map to `sentence`. Text outside matched words is untouched.
    pub fn substitute(&self, sentence: &str) -> String {
        if self.is_empty() {
            return sentence.to_string();
        }
        let spans = self.find_spans(sentence);
        let out = apply_spans(sentence, &spans);
        if !spans.is_empty() {
            trace!(input = sentence, output = %out, spans = spans.len(), "substituted");
        }
        out
    }
}

/// Apply spans sorted by descending start. Spans reaching into text that was
/// already replaced are skipped.
pub fn apply_spans(sentence: &str, spans: &[Span]) -> String {
    let mut out = sentence.to_string();
    let mut limit = sentence.len();

    for span in spans {
        if span.end() > limit {
            trace!(start = span.start, len = span.len, "dropping overlapping substitution");
            continue;
        }
        out.replace_range(span.start..span.end(), &span.replacement);
        limit = span.start;
    }

    out
}

/// Compile `substitutions` and apply them to `sentence` in one go.
pub fn substitute(substitutions: &Substitutions, sentence: &str) -> String {
    Substitutor::new(substitutions).substitute(sentence)
}
