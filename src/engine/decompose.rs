//! Decomposition matching.
//!
//! A decomposition pattern such as `"* ik ben *"` is compiled (see
//! `pattern.rs`) into a case-insensitive regex anchored at both ends, so the
//! pattern has to account for the *whole* sentence. Captured fragments come
//! back in pattern order, trimmed:
//!
//! ```text
//! pattern:  "* ik ben *"       ->  ^(.*)ik ben(.*)$
//! sentence: "nou ik ben moe"   ->  ["nou", "moe"]
//! ```
//!
//! Not matching is an ordinary outcome that drives backtracking in the rule
//! engine, so it is reported as `None` rather than an error.

use super::pattern::{render, tokenize};
use crate::script::SynonymSet;
use regex::{Regex, RegexBuilder};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Decomposer {
    pattern: String,
    regex: Option<Regex>,
}

impl Decomposer {
    /// Compile `pattern`, resolving `@word` references against `synonyms`.
    pub fn compile(pattern: &str, synonyms: &[SynonymSet]) -> Self {
        let source = format!("^{}$", render(&tokenize(pattern), synonyms));
        let regex = match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(pattern, error = %err, "decomposition pattern does not compile");
                None
            }
        };
        Decomposer { pattern: pattern.to_string(), regex }
    }

    /// The pattern as written in the script.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled regex source, if the pattern compiled.
    pub fn regex_source(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// Match the whole `sentence`, returning the captured fragments.
    pub fn decompose(&self, sentence: &str) -> Option<Vec<String>> {
        let caps = self.regex.as_ref()?.captures(sentence)?;
        Some(caps.iter().skip(1).map(|group| group.map_or("", |m| m.as_str()).trim().to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> Vec<SynonymSet> {
        vec![["moeder", "vader"].into_iter().collect()]
    }

    #[test]
    fn trailing_wildcard_yields_one_fragment() {
        let d = Decomposer::compile("ik ben *", &[]);
        assert_eq!(d.decompose("ik ben moe"), Some(vec!["moe".to_string()]));
    }

    #[test]
    fn pattern_must_cover_whole_sentence() {
        let d = Decomposer::compile("ik ben *", &[]);
        assert_eq!(d.decompose("jij bent moe"), None);
        assert_eq!(d.decompose("nou ik ben moe"), None);
    }

    #[test]
    fn synonym_references_capture() {
        let d = Decomposer::compile("* mijn @moeder *", &family());
        assert_eq!(
            d.decompose("ik denk dat mijn vader boos is"),
            Some(vec!["ik denk dat".to_string(), "vader".to_string(), "boos is".to_string()])
        );
        assert_eq!(d.regex_source(), Some("^(.*)mijn (moeder|vader)(.*)$"));
    }

    #[test]
    fn matching_ignores_case() {
        let d = Decomposer::compile("* ik ben *", &[]);
        assert_eq!(d.decompose("Nou IK BEN Moe"), Some(vec!["Nou".to_string(), "Moe".to_string()]));
    }

    #[test]
    fn empty_wildcards_capture_empty_fragments() {
        let d = Decomposer::compile("* ik ben *", &[]);
        assert_eq!(d.decompose("ik ben"), Some(vec![String::new(), String::new()]));
    }

    #[test]
    fn pattern_without_wildcards_captures_nothing() {
        let d = Decomposer::compile("hallo", &[]);
        assert_eq!(d.decompose("hallo"), Some(Vec::new()));
        assert_eq!(d.pattern(), "hallo");
    }
}
