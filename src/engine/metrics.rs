//! Parse traces.
//!
//! [`RuleEngine::parse`](super::RuleEngine::parse) only returns the reply.
//! [`RuleEngine::parse_verbose`](super::RuleEngine::parse_verbose) additionally
//! records what the search did: which keywords ranked, which lines were
//! searched, and every (line, keyword, decomposition) attempt with its result.
//! The trace is opt-in so the normal path does not allocate it.

use std::time::Duration;

/// How the engine arrived at its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePath {
    /// No script is loaded.
    NotReady,
    /// No keyword occurred in the input; a neutral line was chosen.
    Neutral,
    /// A decomposition matched and its reply was assembled.
    Reassembled,
    /// Keywords occurred but no decomposition produced a reply.
    Unresolved,
}

/// The reply produced for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub text: String,
    pub path: ParsePath,
}

/// Result of trying one decomposition against one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The decomposition pattern did not match the line.
    NoMatch,
    /// The decomposition has no reply templates.
    NoReplies,
    /// The chosen template left too many placeholders unresolved.
    Incomplete { unresolved: usize },
    /// The reply was assembled and returned.
    Accepted,
}

/// One decomposition attempt.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub line: String,
    pub keyword: String,
    /// Index of the decomposition within its keyword rule.
    pub decomposition: usize,
    pub pattern: String,
    pub regex: Option<String>,
    pub template: Option<String>,
    /// Fragments after the `post` transformation.
    pub fragments: Vec<String>,
    pub outcome: AttemptOutcome,
}

/// Everything recorded by a verbose parse.
#[derive(Debug, Clone, Default)]
pub struct ParseDetails {
    pub elapsed: Duration,
    /// Matching keywords, in the order they were tried.
    pub ranked: Vec<String>,
    /// The text that was split into lines (lower cased input, possibly
    /// pre-transformed).
    pub searched: String,
    pub lines: Vec<String>,
    pub attempts: Vec<Attempt>,
}

/// Record an attempt if a trace is being collected.
pub(crate) fn record(trace: &mut Option<&mut ParseDetails>, attempt: impl FnOnce() -> Attempt) {
    if let Some(details) = trace.as_deref_mut() {
        details.attempts.push(attempt());
    }
}
