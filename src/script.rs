//! Script documents.
//!
//! A [`Script`] is the immutable rule document for one locale: scripted
//! openers and fallbacks, synonym sets, word transformations and the keyword
//! catalog. Scripts are plain data; the engine compiles them into regex form
//! when they are loaded (see `engine/compiled_rules.rs`).
//!
//! The JSON shape accepted here is the one the bundled `scripts/*.json`
//! files use:
//!
//! ```text
//! {
//!   "greetings": [..], "neutral": [..], "empty": [..], "repeated": [..],
//!   "synonyms": [["moeder", "vader", ..], ..],
//!   "transformations": { "pre": { "word": "replacement" }, "post": { .. } },
//!   "script": [
//!     { "keyword": "ik", "ranking": 5,
//!       "rules": [ { "decompositionRule": "* ik ben *",
//!                    "assemblyRules": [ { "rule": "Waarom ben je (2)?" } ] } ] }
//!   ]
//! }
//! ```
//!
//! The Rust field names (`entries`, `rank`, `decompositions`, `pattern`,
//! `replies`, `template`) are accepted as well.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a script document.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no bundled script for locale '{0}'")]
    UnknownLocale(String),
}

/// Locales shipped inside the crate.
pub const BUILTIN_LOCALES: &[&str] = &["nl", "en"];

/// The rule document for one locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub greetings: Vec<String>,
    #[serde(default)]
    pub neutral: Vec<String>,
    #[serde(default)]
    pub empty: Vec<String>,
    #[serde(default)]
    pub repeated: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<SynonymSet>,
    #[serde(default)]
    pub transformations: Transformations,
    #[serde(default, alias = "script")]
    pub entries: Vec<KeywordRule>,
}

impl Script {
    /// Parse a script from a JSON document.
    pub fn from_json(document: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Read and parse a script from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|source| ScriptError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&document)
    }

    /// Load one of the scripts bundled with the crate (see [`BUILTIN_LOCALES`]).
    pub fn builtin(locale: &str) -> Result<Self, ScriptError> {
        let document = match locale {
            "nl" => include_str!("../scripts/nl.json"),
            "en" => include_str!("../scripts/en.json"),
            other => return Err(ScriptError::UnknownLocale(other.to_string())),
        };
        Self::from_json(document)
    }
}

/// A trigger word with its priority and decomposition rules.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    #[serde(default, alias = "ranking")]
    pub rank: i32,
    #[serde(default, alias = "rules")]
    pub decompositions: Vec<Decomposition>,
}

/// A wildcard pattern and the replies that can be assembled from its fragments.
#[derive(Debug, Clone, Deserialize)]
pub struct Decomposition {
    #[serde(alias = "decompositionRule")]
    pub pattern: String,
    #[serde(default, alias = "assemblyRules")]
    pub replies: Vec<ReplyTemplate>,
}

/// A reply skeleton with positional `(1)`, `(2)`, .. placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyTemplate {
    #[serde(alias = "rule")]
    pub template: String,
}

impl From<&str> for ReplyTemplate {
    fn from(template: &str) -> Self {
        ReplyTemplate { template: template.to_string() }
    }
}

/// A group of interchangeable words, referenced from patterns as `@word`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SynonymSet {
    pub words: Vec<String>,
}

impl SynonymSet {
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// The set `name` refers to. Sets are unnamed word lists, so any member
    /// names its set; when a word is listed in several sets the first wins.
    pub fn lookup<'s>(sets: &'s [SynonymSet], name: &str) -> Option<&'s SynonymSet> {
        sets.iter().find(|set| set.contains(name))
    }
}

impl<S: Into<String>> FromIterator<S> for SynonymSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SynonymSet { words: iter.into_iter().map(Into::into).collect() }
    }
}

/// Word substitutions applied before searching (`pre`) and to decomposed
/// fragments (`post`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transformations {
    #[serde(default)]
    pub pre: Substitutions,
    #[serde(default)]
    pub post: Substitutions,
}

/// An ordered `word -> replacement` mapping.
///
/// Document order is kept: when two trigger words overlap in a sentence the
/// later occurrence wins, and of two occurrences starting at the same place
/// the word registered first wins (see `engine/substitute.rs`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(word, replacement)| (word.as_str(), replacement.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Substitutions { pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl<'de> Deserialize<'de> for Substitutions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMap;

        impl<'de> Visitor<'de> for OrderedMap {
            type Value = Substitutions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of words to replacement words")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((word, replacement)) = access.next_entry::<String, String>()? {
                    pairs.push((word, replacement));
                }
                Ok(Substitutions { pairs })
            }
        }

        deserializer.deserialize_map(OrderedMap)
    }
}
