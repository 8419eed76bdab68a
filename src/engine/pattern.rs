//! Pattern mini-language compiler.
//!
//! Script patterns are written in a tiny declarative language:
//!
//! - `*` is a wildcard that captures free text,
//! - `@word` references the synonym set containing `word`,
//! - everything else is literal text.
//!
//! Compilation happens in two steps so the mini-language stays independent of
//! the regex dialect:
//!
//! ```text
//! "* mijn @moeder *"
//!     │ tokenize
//!     v
//! [Wildcard, Literal("mijn "), Synonym("moeder"), Wildcard]
//!     │ render (synonym catalog)
//!     v
//! "(.*)mijn (moeder|vader)(.*)"
//! ```
//!
//! Wildcards and resolved synonym references render as capture groups; literal
//! text never captures. A reference to a word that is in no synonym set stays
//! literal text (`@word` must then appear verbatim).

use crate::script::SynonymSet;
use regex::{Match, Regex, RegexBuilder};

/// One element of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    Literal(String),
    Synonym(String),
    Wildcard,
}

/// Wildcard capture used between pattern segments.
const WILDCARD_CAPTURE: &str = "(.*)";

/// Parse a decomposition pattern into tokens.
///
/// The pattern is split on `*`; each segment between wildcards is trimmed
/// before it is tokenized, so `"ik ben *"` and `"ik ben*"` are equivalent.
pub fn tokenize(pattern: &str) -> Vec<PatternToken> {
    let mut tokens = Vec::new();
    for (idx, segment) in pattern.trim().split('*').enumerate() {
        if idx > 0 {
            tokens.push(PatternToken::Wildcard);
        }
        tokens.extend(tokenize_segment(segment.trim()));
    }
    tokens
}

/// Tokenize text that contains no wildcards (a keyword or a pattern segment).
pub fn tokenize_segment(segment: &str) -> Vec<PatternToken> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = segment.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c != '@' {
            literal.push(c);
            continue;
        }

        let name_start = idx + c.len_utf8();
        let mut name_end = name_start;
        while let Some(&(next_idx, next)) = chars.peek() {
            if !is_word_char(next) {
                break;
            }
            name_end = next_idx + next.len_utf8();
            chars.next();
        }

        if name_end == name_start {
            literal.push('@');
            continue;
        }

        if !literal.is_empty() {
            tokens.push(PatternToken::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(PatternToken::Synonym(segment[name_start..name_end].to_string()));
    }

    if !literal.is_empty() {
        tokens.push(PatternToken::Literal(literal));
    }
    tokens
}

/// Render tokens into regex syntax, resolving synonym references against
/// `synonyms`.
pub fn render(tokens: &[PatternToken], synonyms: &[SynonymSet]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            PatternToken::Literal(text) => out.push_str(&escape(text)),
            PatternToken::Wildcard => out.push_str(WILDCARD_CAPTURE),
            PatternToken::Synonym(name) => match SynonymSet::lookup(synonyms, name) {
                Some(set) => out.push_str(&alternation(set)),
                None => {
                    out.push_str(&escape("@"));
                    out.push_str(&escape(name));
                }
            },
        }
    }
    out
}

/// Replace every `@word` marker in `fragment` with a capturing alternation of
/// its synonym set; all other text is escaped.
pub fn expand_synonyms(fragment: &str, synonyms: &[SynonymSet]) -> String {
    render(&tokenize_segment(fragment), synonyms)
}

/// Escape `text` for literal use inside a regex.
pub fn escape(text: &str) -> String {
    regex::escape(text)
}

fn alternation(set: &SynonymSet) -> String {
    let words: Vec<String> = set.words.iter().map(|w| escape(w)).collect();
    format!("({})", words.join("|"))
}

/// Word characters, as the regex `\w` class defines them.
pub fn is_word_char(c: char) -> bool {
    let mut buf = [0; 4];
    regex!(r"^\w$").is_match(c.encode_utf8(&mut buf))
}

/// Compile `source` so it only matches where it is flanked by non-word
/// characters or string edges. The word itself is capture group 1.
///
/// The boundaries are part of the regex, so when one alternative of `source`
/// hits only part of a word the engine backtracks into the others
/// (`(droom|droomde)` still finds `droomde`).
pub fn whole_word_regex(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"(?:^|[^\w])({source})(?:[^\w]|$)")).case_insensitive(true).build()
}

/// All non-empty, non-overlapping whole-word matches of a regex built by
/// [`whole_word_regex`].
///
/// Each search resumes right after the previous word, so the separator that
/// closed one word can open the next.
pub fn whole_word_matches<'h>(re: &Regex, haystack: &'h str) -> Vec<Match<'h>> {
    let mut found = Vec::new();
    let mut at = 0;

    while at <= haystack.len() {
        let Some(word) = re.captures_at(haystack, at).and_then(|caps| caps.get(1)) else {
            break;
        };
        if word.is_empty() {
            at = word.start() + haystack[word.start()..].chars().next().map_or(1, char::len_utf8);
        } else {
            at = word.end();
            found.push(word);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> Vec<SynonymSet> {
        vec![
            ["moeder", "vader", "zus"].into_iter().collect(),
            ["blij", "vrolijk"].into_iter().collect(),
            ["c++", "rust"].into_iter().collect(),
        ]
    }

    #[test]
    fn tokenize_splits_wildcards_and_trims_segments() {
        assert_eq!(
            tokenize("ik ben *"),
            vec![PatternToken::Literal("ik ben".into()), PatternToken::Wildcard]
        );
        assert_eq!(
            tokenize("* mijn @moeder *"),
            vec![
                PatternToken::Wildcard,
                PatternToken::Literal("mijn ".into()),
                PatternToken::Synonym("moeder".into()),
                PatternToken::Wildcard,
            ]
        );
        assert_eq!(tokenize("*"), vec![PatternToken::Wildcard]);
    }

    #[test]
    fn lone_at_sign_is_literal() {
        assert_eq!(tokenize_segment("mail @ mij"), vec![PatternToken::Literal("mail @ mij".into())]);
    }

    #[test]
    fn render_expands_known_synonyms() {
        let rendered = render(&tokenize("* mijn @moeder *"), &family());
        assert_eq!(rendered, "(.*)mijn (moeder|vader|zus)(.*)");
    }

    #[test]
    fn unknown_synonym_stays_literal() {
        let rendered = expand_synonyms("@fiets", &family());
        let re = Regex::new(&format!("^{rendered}$")).unwrap();
        assert!(re.is_match("@fiets"));
        assert!(!re.is_match("fiets"));
    }

    #[test]
    fn every_marker_is_resolved_independently() {
        let rendered = expand_synonyms("@moeder is @blij", &family());
        assert_eq!(rendered, "(moeder|vader|zus) is (blij|vrolijk)");
    }

    #[test]
    fn synonym_words_are_escaped() {
        let rendered = expand_synonyms("ik hou van @rust", &family());
        let re = Regex::new(&format!("^{rendered}$")).unwrap();
        assert!(re.is_match("ik hou van c++"));
        assert!(!re.is_match("ik hou van cc"));
    }

    #[test]
    fn literal_metacharacters_are_escaped() {
        let rendered = render(&tokenize("wat (is) dat? *"), &[]);
        let re = Regex::new(&format!("^{rendered}$")).unwrap();
        assert!(re.is_match("wat (is) dat? nou"));
    }

    fn starts(re: &Regex, text: &str) -> Vec<(usize, usize)> {
        whole_word_matches(re, text).iter().map(|m| (m.start(), m.end())).collect()
    }

    #[test]
    fn whole_word_matches_skip_partial_words() {
        let re = whole_word_regex("fiets").unwrap();
        assert_eq!(starts(&re, "fietsen en een Fiets"), vec![(15, 20)]);
    }

    #[test]
    fn whole_word_matches_recover_after_rejected_candidate() {
        let re = whole_word_regex("ab ab").unwrap();
        assert_eq!(starts(&re, "xab ab ab"), vec![(4, 9)]);
    }

    #[test]
    fn adjacent_words_share_a_separator() {
        let re = whole_word_regex("ik").unwrap();
        assert_eq!(starts(&re, "ik ik,ik"), vec![(0, 2), (3, 5), (6, 8)]);
    }

    #[test]
    fn later_alternative_is_tried_when_earlier_one_is_a_prefix() {
        let dreams: SynonymSet = ["droom", "dromen", "droomde"].into_iter().collect();
        let source = expand_synonyms("@droom", &[dreams]);
        let re = whole_word_regex(&source).unwrap();
        assert_eq!(starts(&re, "ik droomde"), vec![(3, 10)]);
        assert!(starts(&re, "ik droomt").is_empty());
    }

    #[test]
    fn whole_word_handles_multibyte_neighbours() {
        let re = whole_word_regex("cafe").unwrap();
        assert!(whole_word_matches(&re, "écafe").is_empty());
        assert_eq!(whole_word_matches(&re, "naar het cafe!").len(), 1);
    }

    #[test]
    fn word_chars_follow_the_regex_class() {
        assert!(is_word_char('a'));
        assert!(is_word_char('é'));
        assert!(is_word_char('7'));
        assert!(is_word_char('_'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('-'));
        assert!(!is_word_char('\''));
    }
}
