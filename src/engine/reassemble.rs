//! Reply reassembly.
//!
//! Reply templates refer to decomposed fragments by position: `(1)` is the
//! first fragment, `(2)` the second, and so on. Fragments are inserted in
//! lower case. A template may reference at most one position the
//! decomposition did not produce; that placeholder is left in the reply as
//! written. Two or more unresolved placeholders reject the template.
//!
//! ```text
//! fragments: ["Moe"]
//! "Waarom ben je (1)?"        -> Some("Waarom ben je moe?")
//! "Ben je (1) door (2)?"      -> Some("Ben je moe door (2)?")
//! "Is (2) de reden voor (3)?" -> None
//! ```

/// Highest number of placeholders a reply may leave unresolved.
pub const MAX_UNRESOLVED: usize = 1;

/// Result of filling a template, before the acceptance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filled {
    pub text: String,
    pub unresolved: usize,
}

impl Filled {
    /// Whether the reply is acceptable (at most [`MAX_UNRESOLVED`] leftovers).
    pub fn accepted(&self) -> bool {
        self.unresolved <= MAX_UNRESOLVED
    }
}

/// Replace every `(i)` in `template` with fragment `i` (1-indexed, lower
/// cased) and count the placeholders that had no fragment.
///
/// Placeholders are resolved in a single pass over the template, so fragment
/// text that happens to look like a placeholder is never expanded.
pub fn fill(fragments: &[String], template: &str) -> Filled {
    let mut unresolved = 0;
    let text = regex!(r"\(([0-9]+)\)")
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let fragment = caps[1].parse::<usize>().ok().and_then(|i| i.checked_sub(1)).and_then(|i| fragments.get(i));
            match fragment {
                Some(fragment) => fragment.to_lowercase(),
                None => {
                    unresolved += 1;
                    caps[0].to_string()
                }
            }
        })
        .into_owned();
    Filled { text, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn reassemble(fragments: &[String], template: &str) -> Option<String> {
        let filled = fill(fragments, template);
        filled.accepted().then_some(filled.text)
    }

    #[test]
    fn fills_all_positions() {
        let out = reassemble(&fragments(&["Moe", "het werk"]), "Ben je (1) door (2)?");
        assert_eq!(out.as_deref(), Some("Ben je moe door het werk?"));
    }

    #[test]
    fn repeated_placeholder_is_filled_everywhere() {
        let out = reassemble(&fragments(&["moe"]), "(1)? Waarom (1)?");
        assert_eq!(out.as_deref(), Some("moe? Waarom moe?"));
    }

    #[test]
    fn tolerates_exactly_one_unresolved_placeholder() {
        let out = reassemble(&fragments(&["moe", "werk"]), "Ben je (1) door (2) of (3)?");
        assert_eq!(out.as_deref(), Some("Ben je moe door werk of (3)?"));
    }

    #[test]
    fn rejects_two_unresolved_placeholders() {
        assert_eq!(reassemble(&fragments(&["moe"]), "Is (2) de reden voor (3)?"), None);
        assert_eq!(reassemble(&[], "(1) en (1)"), None);
    }

    #[test]
    fn zero_index_is_never_resolved() {
        let filled = fill(&fragments(&["moe"]), "(0) (1)");
        assert_eq!(filled, Filled { text: "(0) moe".to_string(), unresolved: 1 });
    }

    #[test]
    fn fragment_text_is_not_reexpanded() {
        let out = reassemble(&fragments(&["(2)", "x"]), "(1) en (2)");
        assert_eq!(out.as_deref(), Some("(2) en x"));
    }

    #[test]
    fn template_without_placeholders_is_returned_unchanged() {
        assert_eq!(reassemble(&[], "Vertel eens meer.").as_deref(), Some("Vertel eens meer."));
    }
}
