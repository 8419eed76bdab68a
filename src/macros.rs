/// A lazily compiled, process-wide `Regex` for a literal pattern.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`KeywordRule`](crate::KeywordRule) inline.
///
/// ```
/// use eloquence::keyword;
///
/// let rule = keyword! {
///     keyword: "ik",
///     rank: 5,
///     decompositions: [
///         "ik ben *" => ["Waarom ben je (1)?", "Hoe lang ben je al (1)?"],
///         "*" => ["Vertel meer over jezelf."],
///     ],
/// };
/// assert_eq!(rule.decompositions.len(), 2);
/// ```
#[macro_export]
macro_rules! keyword {
    (
        keyword: $keyword:expr
        $(, rank: $rank:expr)?
        , decompositions: [ $( $pattern:expr => [ $($reply:expr),* $(,)? ] ),* $(,)? ]
        $(,)?
    ) => {{
        $crate::KeywordRule {
            keyword: ::std::string::String::from($keyword),
            rank: { 0 $(+ $rank)? },
            decompositions: vec![ $(
                $crate::Decomposition {
                    pattern: ::std::string::String::from($pattern),
                    replies: vec![ $( $crate::ReplyTemplate::from($reply) ),* ],
                }
            ),* ],
        }
    }};
}
