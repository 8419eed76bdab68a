use crate::engine::{CompiledScript, ParseDetails, ParsePath, RandomSource, RngSource, RuleEngine, UNRESOLVED};
use crate::memory::{DEFAULT_CAPACITY, RecallMemory};
use crate::script::{Script, ScriptError};
use once_cell::sync::Lazy;
use rand::rngs::ThreadRng;
use std::sync::Arc;
use tracing::{debug, info};

/// Reply given while no script is loaded.
pub const NOT_READY: &str = "I don't know how to respond yet. Give me a moment.";

/// Locale used by [`parse`] and by the binary when none is given.
pub const DEFAULT_LOCALE: &str = "nl";

static DEFAULT_SCRIPT: Lazy<Option<Arc<CompiledScript>>> = Lazy::new(|| match Script::builtin(DEFAULT_LOCALE) {
    Ok(script) => Some(Arc::new(CompiledScript::new(script))),
    Err(err) => {
        tracing::error!(error = %err, "bundled script failed to load");
        None
    }
});

bitflags::bitflags! {
    /// Optional behaviours of a [`Conversation`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u8 {
        /// Answer from the script's `repeated` lines when the user repeats a
        /// recent input.
        const REPETITION_DETECTION = 1 << 0;
        /// Search the `pre`-transformed input instead of discarding the
        /// transformation.
        const APPLY_PRE_TRANSFORM  = 1 << 1;
    }
}

impl Default for Features {
    fn default() -> Self {
        Features::REPETITION_DETECTION
    }
}

/// Options that configure a [`Conversation`].
#[derive(Debug, Clone)]
pub struct Options {
    /// Number of recent exchanges kept for repetition detection.
    pub memory_capacity: usize,
    pub features: Features,
}

impl Default for Options {
    fn default() -> Self {
        Options { memory_capacity: DEFAULT_CAPACITY, features: Features::default() }
    }
}

/// Which rung of the fallback ladder produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    NotReady,
    Repeated,
    Empty,
    Neutral,
    Parsed,
    /// Keywords were found but no rule produced a reply (`"..."`).
    Unparsed,
}

impl From<ParsePath> for ResponseKind {
    fn from(path: ParsePath) -> Self {
        match path {
            ParsePath::NotReady => ResponseKind::NotReady,
            ParsePath::Neutral => ResponseKind::Neutral,
            ParsePath::Reassembled => ResponseKind::Parsed,
            ParsePath::Unresolved => ResponseKind::Unparsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub kind: ResponseKind,
}

/// A conversation: the rule engine plus everything that happens around a
/// parse (repetition detection, blank input, transcripts).
///
/// Turns are taken through `&mut self`, so they are serialized by
/// construction.
#[derive(Debug)]
pub struct Conversation<R = RngSource<ThreadRng>> {
    engine: RuleEngine,
    memory: RecallMemory,
    features: Features,
    rng: R,
    user_history: Vec<String>,
    bot_history: Vec<String>,
}

impl Conversation {
    /// A conversation without a script, drawing from the thread-local generator.
    pub fn new(options: Options) -> Self {
        Conversation::with_rng(options, RngSource::thread())
    }
}

impl<R: RandomSource> Conversation<R> {
    pub fn with_rng(options: Options, rng: R) -> Self {
        let mut engine = RuleEngine::new();
        engine.set_apply_pre_transform(options.features.contains(Features::APPLY_PRE_TRANSFORM));
        Conversation {
            engine,
            memory: RecallMemory::with_capacity(options.memory_capacity),
            features: options.features,
            rng,
            user_history: Vec::new(),
            bot_history: Vec::new(),
        }
    }

    /// Replace the active script.
    pub fn load_script(&mut self, script: Script) {
        info!(entries = script.entries.len(), "loading script");
        self.engine.load_script(script);
    }

    /// Replace the active script with one of the bundled locales.
    pub fn load_locale(&mut self, locale: &str) -> Result<(), ScriptError> {
        let script = Script::builtin(locale)?;
        info!(locale, "loading bundled script");
        self.engine.load_script(script);
        Ok(())
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn memory(&self) -> &RecallMemory {
        &self.memory
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn user_history(&self) -> &[String] {
        &self.user_history
    }

    pub fn bot_history(&self) -> &[String] {
        &self.bot_history
    }

    /// Open the conversation with a scripted greeting.
    pub fn greet(&mut self) -> String {
        let Some(script) = self.engine.script() else {
            self.bot_history.push(NOT_READY.to_string());
            return NOT_READY.to_string();
        };
        let greeting = self.rng.pick(&script.greetings).cloned().unwrap_or_else(|| UNRESOLVED.to_string());
        self.bot_history.push(greeting.clone());
        greeting
    }

    pub fn respond(&mut self, input: &str) -> String {
        self.respond_detailed(input).text
    }

    pub fn respond_detailed(&mut self, input: &str) -> Response {
        self.react(input, false).0
    }

    /// Respond and return the engine trace when the input went through the
    /// rule engine.
    pub fn respond_verbose(&mut self, input: &str) -> (Response, Option<ParseDetails>) {
        self.react(input, true)
    }

    fn react(&mut self, input: &str, verbose: bool) -> (Response, Option<ParseDetails>) {
        self.user_history.push(input.to_string());

        let Some(script) = self.engine.script() else {
            self.bot_history.push(NOT_READY.to_string());
            return (Response { text: NOT_READY.to_string(), kind: ResponseKind::NotReady }, None);
        };

        let mut details = None;
        let response = if self.features.contains(Features::REPETITION_DETECTION) && self.memory.recall(input).is_some()
        {
            debug!(input, "input repeats a recent exchange");
            Response { text: pick_or_unresolved(&mut self.rng, &script.repeated), kind: ResponseKind::Repeated }
        } else if input.trim().is_empty() {
            Response { text: pick_or_unresolved(&mut self.rng, &script.empty), kind: ResponseKind::Empty }
        } else if verbose {
            let (parse, trace) = self.engine.parse_verbose(input, &mut self.rng);
            details = Some(trace);
            Response { text: parse.text, kind: parse.path.into() }
        } else {
            let parse = self.engine.parse_detailed(input, &mut self.rng);
            Response { text: parse.text, kind: parse.path.into() }
        };

        self.memory.remember(input, response.text.clone());
        self.bot_history.push(response.text.clone());
        (response, details)
    }
}

fn pick_or_unresolved<R: RandomSource>(rng: &mut R, lines: &[String]) -> String {
    rng.pick(lines).cloned().unwrap_or_else(|| UNRESOLVED.to_string())
}

/// Reply to `text` with the bundled Dutch script, without memory.
///
/// # Example
/// ```
/// use eloquence::parse;
///
/// let reply = parse("ik ben moe");
/// assert!(!reply.is_empty());
/// ```
pub fn parse(text: &str) -> String {
    parse_with(text, &mut RngSource::thread())
}

/// Like [`parse`], drawing random choices from `rng`.
pub fn parse_with<R: RandomSource>(text: &str, rng: &mut R) -> String {
    let mut engine = RuleEngine::new();
    if let Some(compiled) = DEFAULT_SCRIPT.as_ref() {
        engine.load_compiled(Arc::clone(compiled));
    }
    engine.parse(text, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::Scripted;

    fn script() -> Script {
        Script {
            greetings: vec!["Hallo, hoe gaat het?".into()],
            neutral: vec!["Ga door.".into()],
            empty: vec!["Zeg eens iets.".into()],
            repeated: vec!["Dat zei je net al.".into()],
            entries: vec![keyword! {
                keyword: "ik",
                rank: 1,
                decompositions: ["ik ben *" => ["Waarom ben je (1)?"]],
            }],
            ..Script::default()
        }
    }

    fn conversation(options: Options) -> Conversation<RngSource<rand::rngs::StdRng>> {
        let mut conversation = Conversation::with_rng(options, RngSource::seeded(5));
        conversation.load_script(script());
        conversation
    }

    #[test]
    fn without_script_every_turn_is_not_ready() {
        let mut conversation = Conversation::new(Options::default());
        assert_eq!(conversation.greet(), NOT_READY);

        let response = conversation.respond_detailed("ik ben moe");
        assert_eq!(response, Response { text: NOT_READY.to_string(), kind: ResponseKind::NotReady });
        assert!(conversation.memory().is_empty());
        assert_eq!(conversation.user_history(), ["ik ben moe"]);
        assert_eq!(conversation.bot_history(), [NOT_READY, NOT_READY]);
    }

    #[test]
    fn greeting_is_recorded() {
        let mut conversation = conversation(Options::default());
        assert_eq!(conversation.greet(), "Hallo, hoe gaat het?");
        assert_eq!(conversation.bot_history(), ["Hallo, hoe gaat het?"]);
    }

    #[test]
    fn parsed_reply_is_remembered() {
        let mut conversation = conversation(Options::default());
        let response = conversation.respond_detailed("ik ben moe");
        assert_eq!(response.text, "Waarom ben je moe?");
        assert_eq!(response.kind, ResponseKind::Parsed);
        assert_eq!(conversation.memory().recall("ik ben moe"), Some("Waarom ben je moe?"));
        assert_eq!(conversation.user_history(), ["ik ben moe"]);
    }

    #[test]
    fn blank_input_draws_from_empty_lines() {
        let mut conversation = conversation(Options::default());
        for input in ["", "   ", "\t"] {
            let response = conversation.respond_detailed(input);
            assert_eq!(response.text, "Zeg eens iets.");
            assert_eq!(response.kind, ResponseKind::Empty);
        }
    }

    #[test]
    fn repeated_input_draws_from_repeated_lines() {
        let mut conversation = conversation(Options::default());
        conversation.respond("ik ben moe");
        let response = conversation.respond_detailed("ik ben moe!");
        assert_eq!(response.text, "Dat zei je net al.");
        assert_eq!(response.kind, ResponseKind::Repeated);
    }

    #[test]
    fn repetition_detection_can_be_disabled() {
        let options = Options { features: Features::empty(), ..Options::default() };
        let mut conversation = conversation(options);
        conversation.respond("ik ben moe");
        assert_eq!(conversation.respond("ik ben moe"), "Waarom ben je moe?");
    }

    #[test]
    fn consecutive_empty_inputs_are_not_repeats() {
        let mut conversation = conversation(Options::default());
        conversation.respond("");
        let response = conversation.respond_detailed("");
        assert_eq!(response.kind, ResponseKind::Empty);
    }

    #[test]
    fn keywordless_input_is_neutral() {
        let mut conversation = conversation(Options::default());
        let response = conversation.respond_detailed("het regent");
        assert_eq!(response, Response { text: "Ga door.".to_string(), kind: ResponseKind::Neutral });
    }

    #[test]
    fn verbose_response_carries_trace() {
        let mut conversation = conversation(Options::default());
        let (response, details) = conversation.respond_verbose("ik ben moe");
        assert_eq!(response.kind, ResponseKind::Parsed);
        assert_eq!(details.map(|d| d.ranked), Some(vec!["ik".to_string()]));

        let (_, details) = conversation.respond_verbose("");
        assert!(details.is_none());
    }

    #[test]
    fn pre_transform_feature_reaches_engine() {
        let options = Options { features: Features::APPLY_PRE_TRANSFORM, ..Options::default() };
        let conversation = Conversation::with_rng(options, Scripted::default());
        assert!(conversation.engine().applies_pre_transform());
    }

    #[test]
    fn bundled_locale_loads() {
        let mut conversation = Conversation::with_rng(Options::default(), Scripted::default());
        conversation.load_locale("nl").unwrap();
        assert!(conversation.engine().is_ready());
        assert!(conversation.load_locale("xx").is_err());
    }

    #[test]
    fn parse_uses_bundled_script() {
        let reply = parse_with("ik ben moe", &mut RngSource::seeded(1));
        assert_ne!(reply, NOT_READY);
        assert!(!reply.is_empty());
    }
}
