//! A keyword decomposition/reassembly conversation engine.
//!
//! Replies are produced the way the early pattern-matching dialogue programs
//! did it: find the highest ranked keyword in the input, match one of its
//! decomposition patterns against the sentence, and pour the captured
//! fragments into a scripted reply template. Inputs without a usable keyword
//! get a neutral prompt.
//!
//! ```
//! use eloquence::{Conversation, Options, Script};
//!
//! let mut elsa = Conversation::new(Options::default());
//! elsa.load_script(Script::builtin("nl").unwrap());
//!
//! println!("{}", elsa.greet());
//! println!("{}", elsa.respond("Ik ben vandaag erg moe."));
//! ```
//!
//! The rules come from a [`Script`] (see `scripts/*.json` for the bundled
//! locales). The engine itself lives in [`engine`]; [`Conversation`] wraps
//! it with repetition detection ([`RecallMemory`]) and blank-input handling.

extern crate self as eloquence;

#[macro_use]
mod macros;
mod api;
pub mod engine;
pub mod memory;
pub mod script;


pub use api::{
    Conversation, DEFAULT_LOCALE, Features, NOT_READY, Options, Response, ResponseKind, parse, parse_with,
};
pub use engine::{
    Attempt, AttemptOutcome, Parse, ParseDetails, ParsePath, RandomSource, RngSource, RuleEngine, UNRESOLVED,
};
pub use memory::{MemoryEntry, RecallMemory, edit_distance};
pub use script::{
    BUILTIN_LOCALES, Decomposition, KeywordRule, ReplyTemplate, Script, ScriptError, Substitutions, SynonymSet,
    Transformations,
};
