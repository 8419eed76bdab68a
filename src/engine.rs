//! Keyword decomposition/reassembly engine.
//!
//! This module is the entry point for the rule engine. The parts live in
//! focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! Script ──┐
//!          │  CompiledScript::new             (compiled_rules.rs)
//!          │    - keyword matchers            (pattern.rs)
//!          │    - anchored decomposers        (decompose.rs)
//!          │    - pre/post substitutors       (substitute.rs)
//!          └───────────────┬──────────────
//!                          │
//! input ── rank_keywords ──┤                  (ranking.rs)
//!                          v
//!                RuleEngine::parse            (parser.rs)
//!                  - split into lines
//!                  - shuffle decompositions   (random.rs)
//!                  - decompose, post-transform
//!                  - reassemble               (reassemble.rs)
//!                          │
//!                          v
//!                  reply (+ optional trace)   (metrics.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `pattern.rs`: the pattern mini-language (`*`, `@word`) and its rendering
//!   into regex syntax; whole-word matching.
//! - `substitute.rs`: whole-word, case-insensitive word substitution applied
//!   right to left.
//! - `compiled_rules.rs`: compiles a `Script` once per load.
//! - `ranking.rs`: finds the keyword rules present in an input, by rank.
//! - `decompose.rs`: anchored decomposition matching and fragment capture.
//! - `reassemble.rs`: placeholder filling and the acceptance threshold.
//! - `parser.rs`: the search over lines, rules and decompositions.
//! - `random.rs`: the injectable random source.
//! - `metrics.rs`: opt-in parse traces.
//!
//! ## Debugging
//!
//! The engine logs through `tracing`; run the binary with
//! `ELOQUENCE_LOG=eloquence=debug` (or `trace`) to follow a search.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/decompose.rs"]
mod decompose;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/pattern.rs"]
pub mod pattern;
#[path = "engine/random.rs"]
mod random;
#[path = "engine/ranking.rs"]
mod ranking;
#[path = "engine/reassemble.rs"]
mod reassemble;
#[path = "engine/substitute.rs"]
mod substitute;

pub use compiled_rules::{CompiledDecomposition, CompiledRule, CompiledScript};
pub use decompose::Decomposer;
pub use metrics::{Attempt, AttemptOutcome, Parse, ParseDetails, ParsePath};
pub use parser::{RuleEngine, UNRESOLVED};
pub use random::{RandomSource, RngSource};
pub use ranking::rank_keywords;
pub use reassemble::{Filled, MAX_UNRESOLVED, fill};
pub use substitute::{Span, Substitutor, apply_spans, substitute};

#[cfg(test)]
pub(crate) use random::testing;
