//! Built-in rule modules and the default source stack
//!
//! Rules are grouped into named sources merged in a fixed order; a rule in
//! a later source overrides an earlier one with the same identifier, so the
//! `internal` source can shadow anything the community-style sources ship.

pub mod empty_alternatives;
pub mod inverted_assertions;
pub mod loop_jumps;
pub mod no_labels;
pub mod pseudo_random;
pub mod regex_complexity;

pub use empty_alternatives::{EmptyAlternatives, NO_EMPTY_ALTERNATIVES};
pub use inverted_assertions::{INVERTED_ASSERTION_ARGUMENTS, InvertedAssertions};
pub use loop_jumps::{LoopJumps, TOO_MANY_BREAK_OR_CONTINUE_IN_LOOP};
pub use no_labels::{NO_LABELS, NoLabels};
pub use pseudo_random::{PSEUDO_RANDOM, PseudoRandom};
pub use regex_complexity::{REGEX_COMPLEXITY, RegexComplexity};

use crate::registry::RuleSource;
use std::sync::Arc;

/// The default source stack, in override order
///
/// Later sources win ties, so ordering here is behavior, not taste.
pub fn default_sources() -> Vec<RuleSource> {
    vec![
        RuleSource::new("external", vec![Arc::new(NoLabels), Arc::new(PseudoRandom)]),
        RuleSource::new(
            "plugin",
            vec![Arc::new(EmptyAlternatives), Arc::new(InvertedAssertions)],
        ),
        RuleSource::new(
            "internal",
            vec![Arc::new(RegexComplexity), Arc::new(LoopJumps)],
        ),
    ]
}
