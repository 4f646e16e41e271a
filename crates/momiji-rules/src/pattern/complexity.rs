//! Nesting-weighted structural complexity of pattern expressions
//!
//! Each construct that scopes further complexity (lookaround, character
//! class, quantifier, multi-branch disjunction) raises the nesting counter
//! for its contents; contributions made at depth are weighted by the
//! current nesting value. The scorer records one contribution per
//! construct so every increment can be shown at its own source range.

use super::{Disjunction, Element, parse};
use biome_text_size::TextRange;
use momiji_core::ast::text_range;

/// One complexity increment attached to a range in the pattern text
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub span: TextRange,
    pub message: String,
}

/// Result of scoring one pattern fragment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexityScore {
    pub complexity: u32,
    pub contributions: Vec<Contribution>,
}

/// Walks a parsed pattern-expression tree and totals its complexity
///
/// The nesting counter and the accumulated contributions are explicit
/// per-invocation state; a scorer value is used once and discarded.
pub struct ComplexityScorer {
    nesting: u32,
    complexity: u32,
    contributions: Vec<Contribution>,
}

impl ComplexityScorer {
    /// Score one pattern fragment
    ///
    /// Empty or unparsable text yields a zero score with no contributions;
    /// a pattern the parser cannot understand is nothing to report, not an
    /// error.
    pub fn score(pattern: &str) -> ComplexityScore {
        let Ok(tree) = parse(pattern) else {
            return ComplexityScore::default();
        };
        let mut scorer = ComplexityScorer {
            nesting: 1,
            complexity: 0,
            contributions: Vec::new(),
        };
        scorer.walk_disjunction(&tree);
        ComplexityScore {
            complexity: scorer.complexity,
            contributions: scorer.contributions,
        }
    }

    fn walk_disjunction(&mut self, disjunction: &Disjunction) {
        let branching = disjunction.alternatives.len() > 1;
        if branching {
            // Only the first extra branch is nesting-weighted; every
            // branch after the second adds a flat 1. Each contribution
            // sits on the '|' preceding its alternative.
            let mut increment = self.nesting;
            for alternative in &disjunction.alternatives[1..] {
                let start = u32::from(alternative.span.start());
                self.add(increment, text_range(start - 1, start));
                increment = 1;
            }
            self.nesting += 1;
        }
        for alternative in &disjunction.alternatives {
            for element in &alternative.elements {
                self.walk_element(element);
            }
        }
        if branching {
            self.nesting -= 1;
        }
    }

    fn walk_element(&mut self, element: &Element) {
        match element {
            Element::Literal { .. } => {}
            Element::Backreference { span } => {
                self.add(1, *span);
            }
            Element::CharacterClass { span } => {
                self.add(1, *span);
                // nothing inside a class can nest further; no walk needed
            }
            Element::Group { body, .. } => {
                self.walk_disjunction(body);
            }
            Element::Lookaround { span, kind, body } => {
                let start = u32::from(span.start());
                self.add(self.nesting, text_range(start, start + kind.introducer_len()));
                self.nesting += 1;
                self.walk_disjunction(body);
                self.nesting -= 1;
            }
            Element::Quantified { span, element, .. } => {
                self.add(self.nesting, *span);
                self.nesting += 1;
                self.walk_element(element);
                self.nesting -= 1;
            }
        }
    }

    fn add(&mut self, increment: u32, span: TextRange) {
        self.complexity += increment;
        let mut message = format!("+{increment}");
        if increment > 1 {
            message.push_str(&format!(" (incl {} for nesting)", increment - 1));
        }
        self.contributions.push(Contribution { span, message });
    }
}
