//! Alternation branches that match nothing
//!
//! An empty alternative in a pattern either is dead or makes the whole
//! alternation optional by accident. A trailing empty alternative inside an
//! unquantified group is tolerated, since `(a|b|)` is a common idiom for
//! optionality.

use crate::api::{RuleModule, RuleParams, RuleVisitor, Selector};
use crate::engine::{Report, RuleContext};
use crate::helpers::{is_regex_literal, pattern_part, PatternPart};
use crate::pattern::{parse, Disjunction, Element};
use momiji_core::ast::text_range;
use momiji_core::{NodeId, NodeKind, Result};

/// Rule ID for the empty-alternative check
pub const NO_EMPTY_ALTERNATIVES: &str = "no-empty-alternatives";

const MESSAGE: &str = "Remove this empty alternative.";

pub struct EmptyAlternatives;

impl RuleModule for EmptyAlternatives {
    fn id(&self) -> &'static str {
        NO_EMPTY_ALTERNATIVES
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(EmptyAlternativesVisitor)
    }
}

struct EmptyAlternativesVisitor;

impl RuleVisitor for EmptyAlternativesVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::leave(NodeKind::Literal)]
    }

    fn on_leave(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        if !is_regex_literal(ctx.tree(), node) {
            return Ok(());
        }
        let Some(part) = pattern_part(ctx.tree(), node) else {
            return Ok(());
        };
        let Ok(tree) = parse(&part.pattern) else {
            return Ok(());
        };
        // the pattern root never tolerates a trailing empty alternative
        check_disjunction(ctx, &part, &tree, false);
        Ok(())
    }
}

fn check_disjunction(
    ctx: &mut RuleContext<'_>,
    part: &PatternPart,
    disjunction: &Disjunction,
    allow_trailing_empty: bool,
) {
    let alternatives = &disjunction.alternatives;
    if alternatives.len() > 1 {
        let last = alternatives.len() - 1;
        for (index, alternative) in alternatives.iter().enumerate() {
            if !alternative.is_empty() {
                continue;
            }
            if index == last && allow_trailing_empty {
                continue;
            }
            // point at the '|' adjacent to the empty branch
            let start = u32::from(alternative.span.start());
            let bar = if index == last {
                text_range(start - 1, start)
            } else {
                text_range(start, start + 1)
            };
            let report = Report::new(part.source_range(bar), MESSAGE);
            ctx.report(report);
        }
    }
    for alternative in alternatives {
        for element in &alternative.elements {
            check_element(ctx, part, element, false);
        }
    }
}

fn check_element(
    ctx: &mut RuleContext<'_>,
    part: &PatternPart,
    element: &Element,
    quantified: bool,
) {
    match element {
        Element::Group { body, .. } => {
            // a quantified group repeats, so its trailing empty branch is
            // not a harmless optionality idiom
            check_disjunction(ctx, part, body, !quantified);
        }
        Element::Quantified { element, .. } => {
            check_element(ctx, part, element, true);
        }
        // lookaround bodies are left to their own devices
        _ => {}
    }
}
