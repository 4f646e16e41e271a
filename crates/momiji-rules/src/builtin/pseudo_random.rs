//! Using pseudorandom number generators is security-sensitive

use crate::api::{RuleModule, RuleParams, RuleVisitor, Selector};
use crate::engine::{Report, RuleContext};
use crate::helpers::fully_qualified_callee_name;
use momiji_core::{NodeId, NodeKind, Result};

/// Rule ID for the pseudorandom-generator check
pub const PSEUDO_RANDOM: &str = "pseudo-random";

const MESSAGE: &str = "Make sure that using this pseudorandom number generator is safe here.";

pub struct PseudoRandom;

impl RuleModule for PseudoRandom {
    fn id(&self) -> &'static str {
        PSEUDO_RANDOM
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(PseudoRandomVisitor)
    }
}

struct PseudoRandomVisitor;

impl RuleVisitor for PseudoRandomVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::CallExpression)]
    }

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        if fully_qualified_callee_name(ctx.tree(), node).as_deref() == Some("Math.random") {
            ctx.report(Report::new(ctx.node(node).range, MESSAGE));
        }
        Ok(())
    }
}
