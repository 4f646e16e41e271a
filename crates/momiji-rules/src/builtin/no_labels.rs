//! Labels should not be used

use crate::api::{RuleModule, RuleParams, RuleVisitor, Selector};
use crate::engine::{Report, RuleContext};
use momiji_core::{NodeId, NodeKind, Result};

/// Rule ID for the label ban
pub const NO_LABELS: &str = "no-labels";

const MESSAGE: &str = "Refactor the code to remove this label and the need for it.";

pub struct NoLabels;

impl RuleModule for NoLabels {
    fn id(&self) -> &'static str {
        NO_LABELS
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(NoLabelsVisitor)
    }
}

struct NoLabelsVisitor;

impl RuleVisitor for NoLabelsVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::LabeledStatement)]
    }

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        // report on the label identifier itself, not the whole statement
        let range = ctx
            .tree()
            .children(node)
            .first()
            .map(|&label| ctx.node(label).range)
            .unwrap_or_else(|| ctx.node(node).range);
        ctx.report(Report::new(range, MESSAGE));
        Ok(())
    }
}
