//! Loops should not contain more than one `break` or `continue`
//!
//! A loop with several jump statements is hard to follow. Labeled
//! statements and switches open their own jump scope so that a `break`
//! targeting them is not charged to the surrounding loop alone. The
//! jump-target stack is explicit per-call visitor state.

use crate::api::{ParameterSchema, RuleModule, RuleParams, RuleVisitor, Selector};
use crate::engine::{Report, RuleContext};
use crate::helpers::identifier_name;
use momiji_core::{NodeId, NodeKind, Result};

/// Rule ID for the loop jump-count check
pub const TOO_MANY_BREAK_OR_CONTINUE_IN_LOOP: &str = "too-many-break-or-continue-in-loop";

const MESSAGE: &str =
    "Reduce the total number of \"break\" and \"continue\" statements in this loop to use one at most.";

const LOOP_KINDS: &[NodeKind] = &[
    NodeKind::ForStatement,
    NodeKind::ForInStatement,
    NodeKind::ForOfStatement,
    NodeKind::WhileStatement,
    NodeKind::DoWhileStatement,
];

pub struct LoopJumps;

impl RuleModule for LoopJumps {
    fn id(&self) -> &'static str {
        TOO_MANY_BREAK_OR_CONTINUE_IN_LOOP
    }

    fn schema(&self) -> ParameterSchema {
        ParameterSchema {
            reports_secondary_locations: true,
            needs_execution_context: false,
        }
    }

    fn create(&self, params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(LoopJumpsVisitor {
            secondary_enabled: params.secondary_locations_enabled(),
            jump_targets: Vec::new(),
        })
    }
}

struct JumpTarget {
    label: Option<String>,
    jumps: Vec<NodeId>,
}

struct LoopJumpsVisitor {
    secondary_enabled: bool,
    jump_targets: Vec<JumpTarget>,
}

impl RuleVisitor for LoopJumpsVisitor {
    fn selectors(&self) -> Vec<Selector> {
        let mut selectors = Selector::entering(&[
            NodeKind::BreakStatement,
            NodeKind::ContinueStatement,
            NodeKind::SwitchStatement,
            NodeKind::LabeledStatement,
        ]);
        selectors.extend(Selector::entering(LOOP_KINDS));
        selectors.extend(Selector::leaving(&[
            NodeKind::SwitchStatement,
            NodeKind::LabeledStatement,
        ]));
        selectors.extend(Selector::leaving(LOOP_KINDS));
        selectors
    }

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let tree = ctx.tree();
        match tree.kind(node) {
            NodeKind::BreakStatement | NodeKind::ContinueStatement => {
                let label = tree
                    .children(node)
                    .first()
                    .and_then(|&child| identifier_name(tree, child))
                    .map(str::to_string);
                self.record_jump(node, label);
            }
            NodeKind::SwitchStatement => self.enter_scope(None),
            NodeKind::LabeledStatement => {
                let label = tree
                    .children(node)
                    .first()
                    .and_then(|&child| identifier_name(tree, child))
                    .map(str::to_string);
                self.enter_scope(label);
            }
            kind if LOOP_KINDS.contains(&kind) => self.enter_scope(None),
            _ => {}
        }
        Ok(())
    }

    fn on_leave(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let tree = ctx.tree();
        match tree.kind(node) {
            NodeKind::SwitchStatement | NodeKind::LabeledStatement => {
                self.jump_targets.pop();
            }
            kind if LOOP_KINDS.contains(&kind) => self.leave_loop_and_check(ctx, node),
            _ => {}
        }
        Ok(())
    }
}

impl LoopJumpsVisitor {
    fn enter_scope(&mut self, label: Option<String>) {
        self.jump_targets.push(JumpTarget {
            label,
            jumps: Vec::new(),
        });
    }

    /// Charge a jump to every enclosing target up to the one it lands on;
    /// an unlabeled jump lands on the innermost target
    fn record_jump(&mut self, jump: NodeId, label: Option<String>) {
        for target in self.jump_targets.iter_mut().rev() {
            target.jumps.push(jump);
            if label == target.label {
                break;
            }
        }
    }

    fn leave_loop_and_check(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) {
        let Some(target) = self.jump_targets.pop() else {
            return;
        };
        if target.jumps.len() > 1 {
            let mut report = Report::new(ctx.node(node).range, MESSAGE);
            if self.secondary_enabled {
                for jump in &target.jumps {
                    let label = match ctx.tree().kind(*jump) {
                        NodeKind::BreakStatement => "\"break\" statement.",
                        _ => "\"continue\" statement.",
                    };
                    report = report.with_secondary(ctx.node_location(*jump), Some(label.to_string()));
                }
            }
            ctx.report(report);
        }
    }
}
