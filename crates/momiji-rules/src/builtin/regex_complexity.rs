//! Regular expressions should not be too complicated
//!
//! Collects every regex target while the tree is traversed and scores them
//! all once the whole tree has been seen, so that identifier targets can be
//! resolved through their initializers wherever they are declared. A target
//! is flagged when its aggregate complexity exceeds the configured
//! threshold; every scorer contribution becomes a secondary location on the
//! finding.

use crate::api::{ParameterSchema, RuleModule, RuleParams, RuleVisitor, Selector};
use crate::engine::{Report, RuleContext};
use crate::helpers::{find_pattern_parts, is_regex_literal, is_regexp_constructor};
use crate::pattern::ComplexityScorer;
use momiji_core::diagnostics::Location;
use momiji_core::{NodeId, NodeKind, Result};

/// Rule ID for the regex complexity check
pub const REGEX_COMPLEXITY: &str = "regex-complexity";

const DEFAULT_THRESHOLD: i64 = 20;

pub struct RegexComplexity;

impl RuleModule for RegexComplexity {
    fn id(&self) -> &'static str {
        REGEX_COMPLEXITY
    }

    fn schema(&self) -> ParameterSchema {
        ParameterSchema {
            reports_secondary_locations: true,
            needs_execution_context: false,
        }
    }

    fn create(&self, params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(RegexComplexityVisitor {
            threshold: params.integer_at(0).unwrap_or(DEFAULT_THRESHOLD),
            secondary_enabled: params.secondary_locations_enabled(),
            regex_nodes: Vec::new(),
        })
    }
}

struct RegexComplexityVisitor {
    threshold: i64,
    secondary_enabled: bool,
    /// Targets collected during traversal, checked on Program leave
    regex_nodes: Vec<NodeId>,
}

impl RuleVisitor for RegexComplexityVisitor {
    fn selectors(&self) -> Vec<Selector> {
        Selector::leaving(&[
            NodeKind::Literal,
            NodeKind::NewExpression,
            NodeKind::CallExpression,
            NodeKind::Program,
        ])
    }

    fn on_leave(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let tree = ctx.tree();
        match tree.kind(node) {
            NodeKind::Literal => {
                if is_regex_literal(tree, node) {
                    self.regex_nodes.push(node);
                }
            }
            NodeKind::NewExpression | NodeKind::CallExpression => {
                if is_regexp_constructor(tree, node) {
                    self.regex_nodes.push(node);
                }
            }
            NodeKind::Program => {
                let regex_nodes = std::mem::take(&mut self.regex_nodes);
                for regex_node in regex_nodes {
                    self.check_regex_complexity(ctx, regex_node);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl RegexComplexityVisitor {
    fn check_regex_complexity(&self, ctx: &mut RuleContext<'_>, regex_node: NodeId) {
        for parts in find_pattern_parts(ctx.tree(), regex_node) {
            let mut complexity = 0u32;
            let mut secondaries: Vec<(Location, String)> = Vec::new();
            for part in &parts {
                let score = ComplexityScorer::score(&part.pattern);
                complexity += score.complexity;
                for contribution in score.contributions {
                    let location = ctx.location(part.source_range(contribution.span));
                    secondaries.push((location, contribution.message));
                }
            }
            let Some(first) = parts.first() else {
                continue;
            };
            if i64::from(complexity) > self.threshold {
                let mut report = Report::new(
                    ctx.node(first.node).range,
                    format!(
                        "Simplify this regular expression to reduce its complexity from {complexity} to the {} allowed.",
                        self.threshold
                    ),
                )
                .with_cost((i64::from(complexity) - self.threshold) as f64);
                if self.secondary_enabled {
                    for (location, message) in secondaries {
                        report = report.with_secondary(location, Some(message));
                    }
                }
                ctx.report(report);
            }
        }
    }
}
