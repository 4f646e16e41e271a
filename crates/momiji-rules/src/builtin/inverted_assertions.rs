//! Assertion arguments should be passed in the correct order
//!
//! Inside a test case, `assert.equal(literal, expression)` almost always
//! has its actual and expected values swapped; the failure message then
//! reads backwards. Only applies to test code, so the entry shipping this
//! rule targets the TEST file type.

use crate::api::{ParameterSchema, RuleModule, RuleParams, RuleVisitor, Selector};
use crate::engine::{Report, RuleContext};
use crate::helpers::{call_arguments, callee, identifier_name, is_literal};
use momiji_core::{NodeId, NodeKind, Result, SyntaxTree};

/// Rule ID for the inverted-assertion check
pub const INVERTED_ASSERTION_ARGUMENTS: &str = "inverted-assertion-arguments";

const ASSERT_FUNCTIONS: &[&str] = &[
    "equal",
    "notEqual",
    "strictEqual",
    "notStrictEqual",
    "deepEqual",
    "notDeepEqual",
    "closeTo",
    "approximately",
];

const TEST_CASE_CALLEES: &[&str] = &["it", "test", "specify"];

pub struct InvertedAssertions;

impl RuleModule for InvertedAssertions {
    fn id(&self) -> &'static str {
        INVERTED_ASSERTION_ARGUMENTS
    }

    fn schema(&self) -> ParameterSchema {
        ParameterSchema {
            reports_secondary_locations: true,
            needs_execution_context: false,
        }
    }

    fn create(&self, params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(InvertedAssertionsVisitor {
            secondary_enabled: params.secondary_locations_enabled(),
            test_case_depth: 0,
        })
    }
}

struct InvertedAssertionsVisitor {
    secondary_enabled: bool,
    test_case_depth: u32,
}

impl RuleVisitor for InvertedAssertionsVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![
            Selector::enter(NodeKind::CallExpression),
            Selector::leave(NodeKind::CallExpression),
        ]
    }

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        if is_test_case(ctx.tree(), node) {
            self.test_case_depth += 1;
            return Ok(());
        }
        if self.test_case_depth > 0 {
            self.check_inverted_arguments(ctx, node);
        }
        Ok(())
    }

    fn on_leave(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        if is_test_case(ctx.tree(), node) {
            self.test_case_depth -= 1;
        }
        Ok(())
    }
}

impl InvertedAssertionsVisitor {
    fn check_inverted_arguments(&self, ctx: &mut RuleContext<'_>, node: NodeId) {
        let tree = ctx.tree();
        let Some((actual, expected, format)) = extract_assertion_arguments(tree, node) else {
            return;
        };
        if is_literal(tree, actual) && !is_literal(tree, expected) {
            let mut report = Report::new(
                ctx.node(expected).range,
                format!("Swap these 2 arguments so they are in the correct order: {format}."),
            );
            if self.secondary_enabled {
                report = report.with_secondary(
                    ctx.node_location(actual),
                    Some("Other argument to swap.".to_string()),
                );
            }
            ctx.report(report);
        }
    }
}

fn is_test_case(tree: &SyntaxTree, node: NodeId) -> bool {
    callee(tree, node)
        .and_then(|callee| identifier_name(tree, callee))
        .is_some_and(|name| TEST_CASE_CALLEES.contains(&name))
}

/// `assert.<fn>(actual, expected)` with a recognized assertion name
fn extract_assertion_arguments(
    tree: &SyntaxTree,
    node: NodeId,
) -> Option<(NodeId, NodeId, String)> {
    let callee = callee(tree, node)?;
    if tree.kind(callee) != NodeKind::MemberExpression {
        return None;
    }
    let members = tree.children(callee);
    let object = identifier_name(tree, *members.first()?)?;
    let property = identifier_name(tree, *members.get(1)?)?;
    if object != "assert" || !ASSERT_FUNCTIONS.contains(&property) {
        return None;
    }
    let arguments = call_arguments(tree, node);
    if arguments.len() < 2 {
        return None;
    }
    Some((
        arguments[0],
        arguments[1],
        format!("{object}.{property}(actual, expected)"),
    ))
}
