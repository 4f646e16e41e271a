//! Engine behavior tests: file-type isolation, override order, traversal
//! guarantees, fault semantics, and output determinism

mod common;

use common::regex_literal_program;
use momiji_core::ast::{NodeData, TreeBuilder, text_range};
use momiji_core::{
    EncodedMessage, ErrorKind, FileType, MomijiError, NodeId, NodeKind, Result, SyntaxTree,
};
use momiji_rules::engine::{Report, RuleContext};
use momiji_rules::{
    AnalysisEngine, EngineOptions, RuleConfig, RuleModule, RuleParams, RuleSource, RuleVisitor,
    Selector,
};
use std::path::Path;
use std::sync::Arc;

/// Reports a fixed message on every identifier it enters
struct MarkerRule {
    id: &'static str,
    message: &'static str,
}

struct MarkerVisitor {
    message: &'static str,
}

impl RuleVisitor for MarkerVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::Identifier)]
    }

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let range = ctx.node(node).range;
        ctx.report(Report::new(range, self.message));
        Ok(())
    }
}

impl RuleModule for MarkerRule {
    fn id(&self) -> &'static str {
        self.id
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(MarkerVisitor {
            message: self.message,
        })
    }
}

/// Counts identifiers during traversal, reports the total on Program leave
struct WholeTreeRule;

#[derive(Default)]
struct WholeTreeVisitor {
    identifiers: usize,
}

impl RuleVisitor for WholeTreeVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![
            Selector::enter(NodeKind::Identifier),
            Selector::leave(NodeKind::Program),
        ]
    }

    fn on_enter(&mut self, _ctx: &mut RuleContext<'_>, _node: NodeId) -> Result<()> {
        self.identifiers += 1;
        Ok(())
    }

    fn on_leave(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let range = ctx.node(node).range;
        ctx.report(Report::new(
            range,
            format!("visited {} identifiers", self.identifiers),
        ));
        Ok(())
    }
}

impl RuleModule for WholeTreeRule {
    fn id(&self) -> &'static str {
        "whole-tree-rule"
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(WholeTreeVisitor::default())
    }
}

/// Fails on the first identifier it sees
struct FaultyRule;

struct FaultyVisitor;

impl RuleVisitor for FaultyVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::Identifier)]
    }

    fn on_enter(&mut self, _ctx: &mut RuleContext<'_>, _node: NodeId) -> Result<()> {
        Err(MomijiError::internal_error("boom"))
    }
}

impl RuleModule for FaultyRule {
    fn id(&self) -> &'static str {
        "faulty-rule"
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(FaultyVisitor)
    }
}

/// Attaches a secondary location to every finding
struct SecondaryRule;

struct SecondaryVisitor;

impl RuleVisitor for SecondaryVisitor {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::Identifier)]
    }

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let range = ctx.node(node).range;
        let secondary = ctx.node_location(node);
        ctx.report(
            Report::new(range, "primary message").with_secondary(secondary, Some("evidence".into())),
        );
        Ok(())
    }
}

impl RuleModule for SecondaryRule {
    fn id(&self) -> &'static str {
        "secondary-rule"
    }

    fn create(&self, _params: &RuleParams) -> Box<dyn RuleVisitor> {
        Box::new(SecondaryVisitor)
    }
}

fn identifier_tree(names: &[&str]) -> SyntaxTree {
    let source: String = names
        .iter()
        .map(|name| format!("{name};"))
        .collect::<Vec<_>>()
        .join("");
    let mut builder = TreeBuilder::new(source.as_str());
    let mut statements = Vec::new();
    let mut offset = 0u32;
    for name in names {
        let len = name.len() as u32;
        let identifier = builder.leaf(
            NodeKind::Identifier,
            text_range(offset, offset + len),
            NodeData::Name((*name).to_string()),
        );
        statements.push(builder.node(
            NodeKind::ExpressionStatement,
            text_range(offset, offset + len + 1),
            vec![identifier],
        ));
        offset += len + 1;
    }
    let program = builder.node(NodeKind::Program, text_range(0, offset), statements);
    builder.finish(program)
}

fn engine_with(
    sources: Vec<RuleSource>,
    input_rules: Vec<RuleConfig>,
) -> momiji_core::Result<AnalysisEngine> {
    AnalysisEngine::new(EngineOptions {
        input_rules,
        rule_sources: Some(sources),
        ..Default::default()
    })
}

#[test]
fn test_only_rules_never_fire_on_main_code() {
    let source = RuleSource::new(
        "test",
        vec![Arc::new(MarkerRule {
            id: "test-only",
            message: "from test rule",
        })],
    );
    let engine = engine_with(
        vec![source],
        vec![RuleConfig::new("test-only", vec![FileType::Test])],
    )
    .unwrap();
    let tree = identifier_tree(&["a"]);

    let main = engine.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    assert!(main.is_empty());

    let test = engine.run(&tree, Path::new("file.js"), FileType::Test).unwrap();
    assert_eq!(test.len(), 1);
}

#[test]
fn main_only_rules_never_fire_on_test_code() {
    let source = RuleSource::new(
        "test",
        vec![Arc::new(MarkerRule {
            id: "main-only",
            message: "from main rule",
        })],
    );
    let engine = engine_with(
        vec![source],
        vec![RuleConfig::new("main-only", vec![FileType::Main])],
    )
    .unwrap();
    let tree = identifier_tree(&["a"]);

    assert!(engine
        .run(&tree, Path::new("file.js"), FileType::Test)
        .unwrap()
        .is_empty());
    assert_eq!(
        engine
            .run(&tree, Path::new("file.js"), FileType::Main)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn source_order_decides_which_module_wins() {
    let a = RuleSource::new(
        "a",
        vec![Arc::new(MarkerRule {
            id: "x",
            message: "implementation A",
        })],
    );
    let b = RuleSource::new(
        "b",
        vec![Arc::new(MarkerRule {
            id: "x",
            message: "implementation B",
        })],
    );
    let input = vec![RuleConfig::new("x", vec![FileType::Main])];
    let tree = identifier_tree(&["a"]);

    let forward = engine_with(vec![a.clone(), b.clone()], input.clone()).unwrap();
    let findings = forward.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    assert_eq!(findings[0].message, "implementation B");

    let backward = engine_with(vec![b, a], input).unwrap();
    let findings = backward.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    assert_eq!(findings[0].message, "implementation A");
}

#[test]
fn program_leave_fires_after_every_other_callback() {
    let source = RuleSource::new("test", vec![Arc::new(WholeTreeRule) as Arc<dyn RuleModule>]);
    let engine = engine_with(
        vec![source],
        vec![RuleConfig::new("whole-tree-rule", vec![FileType::Main])],
    )
    .unwrap();
    let tree = identifier_tree(&["a", "b", "c"]);

    let findings = engine.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "visited 3 identifiers");
}

#[test]
fn rule_fault_aborts_the_whole_analysis_call() {
    let source = RuleSource::new(
        "test",
        vec![
            Arc::new(MarkerRule {
                id: "healthy",
                message: "fine",
            }) as Arc<dyn RuleModule>,
            Arc::new(FaultyRule),
        ],
    );
    let engine = engine_with(
        vec![source],
        vec![
            RuleConfig::new("healthy", vec![FileType::Main]),
            RuleConfig::new("faulty-rule", vec![FileType::Main]),
        ],
    )
    .unwrap();
    let tree = identifier_tree(&["a"]);

    let err = engine
        .run(&tree, Path::new("file.js"), FileType::Main)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rule);
    match err {
        MomijiError::RuleError { rule_id, .. } => assert_eq!(rule_id, "faulty-rule"),
        other => panic!("expected rule error, got {other:?}"),
    }
}

#[test]
fn unknown_active_rule_fails_engine_construction() {
    let err = engine_with(
        vec![RuleSource::new("empty", vec![])],
        vec![RuleConfig::new("does-not-exist", vec![FileType::Main])],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn output_ordering_is_stable_across_runs() {
    let source = RuleSource::new(
        "test",
        vec![
            Arc::new(MarkerRule {
                id: "first",
                message: "one",
            }) as Arc<dyn RuleModule>,
            Arc::new(MarkerRule {
                id: "second",
                message: "two",
            }),
        ],
    );
    let engine = engine_with(
        vec![source],
        vec![
            RuleConfig::new("first", vec![FileType::Main]),
            RuleConfig::new("second", vec![FileType::Main]),
        ],
    )
    .unwrap();
    let tree = identifier_tree(&["a", "b"]);

    let first_run = engine.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    let second_run = engine.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    assert_eq!(first_run, second_run);
    // configuration order within one node, traversal order across nodes
    let messages: Vec<_> = first_run.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["one", "two", "one", "two"]);
}

#[test]
fn lint_envelopes_secondary_evidence_and_leaves_plain_findings_alone() {
    let source = RuleSource::new(
        "test",
        vec![
            Arc::new(SecondaryRule) as Arc<dyn RuleModule>,
            Arc::new(MarkerRule {
                id: "plain",
                message: "plain message",
            }),
        ],
    );
    let engine = engine_with(
        vec![source],
        vec![
            RuleConfig::new("secondary-rule", vec![FileType::Main]),
            RuleConfig::new("plain", vec![FileType::Main]),
        ],
    )
    .unwrap();
    let tree = identifier_tree(&["a"]);

    let diagnostics = engine
        .lint(&tree, Path::new("file.js"), FileType::Main)
        .unwrap();
    assert_eq!(diagnostics.len(), 2);

    let enveloped = diagnostics
        .iter()
        .find(|d| d.rule_id == "secondary-rule")
        .unwrap();
    let envelope = EncodedMessage::parse(&enveloped.message).expect("must be enveloped");
    assert_eq!(envelope.message, "primary message");
    assert_eq!(envelope.secondary_locations.len(), 1);
    assert_eq!(envelope.secondary_locations[0].message.as_deref(), Some("evidence"));

    let plain = diagnostics.iter().find(|d| d.rule_id == "plain").unwrap();
    assert_eq!(plain.message, "plain message");
    assert!(EncodedMessage::parse(&plain.message).is_none());
}

#[test]
fn regex_program_helper_round_trips_through_the_engine() {
    // engine construction with the default sources and an empty profile
    let engine = AnalysisEngine::new(EngineOptions::default()).unwrap();
    let tree = regex_literal_program("/a|b/");
    let findings = engine.run(&tree, Path::new("file.js"), FileType::Main).unwrap();
    assert!(findings.is_empty());
}
