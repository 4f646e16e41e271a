//! Shared tree-construction helpers for the integration tests
//!
//! The parser is an external collaborator, so tests assemble trees through
//! `TreeBuilder` with byte ranges computed from the source snippet.
#![allow(dead_code)]

use biome_text_size::TextRange;
use momiji_core::ast::{NodeData, NodeId, NodeKind, SyntaxTree, TreeBuilder, text_range};

/// Byte offset of the first occurrence of `fragment` in `source`
pub fn offset_of(source: &str, fragment: &str) -> u32 {
    source
        .find(fragment)
        .unwrap_or_else(|| panic!("{fragment:?} not found in {source:?}")) as u32
}

/// Range covering the first occurrence of `fragment` in `source`
pub fn range_of(source: &str, fragment: &str) -> TextRange {
    let start = offset_of(source, fragment);
    text_range(start, start + fragment.len() as u32)
}

/// Build a program whose single statement is a regex literal spanning the
/// whole source, e.g. `/(?=abc)/u`
pub fn regex_literal_program(source: &str) -> SyntaxTree {
    let last_slash = source.rfind('/').expect("regex literal needs two slashes");
    let pattern = source[1..last_slash].to_string();
    let flags = source[last_slash + 1..].to_string();
    let end = source.len() as u32;

    let mut builder = TreeBuilder::new(source);
    let literal = builder.leaf(
        NodeKind::Literal,
        text_range(0, end),
        NodeData::Regex { pattern, flags },
    );
    let statement = builder.node(NodeKind::ExpressionStatement, text_range(0, end), vec![literal]);
    let program = builder.node(NodeKind::Program, text_range(0, end), vec![statement]);
    builder.finish(program)
}

/// Convenience wrapper around `TreeBuilder` for hand-assembled programs
pub struct ProgramBuilder {
    pub source: String,
    pub builder: TreeBuilder,
    statements: Vec<NodeId>,
}

impl ProgramBuilder {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            builder: TreeBuilder::new(source),
            statements: Vec::new(),
        }
    }

    pub fn identifier(&mut self, fragment: &str) -> NodeId {
        let range = range_of(&self.source, fragment);
        self.builder
            .leaf(NodeKind::Identifier, range, NodeData::Name(fragment.into()))
    }

    pub fn string_literal(&mut self, quoted: &str, value: &str) -> NodeId {
        let range = range_of(&self.source, quoted);
        self.builder
            .leaf(NodeKind::Literal, range, NodeData::String(value.into()))
    }

    pub fn number_literal(&mut self, fragment: &str, value: f64) -> NodeId {
        let range = range_of(&self.source, fragment);
        self.builder
            .leaf(NodeKind::Literal, range, NodeData::Number(value))
    }

    pub fn member(&mut self, fragment: &str, object: NodeId, property: NodeId) -> NodeId {
        let range = range_of(&self.source, fragment);
        self.builder
            .node(NodeKind::MemberExpression, range, vec![object, property])
    }

    pub fn call(&mut self, fragment: &str, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let range = range_of(&self.source, fragment);
        let mut children = vec![callee];
        children.extend(arguments);
        self.builder.node(NodeKind::CallExpression, range, children)
    }

    pub fn statement(&mut self, node: NodeId) -> NodeId {
        let range = self.builder.range_of(node);
        let statement = self
            .builder
            .node(NodeKind::ExpressionStatement, range, vec![node]);
        self.statements.push(statement);
        statement
    }

    pub fn push_statement(&mut self, node: NodeId) {
        self.statements.push(node);
    }

    pub fn finish(mut self) -> SyntaxTree {
        let end = self.source.len() as u32;
        let statements = std::mem::take(&mut self.statements);
        let program = self
            .builder
            .node(NodeKind::Program, text_range(0, end), statements);
        self.builder.finish(program)
    }
}
