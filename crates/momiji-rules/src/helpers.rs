//! Shared AST helpers for rule modules
//!
//! Mostly predicates over the homogeneous syntax tree, plus the
//! pattern-part finder that resolves a regular-expression target (literal,
//! string, template, identifier with a unique initializer, or string
//! concatenation) into the ordered pattern fragments the scorer consumes.

use biome_text_size::TextRange;
use momiji_core::ast::text_range;
use momiji_core::{NodeData, NodeId, NodeKind, SyntaxTree};

/// Identifier name of a node, if it is an identifier
pub fn identifier_name(tree: &SyntaxTree, node: NodeId) -> Option<&str> {
    match tree.kind(node) {
        NodeKind::Identifier => tree.node(node).name(),
        _ => None,
    }
}

pub fn is_identifier_named(tree: &SyntaxTree, node: NodeId, name: &str) -> bool {
    identifier_name(tree, node) == Some(name)
}

/// Whether a node is a literal (of any literal payload)
pub fn is_literal(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.kind(node) == NodeKind::Literal
}

pub fn is_string_literal(tree: &SyntaxTree, node: NodeId) -> bool {
    is_literal(tree, node) && matches!(tree.node(node).data, NodeData::String(_))
}

pub fn is_regex_literal(tree: &SyntaxTree, node: NodeId) -> bool {
    is_literal(tree, node) && matches!(tree.node(node).data, NodeData::Regex { .. })
}

/// Static template literal (no substitutions)
pub fn is_static_template_literal(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.kind(node) == NodeKind::TemplateLiteral
        && matches!(tree.node(node).data, NodeData::Template(_))
}

/// Callee of a call or new expression
pub fn callee(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    match tree.kind(node) {
        NodeKind::CallExpression | NodeKind::NewExpression => tree.children(node).first().copied(),
        _ => None,
    }
}

/// Arguments of a call or new expression
pub fn call_arguments(tree: &SyntaxTree, node: NodeId) -> &[NodeId] {
    match tree.kind(node) {
        NodeKind::CallExpression | NodeKind::NewExpression => {
            let children = tree.children(node);
            if children.is_empty() { children } else { &children[1..] }
        }
        _ => &[],
    }
}

/// `RegExp(...)` or `new RegExp(...)` with at least one argument
pub fn is_regexp_constructor(tree: &SyntaxTree, node: NodeId) -> bool {
    let Some(callee) = callee(tree, node) else {
        return false;
    };
    is_identifier_named(tree, callee, "RegExp") && !call_arguments(tree, node).is_empty()
}

/// `a + b` string-ish concatenation
pub fn is_binary_plus(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.kind(node) == NodeKind::BinaryExpression
        && matches!(&tree.node(node).data, NodeData::Operator(op) if op == "+")
}

/// Dotted name of a call's callee, e.g. `Math.random`
///
/// Resolves plain identifiers and member chains of identifiers; anything
/// dynamic (computed members, call results) yields `None`.
pub fn fully_qualified_callee_name(tree: &SyntaxTree, call: NodeId) -> Option<String> {
    fn dotted(tree: &SyntaxTree, node: NodeId) -> Option<String> {
        match tree.kind(node) {
            NodeKind::Identifier => identifier_name(tree, node).map(str::to_string),
            NodeKind::MemberExpression => {
                let children = tree.children(node);
                let object = dotted(tree, *children.first()?)?;
                let property = identifier_name(tree, *children.get(1)?)?;
                Some(format!("{object}.{property}"))
            }
            _ => None,
        }
    }
    dotted(tree, callee(tree, call)?)
}

/// The unique initializer of a variable, if the tree writes it exactly once
///
/// A declarator with an initializer counts as the single write; any second
/// declarator for the same name or any assignment to it disqualifies the
/// variable. Scope shadowing is not modeled.
pub fn unique_write_usage(tree: &SyntaxTree, name: &str) -> Option<NodeId> {
    let mut initializer = None;
    let mut writes = 0usize;
    for node in tree.node_ids() {
        match tree.kind(node) {
            NodeKind::VariableDeclarator => {
                let children = tree.children(node);
                if let Some(&id) = children.first()
                    && is_identifier_named(tree, id, name)
                {
                    writes += 1;
                    initializer = children.get(1).copied();
                }
            }
            NodeKind::AssignmentExpression => {
                let children = tree.children(node);
                if let Some(&left) = children.first()
                    && is_identifier_named(tree, left, name)
                {
                    writes += 1;
                }
            }
            _ => {}
        }
    }
    if writes == 1 { initializer } else { None }
}

/// One pattern fragment with the file offset its text starts at
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPart {
    pub node: NodeId,
    pub pattern: String,
    base: u32,
}

impl PatternPart {
    /// Map a span within the pattern text into a source-file byte range
    pub fn source_range(&self, span: TextRange) -> TextRange {
        text_range(
            self.base + u32::from(span.start()),
            self.base + u32::from(span.end()),
        )
    }
}

/// Extract the pattern text carried by a literal-like node
///
/// The fragment starts one byte past the node start, skipping the opening
/// `/`, quote, or backtick.
pub fn pattern_part(tree: &SyntaxTree, node: NodeId) -> Option<PatternPart> {
    let syntax = tree.node(node);
    let pattern = match (&syntax.kind, &syntax.data) {
        (NodeKind::Literal, NodeData::Regex { pattern, .. }) => pattern.clone(),
        (NodeKind::Literal, NodeData::String(value)) => value.clone(),
        (NodeKind::TemplateLiteral, NodeData::Template(text)) => text.clone(),
        _ => return None,
    };
    Some(PatternPart {
        node,
        pattern,
        base: u32::from(syntax.range.start()) + 1,
    })
}

/// Resolve a regex target into groups of concatenated pattern fragments
///
/// Each group is scored as one unit; a `RegExp` construction over a
/// concatenation yields one group with a part per string literal.
pub fn find_pattern_parts(tree: &SyntaxTree, node: NodeId) -> Vec<Vec<PatternPart>> {
    let mut finder = PatternPartFinder {
        tree,
        parts: Vec::new(),
    };
    finder.find(node);
    finder.parts
}

struct PatternPartFinder<'a> {
    tree: &'a SyntaxTree,
    parts: Vec<Vec<PatternPart>>,
}

impl PatternPartFinder<'_> {
    fn find(&mut self, node: NodeId) {
        let tree = self.tree;
        if is_regexp_constructor(tree, node) {
            self.find(call_arguments(tree, node)[0]);
        } else if is_regex_literal(tree, node)
            || is_string_literal(tree, node)
            || is_static_template_literal(tree, node)
        {
            if let Some(part) = pattern_part(tree, node) {
                self.parts.push(vec![part]);
            }
        } else if tree.kind(node) == NodeKind::Identifier {
            if let Some(name) = identifier_name(tree, node)
                && let Some(initializer) = unique_write_usage(tree, name)
            {
                self.find(initializer);
            }
        } else if is_binary_plus(tree, node) {
            let mut literals = Vec::new();
            let children = tree.children(node).to_vec();
            for child in children {
                self.find_in_concatenation(child, &mut literals);
            }
            if !literals.is_empty() {
                self.parts.push(literals);
            }
        }
    }

    fn find_in_concatenation(&mut self, node: NodeId, literals: &mut Vec<PatternPart>) {
        let tree = self.tree;
        if is_string_literal(tree, node) {
            if let Some(part) = pattern_part(tree, node) {
                literals.push(part);
            }
        } else if is_binary_plus(tree, node) {
            let children = tree.children(node).to_vec();
            for child in children {
                self.find_in_concatenation(child, literals);
            }
        } else {
            self.find(node);
        }
    }
}
