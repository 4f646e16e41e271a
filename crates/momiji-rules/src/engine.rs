//! Analysis engine: one traversal, many rule visitors
//!
//! The engine owns the merged rule registry and the two file-type
//! configurations; both are built once and read-only afterwards, so one
//! engine instance serves many analysis calls. Every call instantiates a
//! fresh visitor per active rule, builds a dispatch table from the visitors'
//! selectors in configuration order, and drives them from a single
//! enter/leave traversal of the tree. The root `Program` leave event fires
//! after everything else, which lets rules collect during traversal and
//! decide at the end.

use crate::api::{Phase, RuleVisitor, Selector};
use crate::builtin;
use crate::config::{ConfigBuilder, Configuration, FileTypeConfigs, RuleConfig};
use crate::registry::{RuleRegistry, RuleSource};
use biome_text_size::TextRange;
use momiji_core::diagnostics::{
    DiagnosticEncoder, Finding, Location, OutputDiagnostic, SecondaryLocation,
};
use momiji_core::{
    ExecutionContext, FileType, MomijiError, NodeId, NodeKind, Result, SyntaxNode, SyntaxTree,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Constructor inputs for [`AnalysisEngine`]
///
/// All fields are optional in spirit: an empty options value yields an
/// engine with the default rule sources and no active rules.
#[derive(Default)]
pub struct EngineOptions {
    /// Active-rule entries from the host's quality profile
    pub input_rules: Vec<RuleConfig>,
    /// Environment names bringing predefined globals
    pub environments: Vec<String>,
    /// Explicit extra globals
    pub globals: Vec<String>,
    /// Rule sources to merge, in override order; defaults to the built-in
    /// source stack when absent
    pub rule_sources: Option<Vec<RuleSource>>,
    /// Locally defined rules registered on top of the sources
    pub custom_rules: Vec<crate::api::RuleModuleRef>,
    /// Execution context injected into rules that declare a slot for it
    pub context: ExecutionContext,
}

/// A finding under construction inside a rule callback
#[derive(Debug, Clone)]
pub struct Report {
    message: String,
    range: TextRange,
    secondary_locations: Vec<SecondaryLocation>,
    cost: Option<f64>,
}

impl Report {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            range,
            secondary_locations: Vec::new(),
            cost: None,
        }
    }

    pub fn with_secondary(mut self, location: Location, message: Option<String>) -> Self {
        self.secondary_locations
            .push(SecondaryLocation::new(location, message));
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }
}

/// Reporting context bound to one analysis call
///
/// Exposes read-only tree and text accessors plus the ability to produce a
/// finding. The findings sink is write-only from a rule's point of view;
/// no rule can observe another rule's findings.
pub struct RuleContext<'a> {
    tree: &'a SyntaxTree,
    file_path: &'a Path,
    file_type: FileType,
    current_rule: Option<Arc<str>>,
    findings: Vec<Finding>,
}

impl<'a> RuleContext<'a> {
    fn new(tree: &'a SyntaxTree, file_path: &'a Path, file_type: FileType) -> Self {
        Self {
            tree,
            file_path,
            file_type,
            current_rule: None,
            findings: Vec::new(),
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn file_path(&self) -> &Path {
        self.file_path
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Full source text of the analyzed file
    pub fn source(&self) -> &'a str {
        self.tree.text()
    }

    pub fn node(&self, id: NodeId) -> &'a SyntaxNode {
        self.tree.node(id)
    }

    /// Convert a byte range into a location in the analyzed file
    pub fn location(&self, range: TextRange) -> Location {
        Location::from_range(self.file_path, self.tree.line_index(), range)
    }

    pub fn node_location(&self, id: NodeId) -> Location {
        self.location(self.tree.node(id).range)
    }

    /// Record a finding for the rule currently being dispatched
    pub fn report(&mut self, report: Report) {
        let rule_id = self
            .current_rule
            .as_deref()
            .unwrap_or("unknown-rule")
            .to_string();
        let finding = Finding {
            rule_id,
            location: self.location(report.range),
            message: report.message,
            secondary_locations: report.secondary_locations,
            cost: report.cost,
        };
        self.findings.push(finding);
    }

    fn set_current_rule(&mut self, rule: Arc<str>) {
        self.current_rule = Some(rule);
    }

    fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

struct ActiveRule {
    key: Arc<str>,
    visitor: Box<dyn RuleVisitor>,
}

/// The rule-orchestration engine
#[derive(Debug)]
pub struct AnalysisEngine {
    registry: RuleRegistry,
    configs: FileTypeConfigs,
}

impl AnalysisEngine {
    /// Build the registry and both configurations
    ///
    /// This is the only place rule sources are resolved; afterwards every
    /// configured rule holds a direct module reference and no string lookup
    /// happens during traversal.
    pub fn new(options: EngineOptions) -> Result<Self> {
        let sources = options
            .rule_sources
            .unwrap_or_else(builtin::default_sources);
        let mut registry = RuleRegistry::merge(&sources);
        registry.register_custom(options.custom_rules);
        let configs = ConfigBuilder::build(
            &options.input_rules,
            &registry,
            &options.environments,
            &options.globals,
            &options.context,
        )?;
        Ok(Self { registry, configs })
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self, file_type: FileType) -> &Configuration {
        self.configs.get(file_type)
    }

    /// Run one analysis call and return the raw findings
    ///
    /// Exactly one traversal of the tree. A fault inside any rule callback
    /// aborts the whole call with a rule error; partial findings are
    /// discarded and nothing is retried.
    pub fn run(
        &self,
        tree: &SyntaxTree,
        file_path: &Path,
        file_type: FileType,
    ) -> Result<Vec<Finding>> {
        let config = self.configs.get(file_type);
        let mut ctx = RuleContext::new(tree, file_path, file_type);

        // One fresh visitor per active rule, in configuration order
        let mut active: Vec<ActiveRule> = config
            .rules()
            .iter()
            .map(|rule| ActiveRule {
                key: Arc::from(rule.key.as_str()),
                visitor: rule.module.create(&rule.params),
            })
            .collect();

        // Dispatch table in configuration order keeps rule invocation
        // deterministic for a fixed configuration
        let mut dispatch: HashMap<Selector, Vec<usize>> = HashMap::new();
        for (index, rule) in active.iter().enumerate() {
            for selector in rule.visitor.selectors() {
                dispatch.entry(selector).or_default().push(index);
            }
        }

        tracing::debug!(
            "Analyzing {} as {} with {} active rules",
            file_path.display(),
            file_type,
            active.len()
        );

        enum Event {
            Enter(NodeId),
            Leave(NodeId),
        }

        let mut stack = vec![Event::Enter(tree.root())];
        while let Some(event) = stack.pop() {
            let (node, phase) = match event {
                Event::Enter(node) => (node, Phase::Enter),
                Event::Leave(node) => (node, Phase::Leave),
            };
            let selector = Selector {
                kind: tree.kind(node),
                phase,
            };
            if let Some(indices) = dispatch.get(&selector) {
                for &index in indices {
                    let rule = &mut active[index];
                    ctx.set_current_rule(rule.key.clone());
                    let outcome = match phase {
                        Phase::Enter => rule.visitor.on_enter(&mut ctx, node),
                        Phase::Leave => rule.visitor.on_leave(&mut ctx, node),
                    };
                    if let Err(err) = outcome {
                        let key = rule.key.clone();
                        tracing::error!("Rule '{key}' failed on {}: {err}", file_path.display());
                        return Err(MomijiError::rule_error(key.as_ref(), err.to_string()));
                    }
                }
            }
            if phase == Phase::Enter {
                stack.push(Event::Leave(node));
                for &child in tree.children(node).iter().rev() {
                    stack.push(Event::Enter(child));
                }
            }
        }

        Ok(ctx.into_findings())
    }

    /// Run one analysis call and encode every finding for the host
    ///
    /// Encoding here, in one place, upholds the invariant that secondary
    /// evidence always travels inside the message envelope.
    pub fn lint(
        &self,
        tree: &SyntaxTree,
        file_path: &Path,
        file_type: FileType,
    ) -> Result<Vec<OutputDiagnostic>> {
        let findings = self.run(tree, file_path, file_type)?;
        Ok(DiagnosticEncoder::encode_all(&findings))
    }
}
