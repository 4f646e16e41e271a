//! The rule-module contract
//!
//! A rule module is a self-contained detection unit: it declares an
//! identifier and a parameter schema, and its factory produces one
//! [`RuleVisitor`] per analysis call. Visitors announce which node kinds and
//! phases they listen on through typed [`Selector`]s; the engine drives them
//! from a single traversal.

use crate::engine::RuleContext;
use momiji_core::{ExecutionContext, NodeId, NodeKind, Result};
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to a rule module
pub type RuleModuleRef = Arc<dyn RuleModule>;

/// Whether a callback fires on entering or leaving a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Leave,
}

/// One (node kind, phase) pair a visitor listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector {
    pub kind: NodeKind,
    pub phase: Phase,
}

impl Selector {
    pub fn enter(kind: NodeKind) -> Self {
        Self {
            kind,
            phase: Phase::Enter,
        }
    }

    pub fn leave(kind: NodeKind) -> Self {
        Self {
            kind,
            phase: Phase::Leave,
        }
    }

    /// Enter selectors for a set of kinds
    pub fn entering(kinds: &[NodeKind]) -> Vec<Selector> {
        kinds.iter().copied().map(Selector::enter).collect()
    }

    /// Leave selectors for a set of kinds
    pub fn leaving(kinds: &[NodeKind]) -> Vec<Selector> {
        kinds.iter().copied().map(Selector::leave).collect()
    }
}

/// Declared parameter schema of a rule module
///
/// Explicit parameter values are passed through verbatim; the two markers
/// tell the configuration builder which injected parameters the module
/// accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    /// The rule attaches secondary locations and accepts the enabling flag
    pub reports_secondary_locations: bool,
    /// The rule declares a slot for the execution-context value
    pub needs_execution_context: bool,
}

/// One resolved rule parameter
#[derive(Debug, Clone, PartialEq)]
pub enum RuleParam {
    /// Explicit configuration value from the active-rule entry
    Value(Value),
    /// Injected flag enabling secondary-location reporting
    SecondaryLocationsFlag,
    /// Injected execution-context value
    Context(ExecutionContext),
}

/// Ordered resolved parameters attached to a configured rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleParams {
    params: Vec<RuleParam>,
}

impl RuleParams {
    pub fn new(params: Vec<RuleParam>) -> Self {
        Self { params }
    }

    pub fn as_slice(&self) -> &[RuleParam] {
        &self.params
    }

    /// Explicit configuration values, in schema order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().filter_map(|param| match param {
            RuleParam::Value(value) => Some(value),
            _ => None,
        })
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values().nth(index)
    }

    pub fn integer_at(&self, index: usize) -> Option<i64> {
        self.value_at(index).and_then(Value::as_i64)
    }

    pub fn secondary_locations_enabled(&self) -> bool {
        self.params
            .iter()
            .any(|param| matches!(param, RuleParam::SecondaryLocationsFlag))
    }

    pub fn execution_context(&self) -> Option<&ExecutionContext> {
        self.params.iter().find_map(|param| match param {
            RuleParam::Context(context) => Some(context),
            _ => None,
        })
    }
}

/// Per-call visitor produced by a rule module's factory
///
/// All mutable state a rule accumulates during one analysis call lives in
/// the visitor struct itself; nothing is shared between calls.
pub trait RuleVisitor {
    /// The (kind, phase) pairs this visitor wants callbacks for
    fn selectors(&self) -> Vec<Selector>;

    fn on_enter(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let _ = (ctx, node);
        Ok(())
    }

    fn on_leave(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        let _ = (ctx, node);
        Ok(())
    }
}

/// A self-contained detection rule
pub trait RuleModule: Send + Sync {
    /// Identifier, unique within a registry
    fn id(&self) -> &'static str;

    /// Parameter schema, consulted when building configurations
    fn schema(&self) -> ParameterSchema {
        ParameterSchema::default()
    }

    /// Factory invoked once per analysis call
    fn create(&self, params: &RuleParams) -> Box<dyn RuleVisitor>;
}
