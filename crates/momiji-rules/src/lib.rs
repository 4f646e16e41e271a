//! Momiji Rules
//!
//! The rule-orchestration layer of the Momiji analyzer: the rule-module
//! contract, the registry that composes rule sources deterministically, the
//! MAIN/TEST configuration builder, the single-pass analysis engine, the
//! pattern-expression parser with its complexity scorer, and the built-in
//! rule catalogue.

pub mod api;
pub mod builtin;
pub mod config;
pub mod engine;
pub mod helpers;
pub mod pattern;
pub mod registry;

pub use api::{
    ParameterSchema, Phase, RuleModule, RuleModuleRef, RuleParam, RuleParams, RuleVisitor,
    Selector,
};
pub use config::{
    ConfigBuilder, Configuration, ConfiguredRule, FileTypeConfigs, RuleConfig, extend_rule_config,
};
pub use engine::{AnalysisEngine, EngineOptions, Report, RuleContext};
pub use pattern::{ComplexityScore, ComplexityScorer, Contribution, PatternError};
pub use registry::{RuleRegistry, RuleSource};
