//! Dual-mode configuration building
//!
//! Active-rule entries arrive from the host tagged with the file types they
//! target. Building a configuration partitions them into a MAIN and a TEST
//! rule list, resolves every key against the registry (an unknown key is a
//! configuration error, reported before any traversal starts), and extends
//! each entry's parameters with the injected values its module's schema
//! declares.

use crate::api::{ParameterSchema, RuleModuleRef, RuleParam, RuleParams};
use crate::registry::RuleRegistry;
use momiji_core::{ExecutionContext, FileType, MomijiError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One active-rule entry as sent by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule identifier in the registry
    pub key: String,
    /// Explicit configuration values, in schema order
    #[serde(default)]
    pub configurations: Vec<Value>,
    /// File types this entry applies to
    #[serde(rename = "fileTypeTarget")]
    pub file_type_targets: Vec<FileType>,
}

impl RuleConfig {
    pub fn new(key: impl Into<String>, targets: Vec<FileType>) -> Self {
        Self {
            key: key.into(),
            configurations: Vec::new(),
            file_type_targets: targets,
        }
    }

    pub fn with_configurations(mut self, configurations: Vec<Value>) -> Self {
        self.configurations = configurations;
        self
    }

    pub fn targets(&self, file_type: FileType) -> bool {
        self.file_type_targets.contains(&file_type)
    }
}

/// Extend an entry's explicit parameters with the injected ones its module
/// accepts: explicit values first, then the secondary-locations flag, then
/// the execution context
pub fn extend_rule_config(
    schema: ParameterSchema,
    input: &RuleConfig,
    context: &ExecutionContext,
) -> RuleParams {
    let mut params: Vec<RuleParam> = input
        .configurations
        .iter()
        .cloned()
        .map(RuleParam::Value)
        .collect();
    if schema.reports_secondary_locations {
        params.push(RuleParam::SecondaryLocationsFlag);
    }
    if schema.needs_execution_context {
        params.push(RuleParam::Context(context.clone()));
    }
    RuleParams::new(params)
}

/// A rule resolved to a direct module reference with its final parameters
#[derive(Clone)]
pub struct ConfiguredRule {
    pub key: String,
    pub module: RuleModuleRef,
    pub params: RuleParams,
}

impl std::fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("key", &self.key)
            .field("module", &self.module.id())
            .field("params", &self.params)
            .finish()
    }
}

/// Immutable per-file-type configuration
///
/// The rule list order is the input entry order; the engine's dispatch
/// order follows it, which keeps output ordering stable.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    rules: Vec<ConfiguredRule>,
    environments: Vec<String>,
    globals: Vec<String>,
}

impl Configuration {
    pub fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    pub fn globals(&self) -> &[String] {
        &self.globals
    }

    /// Union of the predefined globals of every declared environment and
    /// the explicit globals list, in declaration order
    pub fn declared_globals(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for environment in &self.environments {
            if let Some(globals) = ENVIRONMENT_GLOBALS.get(environment.as_str()) {
                for global in *globals {
                    if !seen.contains(global) {
                        seen.push(global);
                    }
                }
            }
        }
        for global in &self.globals {
            if !seen.contains(&global.as_str()) {
                seen.push(global.as_str());
            }
        }
        seen
    }
}

/// The two configurations one engine instance serves
#[derive(Debug)]
pub struct FileTypeConfigs {
    main: Configuration,
    test: Configuration,
}

impl FileTypeConfigs {
    pub fn get(&self, file_type: FileType) -> &Configuration {
        match file_type {
            FileType::Main => &self.main,
            FileType::Test => &self.test,
        }
    }
}

const BROWSER_GLOBALS: &[&str] = &["window", "document", "navigator", "console", "fetch"];
const NODE_GLOBALS: &[&str] = &["require", "module", "exports", "process", "__dirname"];
const ES2021_GLOBALS: &[&str] = &["globalThis", "Promise", "Proxy", "Reflect", "BigInt", "WeakRef"];
const JEST_GLOBALS: &[&str] = &["describe", "it", "test", "expect", "beforeEach", "afterEach"];
const MOCHA_GLOBALS: &[&str] = &["describe", "it", "specify", "before", "after"];

/// Predefined global-variable sets selectable by environment name
static ENVIRONMENT_GLOBALS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| {
        HashMap::from([
            ("browser", BROWSER_GLOBALS),
            ("node", NODE_GLOBALS),
            ("es2021", ES2021_GLOBALS),
            ("jest", JEST_GLOBALS),
            ("mocha", MOCHA_GLOBALS),
        ])
    });

/// Builds the MAIN and TEST configurations from the host's input
pub struct ConfigBuilder;

impl ConfigBuilder {
    /// Partition entries by target, resolve modules, and attach parameters
    ///
    /// An entry targeting both file types appears in both configurations;
    /// each side resolves its parameters independently. Referencing a rule
    /// that is not in the registry fails the whole build.
    pub fn build(
        input_rules: &[RuleConfig],
        registry: &RuleRegistry,
        environments: &[String],
        globals: &[String],
        context: &ExecutionContext,
    ) -> Result<FileTypeConfigs> {
        let main = Self::build_one(input_rules, registry, environments, globals, context, FileType::Main)?;
        let test = Self::build_one(input_rules, registry, environments, globals, context, FileType::Test)?;
        Ok(FileTypeConfigs { main, test })
    }

    fn build_one(
        input_rules: &[RuleConfig],
        registry: &RuleRegistry,
        environments: &[String],
        globals: &[String],
        context: &ExecutionContext,
        file_type: FileType,
    ) -> Result<Configuration> {
        let mut rules = Vec::new();
        for input in input_rules.iter().filter(|input| input.targets(file_type)) {
            let module = registry.get(&input.key).ok_or_else(|| {
                MomijiError::config_error(format!(
                    "Active rule '{}' is not registered in any rule source",
                    input.key
                ))
            })?;
            let params = extend_rule_config(module.schema(), input, context);
            rules.push(ConfiguredRule {
                key: input.key.clone(),
                module: module.clone(),
                params,
            });
        }
        tracing::debug!(
            "Built {} configuration with {} active rules",
            file_type,
            rules.len()
        );
        Ok(Configuration {
            rules,
            environments: environments.to_vec(),
            globals: globals.to_vec(),
        })
    }
}
