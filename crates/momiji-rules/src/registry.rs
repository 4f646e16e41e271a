//! Rule registry: deterministic composition of rule sources
//!
//! Sources are merged in caller-specified order; a later source overwrites
//! an earlier one for the same rule identifier. An override is a deliberate
//! act (more specific bundles shadow built-in definitions), never a fault.

use crate::api::RuleModuleRef;
use indexmap::IndexMap;

/// A named provider of zero or more rule modules
#[derive(Clone)]
pub struct RuleSource {
    name: &'static str,
    modules: Vec<RuleModuleRef>,
}

impl RuleSource {
    pub fn new(name: &'static str, modules: Vec<RuleModuleRef>) -> Self {
        Self { name, modules }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn modules(&self) -> &[RuleModuleRef] {
        &self.modules
    }
}

/// Mapping from rule identifier to rule module
///
/// Iteration order is insertion order, which keeps downstream configuration
/// and dispatch deterministic.
#[derive(Default)]
pub struct RuleRegistry {
    rules: IndexMap<&'static str, RuleModuleRef>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field(
                "rules",
                &self.rules.keys().copied().collect::<Vec<&'static str>>(),
            )
            .finish()
    }
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an ordered list of sources; later sources win ties
    pub fn merge(sources: &[RuleSource]) -> Self {
        let mut registry = Self::new();
        for source in sources {
            for module in source.modules() {
                registry.register(source.name(), module.clone());
            }
        }
        registry
    }

    /// Register a single module with override semantics
    pub fn register(&mut self, source_name: &str, module: RuleModuleRef) {
        let id = module.id();
        if self.rules.insert(id, module).is_some() {
            tracing::debug!("Rule '{id}' overridden by source '{source_name}'");
        }
    }

    /// Register caller-supplied modules not bundled in any source
    pub fn register_custom(&mut self, modules: impl IntoIterator<Item = RuleModuleRef>) {
        for module in modules {
            self.register("custom", module);
        }
    }

    pub fn get(&self, id: &str) -> Option<&RuleModuleRef> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// All registered rule identifiers, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
