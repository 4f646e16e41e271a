//! Analysis-call metadata shared with rule modules

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification of a source file driving which rule configuration applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "MAIN")]
    Main,
    #[serde(rename = "TEST")]
    Test,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Main => "MAIN",
            FileType::Test => "TEST",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution-context value injected into rules whose parameter schema
/// declares a context slot
///
/// Passed explicitly through configuration building; there is no process
/// global involved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    /// Working directory of the analysis host
    pub work_dir: PathBuf,
    /// Whether a type-checker is available to rules
    pub type_checking: bool,
    /// Whether the analyzed code is embedded in another document
    pub embedded: bool,
}
