//! Diagnostic model: findings produced during traversal and the output
//! shape consumed by the reporting host

mod encode;

pub use encode::{DiagnosticEncoder, EncodedLocation, EncodedMessage};

use crate::ast::LineIndex;
use biome_text_size::TextRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A range in a source file
///
/// Lines are 1-based, columns 0-based, matching the wire convention of the
/// encoded-message envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(
        file: impl Into<PathBuf>,
        line: u32,
        column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Convert a byte range into a location using the file's line index
    pub fn from_range(file: impl Into<PathBuf>, index: &LineIndex, range: TextRange) -> Self {
        let (line, column) = index.line_col(range.start());
        let (end_line, end_column) = index.line_col(range.end());
        Self {
            file: file.into(),
            line,
            column,
            end_line,
            end_column,
        }
    }
}

/// Auxiliary source range attached to a primary finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryLocation {
    pub location: Location,
    pub message: Option<String>,
}

impl SecondaryLocation {
    pub fn new(location: Location, message: Option<String>) -> Self {
        Self { location, message }
    }
}

/// One raw detected issue produced during traversal
///
/// Immutable once created; the engine owns the collection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub location: Location,
    pub message: String,
    pub secondary_locations: Vec<SecondaryLocation>,
    pub cost: Option<f64>,
}

impl Finding {
    pub fn new(rule_id: impl Into<String>, location: Location, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            location,
            message: message.into(),
            secondary_locations: Vec::new(),
            cost: None,
        }
    }

    pub fn with_secondary_locations(mut self, secondary: Vec<SecondaryLocation>) -> Self {
        self.secondary_locations = secondary;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Whether this finding carries data that must travel in the envelope
    pub fn has_secondary_data(&self) -> bool {
        !self.secondary_locations.is_empty() || self.cost.is_some()
    }
}

/// Stable output shape handed to the reporting host
///
/// The primary location/message pair is the only structured data guaranteed
/// to survive the process boundary; secondary evidence travels inside the
/// message as an [`EncodedMessage`] envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDiagnostic {
    pub rule_id: String,
    pub message: String,
    pub location: Location,
}

/// Location helper for tests and hosts that already know line/column pairs
pub fn location(file: &Path, start: (u32, u32), end: (u32, u32)) -> Location {
    Location::new(file, start.0, start.1, end.0, end.1)
}
