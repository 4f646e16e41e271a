//! Encoded-message envelope for findings with secondary evidence
//!
//! The host receives one structured (location, message) pair per diagnostic.
//! Secondary locations and the numeric cost therefore ride inside the
//! message, serialized as JSON. Encoding is mandatory whenever such data
//! exists; a finding with secondary evidence but a plain message would lose
//! it at the process boundary.

use super::{Finding, OutputDiagnostic, SecondaryLocation};
use serde::{Deserialize, Serialize};

/// One secondary range as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedLocation {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&SecondaryLocation> for EncodedLocation {
    fn from(secondary: &SecondaryLocation) -> Self {
        Self {
            line: secondary.location.line,
            column: secondary.location.column,
            end_line: secondary.location.end_line,
            end_column: secondary.location.end_column,
            message: secondary.message.clone(),
        }
    }
}

/// The message envelope carrying secondary evidence across the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedMessage {
    pub message: String,
    pub secondary_locations: Vec<EncodedLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl EncodedMessage {
    /// Parse an envelope back out of a diagnostic message
    ///
    /// Returns `None` for plain-text messages.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Normalizes raw findings into the stable output diagnostic shape
pub struct DiagnosticEncoder;

impl DiagnosticEncoder {
    /// Encode one finding
    ///
    /// A finding without secondary locations and without cost passes its
    /// message through unchanged.
    pub fn encode(finding: &Finding) -> OutputDiagnostic {
        let message = if finding.has_secondary_data() {
            let envelope = EncodedMessage {
                message: finding.message.clone(),
                secondary_locations: finding.secondary_locations.iter().map(Into::into).collect(),
                cost: finding.cost,
            };
            serde_json::to_string(&envelope).unwrap_or_else(|err| {
                tracing::error!("Failed to serialize message envelope: {err}");
                finding.message.clone()
            })
        } else {
            finding.message.clone()
        };

        OutputDiagnostic {
            rule_id: finding.rule_id.clone(),
            message,
            location: finding.location.clone(),
        }
    }

    /// Encode a batch of findings, preserving order
    pub fn encode_all(findings: &[Finding]) -> Vec<OutputDiagnostic> {
        findings.iter().map(Self::encode).collect()
    }
}
