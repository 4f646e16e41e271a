//! Momiji Core
//!
//! Core types for the Momiji analysis engine: the syntax-tree arena the
//! engine traverses, the diagnostic model (findings, secondary locations,
//! the encoded-message envelope), the analysis-call context, and the error
//! taxonomy shared across the workspace.

pub mod ast;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod result;

// Re-export commonly used types
pub use ast::{
    LineIndex, NodeData, NodeId, NodeKind, SyntaxNode, SyntaxTree, TreeBuilder, text_range,
};
pub use context::{ExecutionContext, FileType};
pub use diagnostics::{
    DiagnosticEncoder, EncodedLocation, EncodedMessage, Finding, Location, OutputDiagnostic,
    SecondaryLocation,
};
pub use error::{ErrorKind, MomijiError};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("momiji=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
