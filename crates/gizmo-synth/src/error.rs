//! Error types for gizmo-synth.

use crate::scan::ScanError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for gizmo-synth operations.
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors that can occur while synthesizing a translation unit.
#[derive(Error, Diagnostic, Debug)]
pub enum SynthError {
    /// A source fragment could not be read.
    #[error("failed to read fragment {}", path.display())]
    #[diagnostic(code(gizmo::synth::read))]
    ReadFragment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generated unit could not be written.
    #[error("failed to write {}", path.display())]
    #[diagnostic(code(gizmo::synth::write))]
    WriteUnit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A test fragment contains a malformed directive.
    #[error("invalid directive in {}", path.display())]
    #[diagnostic(code(gizmo::synth::directive))]
    Directive {
        path: PathBuf,
        #[source]
        source: ScanError,
    },
}
