//! Error types for gizmo-driver.

use gizmo_build::BuildError;
use gizmo_synth::SynthError;
use miette::Diagnostic;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for gizmo-driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that abort a build.
#[derive(Error, Diagnostic, Debug)]
pub enum DriverError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Synth(#[from] SynthError),

    /// Output directory could not be created.
    #[error("failed to create directory {}", path.display())]
    #[diagnostic(code(gizmo::driver::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External tool could not be started.
    #[error("failed to run {}", program.display())]
    #[diagnostic(code(gizmo::toolchain::spawn), help("is the toolchain installed and on PATH?"))]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External tool ran and reported failure. Its own output has already
    /// been passed through.
    #[error("{} failed: {status}", program.display())]
    #[diagnostic(code(gizmo::toolchain::failed))]
    ToolFailed { program: PathBuf, status: ExitStatus },

    #[error("build {kind} object {name}")]
    #[diagnostic(code(gizmo::driver::object))]
    Object {
        kind: String,
        name: String,
        #[source]
        source: Box<DriverError>,
    },

    #[error("build {name}")]
    #[diagnostic(code(gizmo::driver::item))]
    Item {
        name: String,
        #[source]
        source: Box<DriverError>,
    },

    #[error("test {name}")]
    #[diagnostic(code(gizmo::driver::test))]
    Test {
        name: String,
        #[source]
        source: Box<DriverError>,
    },
}

impl DriverError {
    /// Innermost error, below all item and object context.
    pub fn root_cause(&self) -> &DriverError {
        match self {
            DriverError::Object { source, .. }
            | DriverError::Item { source, .. }
            | DriverError::Test { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
