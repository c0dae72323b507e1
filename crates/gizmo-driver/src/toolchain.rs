//! Compiler, assembler and linker invocation.
//!
//! Every tool runs to completion with its stdout/stderr connected to ours,
//! so diagnostics reach the user unmodified. A failed run is never retried.

use crate::{DriverError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default C++ compiler, also used as the linker driver.
pub const DEFAULT_COMPILER: &str = "g++";

/// Default assembler.
pub const DEFAULT_ASSEMBLER: &str = "as";

/// External programs used by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiles generated units and links the final binary.
    pub compiler: PathBuf,
    /// Assembles `asm` objects.
    pub assembler: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            assembler: PathBuf::from(DEFAULT_ASSEMBLER),
        }
    }
}

impl Toolchain {
    pub fn new(compiler: impl Into<PathBuf>, assembler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
            assembler: assembler.into(),
        }
    }

    /// Run the compiler on a generated unit.
    pub fn compile(&self, args: &[OsString]) -> Result<()> {
        run(&self.compiler, args)
    }

    /// Run the assembler.
    pub fn assemble(&self, args: &[OsString]) -> Result<()> {
        run(&self.assembler, args)
    }

    /// Link object files through the compiler driver.
    pub fn link(&self, args: &[OsString]) -> Result<()> {
        // TODO: link external libraries once the manifest can declare them
        run(&self.compiler, args)
    }
}

/// Run `program` with `args`, blocking until it exits.
pub fn run(program: &Path, args: &[OsString]) -> Result<()> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    log::debug!("running {} {:?}", program.display(), args);

    let status = cmd.status().map_err(|source| DriverError::Spawn {
        program: program.to_path_buf(),
        source,
    })?;

    if !status.success() {
        return Err(DriverError::ToolFailed {
            program: program.to_path_buf(),
            status,
        });
    }

    Ok(())
}
