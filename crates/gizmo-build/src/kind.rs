//! Build kinds and the optimization profile each one selects.

use crate::{BuildError, Result};
use std::fmt;
use std::str::FromStr;

/// Selected optimization/diagnostics profile for a build run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildKind {
    /// Debug-friendly optimizations, debug info.
    #[default]
    Debug,
    /// Moderate optimizations, debug info. Always used by `gizmo test`.
    Test,
    /// Most optimizations, link-time optimization.
    Safe,
    /// All optimizations, link-time optimization.
    Fast,
}

/// Compiler settings derived from a [`BuildKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Value appended to `-O`.
    pub opt_level: &'static str,
    /// Emit debugger information.
    pub debug_info: bool,
    /// Enable link-time optimization.
    pub lto: bool,
}

impl BuildKind {
    pub const ALL: [BuildKind; 4] = [
        BuildKind::Debug,
        BuildKind::Test,
        BuildKind::Safe,
        BuildKind::Fast,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildKind::Debug => "debug",
            BuildKind::Test => "test",
            BuildKind::Safe => "safe",
            BuildKind::Fast => "fast",
        }
    }

    pub fn profile(self) -> Profile {
        match self {
            BuildKind::Debug => Profile {
                opt_level: "g",
                debug_info: true,
                lto: false,
            },
            BuildKind::Test => Profile {
                opt_level: "1",
                debug_info: true,
                lto: false,
            },
            BuildKind::Safe => Profile {
                opt_level: "2",
                debug_info: false,
                lto: true,
            },
            BuildKind::Fast => Profile {
                opt_level: "fast",
                debug_info: false,
                lto: true,
            },
        }
    }
}

impl FromStr for BuildKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(BuildError::EmptyBuildKind),
            "debug" => Ok(BuildKind::Debug),
            "test" => Ok(BuildKind::Test),
            "safe" => Ok(BuildKind::Safe),
            "fast" => Ok(BuildKind::Fast),
            other => Err(BuildError::UnknownBuildKind(other.to_string())),
        }
    }
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
