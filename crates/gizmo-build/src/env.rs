//! Local build settings read from `.build.env`.
//!
//! The file holds `KEY=VALUE` lines. Blank lines and `#` comments are
//! skipped, as are lines that do not split into exactly one key and one
//! value. Only `BUILD_KIND` is recognized; other keys are ignored.

use crate::{BuildKind, Result};
use std::path::Path;

/// Default local settings file name, relative to the project root.
pub const LOCAL_CONFIG_FILE: &str = ".build.env";

const BUILD_KIND_KEY: &str = "BUILD_KIND";

/// Settings from the local environment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBuildConfig {
    /// Raw `BUILD_KIND` value. Checked by [`LocalBuildConfig::kind`].
    pub kind: String,
}

impl Default for LocalBuildConfig {
    fn default() -> Self {
        Self {
            kind: BuildKind::default().as_str().to_string(),
        }
    }
}

impl LocalBuildConfig {
    /// Read the settings file, falling back to defaults when it cannot be read.
    ///
    /// Invalid UTF-8 is replaced rather than treated as a missing file.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => Self::parse(&String::from_utf8_lossy(&bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no local build settings at {}", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("using default build settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings text. Never fails; suspicious lines are skipped.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut split = line.split('=');
            let (Some(name), Some(value), None) = (split.next(), split.next(), split.next()) else {
                log::debug!("skipping line {} of local settings: {}", index + 1, line);
                continue;
            };

            match name.trim() {
                BUILD_KIND_KEY => config.kind = value.trim().to_string(),
                _ => {}
            }
        }

        config
    }

    /// Validate the configured kind.
    pub fn kind(&self) -> Result<BuildKind> {
        self.kind.parse()
    }
}
