//! Per-step build state and output layout.
//!
//! ```text
//! build/<item>/<kind>/cache/<object>.gen.cc   generated unit
//! build/<item>/<kind>/cache/<object>.o        object file
//! build/<item>/<kind>/bin/<item>              linked executable
//! build/<item>.test/{cache,bin}/...           same, for test builds
//! ```

use gizmo_build::{BuildKind, ObjectItem};
use std::path::{Path, PathBuf};

/// State for one compile or link step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Output of the current step.
    pub file_path: PathBuf,
    pub bin_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub kind: BuildKind,
}

impl BuildContext {
    /// Context for an ordinary build of `item` under `build_root`.
    pub fn for_build(build_root: &Path, item: &str, kind: BuildKind) -> Self {
        let base = build_root.join(item).join(kind.as_str());
        Self {
            file_path: PathBuf::new(),
            bin_dir: base.join("bin"),
            cache_dir: base.join("cache"),
            kind,
        }
    }

    /// Context for a test build of `item`. Always uses [`BuildKind::Test`].
    pub fn for_test(build_root: &Path, item: &str) -> Self {
        let base = build_root.join(format!("{item}.test"));
        Self {
            file_path: PathBuf::new(),
            bin_dir: base.join("bin"),
            cache_dir: base.join("cache"),
            kind: BuildKind::Test,
        }
    }

    /// Copy of this context writing to `file_path`.
    pub fn with_file_path(&self, file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..self.clone()
        }
    }

    pub fn object_path(&self, object: &ObjectItem) -> PathBuf {
        self.cache_dir.join(object.object_file_name())
    }

    /// Generated translation unit for `object`.
    pub fn unit_path(&self, object: &ObjectItem) -> PathBuf {
        self.cache_dir.join(format!("{}.gen.cc", object.name))
    }

    pub fn binary_path(&self, item: &str) -> PathBuf {
        self.bin_dir.join(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str) -> ObjectItem {
        ObjectItem {
            name: name.to_string(),
            kind: "c++".to_string(),
            parts: vec!["a.cpp".to_string()],
            ext_headers: Vec::new(),
        }
    }

    #[test]
    fn test_build_layout() {
        let ctx = BuildContext::for_build(Path::new("build"), "game", BuildKind::Safe);
        assert_eq!(ctx.cache_dir, Path::new("build/game/safe/cache"));
        assert_eq!(ctx.bin_dir, Path::new("build/game/safe/bin"));
        assert_eq!(ctx.object_path(&object("main")), Path::new("build/game/safe/cache/main.o"));
        assert_eq!(
            ctx.unit_path(&object("main")),
            Path::new("build/game/safe/cache/main.gen.cc")
        );
        assert_eq!(ctx.binary_path("game"), Path::new("build/game/safe/bin/game"));
    }

    #[test]
    fn test_test_layout() {
        let ctx = BuildContext::for_test(Path::new("build"), "core");
        assert_eq!(ctx.kind, BuildKind::Test);
        assert_eq!(ctx.cache_dir, Path::new("build/core.test/cache"));
        assert_eq!(ctx.bin_dir, Path::new("build/core.test/bin"));
    }

    #[test]
    fn test_with_file_path_keeps_dirs() {
        let ctx = BuildContext::for_build(Path::new("out"), "x", BuildKind::Debug);
        let step = ctx.with_file_path("out/x/debug/cache/a.o");
        assert_eq!(step.file_path, Path::new("out/x/debug/cache/a.o"));
        assert_eq!(step.cache_dir, ctx.cache_dir);
        assert_eq!(step.kind, ctx.kind);
        assert_eq!(ctx.file_path, PathBuf::new());
    }
}
