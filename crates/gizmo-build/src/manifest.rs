//! Build manifest types (`build.json` / `test.json` format).

use crate::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Manifest read by `gizmo build`.
pub const BUILD_MANIFEST: &str = "build.json";

/// Manifest read by `gizmo test`.
pub const TEST_MANIFEST: &str = "test.json";

/// Item kind marking a test binary.
pub const TEST_ITEM_KIND: &str = "test";

/// Name of the object whose source is replaced by the generated test harness.
pub const MAIN_OBJECT: &str = "main";

/// A named unit of build work producing one executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildItem {
    pub name: String,

    /// Free-form item kind; `"test"` marks a test binary.
    #[serde(default)]
    pub kind: String,

    /// Only the first recipe is used.
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

/// Concrete object list (and test sources) for one target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub target: Target,

    /// Test source fragments scanned for `#test` directives.
    #[serde(default)]
    pub tests: Vec<String>,

    #[serde(default)]
    pub objects: Vec<ObjectItem>,
}

/// Target platform. Recorded, never resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub arch: String,
}

/// Build instructions for one object file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectItem {
    /// Object name; the object file is written as `<name>.o`.
    pub name: String,

    /// Raw kind string, resolved with [`ObjectItem::object_kind`].
    pub kind: String,

    /// Ordered source fragments, relative to the source root.
    #[serde(default)]
    pub parts: Vec<String>,

    /// Headers emitted as `#include <...>` ahead of the fragments.
    #[serde(default)]
    pub ext_headers: Vec<String>,
}

/// Kind of an object file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Fragments merged into one C++ translation unit.
    Cpp,
    /// Assembly sources passed straight to the assembler.
    Asm,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Cpp => "c++",
            ObjectKind::Asm => "asm",
        }
    }
}

impl FromStr for ObjectKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "c++" => Ok(ObjectKind::Cpp),
            "asm" => Ok(ObjectKind::Asm),
            other => Err(BuildError::UnknownObjectKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All build items of one manifest, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: Vec<BuildItem>,
}

impl Manifest {
    pub fn new(items: Vec<BuildItem>) -> Self {
        Self { items }
    }

    /// Load a manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BuildError::ReadManifest {
            path: path.to_path_buf(),
            source,
        })?;
        let items = serde_json::from_str(&content).map_err(|source| BuildError::ParseManifest {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded manifest {}", path.display());
        Ok(Self { items })
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let items = serde_json::from_str(json)?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[BuildItem] {
        &self.items
    }

    /// Find an item by name.
    pub fn find_item(&self, name: &str) -> Result<&BuildItem> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| BuildError::ItemNotFound(name.to_string()))
    }
}

impl BuildItem {
    pub fn is_test(&self) -> bool {
        self.kind == TEST_ITEM_KIND
    }

    /// The recipe that gets built. Additional recipes are ignored.
    pub fn recipe(&self) -> Result<&Recipe> {
        self.recipes.first().ok_or(BuildError::NoRecipe)
    }

    /// First recipe, checked for an ordinary build.
    pub fn ordinary_recipe(&self) -> Result<&Recipe> {
        let recipe = self.recipe()?;
        if recipe.objects.is_empty() {
            return Err(BuildError::NoObjects);
        }
        Ok(recipe)
    }

    /// First recipe, checked for a test build.
    ///
    /// Besides the ordinary checks, the recipe must list at least one test
    /// file and exactly one `c++` object named `main`, which the generated
    /// harness fills in.
    pub fn test_recipe(&self) -> Result<&Recipe> {
        if !self.is_test() {
            return Err(BuildError::NotTestItem);
        }
        let recipe = self.ordinary_recipe()?;
        if recipe.tests.is_empty() {
            return Err(BuildError::NoTestFiles);
        }
        match recipe.objects.iter().filter(|o| o.is_test_main()).count() {
            0 => Err(BuildError::NoMainObject),
            1 => Ok(recipe),
            _ => Err(BuildError::DuplicateMainObject),
        }
    }
}

impl ObjectItem {
    /// Resolve the raw kind string.
    pub fn object_kind(&self) -> Result<ObjectKind> {
        self.kind.parse()
    }

    /// Resolve the kind and check that there is something to compile.
    pub fn validate(&self) -> Result<ObjectKind> {
        let kind = self.object_kind()?;
        if self.parts.is_empty() {
            return Err(BuildError::EmptyParts(self.name.clone()));
        }
        Ok(kind)
    }

    /// Whether this is the slot the test harness is generated into.
    pub fn is_test_main(&self) -> bool {
        self.name == MAIN_OBJECT && matches!(self.object_kind(), Ok(ObjectKind::Cpp))
    }

    /// Object file name derived from the object name.
    pub fn object_file_name(&self) -> String {
        format!("{}.o", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, kind: &str, parts: &[&str]) -> ObjectItem {
        ObjectItem {
            name: name.to_string(),
            kind: kind.to_string(),
            parts: parts.iter().map(|s| s.to_string()).collect(),
            ext_headers: Vec::new(),
        }
    }

    fn test_item(objects: Vec<ObjectItem>, tests: &[&str]) -> BuildItem {
        BuildItem {
            name: "core".to_string(),
            kind: "test".to_string(),
            recipes: vec![Recipe {
                target: Target::default(),
                tests: tests.iter().map(|s| s.to_string()).collect(),
                objects,
            }],
        }
    }

    #[test]
    fn test_parse_manifest() {
        let json = r#"[
            {
                "name": "game",
                "kind": "exe",
                "recipes": [
                    {
                        "target": { "os": "linux", "arch": "amd64" },
                        "objects": [
                            {
                                "name": "main",
                                "kind": "c++",
                                "parts": ["core/prelude.cpp", "game.cpp", "main.cpp"],
                                "ext_headers": ["stdint.h"]
                            },
                            {
                                "name": "start",
                                "kind": "asm",
                                "parts": ["start_linux_amd64.s"]
                            }
                        ]
                    }
                ]
            }
        ]"#;

        let manifest = Manifest::from_json(json).unwrap();
        assert_eq!(manifest.items().len(), 1);

        let item = manifest.find_item("game").unwrap();
        assert!(!item.is_test());

        let recipe = item.ordinary_recipe().unwrap();
        assert_eq!(recipe.target.os, "linux");
        assert_eq!(recipe.target.arch, "amd64");
        assert!(recipe.tests.is_empty());
        assert_eq!(recipe.objects.len(), 2);
        assert_eq!(recipe.objects[0].parts[1], "game.cpp");
        assert_eq!(recipe.objects[0].ext_headers, vec!["stdint.h"]);
        assert_eq!(recipe.objects[1].object_kind().unwrap(), ObjectKind::Asm);
        assert!(recipe.objects[1].ext_headers.is_empty());
    }

    #[test]
    fn test_find_item_in_built_manifest() {
        let manifest = Manifest::new(vec![
            test_item(vec![object("main", "c++", &["m.cpp"])], &["t.cpp"]),
        ]);
        let name = manifest.items()[0].name.clone();
        assert_eq!(manifest.find_item(&name).unwrap().name, name);
    }

    #[test]
    fn test_find_missing_item() {
        let manifest = Manifest::from_json("[]").unwrap();
        let err = manifest.find_item("nope").unwrap_err();
        assert!(matches!(err, BuildError::ItemNotFound(ref n) if n == "nope"));
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(Manifest::from_json(r#"{"name": "not an array"}"#).is_err());
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.json");

        let err = Manifest::from_file(&path).unwrap_err();
        assert!(matches!(err, BuildError::ReadManifest { .. }));

        std::fs::write(&path, "[{").unwrap();
        let err = Manifest::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("build.json"));
    }

    #[test]
    fn test_only_first_recipe_is_used() {
        let mut item = test_item(vec![object("main", "c++", &["a.cpp"])], &["t.cpp"]);
        item.recipes.push(Recipe::default());
        assert_eq!(item.recipe().unwrap().objects.len(), 1);
    }

    #[test]
    fn test_ordinary_recipe_checks() {
        let item = BuildItem {
            name: "x".to_string(),
            kind: String::new(),
            recipes: Vec::new(),
        };
        assert!(matches!(item.ordinary_recipe(), Err(BuildError::NoRecipe)));

        let item = BuildItem {
            recipes: vec![Recipe::default()],
            ..item
        };
        assert!(matches!(item.ordinary_recipe(), Err(BuildError::NoObjects)));
    }

    #[test]
    fn test_test_recipe_checks() {
        let ok = test_item(
            vec![object("util", "c++", &["u.cpp"]), object("main", "c++", &["m.cpp"])],
            &["t.cpp"],
        );
        assert!(ok.test_recipe().is_ok());

        let not_test = BuildItem {
            kind: "exe".to_string(),
            ..ok.clone()
        };
        assert!(matches!(not_test.test_recipe(), Err(BuildError::NotTestItem)));

        let no_tests = test_item(vec![object("main", "c++", &["m.cpp"])], &[]);
        assert!(matches!(no_tests.test_recipe(), Err(BuildError::NoTestFiles)));

        // an asm object named main does not count
        let asm_main = test_item(vec![object("main", "asm", &["m.s"])], &["t.cpp"]);
        assert!(matches!(asm_main.test_recipe(), Err(BuildError::NoMainObject)));

        let two_mains = test_item(
            vec![object("main", "c++", &["a.cpp"]), object("main", "c++", &["b.cpp"])],
            &["t.cpp"],
        );
        assert!(matches!(
            two_mains.test_recipe(),
            Err(BuildError::DuplicateMainObject)
        ));
    }

    #[test]
    fn test_object_validation() {
        assert_eq!(object("a", "c++", &["a.cpp"]).validate().unwrap(), ObjectKind::Cpp);
        assert!(matches!(
            object("a", "c++", &[]).validate(),
            Err(BuildError::EmptyParts(ref n)) if n == "a"
        ));
        assert!(matches!(
            object("a", "rust", &["a.rs"]).validate(),
            Err(BuildError::UnknownObjectKind(ref k)) if k == "rust"
        ));
        assert_eq!(object("boot", "asm", &["b.s"]).object_file_name(), "boot.o");
    }
}
