//! Error types for gizmo-build.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for gizmo-build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised while loading the manifest, resolving the build kind or
/// validating a recipe.
#[derive(Error, Diagnostic, Debug)]
pub enum BuildError {
    /// Failed to read the manifest file.
    #[error("failed to read manifest {}", path.display())]
    #[diagnostic(code(gizmo::manifest::read))]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode the manifest JSON.
    #[error("failed to parse manifest {}", path.display())]
    #[diagnostic(code(gizmo::manifest::parse))]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `BUILD_KIND` was set to an empty value.
    #[error("build kind cannot be empty")]
    #[diagnostic(
        code(gizmo::kind::empty),
        help("set BUILD_KIND to one of: debug, test, safe, fast")
    )]
    EmptyBuildKind,

    /// `BUILD_KIND` names a kind that does not exist.
    #[error("unknown build kind: {0}")]
    #[diagnostic(
        code(gizmo::kind::unknown),
        help("set BUILD_KIND to one of: debug, test, safe, fast")
    )]
    UnknownBuildKind(String),

    /// No item with the requested name in the manifest.
    #[error("build item {0} not found")]
    #[diagnostic(code(gizmo::manifest::item_not_found))]
    ItemNotFound(String),

    /// Test command was pointed at an item whose kind is not `test`.
    #[error("not a test item")]
    #[diagnostic(code(gizmo::recipe::not_test))]
    NotTestItem,

    #[error("no recipe")]
    #[diagnostic(code(gizmo::recipe::missing))]
    NoRecipe,

    #[error("no objects in recipe")]
    #[diagnostic(code(gizmo::recipe::no_objects))]
    NoObjects,

    #[error("no test files in recipe")]
    #[diagnostic(code(gizmo::recipe::no_tests))]
    NoTestFiles,

    #[error("no main object in recipe")]
    #[diagnostic(
        code(gizmo::recipe::no_main),
        help("test recipes need exactly one object named \"main\" of kind \"c++\"")
    )]
    NoMainObject,

    #[error("more than one main object in recipe")]
    #[diagnostic(code(gizmo::recipe::duplicate_main))]
    DuplicateMainObject,

    /// Object declared without any source fragments.
    #[error("object {0} has no parts")]
    #[diagnostic(code(gizmo::recipe::no_parts))]
    EmptyParts(String),

    #[error("unknown object kind={0}")]
    #[diagnostic(code(gizmo::recipe::object_kind), help("supported kinds: c++, asm"))]
    UnknownObjectKind(String),
}
