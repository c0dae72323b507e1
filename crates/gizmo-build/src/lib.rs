//! Manifest model and build-kind configuration for gizmo.
//!
//! This crate provides:
//! - The build manifest format (`build.json`, `test.json`)
//! - Local build settings (`.build.env`)
//! - Build kinds and the compiler profile each one selects
//!
//! # Example
//!
//! ```json
//! [
//!   {
//!     "name": "game",
//!     "kind": "exe",
//!     "recipes": [
//!       {
//!         "target": { "os": "linux", "arch": "amd64" },
//!         "objects": [
//!           { "name": "main", "kind": "c++", "parts": ["core/prelude.cpp", "main.cpp"] },
//!           { "name": "start", "kind": "asm", "parts": ["start.s"] }
//!         ]
//!       }
//!     ]
//!   }
//! ]
//! ```

mod env;
mod error;
mod kind;
mod manifest;

pub use env::{LocalBuildConfig, LOCAL_CONFIG_FILE};
pub use error::{BuildError, Result};
pub use kind::{BuildKind, Profile};
pub use manifest::{
    BuildItem, Manifest, ObjectItem, ObjectKind, Recipe, Target, BUILD_MANIFEST, MAIN_OBJECT,
    TEST_ITEM_KIND, TEST_MANIFEST,
};
