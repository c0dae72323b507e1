//! Source synthesis for gizmo.
//!
//! This crate provides:
//! - Merging of ordered source fragments into one translation unit
//! - Scanning of test fragments for `namespace` / `#test` directives
//! - Generation of the test harness entry point
//!
//! # Pipeline
//!
//! ```text
//! ordinary object:   parts ──merge──▶ <obj>.gen.cc
//! test main object:  parts + scanned test files + harness ──▶ <obj>.gen.cc
//! ```

mod error;
pub mod harness;
pub mod merge;
pub mod scan;

pub use error::{Result, SynthError};
pub use harness::{build_test_main_unit, generate_harness, TestMainUnit};
pub use merge::{merge_fragments, write_unit, LineMarkers, UnitBuilder};
pub use scan::{scan, ScanError, ScanState, ScannedFragment, TestDirective};
