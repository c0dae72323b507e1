//! Test harness generation.
//!
//! The harness is the `main` of a test binary. It runs every discovered test
//! once, in discovery order, and exits with status 1 if any of them failed.

use crate::merge::{read_fragment, LineMarkers, UnitBuilder};
use crate::scan::{self, TestDirective};
use crate::{Result, SynthError};
use std::fmt::Write;
use std::path::Path;

/// Per-test result object constructed by the harness.
const TEST_TYPE: &str = "coven::gtf::Test";

/// Emit the harness entry point calling `tests` in order.
pub fn generate_harness<S: AsRef<str>>(tests: &[S]) -> String {
    let mut out = String::new();

    out.push_str("fn i32 main() noexcept {\n");
    out.push_str("    var usz failed_tests_counter = 0;\n\n");

    for name in tests {
        let name = name.as_ref();
        // writing to a String cannot fail
        let _ = write!(
            out,
            "    {{\n\
             \x20       var {TEST_TYPE} t = {TEST_TYPE}(str(), macro_static_str(\"{name}\"));\n\
             \x20       {name}(t);\n\
             \x20       if (!t.is_ok()) {{\n\
             \x20           failed_tests_counter += 1;\n\
             \x20           t.report();\n\
             \x20       }}\n\
             \x20   }}\n\n"
        );
    }

    out.push_str("    os::stdout.flush();\n\n");
    out.push_str("    if (failed_tests_counter != 0) {\n");
    out.push_str("        return 1;\n");
    out.push_str("    }\n\n");
    out.push_str("    return 0;\n");
    out.push_str("}\n");

    out
}

/// Generated source of a test binary's `main` object.
#[derive(Debug, Clone)]
pub struct TestMainUnit {
    pub contents: Vec<u8>,
    /// Tests called by the harness, in call order.
    pub tests: Vec<TestDirective>,
}

impl TestMainUnit {
    pub fn qualified_names(&self) -> Vec<String> {
        self.tests.iter().map(TestDirective::qualified_name).collect()
    }
}

/// Build the unit for a test binary's `main` object.
///
/// The object's own parts come first, then each test file with its
/// directives stripped, then the harness. No `#line` markers are emitted
/// since stripping shifts line numbers in the test files.
pub fn build_test_main_unit(
    source_root: &Path,
    parts: &[String],
    ext_headers: &[String],
    test_files: &[String],
) -> Result<TestMainUnit> {
    let mut unit = UnitBuilder::new(ext_headers);

    for part in parts {
        let path = source_root.join(part);
        let contents = read_fragment(&path)?;
        unit.push_fragment(&path, &contents, LineMarkers::Keep);
    }

    let mut tests = Vec::new();
    for file in test_files {
        let path = source_root.join(file);
        let text = read_fragment(&path)?;
        let scanned = scan::scan(&text).map_err(|source| SynthError::Directive {
            path: path.clone(),
            source,
        })?;
        log::debug!("{}: {} tests", path.display(), scanned.tests.len());

        unit.push_fragment(&path, &scanned.source, LineMarkers::Keep);
        tests.extend(scanned.tests);
    }

    let names: Vec<String> = tests.iter().map(TestDirective::qualified_name).collect();
    unit.push_text(&generate_harness(&names));

    Ok(TestMainUnit {
        contents: unit.finish(),
        tests,
    })
}
