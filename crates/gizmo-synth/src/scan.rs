//! Test directive scanning.
//!
//! Test sources mark test functions with a `#test <name>` line placed in
//! front of the function. The enclosing namespace comes from the most recent
//! `namespace <name>` line. Directive lines are build-time annotations and
//! are stripped from the emitted source; namespace lines are kept.
//!
//! ```text
//! namespace coven::fmt {     // kept, current namespace = "coven::fmt"
//! #test test_format_int      // stripped, discovers "coven::fmt::test_format_int"
//! fn void test_format_int(Test& t) noexcept { ... }
//! }
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Directive marking the next function as a test.
pub const TEST_DIRECTIVE: &str = "#test";

/// Keyword that sets the current namespace.
pub const NAMESPACE_KEYWORD: &str = "namespace";

/// Errors produced while scanning a test fragment.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("bad #test line {line}: {text}")]
    #[diagnostic(code(gizmo::scan::test), help("expected `#test <function name>`"))]
    MalformedTest { line: usize, text: String },

    #[error("bad namespace line {line}: {text}")]
    #[diagnostic(code(gizmo::scan::namespace), help("expected `namespace <name>`"))]
    MalformedNamespace { line: usize, text: String },
}

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `namespace <name> ...`, carrying the name.
    Namespace(&'a str),
    /// `#test <name> ...`, carrying the function name.
    Test(&'a str),
    /// Anything else.
    Source,
}

impl Line<'_> {
    /// Whether the line belongs in the compiled output.
    pub fn is_emitted(&self) -> bool {
        !matches!(self, Line::Test(_))
    }
}

/// A test function discovered in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDirective {
    /// Namespace in effect at the directive; empty if none was declared yet.
    pub namespace: String,
    /// Bare function name.
    pub function: String,
    /// 1-based line of the `#test` directive.
    pub line: usize,
}

impl TestDirective {
    /// `namespace::function`, as called from the harness.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace, self.function)
    }
}

/// Classify one line. `line_no` is only used for error reporting.
///
/// Lines are raw bytes; only the directive names have to be UTF-8.
pub fn classify(line_no: usize, raw: &[u8]) -> Result<Line<'_>, ScanError> {
    let line = trim_ascii(raw);

    if line.starts_with(TEST_DIRECTIVE.as_bytes()) {
        return second_token(line)
            .map(Line::Test)
            .ok_or_else(|| ScanError::MalformedTest {
                line: line_no,
                text: String::from_utf8_lossy(line).into_owned(),
            });
    }

    if line.starts_with(NAMESPACE_KEYWORD.as_bytes()) {
        return second_token(line)
            .map(Line::Namespace)
            .ok_or_else(|| ScanError::MalformedNamespace {
                line: line_no,
                text: String::from_utf8_lossy(line).into_owned(),
            });
    }

    Ok(Line::Source)
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

fn second_token(line: &[u8]) -> Option<&str> {
    let token = line
        .split(u8::is_ascii_whitespace)
        .filter(|t| !t.is_empty())
        .nth(1)?;
    std::str::from_utf8(token).ok()
}

/// Namespace tracking for one fragment scan.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    namespace: Option<String>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current namespace, if one has been declared.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Apply a classified line, returning the test it declares, if any.
    pub fn observe(&mut self, line_no: usize, line: Line<'_>) -> Option<TestDirective> {
        match line {
            Line::Namespace(name) => {
                self.namespace = Some(name.to_string());
                None
            }
            Line::Test(function) => {
                if self.namespace.is_none() {
                    log::warn!(
                        "line {}: test {} declared before any namespace",
                        line_no,
                        function
                    );
                }
                Some(TestDirective {
                    namespace: self.namespace.clone().unwrap_or_default(),
                    function: function.to_string(),
                    line: line_no,
                })
            }
            Line::Source => None,
        }
    }
}

/// Result of scanning one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFragment {
    /// Fragment bytes with `#test` lines removed.
    pub source: Vec<u8>,
    /// Tests in file order.
    pub tests: Vec<TestDirective>,
}

impl ScannedFragment {
    pub fn qualified_names(&self) -> impl Iterator<Item = String> + '_ {
        self.tests.iter().map(TestDirective::qualified_name)
    }
}

/// Lines with their terminators, numbered from 1.
fn numbered_lines(text: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    text.split_inclusive(|&b| b == b'\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line))
}

/// Strip directives and collect tests in a single pass.
///
/// Kept lines are copied byte for byte, whitespace and line endings included.
pub fn scan(text: &[u8]) -> Result<ScannedFragment, ScanError> {
    let mut state = ScanState::new();
    let mut fragment = ScannedFragment {
        source: Vec::with_capacity(text.len()),
        tests: Vec::new(),
    };

    for (line_no, raw) in numbered_lines(text) {
        let line = classify(line_no, raw)?;
        if line.is_emitted() {
            fragment.source.extend_from_slice(raw);
        }
        if let Some(test) = state.observe(line_no, line) {
            fragment.tests.push(test);
        }
    }

    Ok(fragment)
}

/// Collect the tests declared in `text` without rewriting it.
pub fn collect_tests(text: &[u8]) -> Result<Vec<TestDirective>, ScanError> {
    let mut state = ScanState::new();
    let mut tests = Vec::new();
    for (line_no, raw) in numbered_lines(text) {
        if let Some(test) = state.observe(line_no, classify(line_no, raw)?) {
            tests.push(test);
        }
    }
    Ok(tests)
}

/// Remove `#test` lines from `text`.
pub fn strip_directives(text: &[u8]) -> Result<Vec<u8>, ScanError> {
    let mut out = Vec::with_capacity(text.len());
    for (line_no, raw) in numbered_lines(text) {
        if classify(line_no, raw)?.is_emitted() {
            out.extend_from_slice(raw);
        }
    }
    Ok(out)
}
