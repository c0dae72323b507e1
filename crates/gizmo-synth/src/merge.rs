//! Merging of ordered source fragments into one translation unit.

use crate::{Result, SynthError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Mode of generated units on unix.
#[cfg(unix)]
const UNIT_MODE: u32 = 0o664;

/// Comment prefix recording which fragment the following text came from.
pub const TRACE_PREFIX: &str = "// gizmo.file = ";

/// Whether to reset compiler line numbering at each fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarkers {
    /// Emit `#line 1 "<path>"` so diagnostics point at the original file.
    Reset,
    /// Leave numbering relative to the generated unit.
    Keep,
}

/// In-memory translation unit under construction.
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    buf: Vec<u8>,
}

impl UnitBuilder {
    /// Start a unit with one `#include <...>` per header and a blank line.
    pub fn new(ext_headers: &[String]) -> Self {
        let mut buf = Vec::new();
        for header in ext_headers {
            buf.extend_from_slice(b"#include <");
            buf.extend_from_slice(header.as_bytes());
            buf.extend_from_slice(b">\n");
        }
        buf.push(b'\n');
        Self { buf }
    }

    /// Append a fragment preceded by its traceability comment.
    pub fn push_fragment(&mut self, path: &Path, contents: &[u8], markers: LineMarkers) {
        let path = path.display();
        self.buf
            .extend_from_slice(format!("{TRACE_PREFIX}{path}\n").as_bytes());
        if markers == LineMarkers::Reset {
            self.buf
                .extend_from_slice(format!("#line 1 \"{path}\"\n").as_bytes());
        }
        self.buf.extend_from_slice(contents);
        self.buf.push(b'\n');
    }

    /// Append generated text as is.
    pub fn push_text(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Read a fragment, attaching its path to any error.
pub fn read_fragment(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| SynthError::ReadFragment {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge `parts` (relative to `source_root`) into one unit.
///
/// Nothing is written here; an unreadable fragment aborts the merge.
pub fn merge_fragments(
    source_root: &Path,
    parts: &[String],
    ext_headers: &[String],
    markers: LineMarkers,
) -> Result<Vec<u8>> {
    let mut unit = UnitBuilder::new(ext_headers);
    for part in parts {
        let path = source_root.join(part);
        let contents = read_fragment(&path)?;
        unit.push_fragment(&path, &contents, markers);
    }
    Ok(unit.finish())
}

/// Write a generated unit, replacing `path` only once the full contents are
/// on disk.
pub fn write_unit(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| SynthError::WriteUnit {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    file.write_all(contents).map_err(write_err)?;
    // temporary files start out private to the owner
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(UNIT_MODE))
            .map_err(write_err)?;
    }
    file.persist(path).map_err(|e| write_err(e.error))?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a.cpp"), "int a = 1;\n").unwrap();
        std::fs::create_dir(root.join("core")).unwrap();
        std::fs::write(root.join("core/b.cpp"), "int b = 2;").unwrap();

        let unit = merge_fragments(
            root,
            &strings(&["a.cpp", "core/b.cpp"]),
            &strings(&["stdint.h", "stddef.h"]),
            LineMarkers::Keep,
        )
        .unwrap();

        let a = root.join("a.cpp");
        let b = root.join("core/b.cpp");
        let expected = format!(
            "#include <stdint.h>\n#include <stddef.h>\n\n\
             // gizmo.file = {}\nint a = 1;\n\n\
             // gizmo.file = {}\nint b = 2;\n",
            a.display(),
            b.display()
        );
        assert_eq!(String::from_utf8(unit).unwrap(), expected);
    }

    #[test]
    fn test_merge_with_line_markers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.cpp"), "int main() { return 0; }\n").unwrap();

        let unit = merge_fragments(dir.path(), &strings(&["main.cpp"]), &[], LineMarkers::Reset)
            .unwrap();

        let path = dir.path().join("main.cpp");
        let expected = format!(
            "\n// gizmo.file = {p}\n#line 1 \"{p}\"\nint main() {{ return 0; }}\n\n",
            p = path.display()
        );
        assert_eq!(String::from_utf8(unit).unwrap(), expected);
    }

    #[test]
    fn test_fragment_bytes_are_copied_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let contents: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
        std::fs::write(dir.path().join("blob.cpp"), &contents).unwrap();

        let unit = merge_fragments(dir.path(), &strings(&["blob.cpp"]), &[], LineMarkers::Keep)
            .unwrap();

        let header = format!("\n{TRACE_PREFIX}{}\n", dir.path().join("blob.cpp").display());
        assert_eq!(&unit[..header.len()], header.as_bytes());
        assert_eq!(&unit[header.len()..unit.len() - 1], contents.as_slice());
        assert_eq!(unit.last(), Some(&b'\n'));
    }

    #[test]
    fn test_missing_fragment_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cpp"), "").unwrap();

        let err = merge_fragments(
            dir.path(),
            &strings(&["a.cpp", "missing.cpp"]),
            &[],
            LineMarkers::Reset,
        )
        .unwrap_err();

        match err {
            SynthError::ReadFragment { path, .. } => assert!(path.ends_with("missing.cpp")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_unit_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.gen.cc");
        std::fs::write(&path, "stale").unwrap();

        write_unit(&path, b"fresh\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_unit_is_group_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.gen.cc");
        write_unit(&path, b"int x;\n").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, UNIT_MODE);
    }

    #[test]
    fn test_write_unit_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("main.gen.cc");
        assert!(matches!(
            write_unit(&path, b""),
            Err(SynthError::WriteUnit { .. })
        ));
        assert!(!path.exists());
    }
}
