//! Per-file formatting pipeline
//!
//! Ties the classifier, rewriter and injector together for a single file:
//! read, locate the import declaration, regenerate it in bucketed order,
//! splice it back, inject group separators, verify the result, write back.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::classify::RuleSet;
use crate::inject::inject_blank_lines;
use crate::parse::{self, ImportBlock, ParseError};
use crate::rewrite::{bucket_and_sort, rewrite_block};

/// Per-file failure. Every variant is fatal for its file only; the run
/// continues with the rest of the queue.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("read failed: {0}")]
    Read(io::Error),
    #[error("write failed: {0}")]
    Write(io::Error),
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("rewritten imports did not round-trip: {0}")]
    Reserialize(String),
}

/// Operating mode for a formatting run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite files in place.
    #[default]
    Write,
    /// Compute rewrites but write nothing.
    DryRun,
    /// Report only the paths of files that would change.
    List,
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Imports were already in canonical order, or there was nothing to sort.
    Unchanged,
    /// The file was rewritten in place.
    Rewritten,
    /// The file would change, but the mode forbids writing.
    WouldChange,
}

/// Reorder the import block of `source`, returning the new text, or `None`
/// when the output would be identical (including files with no imports or a
/// single import, which need no grouping).
pub fn format_source(source: &str, rules: &RuleSet) -> Result<Option<String>, FormatError> {
    let Some(block) = parse::parse_imports(source)? else {
        return Ok(None);
    };
    if block.entries.len() < 2 {
        return Ok(None);
    }

    let buckets = bucket_and_sort(&block.entries, rules);
    let (decl, breaks) = rewrite_block(&buckets, &block.tail_comments);

    let mut rewritten = String::with_capacity(source.len() + breaks.len());
    rewritten.push_str(&source[..block.span.start]);
    rewritten.push_str(&decl);
    rewritten.push_str(&source[block.span.end..]);
    let rewritten = inject_blank_lines(&rewritten, &breaks);

    verify_roundtrip(&rewritten, &block)?;

    if rewritten == source {
        Ok(None)
    } else {
        Ok(Some(rewritten))
    }
}

/// Check that the rewritten text still parses and carries exactly the entries
/// the original block had. A file that fails this check is never written.
fn verify_roundtrip(rewritten: &str, original: &ImportBlock) -> Result<(), FormatError> {
    let reparsed = parse::parse_imports(rewritten)
        .map_err(|e| FormatError::Reserialize(e.to_string()))?
        .ok_or_else(|| FormatError::Reserialize("import declaration disappeared".to_string()))?;

    let key = |entries: &[parse::ImportEntry], skip_empty: bool| {
        let mut keys: Vec<(Option<String>, String)> = entries
            .iter()
            .filter(|e| !(skip_empty && e.path.is_empty()))
            .map(|e| (e.alias.clone(), e.path.clone()))
            .collect();
        keys.sort();
        keys
    };

    // Empty-path entries are dropped by the rewrite, so compare without them.
    if key(&original.entries, true) != key(&reparsed.entries, false) {
        return Err(FormatError::Reserialize(
            "entry set changed during rewrite".to_string(),
        ));
    }
    Ok(())
}

/// Run the full pipeline over one file, honoring the operating mode. The
/// original permission bits are reapplied after a rewrite.
pub fn format_file(path: &Path, rules: &RuleSet, mode: Mode) -> Result<FormatOutcome, FormatError> {
    let source = fs::read_to_string(path).map_err(FormatError::Read)?;
    let Some(rewritten) = format_source(&source, rules)? else {
        return Ok(FormatOutcome::Unchanged);
    };

    match mode {
        Mode::DryRun | Mode::List => Ok(FormatOutcome::WouldChange),
        Mode::Write => {
            let permissions = fs::metadata(path).map_err(FormatError::Read)?.permissions();
            fs::write(path, &rewritten).map_err(FormatError::Write)?;
            fs::set_permissions(path, permissions).map_err(FormatError::Write)?;
            Ok(FormatOutcome::Rewritten)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const INPUT: &str = r#"package main

import (
	tf "thirdy.io/twofer"
	"example.com/exampkg"
	"github.com/random"
	"thirdy.io/two"
	t1 "github.com/thirdy.one"
	"os"
	"k8s.io/klog/v2"
)

func main() {
	os.Exit(86)
}
"#;

    const EXPECTED: &str = r#"package main

import (
	"os"

	"github.com/random"

	"k8s.io/klog/v2"

	"thirdy.io/two"
	tf "thirdy.io/twofer"

	t1 "github.com/thirdy.one"

	"example.com/exampkg"
)

func main() {
	os.Exit(86)
}
"#;

    fn full_rules() -> RuleSet {
        RuleSet::new(
            "example.com/exampkg",
            &[
                "thirdy.io/two".to_string(),
                "github.com/thirdy.one".to_string(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_format_source_groups_and_sorts() {
        let out = format_source(INPUT, &full_rules()).unwrap().unwrap();
        assert_eq!(out, EXPECTED);
    }

    #[test]
    fn test_format_source_is_idempotent() {
        let rules = full_rules();
        let once = format_source(INPUT, &rules).unwrap().unwrap();
        assert_eq!(format_source(&once, &rules).unwrap(), None);
    }

    #[test]
    fn test_code_outside_the_block_is_untouched() {
        let out = format_source(INPUT, &full_rules()).unwrap().unwrap();
        let tail = "func main() {\n\tos.Exit(86)\n}\n";
        assert!(out.ends_with(tail));
        assert!(out.starts_with("package main\n\n"));
    }

    #[test]
    fn test_single_import_left_alone() {
        let src = "package main\n\nimport \"fmt\"\n\nfunc main() {}\n";
        assert_eq!(format_source(src, &full_rules()).unwrap(), None);
    }

    #[test]
    fn test_already_canonical_reports_unchanged() {
        let rules = RuleSet::new("example.com/exampkg", &[]).unwrap();
        let src = "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {}\n";
        assert_eq!(format_source(src, &rules).unwrap(), None);
    }

    #[test]
    fn test_format_file_writes_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("example.go");
        fs::write(&path, INPUT).unwrap();

        let outcome = format_file(&path, &full_rules(), Mode::Write).unwrap();
        assert_eq!(outcome, FormatOutcome::Rewritten);
        assert_eq!(fs::read_to_string(&path).unwrap(), EXPECTED);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("example.go");
        fs::write(&path, INPUT).unwrap();

        let outcome = format_file(&path, &full_rules(), Mode::DryRun).unwrap();
        assert_eq!(outcome, FormatOutcome::WouldChange);
        assert_eq!(fs::read_to_string(&path).unwrap(), INPUT);
    }

    #[test]
    fn test_parse_error_is_reported_per_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.go");
        fs::write(&path, "import (\n\t\"os\"\n)\n").unwrap();

        let err = format_file(&path, &full_rules(), Mode::Write).unwrap_err();
        assert!(matches!(err, FormatError::Parse(_)));
        // File left unmodified.
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "import (\n\t\"os\"\n)\n"
        );
    }

    #[test]
    fn test_read_error_for_missing_file() {
        let err = format_file(
            Path::new("/nonexistent/missing.go"),
            &full_rules(),
            Mode::Write,
        )
        .unwrap_err();
        assert!(matches!(err, FormatError::Read(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_survive_rewrite() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("example.go");
        fs::write(&path, INPUT).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        format_file(&path, &full_rules(), Mode::Write).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
