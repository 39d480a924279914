//! Candidate file discovery
//!
//! Walks a directory tree and yields Go source files, skipping hidden
//! entries, `.git`, vendored trees, and any caller-supplied ignore patterns.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::{DirEntry, WalkBuilder};
use tracing::warn;

/// Returns whether a path names a Go source file. Dotfile-prefixed names are
/// never considered source files.
pub fn is_go_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| !name.starts_with('.') && name.ends_with(".go"))
}

/// Check whether an entry's name matches a skip rule: `vendor` and `.git`
/// directories always, plus the caller's literal or glob ignore patterns.
fn should_skip(entry: &DirEntry, ignore_patterns: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_some_and(|t| t.is_dir()) && (name == "vendor" || name == ".git") {
        return true;
    }
    ignore_patterns
        .iter()
        .any(|pattern| name == *pattern || glob_match(pattern, &name))
}

/// Match a glob pattern against a name.
fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}

/// Walk `root` and invoke `emit` for every Go source file found.
///
/// Hidden entries are skipped, gitignore rules are deliberately not applied.
/// Unreadable entries are logged and skipped without stopping the walk.
pub fn walk_source_files(root: &Path, ignore_patterns: &[String], mut emit: impl FnMut(PathBuf)) {
    let patterns = ignore_patterns.to_vec();
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(move |entry| !should_skip(entry, &patterns))
        .build();

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|t| t.is_file()) && is_go_file(entry.path()) {
                    emit(entry.into_path());
                }
            }
            Err(e) => warn!(error = %e, "skipping unreadable entry"),
        }
    }
}
