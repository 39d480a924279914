//! Lightweight Go source scanning for the import declaration
//!
//! Only the import declaration is modeled; the rest of the file is carried
//! around as raw text so the rewrite can leave it byte-identical.

use std::mem;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Errors produced while locating the import declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no package clause found")]
    MissingPackageClause,
    #[error("import block opened on line {line} is never closed")]
    UnterminatedBlock { line: usize },
    #[error("unrecognized import line {line}")]
    BadImportLine { line: usize },
}

/// One import spec: optional alias, unquoted path, and any comments attached
/// to it in the source.
///
/// `line` is the 1-based source line the entry came from. It is position
/// metadata for diagnostics only; re-serialization never consults it and
/// assigns fresh layout instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub alias: Option<String>,
    pub path: String,
    /// Full-line comments immediately above the entry, moved with it.
    pub leading_comments: Vec<String>,
    /// Comment trailing the entry on the same line, moved with it.
    pub trailing_comment: Option<String>,
    pub line: usize,
}

impl ImportEntry {
    /// Bare entry with no alias or comments, for tests and reconstruction.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
            leading_comments: Vec::new(),
            trailing_comment: None,
            line: 0,
        }
    }

    pub fn with_alias(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::new(path)
        }
    }
}

/// The first import declaration of a file: its entries, comment lines left
/// dangling before the closing paren, and the byte span the rewrite splices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBlock {
    pub entries: Vec<ImportEntry>,
    pub tail_comments: Vec<String>,
    pub span: Range<usize>,
}

/// Matches a one-line import declaration, e.g. `import "os"` or
/// `import foo "bar/baz"`.
static IMPORT_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s+(?:([\w\.]+)\s+)?"([^"]*)"\s*(//.*)?$"#)
        .expect("IMPORT_SINGLE regex is invalid")
});

/// Matches one entry line inside a parenthesized import block.
static IMPORT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:([\w\.]+)\s+)?"([^"]*)"\s*(//.*)?$"#)
        .expect("IMPORT_ENTRY regex is invalid")
});

/// Scan Go source text for its first import declaration.
///
/// Returns `Ok(None)` when the file has no imports. Later import declarations
/// are deliberately left alone; rewriting is confined to the first one, the
/// same way the blank-line injector never re-enters a second import block.
pub fn parse_imports(src: &str) -> Result<Option<ImportBlock>, ParseError> {
    let mut saw_package = false;
    let mut pos = 0usize;
    let mut lineno = 0usize;
    let mut lines = src.split_inclusive('\n');

    while let Some(raw) = lines.next() {
        lineno += 1;
        let start = pos;
        pos += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);

        if !saw_package && is_package_clause(line) {
            saw_package = true;
            continue;
        }

        if !is_import_keyword(line) {
            continue;
        }
        if !saw_package {
            return Err(ParseError::MissingPackageClause);
        }

        if let Some(caps) = IMPORT_SINGLE.captures(line) {
            let entry = entry_from_captures(&caps, Vec::new(), lineno);
            return Ok(Some(ImportBlock {
                entries: vec![entry],
                tail_comments: Vec::new(),
                span: start..pos,
            }));
        }

        if let Some(opener_comment) = block_opener(line) {
            let open_line = lineno;
            let mut entries = Vec::new();
            let mut pending: Vec<String> = Vec::new();
            if let Some(comment) = opener_comment {
                pending.push(comment);
            }

            for raw in lines.by_ref() {
                lineno += 1;
                pos += raw.len();
                let line = raw.trim_end_matches(['\n', '\r']);
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ")" {
                    return Ok(Some(ImportBlock {
                        entries,
                        tail_comments: pending,
                        span: start..pos,
                    }));
                }
                if trimmed.starts_with("//") {
                    pending.push(trimmed.to_string());
                    continue;
                }
                match IMPORT_ENTRY.captures(line) {
                    Some(caps) => {
                        entries.push(entry_from_captures(&caps, mem::take(&mut pending), lineno));
                    }
                    None => return Err(ParseError::BadImportLine { line: lineno }),
                }
            }
            return Err(ParseError::UnterminatedBlock { line: open_line });
        }
        // An import keyword in neither recognized form (e.g. a one-line
        // paren block) is a per-file error, never a silent skip.
        return Err(ParseError::BadImportLine { line: lineno });
    }

    if saw_package {
        Ok(None)
    } else {
        Err(ParseError::MissingPackageClause)
    }
}

fn is_package_clause(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("package")
        .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

/// Returns whether a line begins with the `import` keyword, as opposed to an
/// identifier that merely starts with it (e.g. `importer`).
fn is_import_keyword(line: &str) -> bool {
    line.strip_prefix("import")
        .is_some_and(|rest| !rest.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_'))
}

/// Matches a parenthesized block opener, tolerating a trailing line comment
/// (`import ( // deps`). Returns the comment, if any, so it can ride along as
/// the first pending comment inside the block.
fn block_opener(line: &str) -> Option<Option<String>> {
    let rest = line.strip_prefix("import")?.trim_start().strip_prefix('(')?;
    let rest = rest.trim();
    if rest.is_empty() {
        Some(None)
    } else if rest.starts_with("//") {
        Some(Some(rest.to_string()))
    } else {
        None
    }
}

fn entry_from_captures(
    caps: &regex::Captures<'_>,
    leading_comments: Vec<String>,
    line: usize,
) -> ImportEntry {
    ImportEntry {
        alias: caps.get(1).map(|m| m.as_str().to_string()),
        path: caps[2].to_string(),
        leading_comments,
        trailing_comment: caps.get(3).map(|m| m.as_str().to_string()),
        line,
    }
}
