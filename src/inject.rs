//! Blank-line injection between import groups
//!
//! A tree-shaped rewrite cannot express "blank line between two entries of
//! one declaration", so group separation is materialized in a second pass
//! over the serialized text.

use std::sync::LazyLock;

use regex::Regex;

/// Matches an indented import line and captures its quoted path.
static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s+(?:[\w\.]+\s+)?"(.+)""#).expect("IMPORT_LINE regex is invalid")
});

/// Insert one blank line before each import line whose path equals the next
/// unconsumed break marker.
///
/// Scanning tracks two states: inside the import block (entered at a line
/// starting with `import`, left at the first subsequent top-level declaration
/// keyword) and done (never re-entered, so a later `import`-prefixed line in
/// code cannot restart injection). Markers are consumed strictly in order;
/// every line outside the block passes through untouched.
pub fn inject_blank_lines(text: &str, breaks: &[String]) -> String {
    let mut out = String::with_capacity(text.len() + breaks.len());
    let mut breaks = breaks.iter();
    let mut next_break = breaks.next();
    let mut in_imports = false;
    let mut done = false;

    for line in text.split_inclusive('\n') {
        if !in_imports && !done && line.starts_with("import") {
            in_imports = true;
        }
        if in_imports
            && (line.starts_with("var")
                || line.starts_with("func")
                || line.starts_with("const")
                || line.starts_with("type"))
        {
            done = true;
            in_imports = false;
        }
        if in_imports {
            if let (Some(want), Some(caps)) = (next_break, IMPORT_LINE.captures(line)) {
                if caps.get(1).is_some_and(|m| m.as_str() == want.as_str()) {
                    out.push('\n');
                    next_break = breaks.next();
                }
            }
        }
        out.push_str(line);
    }
    out
}
