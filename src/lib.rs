//! impsort - groups and sorts Go import blocks into ordered sections

pub mod classify;
pub mod format;
pub mod inject;
pub mod parse;
pub mod pool;
pub mod rewrite;
pub mod walker;

pub use classify::{Bucket, ClassificationRule, RuleSet};
pub use format::{FormatError, FormatOutcome, Mode, format_file, format_source};
pub use inject::inject_blank_lines;
pub use parse::{ImportBlock, ImportEntry, ParseError, parse_imports};
pub use pool::{RunSummary, run};
pub use rewrite::{bucket_and_sort, rewrite_block};
pub use walker::{is_go_file, walk_source_files};
