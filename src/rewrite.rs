//! Bucketed reordering and re-serialization of the import declaration

use std::collections::BTreeMap;

use crate::classify::{Bucket, RuleSet};
use crate::parse::ImportEntry;

/// Group entries by bucket and sort each bucket by path.
///
/// The sort is stable, so duplicate paths keep their input order, and aliases
/// never influence ordering. Entries with an empty path are skipped before
/// classification.
pub fn bucket_and_sort(
    entries: &[ImportEntry],
    rules: &RuleSet,
) -> BTreeMap<Bucket, Vec<ImportEntry>> {
    let mut buckets: BTreeMap<Bucket, Vec<ImportEntry>> = BTreeMap::new();
    for entry in entries {
        if entry.path.is_empty() {
            continue;
        }
        buckets
            .entry(rules.classify(&entry.path))
            .or_default()
            .push(entry.clone());
    }
    for group in buckets.values_mut() {
        group.sort_by(|a, b| a.path.cmp(&b.path));
    }
    buckets
}

/// Re-serialize the import declaration from bucketed entries.
///
/// Buckets are emitted in their fixed order with no blank lines between them
/// (the injector adds those in a second pass, since break placement is a
/// property of the serialized text). For every non-empty bucket after the
/// first, the path of its first entry is recorded as a break marker. Original
/// source positions are discarded; every line gets fresh tab indentation.
pub fn rewrite_block(
    buckets: &BTreeMap<Bucket, Vec<ImportEntry>>,
    tail_comments: &[String],
) -> (String, Vec<String>) {
    let mut text = String::from("import (\n");
    let mut breaks = Vec::new();
    let mut first_bucket = true;

    for group in buckets.values() {
        if group.is_empty() {
            continue;
        }
        if !first_bucket {
            breaks.push(group[0].path.clone());
        }
        first_bucket = false;

        for entry in group {
            for comment in &entry.leading_comments {
                text.push('\t');
                text.push_str(comment);
                text.push('\n');
            }
            text.push('\t');
            if let Some(alias) = &entry.alias {
                text.push_str(alias);
                text.push(' ');
            }
            text.push('"');
            text.push_str(&entry.path);
            text.push('"');
            if let Some(comment) = &entry.trailing_comment {
                text.push(' ');
                text.push_str(comment);
            }
            text.push('\n');
        }
    }

    for comment in tail_comments {
        text.push('\t');
        text.push_str(comment);
        text.push('\n');
    }
    text.push_str(")\n");
    (text, breaks)
}
