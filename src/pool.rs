//! Worker-pool fan-out over a bounded file queue
//!
//! One producer walks the tree and feeds paths into a bounded channel; a
//! fixed set of workers drains it, each processing files end-to-end with no
//! shared mutable state. Dropping the sender after the walk is the sole
//! termination signal, and the scope join is the completion point.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::bounded;
use tracing::{debug, error, info};

use crate::classify::RuleSet;
use crate::format::{FormatOutcome, Mode, format_file};
use crate::walker::walk_source_files;

/// How far the producer may run ahead of the workers.
const QUEUE_CAPACITY: usize = 10;

/// Aggregate result of a formatting run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl RunSummary {
    fn merge(&mut self, other: RunSummary) {
        self.changed += other.changed;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }
}

/// Run the formatter over every Go file under `root` with `jobs` parallel
/// workers (0 = available parallelism). Blocks until the walk has finished
/// and every worker has drained the queue.
pub fn run(
    root: &Path,
    rules: &RuleSet,
    mode: Mode,
    jobs: usize,
    ignore_patterns: &[String],
) -> RunSummary {
    let workers = if jobs == 0 {
        thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        jobs
    };

    let (sender, receiver) = bounded::<PathBuf>(QUEUE_CAPACITY);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let receiver = receiver.clone();
                scope.spawn(move || {
                    let mut summary = RunSummary::default();
                    for path in receiver {
                        debug!(path = %path.display(), "processing");
                        match format_file(&path, rules, mode) {
                            Ok(FormatOutcome::Rewritten) => {
                                info!(path = %path.display(), "rewrote imports");
                                summary.changed += 1;
                            }
                            Ok(FormatOutcome::WouldChange) => {
                                if mode == Mode::List {
                                    println!("{}", path.display());
                                } else {
                                    info!(path = %path.display(), "imports would change");
                                }
                                summary.changed += 1;
                            }
                            Ok(FormatOutcome::Unchanged) => summary.unchanged += 1,
                            Err(e) => {
                                error!(path = %path.display(), error = %e, "failed to format");
                                summary.failed += 1;
                            }
                        }
                    }
                    summary
                })
            })
            .collect();

        walk_source_files(root, ignore_patterns, |path| {
            debug!(path = %path.display(), "queueing");
            // A send fails only once every worker has already exited.
            let _ = sender.send(path);
        });
        drop(sender);

        let mut total = RunSummary::default();
        for handle in handles {
            match handle.join() {
                Ok(summary) => total.merge(summary),
                Err(_) => total.failed += 1,
            }
        }
        total
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const UNSORTED: &str = "package main\n\nimport (\n\t\"github.com/random\"\n\t\"os\"\n)\n\nfunc main() {}\n";
    const SORTED: &str = "package main\n\nimport (\n\t\"os\"\n\n\t\"github.com/random\"\n)\n\nfunc main() {}\n";

    fn rules() -> RuleSet {
        RuleSet::new("example.com/exampkg", &[]).unwrap()
    }

    #[test]
    fn test_run_rewrites_all_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.go"), UNSORTED).unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/b.go"), UNSORTED).unwrap();

        let summary = run(dir.path(), &rules(), Mode::Write, 4, &[]);
        assert_eq!(summary.changed, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(fs::read_to_string(dir.path().join("a.go")).unwrap(), SORTED);
        assert_eq!(
            fs::read_to_string(dir.path().join("pkg/b.go")).unwrap(),
            SORTED
        );
    }

    #[test]
    fn test_run_counts_failures_and_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.go"), UNSORTED).unwrap();
        fs::write(dir.path().join("bad.go"), "import (\n\t\"os\"\n").unwrap();

        let summary = run(dir.path(), &rules(), Mode::Write, 2, &[]);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("good.go")).unwrap(),
            SORTED
        );
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.go"), UNSORTED).unwrap();

        let summary = run(dir.path(), &rules(), Mode::DryRun, 1, &[]);
        assert_eq!(summary.changed, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.go")).unwrap(),
            UNSORTED
        );
    }

    #[test]
    fn test_more_workers_than_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.go"), UNSORTED).unwrap();

        let summary = run(dir.path(), &rules(), Mode::Write, 16, &[]);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.unchanged, 0);
    }
}
