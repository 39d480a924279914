//! CLI entry point for impsort

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use impsort::{Mode, RuleSet, run};

#[derive(Parser, Debug)]
#[command(name = "impsort")]
#[command(about = "Groups and sorts Go import blocks into ordered sections")]
#[command(version)]
struct Args {
    /// Directory to process
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Regex identifying imports belonging to the current module
    #[arg(short, long)]
    module: String,

    /// Extra organization group pattern; repeatable, bucket order follows flag order
    #[arg(short, long = "group")]
    group: Vec<String>,

    /// Compute rewrites but do not write any file
    #[arg(short, long = "dry-run", conflicts_with = "list")]
    dry_run: bool,

    /// Print only the paths of files whose imports would change
    #[arg(short, long)]
    list: bool,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Skip files or directories matching pattern (can be used multiple times;
    /// vendor and hidden entries are always skipped)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    let rules = match RuleSet::new(&args.module, &args.group) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("impsort: invalid pattern: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mode = if args.list {
        Mode::List
    } else if args.dry_run {
        Mode::DryRun
    } else {
        Mode::Write
    };

    let summary = run(&args.path, &rules, mode, args.jobs, &args.ignore);
    tracing::info!(
        changed = summary.changed,
        unchanged = summary.unchanged,
        failed = summary.failed,
        "run complete"
    );

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(args: &Args) {
    if args.quiet {
        return;
    }

    let default = match args.verbose {
        0 => "warn,impsort=info",
        1 => "info,impsort=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
