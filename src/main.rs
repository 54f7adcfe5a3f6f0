//! Chatlint: Conversation Quality Classifier CLI

use anyhow::{Context, Result};
use chatlint::analyzer::{aggregate_stats, assess_parallel, TranscriptResult};
use chatlint::config::{build_glob_set, default_config_json, load_config, Config, CONFIG_FILENAME};
use chatlint::input::{collect_transcripts, read_stdin, STDIN_NAME};
use chatlint::reporter::{ConsoleReporter, JsonReporter};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CHATLINT_LOG";

/// Chatlint: quality pre-check for chat transcripts
#[derive(Parser, Debug)]
#[command(name = "chatlint")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript file or directory to check (omit or use - for stdin)
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Quiet mode (one line per transcript; with --json, a bare array)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Treat warnings as failures (exit 1)
    #[arg(long)]
    strict: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Path to config file (default: search .chatlintrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum speaker turns (overrides config)
    #[arg(long, value_name = "N")]
    min_turns: Option<usize>,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .chatlintrc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Minimum speaker turns (default: 4)
        #[arg(long, value_name = "N")]
        min_turns: Option<usize>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(Commands::Init { dir, min_turns }) = args.command {
        return run_init(dir.as_deref(), min_turns);
    }

    let path = args.path.clone().filter(|p| p.as_os_str() != "-");

    // Resolve work directory for config search
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let work_dir = match path.as_deref() {
        Some(p) if p.is_file() => p.parent().unwrap_or(Path::new(".")).to_path_buf(),
        Some(p) => p.to_path_buf(),
        None => cwd,
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())?.merge_with_cli(args.min_turns);

    let (results, had_errors) = match path {
        None => {
            let text = read_stdin()?;
            let result = TranscriptResult::assess(Path::new(STDIN_NAME), &text, &config);
            (vec![result], false)
        }
        Some(ref path) => assess_path(path, &config, args.jobs)?,
    };

    let stats = aggregate_stats(&results);

    if args.json {
        let reporter = if args.pretty {
            JsonReporter::new().pretty()
        } else {
            JsonReporter::new()
        };
        if args.quiet {
            println!("{}", reporter.report_many(&results));
        } else if results.len() == 1 {
            println!("{}", reporter.report_result(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.no_color {
            reporter = reporter.without_colors();
        }
        if args.verbose {
            reporter = reporter.verbose();
        }

        if args.quiet {
            for result in &results {
                reporter.report_quiet(result);
            }
        } else if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    if had_errors {
        return Ok(ExitCode::from(2));
    }

    let all_pass = results.iter().all(|r| r.passes(args.strict));
    Ok(if all_pass {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Collect and assess transcripts under `path`. Read failures are reported
/// as they occur and flagged in the returned bool.
fn assess_path(
    path: &Path,
    config: &Config,
    jobs: Option<usize>,
) -> Result<(Vec<TranscriptResult>, bool)> {
    let include = build_glob_set(&config.include_patterns())?;
    let ignore = if config.ignore.is_empty() {
        None
    } else {
        Some(build_glob_set(&config.ignore)?)
    };

    let files = collect_transcripts(path, &include, ignore.as_ref())?;
    if files.is_empty() {
        anyhow::bail!("No transcripts found in {}", path.display());
    }
    tracing::debug!(count = files.len(), "collected transcripts");

    // Set up parallel processing
    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let mut results = Vec::with_capacity(files.len());
    let mut had_errors = false;
    for outcome in assess_parallel(&files, config) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("{}: {:#}", "Warning".yellow(), e);
                had_errors = true;
            }
        }
    }

    if results.is_empty() {
        anyhow::bail!("All transcripts failed to load");
    }

    Ok((results, had_errors))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "chatlint=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

fn run_init(dir: Option<&Path>, min_turns: Option<usize>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    std::fs::write(&config_path, default_config_json(min_turns))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());
    Ok(ExitCode::SUCCESS)
}
