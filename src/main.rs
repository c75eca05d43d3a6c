use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use gitpace_core::{GitpaceConfig, OutputFormat};
use gitpace_engine::{AnalysisDocument, AnalysisRun, Stage};
use gitpace_history::command::GitCliGateway;
use gitpace_history::gateway::HistoryQuery;
use gitpace_history::libgit::Git2Gateway;

#[derive(Parser)]
#[command(
    name = "gitpace",
    version,
    about = "Git history mining and effort estimation",
    long_about = "gitpace mines a repository's commit history for cadence, churn and work\n\
                   sessions, then compares the measured time against human-effort estimates.\n\n\
                   Examples:\n  \
                     gitpace analyze                       Analyze the current repository\n  \
                     gitpace analyze --path ../service     Analyze another repository\n  \
                     gitpace analyze --format json -o a.json  Export the full document\n  \
                     gitpace init                          Create a .gitpace.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .gitpace.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text  Headline figures as key/value lines (default)\n  \
                         json  The full analysis document with camelCase keys"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Mine history and estimate effort
    #[command(long_about = "Mine history and estimate effort.\n\n\
        Reads the commit log, per-commit change statistics and the tracked files at\n\
        HEAD, groups commits into work sessions, and estimates how long the same\n\
        output would take a human contributor.\n\n\
        Examples:\n  gitpace analyze --path .\n  gitpace analyze --backend cli\n  gitpace analyze --format json --output analysis.json")]
    Analyze {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// How history is read
        #[arg(long, default_value = "git2")]
        backend: Backend,

        /// Write the JSON document to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Create a default .gitpace.toml configuration file
    #[command(long_about = "Create a default .gitpace.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .gitpace.toml already exists.")]
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// libgit2, in-process
    Git2,
    /// The `git` executable on PATH
    Cli,
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("gitpace v{version}: commit cadence, work sessions, and effort estimates\n");

    println!("Quick start:");
    println!("  gitpace init                  Create a .gitpace.toml config file");
    println!("  gitpace analyze               Analyze the current repository");
    println!("  gitpace analyze --format json Export the full analysis document\n");

    println!("Run 'gitpace <command> --help' for details.");
}

const DEFAULT_CONFIG: &str = r#"# gitpace configuration

[history]
# workers = 8                          # default: available parallelism
# exclude = ["node_modules/**", "*.lock"]

[sessions]
# idle_gap_secs = 7200

[estimation]
# overhead_multiplier = 1.8
# min_actual_days = 0.5
# hours_per_workday = 8.0

[estimation.scenarios]
# conservative = 75.0
# average = 125.0
# optimistic = 175.0

[estimation.file_hours]
# script = 4.0
# configuration = 1.0
# other = 2.0
# script_extensions = ["sh", "py", "js", "ts"]
# configuration_extensions = ["json", "yml", "yaml", "md"]
"#;

fn load_config(explicit: Option<&Path>) -> Result<GitpaceConfig> {
    let config = match explicit {
        Some(path) => GitpaceConfig::from_file(path),
        None => {
            let default_path = Path::new(".gitpace.toml");
            if default_path.exists() {
                GitpaceConfig::from_file(default_path)
            } else {
                Ok(GitpaceConfig::default())
            }
        }
    };
    config.into_diagnostic()
}

fn spinner() -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

fn print_summary(doc: &AnalysisDocument) {
    let stats = &doc.statistics;
    let totals = &stats.totals;
    let estimate = &doc.estimate;

    println!("repository: {}", doc.repository);
    println!("commits: {}", totals.commits);
    println!("contributors: {}", stats.contributors.len());
    println!("files: {}", totals.files);
    println!("lines: {}", totals.lines);
    println!("size_mb: {:.2}", totals.size_mb);
    println!("insertions: {}", totals.insertions);
    println!("deletions: {}", totals.deletions);
    println!("net_lines: {}", totals.net_lines);
    println!("span_days: {:.2}", stats.time_span.days);
    println!("sessions: {}", doc.session_summary.count);
    println!("active_hours: {:.2}", doc.session_summary.total_active_hours);
    if let Some(hour) = doc.timeline.peak_hour {
        println!("peak_hour_utc: {hour:02}:00");
    }
    if let Some(day) = &doc.timeline.busiest_day {
        println!("busiest_day: {day}");
    }
    println!(
        "estimate_days: conservative={:.2} average={:.2} optimistic={:.2}",
        estimate.line_based.conservative,
        estimate.line_based.average,
        estimate.line_based.optimistic
    );
    println!(
        "file_estimate: hours={:.1} scaled_hours={:.1} days={:.2}",
        estimate.file_based.base_hours,
        estimate.file_based.scaled_hours,
        estimate.file_based.days
    );
    println!("actual_days: {:.2}", estimate.actual.days);
    match estimate.efficiency_multiplier {
        Some(m) => println!("efficiency_multiplier: {m:.1}x"),
        None => println!("efficiency_multiplier: n/a"),
    }
    println!("time_saved_days: {:.2}", estimate.time_saved_days);
    if !doc.diagnostics.is_clean() {
        println!("failed_queries: {}", doc.diagnostics.failed_queries);
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        eprintln!(
            "workers: {}, idle gap: {}s, overhead: {}",
            config.history.worker_count(),
            config.sessions.idle_gap_secs,
            config.estimation.overhead_multiplier
        );
        if !config.history.exclude.is_empty() {
            eprintln!("excluding: {}", config.history.exclude.join(", "));
        }
    }

    match cli.command {
        None => {
            print_welcome();
            return Ok(());
        }
        Some(Command::Analyze {
            ref path,
            backend,
            ref output,
        }) => {
            // Hint: not a git repository
            let git2_gateway = match Git2Gateway::open(path) {
                Ok(gateway) => gateway,
                Err(e) => miette::bail!(miette::miette!(
                    help = "Run gitpace from inside a git repository, or specify --path to one",
                    "Not a git repository: {} ({e})",
                    path.display()
                )),
            };
            let root = git2_gateway.root().to_path_buf();
            let gateway: Box<dyn HistoryQuery> = match backend {
                Backend::Git2 => Box::new(git2_gateway),
                Backend::Cli => Box::new(GitCliGateway::new(&root)),
            };

            eprintln!("Analyzing history at {} ...", root.display());
            let pb = spinner();
            let verbose = cli.verbose;
            let on_stage = |stage: Stage| {
                if let Some(pb) = &pb {
                    pb.set_message(format!("{stage}..."));
                } else if verbose {
                    eprintln!("{stage}...");
                }
            };

            let doc = AnalysisRun::new(gateway.as_ref(), &root, &config)
                .with_progress(&on_stage)
                .execute();

            if let Some(pb) = &pb {
                pb.finish_with_message("Done");
            }
            eprintln!(
                "Analyzed {} commits across {} files.",
                doc.statistics.totals.commits, doc.statistics.totals.files
            );
            if !doc.diagnostics.is_clean() {
                eprintln!(
                    "warning: {} history queries failed; figures may be incomplete",
                    doc.diagnostics.failed_queries
                );
                if cli.verbose {
                    for failure in &doc.diagnostics.failures {
                        let subject = failure.subject.as_deref().unwrap_or("-");
                        eprintln!("  {:?} {subject}: {}", failure.kind, failure.reason);
                    }
                }
            }

            match output {
                Some(out) => {
                    doc.write_json(out).into_diagnostic()?;
                    eprintln!("Wrote {}", out.display());
                }
                None => match cli.format {
                    OutputFormat::Json => {
                        println!("{}", doc.to_json_pretty().into_diagnostic()?);
                    }
                    OutputFormat::Text => print_summary(&doc),
                },
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".gitpace.toml");
            if path.exists() {
                miette::bail!(".gitpace.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .gitpace.toml with default configuration");
        }
    }

    Ok(())
}
