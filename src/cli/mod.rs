//! # CLI Module
//!
//! Command-line interface for the photo clusterer.
//!
//! ## Usage
//! ```bash
//! # Show duplicates and clusters without touching anything
//! photo-cluster preview ~/Camera
//!
//! # Move every cluster into its own dated directory
//! photo-cluster organize ~/Camera
//!
//! # Tighter clusters, JSON output
//! photo-cluster preview ~/Camera --gap-hours 6 --output json
//! ```
//!
//! Ctrl-C during the scan cancels the run; once scanning is over the run
//! always completes.

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_cluster::core::pipeline::{Pipeline, PipelineOutcome, PipelineResult};
use photo_cluster::error::{PhotoClusterError, Result};
use photo_cluster::events::{
    Event, EventChannel, EventReceiver, PipelineEvent, CANCEL_MARKER, FINISH_MARKER,
    INVALID_MARKER,
};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// How often the control thread drains and renders queued log lines
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Photo Cluster - Sort photos and videos into date folders
#[derive(Parser, Debug)]
#[command(name = "photo-cluster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report duplicates and clusters without moving anything
    Preview {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Move every cluster into its own dated directory
    Organize {
        #[command(flatten)]
        run: RunArgs,

        /// Create cluster directories here instead of inside the scanned directory
        #[arg(long)]
        destination: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory to scan (defaults to the current directory)
    path: Option<PathBuf>,

    /// Largest gap, in hours, between neighbouring files of one cluster
    #[arg(long, default_value = "15")]
    gap_hours: i64,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Ignore hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (cluster directory and path, tab separated)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { run } => run_pipeline(run, false, None),
        Commands::Organize { run, destination } => run_pipeline(run, true, destination),
    }
}

fn run_pipeline(args: RunArgs, relocate: bool, destination: Option<PathBuf>) -> Result<()> {
    if args.gap_hours <= 0 {
        return Err(PhotoClusterError::Config(format!(
            "--gap-hours must be positive, got {}",
            args.gap_hours
        )));
    }

    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir()
            .map_err(|e| PhotoClusterError::Config(format!("No current directory: {}", e)))?,
    };

    let term = Term::stderr();
    let pretty = args.output == OutputFormat::Pretty;

    // Print header
    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Photo Cluster").bold().cyan(),
            style(if relocate { "organize" } else { "preview" }).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .root(root)
        .relocate(relocate)
        .destination(destination)
        .include_hidden(!args.skip_hidden)
        .max_gap(chrono::Duration::hours(args.gap_hours))
        .build();

    let (sender, receiver) = EventChannel::new();
    let handle = pipeline.spawn(sender)?;

    let token = handle.token();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let spinner = if pretty {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(RENDER_INTERVAL);
        Some(pb)
    } else {
        None
    };

    // Control loop: the worker owns the pipeline, we only render and wait
    while !handle.is_finished() {
        render_batch(&receiver, spinner.as_ref());
        thread::sleep(RENDER_INTERVAL);
    }
    render_batch(&receiver, spinner.as_ref());

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let outcome = handle.join()?;

    match args.output {
        OutputFormat::Pretty => print_pretty_results(&term, &outcome, args.verbose),
        OutputFormat::Json => print_json_results(&outcome),
        OutputFormat::Minimal => print_minimal_results(&outcome),
    }

    Ok(())
}

/// Draw everything the worker queued since the last tick
fn render_batch(receiver: &EventReceiver, spinner: Option<&ProgressBar>) {
    let Some(pb) = spinner else {
        // Non-pretty output only needs the final result
        receiver.drain();
        return;
    };

    for event in receiver.drain() {
        match event {
            Event::Line(line) => pb.println(styled_line(&line.text)),
            Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                pb.set_message(format!("{}", phase));
            }
            _ => {}
        }
    }
}

fn styled_line(text: &str) -> String {
    if text == FINISH_MARKER {
        style(text).green().bold().to_string()
    } else if text == CANCEL_MARKER || text == INVALID_MARKER {
        style(text).yellow().bold().to_string()
    } else if text.starts_with("Cluster: ") || text.starts_with("Duplicate file: ") {
        style(text).bold().to_string()
    } else if text.contains("failed") || text.starts_with("Skipped") {
        style(text).red().to_string()
    } else {
        style(text).dim().to_string()
    }
}

fn print_pretty_results(term: &Term, outcome: &PipelineOutcome, verbose: bool) {
    term.write_line("").ok();

    let result = match outcome {
        PipelineOutcome::Cancelled { files_scanned } => {
            term.write_line(&format!(
                "{} Cancelled after scanning {} files. Nothing was moved.",
                style("✗").yellow().bold(),
                style(files_scanned).cyan()
            ))
            .ok();
            return;
        }
        PipelineOutcome::Completed(result) => result,
    };

    let summary = result.summary();
    term.write_line(&format!(
        "{} {} Complete",
        style("✓").green().bold(),
        if result.relocation.is_some() {
            "Organize"
        } else {
            "Preview"
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {} ({:.1}s)",
        style(summary.total_files).cyan(),
        display_path(&result.root),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} media files, {} other files",
        style(summary.media_files).cyan(),
        style(summary.non_media_files).dim()
    ))
    .ok();
    term.write_line(&format!(
        "  {} clusters",
        style(summary.clusters).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate file names",
        style(summary.duplicate_groups).yellow()
    ))
    .ok();

    if let Some(relocation) = &result.relocation {
        term.write_line(&format!(
            "  {} files moved, {} directories created",
            style(summary.files_moved).green(),
            relocation.directories_created()
        ))
        .ok();
        if summary.move_failures > 0 {
            term.write_line(&format!(
                "  {} files could not be moved",
                style(summary.move_failures).red()
            ))
            .ok();
        }
    }

    if summary.scan_errors > 0 {
        term.write_line(&format!(
            "  {} entries skipped while scanning",
            style(summary.scan_errors).red()
        ))
        .ok();
        if verbose {
            for error in &result.scan_errors {
                term.write_line(&format!("    {}", style(error).dim())).ok();
            }
        }
    }

    if verbose && !result.clusters.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Clusters:").bold().underlined()))
            .ok();
        for cluster in &result.clusters {
            term.write_line(&format!(
                "  {} {} files, {} → {} ({}h)",
                style(&cluster.dir_name).bold(),
                cluster.len(),
                cluster.start,
                cluster.end,
                cluster.span().num_hours()
            ))
            .ok();
            for file in &cluster.files {
                term.write_line(&format!(
                    "    {} {}",
                    display_path(file.path()),
                    style(format!("({})", file.date_source())).dim()
                ))
                .ok();
            }
        }
    }

    if result.relocation.is_none() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Preview only: no files were moved. Run `organize` to apply.").dim()
        ))
        .ok();
    }
}

fn print_json_results(outcome: &PipelineOutcome) {
    let output = match outcome {
        PipelineOutcome::Cancelled { files_scanned } => serde_json::json!({
            "cancelled": true,
            "files_scanned": files_scanned,
        }),
        PipelineOutcome::Completed(result) => serde_json::json!({
            "cancelled": false,
            "summary": result.summary(),
            "result": result,
        }),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}

fn print_minimal_results(outcome: &PipelineOutcome) {
    if let PipelineOutcome::Completed(result) = outcome {
        print_minimal_clusters(result);
    }
}

fn print_minimal_clusters(result: &PipelineResult) {
    for cluster in &result.clusters {
        for file in &cluster.files {
            println!("{}\t{}", cluster.dir_name, file.path().display());
        }
    }
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(relative) => format!("~/{}", relative.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
