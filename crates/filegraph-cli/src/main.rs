//! filegraph CLI: map the file-level import/require graph of a JavaScript project.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record};

use filegraph_core::config::{AnalysisConfig, AnalysisResult, DependencyEdge};
use filegraph_core::graph::dependency_graph::DependencyGraph;
use filegraph_core::output::{stats, write_output};
use filegraph_core::pipeline;

#[derive(Parser)]
#[command(
    name = "filegraph",
    about = "filegraph - Map the import and require graph of a JavaScript project"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a project and write its file tree and dependency edges as JSON
    Analyze {
        /// Path to the project root
        path: PathBuf,

        /// Output JSON file path
        #[arg(short, long)]
        output: Option<String>,

        /// Source file extension to analyse
        #[arg(long, default_value = "js")]
        extension: String,

        /// Additional entry names to exclude
        #[arg(long)]
        exclude: Vec<String>,

        /// Worker threads for per-file extraction
        #[arg(long)]
        threads: Option<usize>,

        /// Show per-phase timings and skipped files
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },

    /// Show which files import a file and which files it imports
    Deps {
        /// Path to the project root
        path: PathBuf,

        /// File to inspect, absolute or relative to the project root
        file: PathBuf,

        /// Source file extension to analyse
        #[arg(long, default_value = "js")]
        extension: String,

        /// Additional entry names to exclude
        #[arg(long)]
        exclude: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => style("error").red().bold(),
            Level::Warn => style("warn").yellow().bold(),
            Level::Info => style("info").green(),
            Level::Debug => style("debug").blue(),
            Level::Trace => style("trace").dim(),
        };
        eprintln!("{tag}: {}", record.args());
    }

    fn flush(&self) {}
}

fn init_logging(config: &AnalysisConfig) {
    let level = config.log_level();
    let logger: &'static StderrLogger = Box::leak(Box::new(StderrLogger { level }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            output,
            extension,
            exclude,
            threads,
            verbose,
            quiet,
        } => {
            let repo_path = path.canonicalize().unwrap_or(path);
            let config = AnalysisConfig {
                repo_path: repo_path.to_string_lossy().to_string(),
                output_path: output,
                source_extension: extension,
                exclude_patterns: exclude,
                threads,
                verbose,
                quiet,
            };
            init_logging(&config);

            if config.quiet {
                run_quiet(&config);
            } else {
                run_with_progress(&config);
            }
        }
        Commands::Deps {
            path,
            file,
            extension,
            exclude,
        } => {
            let repo_path = path.canonicalize().unwrap_or(path);
            let config = AnalysisConfig {
                repo_path: repo_path.to_string_lossy().to_string(),
                source_extension: extension,
                exclude_patterns: exclude,
                ..Default::default()
            };
            init_logging(&config);
            run_deps(&config, &repo_path, &file);
        }
    }
}

fn repo_name(repo_path: &Path) -> String {
    repo_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

fn analyse_or_exit(
    config: &AnalysisConfig,
    progress: Option<pipeline::ProgressCallback>,
) -> AnalysisResult {
    match pipeline::run_pipeline(config, progress) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Write the result and return the path written.
fn write_or_exit(result: &AnalysisResult, config: &AnalysisConfig) -> String {
    let output_path = config.resolved_output_path();
    if let Err(e) = write_output(result, &output_path) {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }
    output_path
}

fn run_quiet(config: &AnalysisConfig) {
    let result = analyse_or_exit(config, None);
    write_or_exit(&result, config);
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(template.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn run_with_progress(config: &AnalysisConfig) {
    let pb = spinner();
    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let result = match pipeline::run_pipeline(config, Some(progress)) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("Analysis failed: {e}");
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    let stats = stats(&result);
    let zero = serde_json::json!(0);

    println!(
        "\n{}  filegraph: {}",
        style("✓").green().bold(),
        style(repo_name(Path::new(&config.repo_path))).bold()
    );
    for (label, key) in [
        ("Files:", "files"),
        ("Sources:", "sources"),
        ("Dependencies:", "dependencies"),
        ("Skipped:", "skipped"),
    ] {
        println!("  {:<14} {}", label, stats.get(key).unwrap_or(&zero));
    }
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        start.elapsed().as_secs_f64() * 1000.0
    );

    if config.verbose {
        println!("\n  Phase Timings:");
        for phase in ["structure", "discovery", "imports"] {
            if let Some(secs) = result.metadata.phase_timings.get(phase) {
                println!("    {:<14} {:.1}ms", phase, secs * 1000.0);
            }
        }
        if !result.diagnostics.is_empty() {
            println!("\n  Skipped files:");
            for diagnostic in &result.diagnostics {
                println!("    {}", style(&diagnostic.message).yellow());
            }
        }
    }

    let output_path = write_or_exit(&result, config);

    println!(
        "\n  {} {}",
        style("Output written to:").green(),
        output_path
    );
}

fn run_deps(config: &AnalysisConfig, repo_path: &Path, file: &Path) {
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        repo_path.join(file)
    };
    let target = joined.canonicalize().unwrap_or(joined);
    let target = target.to_string_lossy().to_string();

    let result = analyse_or_exit(config, None);
    let graph = DependencyGraph::new(result.dependencies);

    println!("{}", style(relative_to(repo_path, &target)).bold());
    if !graph.has_file(&target) {
        println!("  {}", style("no dependency edges touch this file").dim());
        return;
    }

    println!("\n  {}", style("Imported by:").green());
    print_edges(repo_path, &graph.incoming(&target), |e| &e.source);

    println!("\n  {}", style("Imports:").green());
    print_edges(repo_path, &graph.outgoing(&target), |e| &e.target);
}

fn print_edges(
    repo_path: &Path,
    edges: &[&DependencyEdge],
    endpoint: impl Fn(&DependencyEdge) -> &String,
) {
    if edges.is_empty() {
        println!("    {}", style("(none)").dim());
        return;
    }
    for edge in edges {
        let elements = if edge.imported_elements.is_empty() {
            String::new()
        } else {
            format!(" {{ {} }}", edge.imported_elements.join(", "))
        };
        println!(
            "    {:<8} {}{}",
            style(edge.kind.as_str()).cyan(),
            relative_to(repo_path, endpoint(edge)),
            style(elements).dim()
        );
    }
}

fn relative_to(repo_path: &Path, path: &str) -> String {
    Path::new(path)
        .strip_prefix(repo_path)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string())
}
