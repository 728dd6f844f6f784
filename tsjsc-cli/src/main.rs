//! # tsjsc
//!
//! Generate JSON Schema artifacts from TypeScript declarations.
//!
//! ## Usage
//!
//! ```bash
//! # One schema per interface whose name ends in "Interface"
//! tsjsc generate -p src/models -m 'Interface$'
//!
//! # Skip some types, write elsewhere
//! tsjsc generate -p src/models -m 'Interface$' -e '^Publication' -o gen/schema
//!
//! # Use the declaration-scan backend
//! tsjsc generate -p src/models -m '.' -A -t tsconfig.json
//!
//! # Regenerate on every change
//! tsjsc generate -p src/models -m 'Interface$' --watch
//!
//! # Fail (exit 2) if artifacts are out of date
//! tsjsc check -p src/models -m 'Interface$'
//!
//! # Write a starter tsjsc.toml
//! tsjsc init
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use tsjsc::BackendKind;
use tsjsc_cli::{
    config::{CliArgs, ConfigManager, ResolvedConfig},
    error::{CliError, CliResult},
    logging,
    pipeline::{self, GenerationOutcome, RunOutcome},
    watcher::{self, FileWatcher},
};

#[derive(Parser)]
#[command(name = "tsjsc")]
#[command(author, version, about = "Generate JSON Schema artifacts from TypeScript declarations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one schema artifact per matching type
    Generate {
        #[command(flatten)]
        selection: Selection,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Watch the input directory and regenerate on change
        #[arg(short, long)]
        watch: bool,
    },

    /// Check that generated artifacts are up-to-date
    Check {
        #[command(flatten)]
        selection: Selection,
    },

    /// Initialize a new tsjsc configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "tsjsc.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Flags shared by `generate` and `check`.
#[derive(Args)]
struct Selection {
    /// Directory containing the TypeScript declarations
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Regex selecting type names
    #[arg(short = 'm', long = "match")]
    type_pattern: Option<String>,

    /// Output directory (default: "schema" next to the input directory)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Regex selecting file names
    #[arg(short, long)]
    filematch: Option<String>,

    /// Regex rejecting type names
    #[arg(short, long)]
    exclude: Option<String>,

    /// Root directory the other paths are relative to
    #[arg(short = 'R', long)]
    root: Option<PathBuf>,

    /// tsconfig.json path (required by declaration-scan)
    #[arg(short, long)]
    tsconfig: Option<PathBuf>,

    /// Shorthand for --backend declaration-scan
    #[arg(short = 'A', long = "declaration-scan", conflicts_with = "backend")]
    declaration_scan: bool,

    /// Schema backend: symbol-table or declaration-scan
    #[arg(long)]
    backend: Option<BackendKind>,

    /// Debug logging
    #[arg(short = 'D', long)]
    debug: bool,

    /// Most detailed logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Selection {
    fn into_cli_args(self, dry_run: bool) -> CliArgs {
        let backend = if self.declaration_scan {
            Some(BackendKind::DeclarationScan)
        } else {
            self.backend
        };

        CliArgs {
            path: self.path,
            type_pattern: self.type_pattern,
            out: self.out,
            filematch: self.filematch,
            exclude: self.exclude,
            backend,
            tsconfig: self.tsconfig,
            root: self.root,
            config: self.config,
            debug: self.debug,
            verbose: self.verbose,
            dry_run,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::OutOfDate(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Generate {
            selection,
            dry_run,
            watch,
        } => cmd_generate(selection.into_cli_args(dry_run), watch),

        Commands::Check { selection } => cmd_check(selection.into_cli_args(false)),

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

/// Generate command implementation.
fn cmd_generate(args: CliArgs, watch: bool) -> CliResult<()> {
    let config = ConfigManager::resolve(&args)?;
    logging::init(config.verbosity);
    config.log_sources();

    if watch {
        run_watch_mode(&config)
    } else {
        run_generate(&config)
    }
}

/// Run schema generation once.
fn run_generate(config: &ResolvedConfig) -> CliResult<()> {
    println!(
        "{} {}",
        "Generating schemas from".cyan(),
        config.input_path.display()
    );

    let summary = match pipeline::run(config)? {
        RunOutcome::NoSourceFiles => {
            println!("{}", "No matching source files found.".yellow());
            return Ok(());
        }
        RunOutcome::Completed(summary) => summary,
    };

    println!(
        "  Found {} file(s), {} of {} type(s) matched",
        summary.files_discovered.to_string().green(),
        summary.symbols_matched.to_string().green(),
        summary.symbols_enumerated
    );

    for outcome in &summary.outcomes {
        match outcome {
            GenerationOutcome::Written { path, .. } if summary.dry_run => {
                println!("  {} {}", "[dry-run]".yellow(), path.display());
            }
            GenerationOutcome::Written { path, .. } => {
                println!("  {} {}", "✓".green(), path.display());
            }
            GenerationOutcome::Failed {
                type_name,
                phase,
                cause,
            } => {
                println!("  {} {} ({} failed): {}", "✗".red(), type_name, phase, cause);
            }
        }
    }

    let verb = if summary.dry_run { "Would write" } else { "Wrote" };
    println!(
        "{} {} {} schema(s) to {}",
        "✓".green(),
        verb,
        summary.written(),
        config.output_path.display()
    );
    if summary.failed() > 0 {
        println!(
            "{} {} type(s) failed",
            "Warning:".yellow(),
            summary.failed()
        );
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(config: &ResolvedConfig) -> CliResult<()> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", config.input_path.display());
    println!("  Press Ctrl+C to stop\n");

    run_generate(config)?;

    let watcher = FileWatcher::new(&config.input_path);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(first) = rx.recv() {
        let batch = watcher::drain_pending(first, &rx);

        for event in &batch {
            if let Some(message) = event.error_message() {
                println!("{} {}", "Watch error:".red(), message);
            } else if let Some(path) = event.path() {
                println!("\n{} {}", "File changed:".cyan(), path.display());
            }
        }
        if !watcher::has_changes(&batch) {
            continue;
        }

        if let Err(e) = run_generate(config) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(args: CliArgs) -> CliResult<()> {
    let config = ConfigManager::resolve(&args)?;
    logging::init(config.verbosity);
    config.log_sources();

    println!("{}", "Checking schemas...".cyan());
    let report = pipeline::check(&config)?;

    for path in &report.missing {
        println!("  {} missing {}", "✗".red(), path.display());
    }
    for path in &report.stale {
        println!("  {} stale   {}", "✗".red(), path.display());
    }
    for name in &report.failed {
        println!("  {} {} could not be generated", "Warning:".yellow(), name);
    }

    if report.is_current() {
        println!(
            "{} {} schema(s) are up-to-date",
            "✓".green(),
            report.up_to_date.len()
        );
        Ok(())
    } else {
        println!("  Run 'tsjsc generate' to update");
        Err(CliError::OutOfDate(format!(
            "{} missing, {} stale",
            report.missing.len(),
            report.stale.len()
        )))
    }
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> CliResult<()> {
    if output.exists() && !force {
        return Err(CliError::ConfigExists { path: output });
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
