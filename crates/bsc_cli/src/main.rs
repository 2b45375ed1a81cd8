//! bsc: The BrighterScript compiler CLI.
//!
//! Usage:
//!   bsc [options] [file...]
//!
//! Compiles a BrightScript/BrighterScript project, reports diagnostics and
//! writes the transpiled `.brs` files to the staging directory.

use bsc_compiler::Program;
use bsc_config::{load_config, BsConfig, LogLevel};
use bsc_diagnostics::{Diagnostic, DiagnosticSeverity};
use bsc_transpiler::ScopeProtection;
use clap::{ArgAction, Parser as ClapParser};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "bsc", version, about = "BrighterScript compiler")]
struct Cli {
    /// Source files to compile, relative to the root directory.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to bsconfig.json.
    #[arg(short = 'p', long = "project")]
    project: Option<PathBuf>,

    /// Project root directory.
    #[arg(long = "root-dir")]
    root_dir: Option<PathBuf>,

    /// Where transpiled files are written.
    #[arg(long = "staging-dir")]
    staging_dir: Option<PathBuf>,

    /// How conditional expressions are transpiled (safe or none).
    #[arg(long = "conditional-scope-protection")]
    conditional_scope_protection: Option<ScopeProtection>,

    /// Report diagnostics only; do not write output files.
    #[arg(long = "no-emit")]
    no_emit: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose, config.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_compile(&cli, config)?;
    process::exit(exit_code);
}

/// The project configuration with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<BsConfig> {
    let project = match &cli.project {
        Some(path) => Some(path.clone()),
        None if Path::new("bsconfig.json").is_file() => Some(PathBuf::from("bsconfig.json")),
        None => None,
    };
    let mut config = match project {
        Some(path) => load_config(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load project '{}'", path.display()))?,
        None => BsConfig::default(),
    };

    if let Some(root_dir) = &cli.root_dir {
        config.root_dir = Some(root_dir.clone());
    }
    if let Some(staging_dir) = &cli.staging_dir {
        config.staging_dir = Some(staging_dir.clone());
    }
    if let Some(protection) = cli.conditional_scope_protection {
        config.conditional_scope_protection = protection;
    }
    if !cli.files.is_empty() {
        config.files = cli.files.iter().map(|f| f.to_string_lossy().into_owned()).collect();
    }
    Ok(config)
}

fn run_compile(cli: &Cli, config: BsConfig) -> Result<i32> {
    let start = Instant::now();
    tracing::debug!(
        root_dir = %config.root_dir().display(),
        scope_protection = ?config.conditional_scope_protection,
        "starting compile"
    );
    let mut program = Program::new(config);
    program
        .load_files()
        .into_diagnostic()
        .wrap_err("Failed to load source files")?;

    if program.source_files().is_empty() {
        print_error("No input files found.");
        return Ok(1);
    }

    let diagnostics = program.compile();
    let use_color = stderr_is_terminal();
    if program.config.show_diagnostics_in_console {
        for diagnostic in diagnostics.diagnostics() {
            print_diagnostic(diagnostic, use_color);
        }
    }

    if diagnostics.has_errors() {
        let count = diagnostics.error_count();
        let summary = format!("Found {} error{}.", count, if count == 1 { "" } else { "s" });
        if use_color {
            eprintln!("\n{}{}{}", RED, summary, RESET);
        } else {
            eprintln!("\n{}", summary);
        }
        return Ok(1);
    }

    if !cli.no_emit {
        let outputs = program.transpile();
        program
            .write_output_files(&outputs)
            .into_diagnostic()
            .wrap_err("Failed to write output files")?;
    }

    if use_color {
        eprintln!("{}Compilation completed in {:.2}s.{}", GRAY, start.elapsed().as_secs_f64(), RESET);
    }
    Ok(0)
}

fn directive_for_verbosity(v: u8, level: LogLevel) -> &'static str {
    match v {
        0 => level.directive(),
        1 => "debug",
        _ => "trace",
    }
}

fn print_diagnostic(diagnostic: &Diagnostic, use_color: bool) {
    if !use_color {
        eprintln!("{}", diagnostic);
        return;
    }
    let color = match diagnostic.severity {
        DiagnosticSeverity::Error => RED,
        DiagnosticSeverity::Warning => YELLOW,
        DiagnosticSeverity::Information | DiagnosticSeverity::Hint => CYAN,
    };
    if let Some(file) = &diagnostic.file {
        eprint!("{}{}{}:{}{}{} - ", CYAN, file, RESET, YELLOW, diagnostic.range, RESET);
    }
    eprintln!(
        "{}{}{}{} {}BS{}{}: {}",
        BOLD, color, diagnostic.severity, RESET, GRAY, diagnostic.code, RESET, diagnostic.message
    );
}

fn print_error(msg: &str) {
    if stderr_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
