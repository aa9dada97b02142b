//! CLI module for qrun
//!
//! ## Commands
//!
//! - `sim <TOP_TB>` - Compile, simulate, report coverage, open the waveform
//! - `lint <TOP_MODULE>` - Run Questa Lint, optionally open the lint GUI
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::flow::FlowError;
use crate::version::QRUN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<FlowError> for CliError {
    fn from(err: FlowError) -> Self {
        match err {
            // The flow already printed the failure summary
            FlowError::SimulationFailed { .. } => CliError::new("", ExitCode::FAILURE),
            other => CliError::failure(other.to_string()),
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Drive ModelSim/QuestaSim simulation and Questa Lint runs
#[derive(Parser, Debug)]
#[command(name = "qrun")]
#[command(version = QRUN_VERSION)]
#[command(about = "Drive ModelSim/QuestaSim simulation and Questa Lint runs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run as if qrun was started in DIR
    #[arg(short = 'C', long = "dir", value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Disable ANSI colors (also honoured via NO_COLOR)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile, simulate, generate coverage reports and view waveforms
    Sim {
        /// Top-level testbench module name
        #[arg(value_name = "TOP_TB")]
        top: String,
        /// Show waveform after simulation
        #[arg(long = "show-waveform", visible_alias = "gui", alias = "show_waveform")]
        show_waveform: bool,
        /// Show waveform and reports even if failures were detected
        #[arg(long = "force", alias = "force_flag")]
        force: bool,
        /// Generate an HTML coverage report
        #[arg(long = "html", alias = "html_flag")]
        html: bool,
        /// Reuse the existing work library instead of recreating it
        #[arg(short = 'r', long = "reload")]
        reload: bool,
        /// Seconds to wait for the waveform viewer to start
        #[arg(long = "viewer-delay", value_name = "SECS", default_value_t = 4)]
        viewer_delay: u64,
    },

    /// Run Questa Lint on the Verilog sources in the current directory
    Lint {
        /// Top-level design module name
        #[arg(value_name = "TOP_MODULE")]
        top: String,
        /// Open the lint GUI on the results database
        #[arg(long = "gui")]
        gui: bool,
        /// Reuse the existing lint setup instead of resetting it
        #[arg(short = 'r', long = "reload")]
        reload: bool,
    },
}

/// Rewrite historical single-dash spellings clap cannot express.
///
/// `-gui` becomes `--gui`; everything else passes through untouched.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| if arg == "-gui" { OsString::from("--gui") } else { arg })
        .collect()
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let code = run_with_args(env::args_os());
    if code.0 != 0 {
        process::exit(code.0);
    }
}

/// Parse `args`, execute, print any error, and return the exit code.
///
/// Usage errors exit with 1 rather than clap's default of 2.
pub fn run_with_args<I>(args: I) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(normalize_legacy_args(args)) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match execute(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            e.exit_code
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let root = match cli.dir {
        Some(dir) => dir,
        None => env::current_dir()
            .map_err(|e| CliError::failure(format!("Cannot determine current directory: {}", e)))?,
    };
    let color = crate::config::color_enabled(cli.no_color);

    match cli.command {
        Command::Sim {
            top,
            show_waveform,
            force,
            html,
            reload,
            viewer_delay,
        } => {
            let config = crate::config::RunConfig::new()
                .with_show_waveform(show_waveform)
                .with_force_display(force)
                .with_generate_html(html)
                .with_reload(reload)
                .with_color(color)
                .with_viewer_delay(std::time::Duration::from_secs(viewer_delay));
            commands::simulate(&root, &top, config)
        }
        Command::Lint { top, gui, reload } => {
            let config = crate::config::RunConfig::new()
                .with_show_waveform(gui)
                .with_reload(reload)
                .with_color(color);
            commands::lint(&root, &top, config)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
