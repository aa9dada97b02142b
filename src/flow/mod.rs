//! Tool flows
//!
//! A flow is one linear pipeline over a [`FlowContext`]: discover sources,
//! prepare the workspace, generate scripts, run the external tools, evaluate,
//! and optionally post-process. The two flows share everything except their
//! scripts and steps:
//!
//! - [`simulate`] - vlib/vlog/vsim, verdict, coverage report, waveform viewer
//! - [`lint`] - Questa Lint batch run, optional lint GUI
//!
//! Flows never exit the process. They return a [`FlowError`] and the CLI
//! decides what to print and which exit code to use.

mod lint;
mod simulate;

pub use lint::{LINT_DB, LINT_SCRIPT, LintOutcome, lint};
pub use simulate::{SIM_DO_FILE, SIM_LOG_FILE, SimulationOutcome, simulate};

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{RunConfig, Toolchain};
use crate::runner::{Invocation, ToolError, ToolOutput, ToolRunner};
use crate::script::Script;
use crate::style::{Color, paint};
use crate::workspace::Workspace;

/// Errors that end a flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid top-level name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("No Verilog files ({}) found in {}", glob_list(.extensions), .dir.display())]
    NoSources { dir: PathBuf, extensions: Vec<String> },

    #[error("cannot read source directory {}: {source}", .dir.display())]
    SourceDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output directory {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write script {}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Error: {description} failed (exit status {}).\n{stderr}", exit_status(.status))]
    ToolFailed {
        description: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Simulation FAILED: {failures} failure(s) detected")]
    SimulationFailed { failures: usize },

    #[error("console output failed: {0}")]
    Console(#[source] io::Error),
}

fn glob_list(extensions: &[String]) -> String {
    extensions
        .iter()
        .map(|e| format!("*.{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn exit_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "killed by signal".to_string(),
    }
}

/// Outcome of an optional step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Not requested
    Skipped,
    /// Requested, but the input artifact does not exist
    Missing(PathBuf),
    Done,
}

/// Everything a flow needs, passed explicitly from step to step.
pub struct FlowContext<'a> {
    pub workspace: Workspace,
    pub config: RunConfig,
    pub tools: Toolchain,
    runner: &'a mut dyn ToolRunner,
    console: &'a mut dyn Write,
    /// Replay DO file that records every command run, if the flow keeps one
    transcript: Option<PathBuf>,
}

impl<'a> FlowContext<'a> {
    pub fn new(
        workspace: Workspace,
        config: RunConfig,
        tools: Toolchain,
        runner: &'a mut dyn ToolRunner,
        console: &'a mut dyn Write,
    ) -> Self {
        Self {
            workspace,
            config,
            tools,
            runner,
            console,
            transcript: None,
        }
    }

    /// Print one line to the console.
    pub fn say(&mut self, message: impl fmt::Display) -> Result<(), FlowError> {
        writeln!(self.console, "{message}").map_err(FlowError::Console)
    }

    /// Apply a color if the run has colors enabled.
    pub fn paint(&self, text: &str, color: Color) -> String {
        paint(text, color, self.config.color)
    }

    /// Start recording commands into `path`.
    pub(crate) fn record_to(&mut self, path: PathBuf) {
        self.transcript = Some(path);
    }

    pub(crate) fn transcript(&self) -> Option<&Path> {
        self.transcript.as_deref()
    }

    /// Run a step that must succeed.
    ///
    /// The command is announced, recorded in the transcript (if any), and
    /// streamed. A non-zero exit becomes [`FlowError::ToolFailed`] carrying the
    /// tool's stderr.
    pub fn run_checked(&mut self, invocation: &Invocation) -> Result<ToolOutput, FlowError> {
        let output = self.run_unchecked(invocation)?;
        if !output.success() {
            tracing::warn!(command = %invocation, status = ?output.status, "step failed");
            return Err(FlowError::ToolFailed {
                description: invocation.description.clone(),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }

    /// Run a step and hand back its output whatever the exit status.
    pub fn run_unchecked(&mut self, invocation: &Invocation) -> Result<ToolOutput, FlowError> {
        self.say(format_args!("Running command: {invocation}"))?;
        self.say(format_args!("\n{}...", invocation.description))?;

        if let Some(path) = self.transcript.as_deref() {
            let line: Script = [invocation.command_line()].into_iter().collect();
            line.append_to(path).map_err(|source| FlowError::Script {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let output = self.runner.run(invocation, &mut *self.console)?;
        Ok(output)
    }

    /// Start a viewer-like process without waiting, then pause for it to come up.
    pub fn launch(&mut self, invocation: &Invocation) -> Result<(), FlowError> {
        self.runner.launch(invocation)?;
        if !self.config.viewer_delay.is_zero() {
            std::thread::sleep(self.config.viewer_delay);
        }
        Ok(())
    }

    /// Write a script into the workspace, replacing any previous version.
    pub fn write_script(&self, name: &str, script: &Script) -> Result<PathBuf, FlowError> {
        let path = self.workspace.artifact(name);
        script.write_to(&path).map_err(|source| FlowError::Script {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), lines = script.lines().len(), "script written");
        Ok(path)
    }

    /// Report a missing input artifact without failing the run.
    pub fn report_missing(&mut self, path: &Path, what: &str, consequence: &str) -> Result<Step, FlowError> {
        tracing::warn!(path = %path.display(), "{what} not found");
        let label = self.paint(&format!("Error: {what} not found."), Color::Red);
        self.say(format_args!("{label} {consequence}"))?;
        Ok(Step::Missing(path.to_path_buf()))
    }
}
