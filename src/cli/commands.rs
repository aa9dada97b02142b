//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io;
use std::path::Path;

use crate::config::{RunConfig, Toolchain};
use crate::flow::{self, FlowContext};
use crate::runner::ProcessRunner;
use crate::workspace::Workspace;

use super::{CliResult, ExitCode};

/// Compile and simulate `top` from sources in `root`.
pub fn simulate(root: &Path, top: &str, config: RunConfig) -> CliResult<ExitCode> {
    let workspace = Workspace::for_simulation(root, top)?;
    let mut runner = ProcessRunner::new(config.keywords.clone(), config.color);
    let mut stdout = io::stdout().lock();
    let mut ctx = FlowContext::new(workspace, config, Toolchain::from_env(), &mut runner, &mut stdout);

    flow::simulate(&mut ctx)?;
    Ok(ExitCode::SUCCESS)
}

/// Lint `top` from sources in `root`.
pub fn lint(root: &Path, top: &str, config: RunConfig) -> CliResult<ExitCode> {
    let workspace = Workspace::for_lint(root, top)?;
    let mut runner = ProcessRunner::new(config.keywords.clone(), config.color);
    let mut stdout = io::stdout().lock();
    let mut ctx = FlowContext::new(workspace, config, Toolchain::from_env(), &mut runner, &mut stdout);

    let outcome = flow::lint(&mut ctx)?;
    tracing::info!(script = %outcome.script.display(), "lint finished");
    Ok(ExitCode::SUCCESS)
}
