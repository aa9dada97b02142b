//! Viewer launch for simulation traces and lint databases
//!
//! Viewers are fire-and-forget: qrun starts them, waits a short fixed time, and
//! never checks whether a window actually opened.

use std::path::Path;

use crate::flow::{FlowContext, FlowError, LINT_DB, Step};
use crate::runner::Invocation;
use crate::script::TRACE_FILE;

/// Open the simulation trace in the configured waveform viewer.
pub fn open_trace(ctx: &mut FlowContext<'_>) -> Result<Step, FlowError> {
    let trace = ctx.workspace.artifact(TRACE_FILE);
    let viewer = Invocation::new(&ctx.tools.viewer, ctx.workspace.dir())
        .arg(trace.to_string_lossy())
        .describe("Opening waveform viewer");
    open_artifact(ctx, &trace, &viewer, "VCD file", "Cannot open GTKWave.")
}

/// Open the lint results database in the Questa Lint GUI.
pub fn open_lint_gui(ctx: &mut FlowContext<'_>) -> Result<Step, FlowError> {
    let db = ctx.workspace.artifact(LINT_DB);
    let gui = Invocation::new(&ctx.tools.qverify, ctx.workspace.dir())
        .args(["-idegui", LINT_DB])
        .describe("Opening lint GUI");
    open_artifact(ctx, &db, &gui, "lint database", "Cannot open the lint GUI.")
}

fn open_artifact(
    ctx: &mut FlowContext<'_>,
    artifact: &Path,
    invocation: &Invocation,
    what: &str,
    consequence: &str,
) -> Result<Step, FlowError> {
    if !artifact.is_file() {
        return ctx.report_missing(artifact, what, consequence);
    }
    ctx.say(format_args!("\n{}...", invocation.description))?;
    ctx.launch(invocation)?;
    Ok(Step::Done)
}
