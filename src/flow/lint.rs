//! Questa Lint flow

use std::path::PathBuf;

use crate::discovery::{SourceSpec, discover_sources};
use crate::runner::Invocation;
use crate::script::lint_script;
use crate::waveform::open_lint_gui;

use super::{FlowContext, FlowError, Step};

/// Generated TCL script passed to `qverify -do`.
pub const LINT_SCRIPT: &str = "lint.do";
/// Results database written by the lint run.
pub const LINT_DB: &str = "lint.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOutcome {
    pub script: PathBuf,
    pub gui: Step,
}

/// Generate the lint script, run qverify in batch mode, optionally open the GUI.
#[tracing::instrument(skip_all, fields(top = ctx.workspace.top(), reload = ctx.config.reload))]
pub fn lint(ctx: &mut FlowContext<'_>) -> Result<LintOutcome, FlowError> {
    let sources = discover_sources(ctx.workspace.root(), &SourceSpec::lint())?;
    ctx.workspace.prepare()?;

    let script = lint_script(&ctx.workspace, &sources, ctx.config.reload);
    let script_path = ctx.write_script(LINT_SCRIPT, &script)?;

    let qverify = Invocation::new(&ctx.tools.qverify, ctx.workspace.dir())
        .args(["-c", "-do", LINT_SCRIPT])
        .describe("Linting process");
    ctx.run_checked(&qverify)?;

    let gui = if ctx.config.show_waveform {
        open_lint_gui(ctx)?
    } else {
        Step::Skipped
    };

    Ok(LintOutcome {
        script: script_path,
        gui,
    })
}
