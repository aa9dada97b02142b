//! Coverage report generation from the simulator's UCDB database

use crate::flow::{FlowContext, FlowError, Step};
use crate::runner::Invocation;
use crate::script::COVERAGE_DB;

pub const COVERAGE_REPORT_TXT: &str = "coverage_report.txt";
pub const COVERAGE_REPORT_HTML: &str = "coverage_report.html";

/// Which reports were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    pub text: Step,
    pub html: Step,
}

/// Run `vcover report` for a text report and, if configured, an HTML report.
///
/// A missing database is reported and skipped; a failing `vcover` is fatal.
#[tracing::instrument(skip_all, fields(html = ctx.config.generate_html))]
pub fn generate_report(ctx: &mut FlowContext<'_>) -> Result<CoverageReport, FlowError> {
    let db = ctx.workspace.artifact(COVERAGE_DB);
    if !db.is_file() {
        let missing = ctx.report_missing(&db, "UCDB file", "Cannot generate coverage report.")?;
        return Ok(CoverageReport {
            text: missing.clone(),
            html: if ctx.config.generate_html { missing } else { Step::Skipped },
        });
    }

    let dir = ctx.workspace.dir().to_path_buf();
    ctx.say("\nGenerating coverage report...")?;
    let text = Invocation::new(&ctx.tools.vcover, &dir)
        .args(["report", COVERAGE_DB, "-details", "-annotate", "-all", "-output", COVERAGE_REPORT_TXT])
        .describe("Generating coverage report");
    ctx.run_checked(&text)?;
    let text_path = ctx.workspace.artifact(COVERAGE_REPORT_TXT);
    ctx.say(format_args!("Coverage report generated: {}", text_path.display()))?;

    let html = if ctx.config.generate_html {
        ctx.say("\nGenerating HTML coverage report...")?;
        let html = Invocation::new(&ctx.tools.vcover, &dir)
            .args(["report", "-html", "-output", COVERAGE_REPORT_HTML, COVERAGE_DB])
            .describe("Generating HTML coverage report");
        ctx.run_checked(&html)?;
        ctx.say(format_args!("Coverage report generated: {COVERAGE_REPORT_HTML}"))?;
        Step::Done
    } else {
        Step::Skipped
    };

    Ok(CoverageReport { text: Step::Done, html })
}
