//! Compile / simulate flow

use crate::coverage::{CoverageReport, generate_report};
use crate::discovery::{SourceSpec, discover_sources};
use crate::runner::Invocation;
use crate::script::{SimExit, simulation_do};
use crate::style::Color;
use crate::verdict::Verdict;
use crate::waveform::open_trace;
use crate::workspace::normalize_separators;

use super::{FlowContext, FlowError, Step};

/// Batch DO file passed to vsim.
pub const SIM_DO_FILE: &str = "simulate.do";
/// Simulator transcript written by `vsim -l`.
pub const SIM_LOG_FILE: &str = "simulation_log.txt";

/// What a completed simulation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub verdict: Verdict,
    pub coverage: CoverageReport,
    pub waveform: Step,
}

/// Name of the replay DO file for `top`; never collides with the batch DO file.
pub(crate) fn transcript_name(top: &str) -> String {
    let name = format!("{top}.do");
    if name == SIM_DO_FILE {
        format!("{top}_replay.do")
    } else {
        name
    }
}

/// Compile all sources, simulate the testbench, evaluate, and post-process.
///
/// ## Errors
///
/// - [`FlowError::NoSources`] before anything is spawned when no `.v` file exists
/// - [`FlowError::ToolFailed`] as soon as vlib, vlog, vsim or vcover exits non-zero
/// - [`FlowError::SimulationFailed`] when failures were counted and
///   `force_display` is off; coverage and waveform steps are skipped
#[tracing::instrument(skip_all, fields(top = ctx.workspace.top(), reload = ctx.config.reload))]
pub fn simulate(ctx: &mut FlowContext<'_>) -> Result<SimulationOutcome, FlowError> {
    let sources = discover_sources(ctx.workspace.root(), &SourceSpec::simulation())?;
    ctx.workspace.prepare()?;

    let top = ctx.workspace.top().to_string();
    let transcript = transcript_name(&top);
    for name in [SIM_DO_FILE, transcript.as_str()] {
        ctx.workspace.truncate(name).map_err(|source| FlowError::Script {
            path: ctx.workspace.artifact(name),
            source,
        })?;
    }
    ctx.record_to(ctx.workspace.artifact(&transcript));

    let dir = ctx.workspace.dir().to_path_buf();

    if ctx.config.reload {
        tracing::info!("reload: reusing existing work library");
    } else {
        let vlib = Invocation::new(&ctx.tools.vlib, &dir)
            .arg("work")
            .describe("Creating ModelSim work library");
        ctx.run_checked(&vlib)?;
    }

    let vlog = Invocation::new(&ctx.tools.vlog, &dir)
        .args(["-work", "work", "+acc", "+cover", "-covercells"])
        .args(sources.all().map(|p| normalize_separators(p)))
        .describe("Compiling Verilog files");
    ctx.run_checked(&vlog)?;

    ctx.write_script(SIM_DO_FILE, &simulation_do(SimExit::Quit))?;
    let vsim = Invocation::new(&ctx.tools.vsim, &dir)
        .args(["-c", "-voptargs=+acc", "-cover", "-do", SIM_DO_FILE, "-l", SIM_LOG_FILE])
        .arg(format!("work.{top}"))
        .describe(format!("Simulating {top}"));
    let output = ctx.run_checked(&vsim)?;

    if let Some(path) = ctx.transcript() {
        let path = path.to_path_buf();
        simulation_do(SimExit::QuitSim)
            .append_to(&path)
            .map_err(|source| FlowError::Script { path, source })?;
    }

    let verdict = Verdict::from_output(&output.stdout, &ctx.config.keywords);
    report_verdict(ctx, &verdict)?;

    let coverage = generate_report(ctx)?;
    let waveform = if ctx.config.show_waveform {
        open_trace(ctx)?
    } else {
        Step::Skipped
    };

    ctx.say("\nSimulation completed successfully!")?;
    Ok(SimulationOutcome {
        verdict,
        coverage,
        waveform,
    })
}

/// Print the error count and decide whether the run continues.
fn report_verdict(ctx: &mut FlowContext<'_>, verdict: &Verdict) -> Result<(), FlowError> {
    let count_color = if verdict.has_failures() { Color::Red } else { Color::Green };
    let count = ctx.paint(&verdict.failures.to_string(), count_color);
    ctx.say(format_args!("Simulation Errors: {count}"))?;
    let passes = ctx.paint(&verdict.passes.to_string(), Color::Green);
    ctx.say(format_args!("Simulation Passes: {passes}"))?;
    tracing::info!(passes = verdict.passes, failures = verdict.failures, "verdict");

    if !verdict.has_failures() {
        let status = ctx.paint("Simulation PASSED.", Color::Green);
        return ctx.say(format_args!("{status} Proceeding to waveform display..."));
    }

    let status = ctx.paint("Simulation FAILED.", Color::Red);
    if ctx.config.force_display {
        let forced = ctx.paint("--force", Color::Yellow);
        ctx.say(format_args!("{status} Continuing because {forced} was given."))
    } else {
        ctx.say(format_args!("{status} Waveform will not be displayed."))?;
        Err(FlowError::SimulationFailed {
            failures: verdict.failures,
        })
    }
}
