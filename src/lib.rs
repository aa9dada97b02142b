#![forbid(unsafe_code)]
//! qrun: a command-line driver for ModelSim/QuestaSim and Questa Lint
//!
//! qrun prepares an output directory, discovers HDL sources, generates DO/TCL
//! scripts, runs the external tools while streaming their output, and decides
//! pass/fail from exit codes and result keywords. All compilation, simulation,
//! coverage and lint work happens in the external tools.
//!
//! ## Layout
//!
//! - [`cli`] - argument parsing and exit-code handling
//! - [`flow`] - the sim and lint pipelines
//! - [`runner`] - the process boundary ([`runner::ToolRunner`])
//! - [`script`], [`discovery`], [`workspace`] - script text, sources, paths
//! - [`verdict`], [`coverage`], [`waveform`] - evaluation and post-processing
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod coverage;
pub mod discovery;
pub mod flow;
pub mod runner;
pub mod script;
pub mod style;
pub mod verdict;
pub mod version;
pub mod waveform;
pub mod workspace;

pub use config::{Keywords, RunConfig, Toolchain};
pub use flow::{FlowContext, FlowError, LintOutcome, SimulationOutcome, Step, lint, simulate};
pub use runner::{Invocation, ProcessRunner, ToolError, ToolOutput, ToolRunner};
pub use script::Script;
pub use verdict::Verdict;
pub use workspace::Workspace;
