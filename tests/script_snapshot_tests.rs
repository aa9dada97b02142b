//! Golden snapshot tests for generated tool scripts
//!
//! These tests render the lint TCL script and the simulation DO files for a
//! fixed design and compare them against stored snapshots. Script changes
//! alter what the external tools execute, so they must be reviewed.
//!
//! Run with: `cargo test --test script_snapshot_tests`
//! Review changes: `cargo insta review`

use std::path::PathBuf;

use qrun::Workspace;
use qrun::discovery::Sources;
use qrun::script::{SimExit, lint_script, simulation_do};

/// The `top_alu` design as discovered in `/designs/alu`
fn alu_design() -> (Workspace, Sources) {
    let workspace = Workspace::for_lint("/designs/alu", "top_alu").expect("valid name");
    let sources = Sources {
        primary: vec![
            PathBuf::from("/designs/alu/adder.v"),
            PathBuf::from("/designs/alu/top_alu.v"),
        ],
        secondary: Vec::new(),
    };
    (workspace, sources)
}

#[test]
fn test_lint_full_script() {
    let (workspace, sources) = alu_design();
    let script = lint_script(&workspace, &sources, false);
    insta::assert_snapshot!("lint_full", script.render());
}

#[test]
fn test_lint_reload_script() {
    let (workspace, sources) = alu_design();
    let script = lint_script(&workspace, &sources, true);
    insta::assert_snapshot!("lint_reload", script.render());
}

#[test]
fn test_simulation_batch_do() {
    insta::assert_snapshot!("simulate_do", simulation_do(SimExit::Quit).render());
}

#[test]
fn test_simulation_replay_do() {
    insta::assert_snapshot!("replay_do", simulation_do(SimExit::QuitSim).render());
}
