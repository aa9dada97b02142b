//! DO file / TCL script generation
//!
//! Scripts are plain ordered lists of directive lines for the external tool.
//! qrun never reads them back. Every path or name interpolated into a line goes
//! through [`tcl_quote`] so spaces and TCL metacharacters cannot split or
//! terminate a directive.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::discovery::Sources;
use crate::workspace::{Workspace, normalize_separators};

/// Trace file written by the simulation DO file.
pub const TRACE_FILE: &str = "simulation.vcd";
/// Coverage database saved on simulator exit.
pub const COVERAGE_DB: &str = "coverage.ucdb";

/// An ordered sequence of tool directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined by `\n`, with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Replace the file's contents with this script.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.render())
    }

    /// Add this script to the end of the file, creating it if needed.
    pub fn append_to(&self, path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.render().as_bytes())?;
        file.flush()
    }
}

impl<S: Into<String>> FromIterator<S> for Script {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Quote a word for inclusion in a TCL command line.
///
/// Plain words are returned unchanged. Words with whitespace or TCL
/// metacharacters are brace-quoted, or backslash-escaped when the word itself
/// contains unbalanced braces or backslashes.
pub fn tcl_quote(word: &str) -> String {
    if word.is_empty() {
        return "{}".to_string();
    }
    if word.chars().all(is_plain_char) {
        return word.to_string();
    }
    if braces_balanced(word) && !word.contains('\\') {
        return format!("{{{}}}", word);
    }

    let mut out = String::with_capacity(word.len() * 2);
    for ch in word.chars() {
        if !is_plain_char(ch) {
            out.push('\\');
        }
        match ch {
            '\n' => out.push('n'),
            '\t' => out.push('t'),
            '\r' => out.push('r'),
            _ => out.push(ch),
        }
    }
    out
}

fn is_plain_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/' | ':' | '+' | '=' | ',' | '@' | '%')
}

fn braces_balanced(word: &str) -> bool {
    let mut depth: usize = 0;
    for ch in word.chars() {
        match ch {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Sources rendered as script words: forward slashes, quoted, space-joined.
pub fn source_list(sources: &Sources) -> String {
    sources
        .all()
        .map(|p| tcl_quote(&normalize_separators(p)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Questa Lint TCL script.
///
/// The full variant resets settings and recreates the work library; the
/// reload variant assumes both already exist and only recompiles and reruns.
pub fn lint_script(workspace: &Workspace, sources: &Sources, reload: bool) -> Script {
    let out_dir = tcl_quote(&workspace.dir_text());
    let files = source_list(sources);
    let top = tcl_quote(workspace.top());

    let mut script = Script::new();
    if !reload {
        script
            .push(format!("configure output directory {out_dir}"))
            .push("clear settings -lib")
            .push(format!("configure output directory {out_dir}"))
            .push("clear directives")
            .push("vlib work")
            .push("vmap work work");
    }
    script
        .push(format!("vlog {files} -work work"))
        .push("lint methodology soc -goal start")
        .push(format!("configure output directory {out_dir}"))
        .push("clear directives")
        .push("lint methodology soc -goal start")
        .push(format!("lint run -d {top} -L work"))
        .push("clear directives");
    script
}

/// How the simulation DO file ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimExit {
    /// Leave the simulator (batch runs)
    Quit,
    /// End the simulation but keep the session (interactive replay)
    QuitSim,
}

/// Simulation DO file: dump all signals, run to completion, save coverage.
pub fn simulation_do(exit: SimExit) -> Script {
    let quit = match exit {
        SimExit::Quit => "quit",
        SimExit::QuitSim => "quit -sim",
    };
    [
        format!("vcd file {TRACE_FILE}"),
        "vcd add -r /*".to_string(),
        "run -all".to_string(),
        format!("coverage save -onexit {COVERAGE_DB}"),
        quit.to_string(),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn alu_sources() -> Sources {
        Sources {
            primary: vec![PathBuf::from("/proj/alu.v"), PathBuf::from("/proj/top_alu.v")],
            secondary: Vec::new(),
        }
    }

    #[test]
    fn test_lint_script_full() {
        let ws = Workspace::for_lint("/proj", "top_alu").unwrap();
        let script = lint_script(&ws, &alu_sources(), false);
        assert_eq!(
            script.lines(),
            [
                "configure output directory /proj/lint",
                "clear settings -lib",
                "configure output directory /proj/lint",
                "clear directives",
                "vlib work",
                "vmap work work",
                "vlog /proj/alu.v /proj/top_alu.v -work work",
                "lint methodology soc -goal start",
                "configure output directory /proj/lint",
                "clear directives",
                "lint methodology soc -goal start",
                "lint run -d top_alu -L work",
                "clear directives",
            ]
        );
    }

    #[test]
    fn test_lint_script_reload() {
        let ws = Workspace::for_lint("/proj", "top_alu").unwrap();
        let script = lint_script(&ws, &alu_sources(), true);
        assert_eq!(
            script.lines(),
            [
                "vlog /proj/alu.v /proj/top_alu.v -work work",
                "lint methodology soc -goal start",
                "configure output directory /proj/lint",
                "clear directives",
                "lint methodology soc -goal start",
                "lint run -d top_alu -L work",
                "clear directives",
            ]
        );
    }

    #[test]
    fn test_lint_script_quotes_paths_with_spaces() {
        let ws = Workspace::for_lint("/my proj", "top_alu").unwrap();
        let sources = Sources {
            primary: vec![PathBuf::from("/my proj/alu.v")],
            secondary: Vec::new(),
        };
        let script = lint_script(&ws, &sources, true);
        assert_eq!(script.lines()[0], "vlog {/my proj/alu.v} -work work");
        assert_eq!(script.lines()[2], "configure output directory {/my proj/lint}");
    }

    #[test]
    fn test_simulation_do_variants() {
        let batch = simulation_do(SimExit::Quit);
        assert_eq!(
            batch.render(),
            "vcd file simulation.vcd\nvcd add -r /*\nrun -all\ncoverage save -onexit coverage.ucdb\nquit\n"
        );
        let replay = simulation_do(SimExit::QuitSim);
        assert_eq!(replay.lines().last().map(String::as_str), Some("quit -sim"));
    }

    #[test]
    fn test_tcl_quote_plain() {
        assert_eq!(tcl_quote("top_alu"), "top_alu");
        assert_eq!(tcl_quote("C:/designs/alu.v"), "C:/designs/alu.v");
    }

    #[test]
    fn test_tcl_quote_braces() {
        assert_eq!(tcl_quote("a b"), "{a b}");
        assert_eq!(tcl_quote("x;vdel -all"), "{x;vdel -all}");
        assert_eq!(tcl_quote("$env"), "{$env}");
        assert_eq!(tcl_quote(""), "{}");
    }

    #[test]
    fn test_tcl_quote_unbalanced_falls_back_to_escapes() {
        assert_eq!(tcl_quote("a}b"), r"a\}b");
        assert_eq!(tcl_quote("a {b"), r"a\ \{b");
        assert_eq!(tcl_quote(r"a\b c"), r"a\\b\ c");
    }

    #[test]
    fn test_append_and_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("t.do");
        let script: Script = ["vlib work"].into_iter().collect();
        script.write_to(&path).unwrap();
        script.append_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "vlib work\nvlib work\n");
        script.write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "vlib work\n");
    }
}
