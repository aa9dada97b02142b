//! Shared helpers for flow tests: a recording tool runner and project setup.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use qrun::{Invocation, RunConfig, ToolError, ToolOutput, ToolRunner};
use tempfile::TempDir;

/// Canned response for one program.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    /// Files the "tool" creates in its working directory
    pub creates: Vec<&'static str>,
}

impl Reply {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn exit(status: i32) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.stdout = text.to_string();
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.stderr = text.to_string();
        self
    }

    pub fn creates(mut self, files: &[&'static str]) -> Self {
        self.creates.extend_from_slice(files);
        self
    }
}

/// Stub runner: records every call and answers from a per-program table.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub runs: Vec<Invocation>,
    pub launches: Vec<Invocation>,
    replies: HashMap<String, Reply>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, program: &str, reply: Reply) -> Self {
        self.replies.insert(program.to_string(), reply);
        self
    }

    /// Programs run so far, in order.
    pub fn programs(&self) -> Vec<&str> {
        self.runs.iter().map(|inv| inv.program.as_str()).collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation, console: &mut dyn Write) -> Result<ToolOutput, ToolError> {
        self.runs.push(invocation.clone());
        let reply = self.replies.get(&invocation.program).cloned().unwrap_or_default();

        for name in &reply.creates {
            fs::write(invocation.current_dir.join(name), "stub").map_err(|source| ToolError::Io {
                program: invocation.program.clone(),
                source,
            })?;
        }
        console
            .write_all(reply.stdout.as_bytes())
            .map_err(|source| ToolError::Io {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(ToolOutput {
            status: Some(reply.status),
            stdout: reply.stdout,
            stderr: reply.stderr,
        })
    }

    fn launch(&mut self, invocation: &Invocation) -> Result<(), ToolError> {
        self.launches.push(invocation.clone());
        Ok(())
    }
}

/// A scratch project directory containing the given (empty) source files.
pub fn project(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in files {
        fs::write(dir.path().join(name), "module m; endmodule\n").expect("write source");
    }
    dir
}

/// Test defaults: no colors, no viewer pause.
pub fn quiet_config() -> RunConfig {
    RunConfig::new().with_color(false).with_viewer_delay(Duration::ZERO)
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref()).unwrap_or_else(|_| panic!("missing {}", path.as_ref().display()))
}
