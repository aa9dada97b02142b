//! External tool execution boundary
//!
//! Every simulator, lint, coverage and viewer process goes through the
//! [`ToolRunner`] trait. Flows only build [`Invocation`]s and inspect
//! [`ToolOutput`]s, which keeps them testable with a recording stub and keeps
//! process handling in one place.
//!
//! Arguments are always passed as a list; no shell is involved, so names and
//! paths reach the tool exactly as given.

mod stream;

pub use stream::stream_lines;

use std::fmt;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;

use crate::config::Keywords;
use crate::script::tcl_quote;

/// Errors raised while talking to an external process.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// One external command: program, list-style arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
    /// Human-readable step name used in progress and error messages
    pub description: String,
}

impl Invocation {
    pub fn new(program: impl Into<String>, current_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.as_ref().to_path_buf(),
            description: String::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The command as a single directive line, words TCL-quoted.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|w| tcl_quote(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.current_dir);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` if the process was killed by a signal
    pub status: Option<i32>,
    /// Everything the process wrote to stdout, uncolored
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Spawn external tools.
pub trait ToolRunner {
    /// Run to completion, streaming stdout to `console` as it arrives.
    fn run(&mut self, invocation: &Invocation, console: &mut dyn Write) -> Result<ToolOutput, ToolError>;

    /// Start a process and return immediately without waiting for it.
    fn launch(&mut self, invocation: &Invocation) -> Result<(), ToolError>;
}

/// Real process execution (default runner).
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    keywords: Keywords,
    color: bool,
}

impl ProcessRunner {
    pub fn new(keywords: Keywords, color: bool) -> Self {
        Self { keywords, color }
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation, console: &mut dyn Write) -> Result<ToolOutput, ToolError> {
        let program = invocation.program.clone();
        tracing::debug!(command = %invocation, dir = %invocation.current_dir.display(), "spawning");

        let mut child = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: program.clone(),
                source,
            })?;

        // stderr is drained concurrently so a chatty tool cannot block on a full pipe
        let stderr_drain = child.stderr.take().map(|mut err| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = err.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        let streamed = match child.stdout.take() {
            Some(out) => stream_lines(BufReader::new(out), console, &self.keywords, self.color),
            None => Ok(String::new()),
        };
        let stdout = match streamed {
            Ok(text) => text,
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ToolError::Io { program, source });
            }
        };

        let status = child.wait().map_err(|source| ToolError::Io {
            program: program.clone(),
            source,
        })?;
        let stderr = stderr_drain.and_then(|h| h.join().ok()).unwrap_or_default();

        tracing::debug!(program = %program, status = ?status.code(), "process exited");
        Ok(ToolOutput {
            status: status.code(),
            stdout,
            stderr,
        })
    }

    fn launch(&mut self, invocation: &Invocation) -> Result<(), ToolError> {
        tracing::debug!(command = %invocation, "launching detached");
        invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
            .map_err(|source| ToolError::Spawn {
                program: invocation.program.clone(),
                source,
            })
    }
}
