//! HDL source discovery
//!
//! Sources are looked up non-recursively in the invocation directory. A flow
//! names a primary extension set (at least one file required) and an optional
//! secondary set that is only compiled when something matches.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::flow::FlowError;

/// Extension sets used by a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub primary: Vec<&'static str>,
    pub secondary: Vec<&'static str>,
}

impl SourceSpec {
    /// Verilog required, SystemVerilog appended when present.
    pub fn simulation() -> Self {
        Self {
            primary: vec!["v"],
            secondary: vec!["sv"],
        }
    }

    /// Verilog only.
    pub fn lint() -> Self {
        Self {
            primary: vec!["v"],
            secondary: Vec::new(),
        }
    }
}

/// Discovered source files, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    pub primary: Vec<PathBuf>,
    pub secondary: Vec<PathBuf>,
}

impl Sources {
    /// Primary files followed by secondary files.
    pub fn all(&self) -> impl Iterator<Item = &PathBuf> {
        self.primary.iter().chain(self.secondary.iter())
    }
}

/// Find sources in `dir` for the given extension sets.
///
/// ## Errors
///
/// - [`FlowError::SourceDir`] if `dir` cannot be listed
/// - [`FlowError::NoSources`] if no primary file exists
pub fn discover_sources(dir: &Path, spec: &SourceSpec) -> Result<Sources, FlowError> {
    let read_error = |source| FlowError::SourceDir {
        dir: dir.to_path_buf(),
        source,
    };
    let primary = collect_with_extensions(dir, &spec.primary).map_err(read_error)?;
    if primary.is_empty() {
        return Err(FlowError::NoSources {
            dir: dir.to_path_buf(),
            extensions: spec.primary.iter().map(|e| e.to_string()).collect(),
        });
    }
    let secondary = collect_with_extensions(dir, &spec.secondary).map_err(read_error)?;

    tracing::debug!(
        dir = %dir.display(),
        primary = primary.len(),
        secondary = secondary.len(),
        "discovered sources"
    );
    Ok(Sources { primary, secondary })
}

fn collect_with_extensions(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    if extensions.is_empty() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry_path = entry?.path();
        if !entry_path.is_file() {
            continue;
        }
        if entry_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext))
        {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}
