//! Output directory layout for a run
//!
//! A [`Workspace`] is resolved once from the invocation directory and the top
//! module name, then handed to every later step. Nothing changes the process's
//! current directory; invocations carry the workspace directory explicitly.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::flow::FlowError;

/// Resolved paths for one run.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Absolute directory the user invoked qrun from; sources are discovered here
    root: PathBuf,
    /// Directory the external tools run in and write their artifacts to
    dir: PathBuf,
    /// Top-level module or testbench name
    top: String,
}

impl Workspace {
    /// `<root>/sim/<top>`
    pub fn for_simulation(root: impl AsRef<Path>, top: &str) -> Result<Self, FlowError> {
        validate_top_name(top)?;
        let root = resolve_root(root.as_ref())?;
        let dir = root.join("sim").join(top);
        Ok(Self {
            root,
            dir,
            top: top.to_string(),
        })
    }

    /// `<root>/lint`
    pub fn for_lint(root: impl AsRef<Path>, top: &str) -> Result<Self, FlowError> {
        validate_top_name(top)?;
        let root = resolve_root(root.as_ref())?;
        let dir = root.join("lint");
        Ok(Self {
            root,
            dir,
            top: top.to_string(),
        })
    }

    /// Create the output directory tree. Succeeds if it already exists.
    pub fn prepare(&self) -> Result<(), FlowError> {
        fs::create_dir_all(&self.dir).map_err(|source| FlowError::Workspace {
            path: self.dir.clone(),
            source,
        })?;
        tracing::debug!(dir = %self.dir.display(), "workspace ready");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn top(&self) -> &str {
        &self.top
    }

    /// Absolute path of a file inside the output directory.
    pub fn artifact(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Output directory as script text (forward slashes).
    pub fn dir_text(&self) -> String {
        normalize_separators(&self.dir)
    }

    /// Remove a generated file's previous contents, creating it if needed.
    pub fn truncate(&self, name: &str) -> io::Result<PathBuf> {
        let path = self.artifact(name);
        fs::write(&path, "")?;
        Ok(path)
    }
}

/// Make `root` absolute against the current directory.
///
/// Tools run inside the output directory, so every path handed to them must
/// not depend on the directory qrun itself was started in.
fn resolve_root(root: &Path) -> Result<PathBuf, FlowError> {
    std::path::absolute(root).map_err(|source| FlowError::SourceDir {
        dir: root.to_path_buf(),
        source,
    })
}

/// Render a path with forward slashes regardless of host conventions.
pub fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Reject top names that cannot be used as a single directory component.
///
/// The name becomes `sim/<name>`; separators or `..` would move the output
/// directory outside `sim/`.
pub fn validate_top_name(top: &str) -> Result<(), FlowError> {
    let invalid = |reason: &str| {
        Err(FlowError::InvalidName {
            name: top.to_string(),
            reason: reason.to_string(),
        })
    };

    if top.trim().is_empty() {
        return invalid("name is empty");
    }
    if top.contains(['/', '\\']) {
        return invalid("name contains a path separator");
    }
    let mut components = Path::new(top).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => invalid("name is not a plain directory name"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_dir_layout() {
        let ws = Workspace::for_simulation("/work/proj", "top_alu").unwrap();
        assert_eq!(ws.dir(), Path::new("/work/proj/sim/top_alu"));
        assert_eq!(ws.root(), Path::new("/work/proj"));
        assert_eq!(ws.artifact("simulate.do"), Path::new("/work/proj/sim/top_alu/simulate.do"));
    }

    #[test]
    fn test_lint_dir_layout() {
        let ws = Workspace::for_lint("/work/proj", "top_alu").unwrap();
        assert_eq!(ws.dir(), Path::new("/work/proj/lint"));
        assert_eq!(ws.top(), "top_alu");
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let ws = Workspace::for_simulation("proj", "tb").unwrap();
        assert!(ws.root().is_absolute());
        assert_eq!(ws.root(), cwd.join("proj"));
        assert_eq!(ws.dir(), cwd.join("proj").join("sim").join("tb"));

        let ws = Workspace::for_lint("proj", "tb").unwrap();
        assert_eq!(ws.dir(), cwd.join("proj").join("lint"));
    }

    #[test]
    fn test_normalize_separators() {
        let p = PathBuf::from(r"C:\designs\alu\lint");
        assert_eq!(normalize_separators(&p), "C:/designs/alu/lint");
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(matches!(
            Workspace::for_simulation("/w", ".."),
            Err(FlowError::InvalidName { .. })
        ));
        assert!(Workspace::for_simulation("/w", "a/b").is_err());
        assert!(Workspace::for_simulation("/w", r"a\b").is_err());
        assert!(Workspace::for_simulation("/w", ".").is_err());
        assert!(Workspace::for_simulation("/w", "").is_err());
    }

    #[test]
    fn test_accepts_odd_but_plain_names() {
        assert!(validate_top_name("tb top").is_ok());
        assert!(validate_top_name("tb$1").is_ok());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::for_simulation(tmp.path(), "tb").unwrap();
        ws.prepare().unwrap();
        ws.prepare().unwrap();
        assert!(ws.dir().is_dir());
    }

    #[test]
    fn test_truncate_clears_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::for_lint(tmp.path(), "tb").unwrap();
        ws.prepare().unwrap();
        fs::write(ws.artifact("lint.do"), "old").unwrap();
        let path = ws.truncate("lint.do").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }
}
