//! Run configuration for qrun flows
//!
//! One explicit configuration struct replaces the per-script flag handling:
//! every flow branches on [`RunConfig`] instead of carrying its own copy of
//! the pipeline.

use std::env;
use std::time::Duration;

/// Default pause after launching a detached viewer.
pub const DEFAULT_VIEWER_DELAY: Duration = Duration::from_secs(4);

/// Options recognised by the sim and lint flows
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Assume the work library already exists and skip the setup steps
    pub reload: bool,
    /// Open the waveform viewer (sim) or the lint GUI (lint) after a run
    pub show_waveform: bool,
    /// Continue to report/viewer steps even when failures were detected
    pub force_display: bool,
    /// Also produce an HTML coverage report
    pub generate_html: bool,
    /// Wrap keywords and status messages in ANSI color codes
    pub color: bool,
    /// How long to wait for a detached viewer to come up
    pub viewer_delay: Duration,
    /// Literal markers scanned for in simulator output
    pub keywords: Keywords,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reload: false,
            show_waveform: false,
            force_display: false,
            generate_html: false,
            color: true,
            viewer_delay: DEFAULT_VIEWER_DELAY,
            keywords: Keywords::default(),
        }
    }
}

impl RunConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reload(mut self, reload: bool) -> Self {
        self.reload = reload;
        self
    }

    pub fn with_show_waveform(mut self, show: bool) -> Self {
        self.show_waveform = show;
        self
    }

    pub fn with_force_display(mut self, force: bool) -> Self {
        self.force_display = force;
        self
    }

    pub fn with_generate_html(mut self, html: bool) -> Self {
        self.generate_html = html;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_viewer_delay(mut self, delay: Duration) -> Self {
        self.viewer_delay = delay;
        self
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }
}

/// Pass/fail markers printed by testbenches.
///
/// Detection is a literal substring count; any occurrence of `fail` anywhere in
/// the simulator output counts, including inside unrelated words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    pub pass: String,
    pub fail: String,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            pass: "Passed".to_string(),
            fail: "Failed".to_string(),
        }
    }
}

/// Executable names for every external tool qrun drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub vlib: String,
    pub vlog: String,
    pub vsim: String,
    pub vcover: String,
    pub qverify: String,
    pub viewer: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            vlib: "vlib".to_string(),
            vlog: "vlog".to_string(),
            vsim: "vsim".to_string(),
            vcover: "vcover".to_string(),
            qverify: "qverify".to_string(),
            viewer: "gtkwave".to_string(),
        }
    }
}

impl Toolchain {
    /// Defaults overridden by `QRUN_VLIB`, `QRUN_VLOG`, `QRUN_VSIM`,
    /// `QRUN_VCOVER`, `QRUN_QVERIFY` and `QRUN_VIEWER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut tools = Self::default();
        let slots: [(&str, &mut String); 6] = [
            ("QRUN_VLIB", &mut tools.vlib),
            ("QRUN_VLOG", &mut tools.vlog),
            ("QRUN_VSIM", &mut tools.vsim),
            ("QRUN_VCOVER", &mut tools.vcover),
            ("QRUN_QVERIFY", &mut tools.qverify),
            ("QRUN_VIEWER", &mut tools.viewer),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(key, value = %value, "tool override");
                *slot = value;
            }
        }
        tools
    }
}

/// Whether colored output should be used given the `NO_COLOR` convention.
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}
