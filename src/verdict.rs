//! Pass/fail evaluation of simulator output
//!
//! The simulator's exit code only says whether it ran; testbench results are
//! signalled by literal keywords in its transcript. A verdict counts every
//! non-overlapping occurrence, so two failures reported on one line count as
//! two, and a keyword embedded in an unrelated word counts too.

use crate::config::Keywords;

/// Keyword counts for one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verdict {
    pub passes: usize,
    pub failures: usize,
}

impl Verdict {
    pub fn from_output(output: &str, keywords: &Keywords) -> Self {
        Self {
            passes: count_occurrences(output, &keywords.pass),
            failures: count_occurrences(output, &keywords.fail),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}

/// Non-overlapping occurrences of `needle`; an empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_occurrence() {
        let out = "# Test 1 Failed\n# Test 2 Passed\n# Test 3 Failed Failed\n";
        let verdict = Verdict::from_output(out, &Keywords::default());
        assert_eq!(verdict.failures, 3);
        assert_eq!(verdict.passes, 1);
        assert!(verdict.has_failures());
    }

    #[test]
    fn test_clean_output() {
        let verdict = Verdict::from_output("# ** Note: $finish\n", &Keywords::default());
        assert_eq!(verdict, Verdict::default());
        assert!(!verdict.has_failures());
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(count_occurrences("FAILED failed", "Failed"), 0);
    }

    #[test]
    fn test_empty_needle() {
        assert_eq!(count_occurrences("anything", ""), 0);
    }
}
