use std::{fmt, str::FromStr};

/// Maximum accepted gap between the achieved and the requested duration.
pub const ALLOWANCE_MS: u64 = 15_000;

/// Targets shorter than this never take the allowance-only shortcut.
pub const MIN_DURATION_FOR_ALLOWANCE_MS: u64 = 600_000;

/// How the residual gap is compared against the allowance when deciding
/// whether a greedy pass is good enough without a filler track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllowanceComparison {
    /// `gap <= allowance`
    #[default]
    AtMost,
    /// `gap == allowance`, kept for parity with older playlist builders.
    Exact,
}

impl fmt::Display for AllowanceComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowanceComparison::AtMost => write!(f, "at-most"),
            AllowanceComparison::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for AllowanceComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "at-most" | "atmost" | "le" | "<=" => Ok(AllowanceComparison::AtMost),
            "exact" | "eq" | "==" => Ok(AllowanceComparison::Exact),
            other => Err(format!(
                "invalid value '{other}' (expected: at-most, exact)"
            )),
        }
    }
}

/// Tolerance rules shared by the greedy fitter and the gap filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub allowance_ms: u64,
    pub min_duration_for_allowance_ms: u64,
    pub comparison: AllowanceComparison,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            allowance_ms: ALLOWANCE_MS,
            min_duration_for_allowance_ms: MIN_DURATION_FOR_ALLOWANCE_MS,
            comparison: AllowanceComparison::AtMost,
        }
    }
}

impl SelectionPolicy {
    pub fn with_comparison(mut self, comparison: AllowanceComparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Whether a greedy selection leaving `gap_ms` unfilled is acceptable as is.
    pub fn accepts_without_fill(&self, gap_ms: u64, target_ms: u64) -> bool {
        if gap_ms == 0 {
            return true;
        }

        if target_ms < self.min_duration_for_allowance_ms {
            return false;
        }

        match self.comparison {
            AllowanceComparison::AtMost => gap_ms <= self.allowance_ms,
            AllowanceComparison::Exact => gap_ms == self.allowance_ms,
        }
    }

    /// Whether a filler of `duration_ms` may close a gap of `gap_ms`.
    ///
    /// A filler may fall short of the gap by up to the allowance but never
    /// run past it.
    pub fn fills(&self, duration_ms: u64, gap_ms: u64) -> bool {
        duration_ms <= gap_ms && gap_ms - duration_ms <= self.allowance_ms
    }
}
