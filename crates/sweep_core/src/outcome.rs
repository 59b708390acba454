use std::ops::AddAssign;

/// Per-record delivery tally for one or more batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchOutcome {
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    /// True when nothing failed. An empty tally counts as success.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded == self.attempted
    }

    /// Fraction of attempted records that were accepted, `1.0` when nothing was attempted.
    pub fn success_ratio(&self) -> f64 {
        if self.attempted == 0 {
            1.0
        } else {
            self.succeeded as f64 / self.attempted as f64
        }
    }
}

impl AddAssign for DispatchOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.attempted += rhs.attempted;
        self.succeeded += rhs.succeeded;
        self.failed += rhs.failed;
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed",
            self.attempted, self.succeeded, self.failed
        )
    }
}
