use crate::{ArticleId, Batcher, DispatchOutcome, IdRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Idle,
    Running { current: ArticleId },
    Done,
    Aborted,
}

impl WorkerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerPhase::Done | WorkerPhase::Aborted)
    }
}

/// Counters a worker reports when it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub range: IdRange,
    pub fetched: u64,
    pub fetch_failures: u64,
    pub extracted: u64,
    pub skipped: u64,
    /// Batches handed to the dispatcher.
    pub batches: u64,
    pub delivery: DispatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerState {
    range: IdRange,
    phase: WorkerPhase,
    batch: Batcher,
    fetched: u64,
    fetch_failures: u64,
    extracted: u64,
    skipped: u64,
    batches: u64,
    delivery: DispatchOutcome,
}

impl WorkerState {
    pub fn new(range: IdRange, batch_size: usize) -> Self {
        Self {
            range,
            phase: WorkerPhase::Idle,
            batch: Batcher::new(batch_size),
            fetched: 0,
            fetch_failures: 0,
            extracted: 0,
            skipped: 0,
            batches: 0,
            delivery: DispatchOutcome::default(),
        }
    }

    pub fn range(&self) -> IdRange {
        self.range
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Records extracted but not yet handed to the dispatcher.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    pub fn summary(&self) -> WorkerSummary {
        WorkerSummary {
            range: self.range,
            fetched: self.fetched,
            fetch_failures: self.fetch_failures,
            extracted: self.extracted,
            skipped: self.skipped,
            batches: self.batches,
            delivery: self.delivery,
        }
    }

    pub(crate) fn set_phase(&mut self, phase: WorkerPhase) {
        self.phase = phase;
    }

    pub(crate) fn batch_mut(&mut self) -> &mut Batcher {
        &mut self.batch
    }

    pub(crate) fn note_fetched(&mut self) {
        self.fetched += 1;
    }

    pub(crate) fn note_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub(crate) fn note_extracted(&mut self) {
        self.extracted += 1;
    }

    pub(crate) fn note_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn note_delivery(&mut self, outcome: DispatchOutcome) {
        self.batches += 1;
        self.delivery += outcome;
    }
}
