use std::sync::Arc;

use sweep_core::{partition, DispatchOutcome, IdRange, WorkerSummary};
use sweep_logging::{sweep_error, sweep_info};

use crate::{
    ArticleExtractor, Collaborators, Dispatcher, Extractor, RecordSink, SessionFactory,
    SweepConfig, Worker, WorkerFatal,
};

#[derive(Debug)]
pub struct WorkerReport {
    pub index: usize,
    pub range: IdRange,
    pub summary: WorkerSummary,
}

#[derive(Debug)]
pub struct WorkerFailure {
    pub index: usize,
    pub range: IdRange,
    pub error: WorkerFatal,
}

/// Everything a finished run knows. Informational only: a run has no pass/fail status.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<WorkerReport>,
    pub failures: Vec<WorkerFailure>,
}

impl RunSummary {
    /// Delivery tally across all workers, including those that lost their session.
    pub fn delivery(&self) -> DispatchOutcome {
        let mut total = DispatchOutcome::default();
        for report in &self.reports {
            total += report.summary.delivery;
        }
        for failure in &self.failures {
            if let WorkerFatal::SessionLost { summary, .. } = &failure.error {
                total += summary.delivery;
            }
        }
        total
    }
}

/// Fans a sweep out over one task per range and collects the results.
pub struct Orchestrator {
    config: SweepConfig,
    collab: Collaborators,
}

impl Orchestrator {
    pub fn new(
        config: SweepConfig,
        sessions: Arc<dyn SessionFactory>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            config,
            collab: Collaborators {
                sessions,
                extractor: Arc::new(ArticleExtractor),
                dispatcher: Dispatcher::new(sink),
            },
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.collab.extractor = extractor;
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Must be called from within a tokio runtime.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        let ranges = match partition(self.config.start_id, self.config.end_id, self.config.workers) {
            Ok(ranges) => ranges,
            Err(err) => {
                sweep_error!("cannot partition sweep: {}", err);
                return summary;
            }
        };

        sweep_info!(
            "sweeping [{}, {}] with {} workers, batch size {}",
            self.config.start_id,
            self.config.end_id,
            ranges.len(),
            self.config.batch_size
        );

        let handles: Vec<_> = ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                let worker = Worker::new(index, range, &self.config, self.collab.clone());
                (index, range, tokio::spawn(worker.run()))
            })
            .collect();

        for (index, range, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(WorkerFatal::Panicked(join_err.to_string())),
            };
            match result {
                Ok(worker_summary) => summary.reports.push(WorkerReport {
                    index,
                    range,
                    summary: worker_summary,
                }),
                Err(error) => {
                    sweep_error!("worker {} ({}) failed: {}", index, range, error);
                    summary.failures.push(WorkerFailure { index, range, error });
                }
            }
        }

        let delivery = summary.delivery();
        sweep_info!(
            "sweep finished: {} workers completed, {} failed; delivery {} ({:.1}% accepted)",
            summary.reports.len(),
            summary.failures.len(),
            delivery,
            delivery.success_ratio() * 100.0
        );
        summary
    }
}
