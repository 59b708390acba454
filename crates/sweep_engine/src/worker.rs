use std::collections::VecDeque;
use std::sync::Arc;

use sweep_core::{
    update, ArticleContext, ArticleId, IdRange, ItemOutcome, WorkerEffect, WorkerMsg, WorkerState,
    WorkerSummary,
};
use sweep_logging::{sweep_error, sweep_info, sweep_warn};
use thiserror::Error;

use crate::{Dispatcher, Extractor, FetchError, Fetcher, Jitter, SessionFactory, SweepConfig};

/// Reasons a worker stops before its range is exhausted.
#[derive(Debug, Error)]
pub enum WorkerFatal {
    #[error("session could not be opened: {0}")]
    SessionInit(FetchError),
    #[error("session lost at id {id}: {error}")]
    SessionLost {
        id: ArticleId,
        error: FetchError,
        summary: WorkerSummary,
    },
    #[error("worker task panicked: {0}")]
    Panicked(String),
}

/// Collaborators shared by every worker of a run.
#[derive(Clone)]
pub struct Collaborators {
    pub sessions: Arc<dyn SessionFactory>,
    pub extractor: Arc<dyn Extractor>,
    pub dispatcher: Dispatcher,
}

/// Sweeps one range with its own session, strictly in ascending id order.
pub struct Worker {
    index: usize,
    range: IdRange,
    ctx: ArticleContext,
    batch_size: usize,
    pace: Jitter,
    collab: Collaborators,
}

impl Worker {
    pub fn new(index: usize, range: IdRange, config: &SweepConfig, collab: Collaborators) -> Self {
        Self {
            index,
            range,
            ctx: config.context(),
            batch_size: config.batch_size,
            pace: config.pace_jitter(),
            collab,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn range(&self) -> IdRange {
        self.range
    }

    pub async fn run(self) -> Result<WorkerSummary, WorkerFatal> {
        let state = WorkerState::new(self.range, self.batch_size);
        if self.range.is_empty() {
            sweep_info!("worker {}: range {} is empty, nothing to do", self.index, self.range);
            return Ok(state.summary());
        }

        let fetcher = self
            .collab
            .sessions
            .open(self.index)
            .await
            .map_err(WorkerFatal::SessionInit)?;
        sweep_info!("worker {}: sweeping {}", self.index, self.range);

        let (mut state, effects) = update(state, WorkerMsg::Start);
        let mut pending: VecDeque<WorkerEffect> = effects.into();
        let mut lost: Option<(ArticleId, FetchError)> = None;

        while let Some(effect) = pending.pop_front() {
            let msg = match effect {
                WorkerEffect::Fetch { id } => match self.process(fetcher.as_ref(), id).await {
                    Ok(outcome) => WorkerMsg::ItemFinished { id, outcome },
                    Err(error) => {
                        sweep_error!("worker {}: id {}: {}, stopping", self.index, id, error);
                        lost = Some((id, error));
                        WorkerMsg::SessionLost
                    }
                },
                WorkerEffect::Dispatch { batch } => {
                    let outcome = self.collab.dispatcher.dispatch(&batch).await;
                    if !outcome.all_succeeded() {
                        sweep_warn!(
                            "worker {}: {} of {} records were not delivered",
                            self.index,
                            outcome.failed,
                            outcome.attempted
                        );
                    }
                    WorkerMsg::BatchDispatched(outcome)
                }
                WorkerEffect::Pace => {
                    self.pace.pause().await;
                    continue;
                }
                WorkerEffect::Finished | WorkerEffect::Aborted => continue,
            };
            let (next, more) = update(state, msg);
            state = next;
            pending.extend(more);
        }

        let summary = state.summary();
        if let Some((id, error)) = lost {
            return Err(WorkerFatal::SessionLost { id, error, summary });
        }
        sweep_info!(
            "worker {}: finished {} - {} fetched, {} extracted, {} skipped, {} fetch failures; delivery {}",
            self.index,
            self.range,
            summary.fetched,
            summary.extracted,
            summary.skipped,
            summary.fetch_failures,
            summary.delivery
        );
        Ok(summary)
    }

    /// Fetch and extract one id. Only fatal fetch failures come back as errors.
    async fn process(&self, fetcher: &dyn Fetcher, id: ArticleId) -> Result<ItemOutcome, FetchError> {
        match fetcher.fetch(id, &self.ctx).await {
            Ok(raw) if raw.trim().is_empty() => {
                sweep_info!("worker {}: id {}: no content", self.index, id);
                Ok(ItemOutcome::NoRecord)
            }
            Ok(raw) => Ok(match self.collab.extractor.extract(id, &raw, &self.ctx) {
                Some(record) => ItemOutcome::Extracted(record),
                None => ItemOutcome::NoRecord,
            }),
            Err(error) if error.kind.is_fatal() => Err(error),
            Err(error) => {
                sweep_warn!("worker {}: id {}: fetch failed: {}", self.index, id, error);
                Ok(ItemOutcome::FetchFailed)
            }
        }
    }
}
