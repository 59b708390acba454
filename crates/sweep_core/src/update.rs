use crate::{ItemOutcome, WorkerEffect, WorkerMsg, WorkerPhase, WorkerState};

/// Pure worker step: applies a message to state and returns the effects to run, in order.
///
/// Identifiers advance strictly upward and the phase never moves backwards.
/// Messages that do not fit the current phase are ignored.
pub fn update(mut state: WorkerState, msg: WorkerMsg) -> (WorkerState, Vec<WorkerEffect>) {
    let effects = match msg {
        WorkerMsg::Start => {
            if state.phase() != WorkerPhase::Idle {
                return (state, Vec::new());
            }
            let range = state.range();
            if range.is_empty() {
                state.set_phase(WorkerPhase::Done);
                vec![WorkerEffect::Finished]
            } else {
                state.set_phase(WorkerPhase::Running {
                    current: range.start,
                });
                vec![WorkerEffect::Fetch { id: range.start }]
            }
        }
        WorkerMsg::ItemFinished { id, outcome } => {
            let WorkerPhase::Running { current } = state.phase() else {
                return (state, Vec::new());
            };
            if id != current {
                return (state, Vec::new());
            }

            match outcome {
                ItemOutcome::Extracted(record) => {
                    state.note_fetched();
                    state.note_extracted();
                    state.batch_mut().add(record);
                }
                ItemOutcome::NoRecord => {
                    state.note_fetched();
                    state.note_skipped();
                }
                ItemOutcome::FetchFailed => state.note_fetch_failure(),
            }

            let mut effects = Vec::with_capacity(4);
            if state.batch_mut().should_flush() {
                effects.push(WorkerEffect::Dispatch {
                    batch: state.batch_mut().drain(),
                });
            }
            effects.push(WorkerEffect::Pace);

            let end = state.range().end;
            match current.checked_add(1).filter(|next| *next <= end) {
                Some(next) => {
                    state.set_phase(WorkerPhase::Running { current: next });
                    effects.push(WorkerEffect::Fetch { id: next });
                }
                None => {
                    effects.extend(flush_remaining(&mut state));
                    state.set_phase(WorkerPhase::Done);
                    effects.push(WorkerEffect::Finished);
                }
            }
            effects
        }
        WorkerMsg::BatchDispatched(outcome) => {
            state.note_delivery(outcome);
            Vec::new()
        }
        WorkerMsg::SessionLost => {
            if state.phase().is_terminal() {
                return (state, Vec::new());
            }
            // Whatever was already extracted still goes out.
            let mut effects: Vec<WorkerEffect> = flush_remaining(&mut state).into_iter().collect();
            state.set_phase(WorkerPhase::Aborted);
            effects.push(WorkerEffect::Aborted);
            effects
        }
    };

    (state, effects)
}

fn flush_remaining(state: &mut WorkerState) -> Option<WorkerEffect> {
    if state.pending() == 0 {
        return None;
    }
    Some(WorkerEffect::Dispatch {
        batch: state.batch_mut().drain(),
    })
}
