use crate::{ArticleId, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEffect {
    Fetch { id: ArticleId },
    Dispatch { batch: Vec<Record> },
    /// Randomised pause before the next identifier.
    Pace,
    /// The range is exhausted and every record has been handed off.
    Finished,
    /// The session was lost; remaining identifiers are abandoned.
    Aborted,
}
