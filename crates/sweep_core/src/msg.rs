use crate::{ArticleId, DispatchOutcome, Record};

/// What became of one identifier after fetch and extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A record was extracted.
    Extracted(Record),
    /// Content arrived but held no usable article (empty body, no writer, bad payload).
    NoRecord,
    /// The fetch failed with a non-fatal error.
    FetchFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMsg {
    /// Session is open; begin at the first id of the range.
    Start,
    /// The current identifier has been fetched and extracted.
    ItemFinished { id: ArticleId, outcome: ItemOutcome },
    /// A previously emitted batch has been delivered.
    BatchDispatched(DispatchOutcome),
    /// The authenticated session is gone; nothing more can be fetched.
    SessionLost,
}
