//! Sweep core: pure range, extraction and batching rules plus the worker state machine.
mod batch;
mod effect;
mod extract;
mod msg;
mod outcome;
mod range;
mod record;
mod state;
mod update;

pub use batch::Batcher;
pub use effect::WorkerEffect;
pub use extract::{
    find_writer, format_write_date, try_extract, ExtractionMismatch, DATE_FORMAT, EMAIL_DOMAIN,
};
pub use msg::{ItemOutcome, WorkerMsg};
pub use outcome::DispatchOutcome;
pub use range::{partition, ArticleId, IdRange, PartitionError};
pub use record::{ArticleContext, Record};
pub use state::{WorkerPhase, WorkerState, WorkerSummary};
pub use update::update;
