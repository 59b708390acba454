//! Sweep engine: authenticated fetching, record delivery and the worker fan-out.
mod config;
mod dispatch;
mod extract;
mod fetch;
mod orchestrator;
mod pacing;
mod session;
mod types;
mod worker;

pub use config::{ConfigError, SweepConfig};
pub use dispatch::{DispatchError, Dispatcher, HttpSink, RecordSink};
pub use extract::{ArticleExtractor, Extractor};
pub use fetch::{article_url, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_API_BASE};
pub use orchestrator::{Orchestrator, RunSummary, WorkerFailure, WorkerReport};
pub use pacing::Jitter;
pub use session::{CookieSessionFactory, Session, SessionFactory, USER_AGENTS};
pub use types::{FailureKind, FetchError, RawContent};
pub use worker::{Collaborators, Worker, WorkerFatal};
