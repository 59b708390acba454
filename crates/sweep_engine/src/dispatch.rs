use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use sweep_core::{DispatchOutcome, Record};
use sweep_logging::{sweep_debug, sweep_error, sweep_info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("sink rejected record with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Destination for individual records.
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    async fn send(&self, record: &Record) -> Result<(), DispatchError>;
}

/// Posts each record as a JSON document to the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RecordSink for HttpSink {
    async fn send(&self, record: &Record) -> Result<(), DispatchError> {
        let body = serde_json::to_string(record)?;
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| DispatchError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Delivers batches record by record and tallies the result.
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn RecordSink>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    /// Send every record in order. A failed record is logged and counted;
    /// it never stops the rest of the batch.
    pub async fn dispatch(&self, batch: &[Record]) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        if batch.is_empty() {
            return outcome;
        }

        for record in batch {
            match self.sink.send(record).await {
                Ok(()) => {
                    sweep_debug!("delivered: {}", record.title);
                    outcome.record_success();
                }
                Err(err) => {
                    sweep_error!("delivery failed: {} - {}", record.title, err);
                    outcome.record_failure();
                }
            }
        }

        sweep_info!(
            "batch of {} records: {} succeeded, {} failed",
            batch.len(),
            outcome.succeeded,
            outcome.failed
        );
        outcome
    }
}
