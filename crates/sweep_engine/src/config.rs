use std::time::Duration;

use serde::{Deserialize, Serialize};
use sweep_core::{ArticleContext, ArticleId};
use thiserror::Error;
use url::Url;

use crate::fetch::DEFAULT_API_BASE;
use crate::{FetchSettings, Jitter};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("workers must be at least 1")]
    NoWorkers,
    #[error("batch_size must be at least 1")]
    ZeroBatchSize,
    #[error("start_id {start} is greater than end_id {end}")]
    InvertedRange { start: ArticleId, end: ArticleId },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field}: minimum {min_ms}ms exceeds maximum {max_ms}ms")]
    InvertedJitter {
        field: &'static str,
        min_ms: u64,
        max_ms: u64,
    },
    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
}

/// Immutable settings for one sweep. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start_id: ArticleId,
    pub end_id: ArticleId,
    pub batch_size: usize,
    pub workers: usize,
    pub cafe_id: String,
    pub menu_id: String,
    pub sink_endpoint: String,
    pub api_base: String,
    /// Cookie header of an already logged-in session.
    pub session_cookie: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub content_timeout_ms: u64,
    pub sink_timeout_ms: u64,
    pub max_bytes: u64,
    /// Delay before waiting for article content.
    pub render_jitter_ms: (u64, u64),
    /// Delay between consecutive identifiers.
    pub pace_jitter_ms: (u64, u64),
}

impl Default for SweepConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            start_id: 3_879_427,
            end_id: 3_879_500,
            batch_size: 5,
            workers: 1,
            cafe_id: "10094408".to_string(),
            menu_id: "415".to_string(),
            sink_endpoint: "http://localhost:3000/api/data".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            session_cookie: None,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            content_timeout_ms: fetch.content_timeout.as_millis() as u64,
            sink_timeout_ms: 10_000,
            max_bytes: fetch.max_bytes,
            render_jitter_ms: (1_500, 3_000),
            pace_jitter_ms: (500, 1_000),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.start_id > self.end_id {
            return Err(ConfigError::InvertedRange {
                start: self.start_id,
                end: self.end_id,
            });
        }
        for (field, value) in [
            ("cafe_id", &self.cafe_id),
            ("menu_id", &self.menu_id),
            ("sink_endpoint", &self.sink_endpoint),
            ("api_base", &self.api_base),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        for (field, value) in [
            ("sink_endpoint", &self.sink_endpoint),
            ("api_base", &self.api_base),
        ] {
            let url = Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
                field,
                reason: err.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl {
                    field,
                    reason: format!("unsupported scheme {}", url.scheme()),
                });
            }
        }
        for (field, (min_ms, max_ms)) in [
            ("render_jitter_ms", self.render_jitter_ms),
            ("pace_jitter_ms", self.pace_jitter_ms),
        ] {
            if min_ms > max_ms {
                return Err(ConfigError::InvertedJitter {
                    field,
                    min_ms,
                    max_ms,
                });
            }
        }
        Ok(())
    }

    pub fn context(&self) -> ArticleContext {
        ArticleContext::new(self.cafe_id.clone(), self.menu_id.clone())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            api_base: self.api_base.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            content_timeout: Duration::from_millis(self.content_timeout_ms),
            max_bytes: self.max_bytes,
            render_jitter: Jitter::from_millis(self.render_jitter_ms.0, self.render_jitter_ms.1),
        }
    }

    pub fn pace_jitter(&self) -> Jitter {
        Jitter::from_millis(self.pace_jitter_ms.0, self.pace_jitter_ms.1)
    }

    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(self.sink_timeout_ms)
    }
}
