use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, USER_AGENT};
use reqwest::StatusCode;
use sweep_core::{ArticleContext, ArticleId};
use sweep_logging::sweep_debug;
use url::Url;

use crate::{FailureKind, FetchError, Jitter, RawContent, Session};

pub const DEFAULT_API_BASE: &str = "https://apis.naver.com/cafe-web/cafe-articleapi";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Prefix the `/v3/cafes/...` article path is appended to.
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound on waiting for the body once the response head has arrived.
    pub content_timeout: Duration,
    pub max_bytes: u64,
    /// Pause between the response head and reading the content.
    pub render_jitter: Jitter,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            content_timeout: Duration::from_secs(15),
            max_bytes: 5 * 1024 * 1024,
            render_jitter: Jitter::from_millis(1_500, 3_000),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: ArticleId, ctx: &ArticleContext) -> Result<RawContent, FetchError>;
}

/// Article URL for `id`:
/// `{api_base}/v3/cafes/{cafe}/articles/{id}?fromList=true&menuId={menu}&useCafeId=true`.
pub fn article_url(api_base: &str, id: ArticleId, ctx: &ArticleContext) -> Result<Url, FetchError> {
    let raw = format!(
        "{}/v3/cafes/{}/articles/{id}",
        api_base.trim_end_matches('/'),
        ctx.cafe_id
    );
    let mut url =
        Url::parse(&raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    url.query_pairs_mut()
        .append_pair("fromList", "true")
        .append_pair("menuId", &ctx.menu_id)
        .append_pair("useCafeId", "true");
    Ok(url)
}

/// Fetcher bound to one authenticated session.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings, session: &Session) -> Result<Self, FetchError> {
        let client = build_client(&settings, session)?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

fn build_client(settings: &FetchSettings, session: &Session) -> Result<reqwest::Client, FetchError> {
    let setup_error = |err: String| FetchError::new(FailureKind::SessionSetup, err);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&session.user_agent).map_err(|err| setup_error(err.to_string()))?,
    );
    if let Some(cookie) = session.cookie.as_deref() {
        let mut value = HeaderValue::from_str(cookie).map_err(|err| setup_error(err.to_string()))?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .default_headers(headers)
        .build()
        .map_err(|err| setup_error(err.to_string()))
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, id: ArticleId, ctx: &ArticleContext) -> Result<RawContent, FetchError> {
        let url = article_url(&self.settings.api_base, id, ctx)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::new(FailureKind::AuthExpired, status.to_string()));
        }
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::new(FailureKind::Transport, status.to_string()));
        }
        // Other statuses still carry a JSON document; it just has no writer in it.

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        self.settings.render_jitter.pause().await;

        let bytes = tokio::time::timeout(self.settings.content_timeout, read_body(response, max_bytes))
            .await
            .map_err(|_| {
                FetchError::new(
                    FailureKind::Timeout,
                    format!("content not received within {:?}", self.settings.content_timeout),
                )
            })??;

        let content = String::from_utf8_lossy(&bytes).into_owned();
        sweep_debug!(
            "fetched id {} ({} {} bytes): {}...",
            id,
            status.as_u16(),
            bytes.len(),
            content.chars().take(100).collect::<String>()
        );
        Ok(content)
    }
}

async fn read_body(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Transport, err.to_string())
}
