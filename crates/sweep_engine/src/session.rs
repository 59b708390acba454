use std::sync::Arc;

use rand::seq::SliceRandom;
use sweep_logging::sweep_info;

use crate::{FetchError, FetchSettings, Fetcher, ReqwestFetcher};

/// Browser identities a session may present; one is picked per session.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.101 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Mobile/15E148 Safari/604.1",
];

/// Material for an already-authenticated session. How it was obtained is not our concern.
#[derive(Clone)]
pub struct Session {
    pub cookie: Option<String>,
    pub user_agent: String,
}

impl Session {
    pub fn with_random_agent(cookie: Option<String>) -> Self {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        Self {
            cookie,
            user_agent: user_agent.to_string(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Hands each worker its own authenticated fetch capability.
///
/// An error here is fatal for the requesting worker only.
#[async_trait::async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, worker: usize) -> Result<Arc<dyn Fetcher>, FetchError>;
}

/// Opens sessions from an operator-supplied cookie header.
#[derive(Debug, Clone)]
pub struct CookieSessionFactory {
    settings: FetchSettings,
    cookie: Option<String>,
}

impl CookieSessionFactory {
    pub fn new(settings: FetchSettings, cookie: Option<String>) -> Self {
        Self { settings, cookie }
    }
}

#[async_trait::async_trait]
impl SessionFactory for CookieSessionFactory {
    async fn open(&self, worker: usize) -> Result<Arc<dyn Fetcher>, FetchError> {
        let session = Session::with_random_agent(self.cookie.clone());
        sweep_info!(
            "worker {}: opening session (cookie: {}, agent: {})",
            worker,
            if session.cookie.is_some() { "yes" } else { "no" },
            session.user_agent
        );
        let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(self.settings.clone(), &session)?);
        Ok(fetcher)
    }
}
