use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sweep_core::{ArticleContext, ArticleId, IdRange, Record};
use sweep_engine::{
    CookieSessionFactory, DispatchError, FailureKind, FetchError, Fetcher, HttpSink, Orchestrator,
    RecordSink, SessionFactory, SweepConfig, WorkerFatal,
};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn article_json(id: ArticleId, writer: &str) -> String {
    format!(
        r#"{{"result":{{"article":{{"id":{id},"writer":{{"id":"{writer}"}},"writeDate":1700000000000}}}}}}"#
    )
}

fn test_config(start: ArticleId, end: ArticleId, batch_size: usize, workers: usize) -> SweepConfig {
    SweepConfig {
        start_id: start,
        end_id: end,
        batch_size,
        workers,
        render_jitter_ms: (0, 0),
        pace_jitter_ms: (0, 0),
        ..SweepConfig::default()
    }
}

/// Answers from a fixed table; ids not in the table get a document without a writer.
struct TableFetcher {
    pages: HashMap<ArticleId, Result<String, FetchError>>,
    seen: Mutex<Vec<ArticleId>>,
    panic_on: Option<ArticleId>,
}

#[async_trait::async_trait]
impl Fetcher for TableFetcher {
    async fn fetch(&self, id: ArticleId, _ctx: &ArticleContext) -> Result<String, FetchError> {
        self.seen.lock().unwrap().push(id);
        if self.panic_on == Some(id) {
            panic!("renderer crashed on {id}");
        }
        self.pages
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Ok(r#"{"errorCode":"0004"}"#.to_string()))
    }
}

struct TableSessions {
    fetcher: Arc<TableFetcher>,
    broken_workers: Vec<usize>,
}

#[async_trait::async_trait]
impl SessionFactory for TableSessions {
    async fn open(&self, worker: usize) -> Result<Arc<dyn Fetcher>, FetchError> {
        if self.broken_workers.contains(&worker) {
            return Err(FetchError::new(FailureKind::SessionSetup, "login failed"));
        }
        let fetcher: Arc<dyn Fetcher> = self.fetcher.clone();
        Ok(fetcher)
    }
}

#[derive(Default)]
struct MemorySink {
    received: Mutex<Vec<Record>>,
}

#[async_trait::async_trait]
impl RecordSink for MemorySink {
    async fn send(&self, record: &Record) -> Result<(), DispatchError> {
        self.received.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn table(pages: impl IntoIterator<Item = (ArticleId, Result<String, FetchError>)>) -> Arc<TableFetcher> {
    Arc::new(TableFetcher {
        pages: pages.into_iter().collect(),
        seen: Mutex::new(Vec::new()),
        panic_on: None,
    })
}

fn authors(sink: &MemorySink) -> Vec<String> {
    sink.received
        .lock()
        .unwrap()
        .iter()
        .map(|record| record.author.clone())
        .collect()
}

#[tokio::test]
async fn single_worker_full_match_dispatches_three_batches() {
    sweep_logging::initialize_for_tests();
    let fetcher = table((100..=104).map(|id| (id, Ok(article_json(id, &format!("w{id}"))))));
    let sessions = Arc::new(TableSessions {
        fetcher: fetcher.clone(),
        broken_workers: Vec::new(),
    });
    let sink = Arc::new(MemorySink::default());

    let summary = Orchestrator::new(test_config(100, 104, 2, 1), sessions, sink.clone())
        .run()
        .await;

    assert!(summary.failures.is_empty());
    assert_eq!(summary.reports.len(), 1);
    let report = &summary.reports[0];
    assert_eq!(report.range, IdRange::new(100, 104));
    assert_eq!(report.summary.batches, 3);
    assert_eq!(report.summary.extracted, 5);
    assert_eq!(summary.delivery().succeeded, 5);

    assert_eq!(*fetcher.seen.lock().unwrap(), vec![100, 101, 102, 103, 104]);
    assert_eq!(authors(&sink), vec!["w100", "w101", "w102", "w103", "w104"]);
}

#[tokio::test]
async fn ids_without_writer_produce_fewer_records() {
    sweep_logging::initialize_for_tests();
    let fetcher = table([
        (100, Ok(article_json(100, "a"))),
        (101, Ok(String::new())),
        (102, Ok(r#"{"writer":{"id":"broken"}"#.to_string())),
        (103, Err(FetchError::new(FailureKind::Timeout, "content not received"))),
        (104, Ok(article_json(104, "b"))),
    ]);
    let sessions = Arc::new(TableSessions {
        fetcher,
        broken_workers: Vec::new(),
    });
    let sink = Arc::new(MemorySink::default());

    let summary = Orchestrator::new(test_config(100, 104, 2, 1), sessions, sink.clone())
        .run()
        .await;

    let report = &summary.reports[0].summary;
    assert_eq!(report.extracted, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.batches, 1);
    assert_eq!(authors(&sink), vec!["a", "b"]);
}

#[tokio::test]
async fn expired_session_stops_only_its_worker() {
    sweep_logging::initialize_for_tests();
    let mut pages: Vec<(ArticleId, Result<String, FetchError>)> =
        (1..=8).map(|id| (id, Ok(article_json(id, &format!("w{id}"))))).collect();
    pages[1] = (2, Err(FetchError::new(FailureKind::AuthExpired, "401 Unauthorized")));
    let fetcher = table(pages);
    let sessions = Arc::new(TableSessions {
        fetcher: fetcher.clone(),
        broken_workers: Vec::new(),
    });
    let sink = Arc::new(MemorySink::default());

    let summary = Orchestrator::new(test_config(1, 8, 5, 2), sessions, sink.clone())
        .run()
        .await;

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].range, IdRange::new(5, 8));
    assert_eq!(summary.failures.len(), 1);

    let failure = &summary.failures[0];
    assert_eq!(failure.index, 0);
    match &failure.error {
        WorkerFatal::SessionLost { id, error, summary } => {
            assert_eq!(*id, 2);
            assert_eq!(error.kind, FailureKind::AuthExpired);
            // The record extracted before the loss was still delivered.
            assert_eq!(summary.delivery.succeeded, 1);
        }
        other => panic!("expected SessionLost, got {other:?}"),
    }

    let seen = fetcher.seen.lock().unwrap().clone();
    assert!(!seen.contains(&3) && !seen.contains(&4), "abandoned ids were fetched: {seen:?}");

    let mut delivered = authors(&sink);
    delivered.sort();
    assert_eq!(delivered, vec!["w1", "w5", "w6", "w7", "w8"]);
    assert_eq!(summary.delivery().attempted, 5);
}

#[tokio::test]
async fn session_init_failure_abandons_that_range() {
    sweep_logging::initialize_for_tests();
    let fetcher = table((1..=6).map(|id| (id, Ok(article_json(id, "w")))));
    let sessions = Arc::new(TableSessions {
        fetcher,
        broken_workers: vec![1],
    });
    let sink = Arc::new(MemorySink::default());

    let summary = Orchestrator::new(test_config(1, 6, 10, 3), sessions, sink.clone())
        .run()
        .await;

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].range, IdRange::new(3, 4));
    assert!(matches!(
        summary.failures[0].error,
        WorkerFatal::SessionInit(_)
    ));
    assert_eq!(sink.received.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn surplus_workers_finish_without_a_session() {
    sweep_logging::initialize_for_tests();
    let fetcher = table((1..=2).map(|id| (id, Ok(article_json(id, "w")))));
    // Workers 2 and 3 own empty ranges; opening a session for them would fail.
    let sessions = Arc::new(TableSessions {
        fetcher,
        broken_workers: vec![2, 3],
    });
    let sink = Arc::new(MemorySink::default());

    let summary = Orchestrator::new(test_config(1, 2, 1, 4), sessions, sink.clone())
        .run()
        .await;

    assert!(summary.failures.is_empty());
    assert_eq!(summary.reports.len(), 4);
    assert!(summary.reports[2].range.is_empty());
    assert_eq!(summary.reports[3].summary.fetched, 0);
    assert_eq!(sink.received.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn panicking_worker_does_not_stop_the_others() {
    sweep_logging::initialize_for_tests();
    let fetcher = Arc::new(TableFetcher {
        pages: (1..=4).map(|id| (id, Ok(article_json(id, &format!("w{id}"))))).collect(),
        seen: Mutex::new(Vec::new()),
        panic_on: Some(1),
    });
    let sessions = Arc::new(TableSessions {
        fetcher,
        broken_workers: Vec::new(),
    });
    let sink = Arc::new(MemorySink::default());

    let summary = Orchestrator::new(test_config(1, 4, 5, 2), sessions, sink.clone())
        .run()
        .await;

    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert_eq!(failure.index, 0);
    assert_eq!(failure.range, IdRange::new(1, 2));
    match &failure.error {
        WorkerFatal::Panicked(message) => assert!(message.contains("renderer crashed on 1"), "{message}"),
        other => panic!("expected Panicked, got {other:?}"),
    }

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].range, IdRange::new(3, 4));
    assert_eq!(authors(&sink), vec!["w3", "w4"]);
}

/// Serves an article for every id, derived from the request path.
struct ArticleResponder;

impl Respond for ArticleResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id: ArticleId = request
            .url
            .path()
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
            .unwrap_or_default();
        ResponseTemplate::new(200)
            .set_body_raw(article_json(id, &format!("user{id}")), "application/json")
    }
}

#[tokio::test]
async fn sweep_over_http_delivers_every_article() {
    sweep_logging::initialize_for_tests();
    let platform = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/cafe-articleapi/v3/cafes/10094408/articles/\d+$"))
        .respond_with(ArticleResponder)
        .expect(6)
        .mount(&platform)
        .await;

    let ingest = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200))
        .expect(6)
        .mount(&ingest)
        .await;

    let config = SweepConfig {
        api_base: format!("{}/cafe-articleapi", platform.uri()),
        sink_endpoint: format!("{}/api/data", ingest.uri()),
        session_cookie: Some("NID_SES=test".to_string()),
        ..test_config(500, 505, 4, 2)
    };
    let sessions = Arc::new(CookieSessionFactory::new(
        config.fetch_settings(),
        config.session_cookie.clone(),
    ));
    let sink = Arc::new(HttpSink::new(config.sink_endpoint.clone(), config.sink_timeout()).unwrap());

    let summary = Orchestrator::new(config, sessions, sink).run().await;

    assert!(summary.failures.is_empty());
    let delivery = summary.delivery();
    assert_eq!(delivery.attempted, 6);
    assert_eq!(delivery.succeeded, 6);

    let posted: Vec<Record> = ingest
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect();
    let mut urls: Vec<String> = posted.into_iter().map(|record| record.url).collect();
    urls.sort();
    assert_eq!(
        urls[0],
        "https://cafe.naver.com/ArticleRead.nhn?clubid=10094408&menuid=415&articleid=500"
    );
}
