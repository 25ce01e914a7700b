//! Integration tests for the engine
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! batch cycle through the reqwest transport.

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Method;
use ripple_engine::config::{parse_config, DownloaderConfig};
use ripple_engine::{
    build_engine, Downloader, Engine, FifoQueue, FollowUps, HandlerError, HandlerRegistry,
    HandlerResult, HttpDownloader, Outcome, Request, Response, Scheduler, Spider, StatsCollector,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Follows `href="..."` links on listing pages and records every visited path
struct LinkSpider {
    base: String,
    seeds: Vec<String>,
    visited: Vec<String>,
    details: Vec<String>,
    finished: usize,
}

impl LinkSpider {
    fn new(base: &str, seeds: &[&str]) -> Self {
        Self {
            base: base.to_string(),
            seeds: seeds.iter().map(|s| format!("{}{}", base, s)).collect(),
            visited: Vec::new(),
            details: Vec::new(),
            finished: 0,
        }
    }

    fn parse_detail(&mut self, response: Response, _: &mut Scheduler<'_>) -> HandlerResult {
        let body = response.text();
        if !body.contains("detail") {
            return Err(HandlerError::failed("detail", "missing marker"));
        }
        self.details.push(response.url().path().to_string());
        Ok(FollowUps::none())
    }
}

impl Spider for LinkSpider {
    fn name(&self) -> &str {
        "links"
    }

    fn start_requests(&mut self) -> Box<dyn Iterator<Item = Request> + '_> {
        Box::new(self.seeds.iter().map(|s| Request::get(s).unwrap()))
    }

    fn parse(&mut self, response: Response, _: &mut Scheduler<'_>) -> HandlerResult {
        self.visited.push(response.url().path().to_string());

        let base = self.base.clone();
        let links: Vec<String> = response
            .text()
            .split("href=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect();

        Ok(FollowUps::new(links.into_iter().map(move |link| {
            Request::get(&format!("{}{}", base, link))
                .unwrap()
                .with_handler("detail")
        })))
    }

    fn handlers(&self) -> HandlerRegistry<Self> {
        HandlerRegistry::new().register("detail", Self::parse_detail)
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

fn http_engine(
    concurrency: usize,
    http_errors: bool,
) -> (Engine<FifoQueue, HttpDownloader>, Arc<StatsCollector>) {
    let config = DownloaderConfig {
        timeout_secs: 5,
        http_errors,
        ..DownloaderConfig::default()
    };
    let stats = Arc::new(StatsCollector::new());
    let downloader = HttpDownloader::new(&config, false).expect("Failed to build downloader");
    let engine = Engine::new(FifoQueue::new(), downloader, stats.clone(), concurrency);
    (engine, stats)
}

#[tokio::test]
async fn test_crawl_follows_links_to_named_handler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/item/1">1</a><a href="/item/2">2</a></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("detail one"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("detail two"))
        .mount(&mock_server)
        .await;

    let (mut engine, stats) = http_engine(4, true);
    let mut spider = LinkSpider::new(&mock_server.uri(), &["/"]);

    let summary = engine.open_spider(&mut spider).await;

    assert_eq!(spider.visited, vec!["/"]);
    assert_eq!(spider.details, vec!["/item/1", "/item/2"]);
    assert_eq!(spider.finished, 1);
    assert_eq!(summary.batches, 2);
    assert_eq!(stats.get("scheduler/enqueued"), 3);
    assert_eq!(stats.get("downloader/response_status_count/200"), 3);
}

#[tokio::test]
async fn test_http_error_is_failure_with_status_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&mock_server)
        .await;

    let (mut engine, stats) = http_engine(2, true);
    let mut spider = LinkSpider::new(&mock_server.uri(), &["/broken", "/ok"]);

    engine.open_spider(&mut spider).await;

    assert_eq!(stats.get("downloader/response_status_count/500"), 1);
    assert_eq!(stats.get("downloader/response_status_count/200"), 1);
    assert_eq!(spider.visited, vec!["/ok"]);
    assert_eq!(spider.finished, 1);
}

#[tokio::test]
async fn test_http_error_reaches_handler_when_disabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let (mut engine, stats) = http_engine(1, false);
    let mut spider = LinkSpider::new(&mock_server.uri(), &["/missing"]);

    engine.open_spider(&mut spider).await;

    assert_eq!(stats.get("downloader/response_status_count/404"), 1);
    assert_eq!(spider.visited, vec!["/missing"]);
}

#[tokio::test]
async fn test_handler_failure_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/bad">bad</a><a href="/good">good</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string("detail"))
        .mount(&mock_server)
        .await;

    let (mut engine, stats) = http_engine(2, true);
    let mut spider = LinkSpider::new(&mock_server.uri(), &["/"]);

    engine.open_spider(&mut spider).await;

    assert_eq!(spider.details, vec!["/good"]);
    assert_eq!(stats.get("spider/handler_errors"), 1);
    assert_eq!(spider.finished, 1);
}

#[tokio::test]
async fn test_request_method_and_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let downloader = HttpDownloader::new(&DownloaderConfig::default(), false).unwrap();
    let request = Request::get(&format!("{}/submit", mock_server.uri()))
        .unwrap()
        .with_method(Method::POST)
        .with_header(ACCEPT, HeaderValue::from_static("application/json"))
        .with_context(5u64.into());

    match downloader.fetch(request).await {
        Outcome::Success(response) => {
            assert_eq!(response.status().as_u16(), 201);
            assert_eq!(response.text(), "created");
            assert_eq!(response.context().value(), 5);
        }
        Outcome::Failure(failure) => panic!("unexpected failure: {}", failure),
    }
}

#[tokio::test]
async fn test_timeout_is_reported_as_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = DownloaderConfig {
        timeout_secs: 1,
        ..DownloaderConfig::default()
    };
    let downloader = HttpDownloader::new(&config, false).unwrap();
    let request = Request::get(&format!("{}/slow", mock_server.uri())).unwrap();

    match downloader.fetch(request).await {
        Outcome::Failure(failure) => assert_eq!(failure.code().to_string(), "timeout"),
        Outcome::Success(_) => panic!("expected a timeout"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_isolated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (mut engine, stats) = http_engine(2, true);
    engine.schedule(Request::get("http://127.0.0.1:1/down").unwrap());
    let mut spider = LinkSpider::new(&mock_server.uri(), &["/up"]);

    engine.open_spider(&mut spider).await;

    assert_eq!(spider.visited, vec!["/up"]);
    assert_eq!(stats.get("downloader/response_status_count/200"), 1);
    let failures: u64 = stats
        .snapshot()
        .iter()
        .filter(|(key, _)| {
            key.starts_with("downloader/response_status_count/") && !key.ends_with("/200")
        })
        .map(|(_, count)| count)
        .sum();
    assert_eq!(failures, 1);
}

#[tokio::test]
async fn test_engine_built_from_config_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        r#"
seeds = ["{uri}/a", "{uri}/b", "{uri}/c"]

[engine]
concurrent-requests = 2

[downloader]
timeout-secs = 5

[scheduler]
kind = "lifo"
"#,
        uri = mock_server.uri()
    ))
    .expect("Failed to parse config");

    let stats = Arc::new(StatsCollector::new());
    let mut engine = build_engine(&config, stats.clone()).expect("Failed to build engine");
    let mut spider = LinkSpider::new("", &[]);
    spider.seeds = config.seeds.clone();

    let summary = engine.open_spider(&mut spider).await;

    assert_eq!(summary.batches, 2);
    assert_eq!(spider.visited, vec!["/c", "/b", "/a"]);
    assert_eq!(stats.get("downloader/response_status_count/200"), 3);
}
