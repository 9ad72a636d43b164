/*!
HTTP checks against a local test server using the real isahc client.
*/

use crate::common::{query_param, TestResponse, TestServer};
use beepboop::core::check::{
    CheckError, CheckMode, CheckOptions, Checker, HttpProbeClient, IsahcProbeClient,
};
use beepboop::core::debug_logger::DebugLogger;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn checker_for(url: String) -> Checker {
    let options = CheckOptions::new(CheckMode::Http, url, Duration::from_secs(5));
    Checker::new(options)
        .expect("checker should build")
        .with_logger(DebugLogger::disabled())
}

/// Redirects `/?count=N` to `/?count=N+1` until `final_count`, then answers `final_status`
fn redirect_chain(final_count: u32, final_status: u16) -> impl Fn(&str) -> TestResponse {
    move |path: &str| {
        let count = query_param(path, "count").unwrap_or(0);
        if count < final_count {
            TestResponse::redirect(302, &format!("/?count={}", count + 1))
        } else {
            TestResponse::status(final_status)
        }
    }
}

#[tokio::test]
async fn test_ok_response_is_up() {
    let server = TestServer::start(|_| TestResponse::status(200)).await;
    let checker = checker_for(format!("{}/ready", server.url()));

    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(true));
}

#[tokio::test]
async fn test_not_found_is_down() {
    let server = TestServer::start(|_| TestResponse::status(404)).await;
    let checker = checker_for(server.url());

    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(false));
}

#[tokio::test]
async fn test_single_redirect_to_ok_is_up() {
    let server = TestServer::start(redirect_chain(1, 200)).await;
    let checker = checker_for(format!("{}/?count=0", server.url()));

    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(true));
}

#[tokio::test]
async fn test_redirect_chain_within_cap_is_followed() {
    let server = TestServer::start(redirect_chain(5, 204)).await;
    let client = IsahcProbeClient::new(Duration::from_secs(5)).unwrap();

    let status = client
        .get_status(&format!("{}/?count=0", server.url()))
        .await
        .unwrap();
    assert_eq!(status, 204);
}

#[tokio::test]
async fn test_expected_status_checked_after_redirect() {
    let server = TestServer::start(|path: &str| {
        if path.starts_with("/old") {
            TestResponse::redirect(301, "/new")
        } else {
            TestResponse::status(202)
        }
    })
    .await;

    let options = CheckOptions::new(CheckMode::Http, format!("{}/old", server.url()), Duration::from_secs(5))
        .with_expected_statuses([202].into_iter().collect());
    let checker = Checker::new(options)
        .unwrap()
        .with_logger(DebugLogger::disabled());

    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(true));
}

#[tokio::test]
async fn test_too_many_redirects_is_error() {
    let server = TestServer::start(redirect_chain(12, 200)).await;
    let checker = checker_for(format!("{}/?count=0", server.url()));

    let result = checker.check_once(&CancellationToken::new()).await;

    let err = result.unwrap_err();
    assert_eq!(err, CheckError::TooManyRedirects(10));
    assert!(err.to_string().contains("stopped after 10 redirects"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let checker = checker_for(format!("http://{}", addr));

    let result = checker.check_once(&CancellationToken::new()).await;
    assert!(matches!(result, Err(CheckError::Transport(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_retries_against_server_until_ready() {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let server = TestServer::start(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            TestResponse::status(503)
        } else {
            TestResponse::status(200)
        }
    })
    .await;
    let checker = checker_for(server.url());

    assert_eq!(
        checker.check_with_retries(&CancellationToken::new(), 3).await,
        Ok(true)
    );
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_timeout_covers_whole_redirect_chain() {
    // Each hop fits the timeout on its own; the chain as a whole does not
    let server =
        TestServer::start_with_delay(Duration::from_millis(600), redirect_chain(3, 200)).await;
    let options = CheckOptions::new(
        CheckMode::Http,
        format!("{}/?count=0", server.url()),
        Duration::from_secs(1),
    );
    let checker = Checker::new(options)
        .unwrap()
        .with_logger(DebugLogger::disabled());

    let start = Instant::now();
    let result = checker.check_once(&CancellationToken::new()).await;
    let elapsed = start.elapsed();

    match result {
        Err(CheckError::Transport(message)) => assert!(message.contains("timed out"), "{}", message),
        other => panic!("expected a timeout error, got {:?}", other),
    }
    assert!(elapsed < Duration::from_millis(1800), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_slow_single_response_within_timeout_is_up() {
    let server = TestServer::start_with_delay(Duration::from_millis(200), |_| TestResponse::status(200)).await;
    let client = IsahcProbeClient::new(Duration::from_secs(2)).unwrap();

    assert_eq!(client.get_status(&server.url()).await, Ok(200));
}
