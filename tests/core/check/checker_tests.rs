/*!
Tests for the Checker: mode dispatch, retry accounting and cancellation.

Uses scripted HTTP clients and mock ping runners so no network is needed.
*/

use crate::common::{HangingHttpClient, MockPingRunner, ScriptedHttpClient};
use beepboop::core::check::{CheckError, CheckMode, CheckOptions, Checker, PingExit};
use beepboop::core::debug_logger::DebugLogger;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn http_options() -> CheckOptions {
    CheckOptions::new(CheckMode::Http, "http://example.test/ready", Duration::from_secs(2))
}

fn icmp_options(target: &str) -> CheckOptions {
    CheckOptions::new(CheckMode::Icmp, target, Duration::from_secs(2))
}

fn checker_with_http(options: CheckOptions, client: ScriptedHttpClient) -> Checker {
    Checker::new(options)
        .unwrap()
        .with_http_client(Box::new(client))
        .with_logger(DebugLogger::disabled())
}

fn checker_with_ping(options: CheckOptions, runner: MockPingRunner) -> Checker {
    Checker::new(options)
        .unwrap()
        .with_ping_runner(Box::new(runner))
        .with_logger(DebugLogger::disabled())
}

#[test]
fn test_zero_timeout_rejected() {
    let options = CheckOptions::new(CheckMode::Http, "http://x", Duration::ZERO);
    assert!(matches!(Checker::new(options), Err(CheckError::InvalidTimeout)));
}

#[tokio::test]
async fn test_http_success_status_is_up() {
    let client = ScriptedHttpClient::always(Ok(204));
    let checker = checker_with_http(http_options(), client.clone());

    let up = checker.check_once(&CancellationToken::new()).await.unwrap();
    assert!(up);
    assert_eq!(client.requested_urls(), vec!["http://example.test/ready".to_string()]);
}

#[tokio::test]
async fn test_http_not_found_is_down_without_error() {
    let checker = checker_with_http(http_options(), ScriptedHttpClient::always(Ok(404)));
    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(false));
}

#[tokio::test]
async fn test_http_expected_statuses_override_default_range() {
    let options = http_options().with_expected_statuses([503].into_iter().collect());

    let down = checker_with_http(options.clone(), ScriptedHttpClient::always(Ok(200)));
    assert_eq!(down.check_once(&CancellationToken::new()).await, Ok(false));

    let up = checker_with_http(options, ScriptedHttpClient::always(Ok(503)));
    assert_eq!(up.check_once(&CancellationToken::new()).await, Ok(true));
}

#[tokio::test]
async fn test_http_transport_error_propagates() {
    let err = CheckError::Transport("connection refused".to_string());
    let checker = checker_with_http(http_options(), ScriptedHttpClient::always(Err(err.clone())));
    assert_eq!(checker.check_once(&CancellationToken::new()).await, Err(err));
}

#[tokio::test]
async fn test_https_mode_uses_http_client() {
    let options = CheckOptions::new(CheckMode::Https, "https://example.test", Duration::from_secs(1));
    let client = ScriptedHttpClient::always(Ok(200));
    let runner = MockPingRunner::new(Ok(PingExit::Reachable));
    let checker = Checker::new(options)
        .unwrap()
        .with_http_client(Box::new(client.clone()))
        .with_ping_runner(Box::new(runner.clone()))
        .with_logger(DebugLogger::disabled());

    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(true));
    assert_eq!(client.call_count(), 1);
    assert!(runner.invocations().is_empty());
}

#[tokio::test]
async fn test_icmp_reachable_is_up() {
    let runner = MockPingRunner::new(Ok(PingExit::Reachable));
    let checker = checker_with_ping(icmp_options("10.1.2.3"), runner.clone());

    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(true));

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    let (program, args) = &invocations[0];
    assert_eq!(program, "ping");
    assert_eq!(args.last().map(String::as_str), Some("10.1.2.3"));
}

#[tokio::test]
async fn test_icmp_non_zero_exit_is_down_without_error() {
    let checker = checker_with_ping(
        icmp_options("10.1.2.3"),
        MockPingRunner::new(Ok(PingExit::Unreachable(1))),
    );
    assert_eq!(checker.check_once(&CancellationToken::new()).await, Ok(false));
}

#[tokio::test]
async fn test_icmp_abnormal_exit_is_error() {
    let checker = checker_with_ping(icmp_options("10.1.2.3"), MockPingRunner::new(Ok(PingExit::Abnormal)));
    assert!(matches!(
        checker.check_once(&CancellationToken::new()).await,
        Err(CheckError::Subprocess(_))
    ));
}

#[tokio::test]
async fn test_icmp_launch_failure_is_error() {
    let err = CheckError::Subprocess("ping: No such file or directory".to_string());
    let checker = checker_with_ping(icmp_options("10.1.2.3"), MockPingRunner::new(Err(err.clone())));
    assert_eq!(checker.check_once(&CancellationToken::new()).await, Err(err));
}

#[tokio::test]
async fn test_retries_attempt_count_and_last_error() {
    let client = ScriptedHttpClient::new(vec![
        Err(CheckError::Transport("first".to_string())),
        Err(CheckError::Transport("second".to_string())),
        Err(CheckError::Transport("third".to_string())),
    ]);
    let checker = checker_with_http(http_options(), client.clone());

    let result = checker.check_with_retries(&CancellationToken::new(), 2).await;

    assert_eq!(client.call_count(), 3);
    assert_eq!(result, Err(CheckError::Transport("third".to_string())));
}

#[tokio::test]
async fn test_retries_stop_on_first_success() {
    let client = ScriptedHttpClient::new(vec![
        Err(CheckError::Transport("refused".to_string())),
        Ok(200),
        Ok(500),
    ]);
    let checker = checker_with_http(http_options(), client.clone());

    let result = checker.check_with_retries(&CancellationToken::new(), 5).await;

    assert_eq!(result, Ok(true));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_retries_all_down_without_error() {
    let client = ScriptedHttpClient::always(Ok(503));
    let checker = checker_with_http(http_options(), client.clone());

    let result = checker.check_with_retries(&CancellationToken::new(), 2).await;

    assert_eq!(result, Ok(false));
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_retries_keep_last_error_even_if_later_attempt_is_down() {
    let client = ScriptedHttpClient::new(vec![
        Err(CheckError::Transport("timeout".to_string())),
        Ok(404),
    ]);
    let checker = checker_with_http(http_options(), client.clone());

    let result = checker.check_with_retries(&CancellationToken::new(), 1).await;

    assert_eq!(result, Err(CheckError::Transport("timeout".to_string())));
}

#[tokio::test]
async fn test_zero_retries_is_single_attempt_without_delay() {
    let client = ScriptedHttpClient::always(Ok(404));
    let checker = checker_with_http(http_options(), client.clone());

    let start = Instant::now();
    let result = checker.check_with_retries(&CancellationToken::new(), 0).await;

    assert_eq!(result, Ok(false));
    assert_eq!(client.call_count(), 1);
    assert!(start.elapsed() < Duration::from_millis(140));
}

#[tokio::test]
async fn test_retry_delay_between_attempts() {
    let client = ScriptedHttpClient::always(Ok(404));
    let checker = checker_with_http(http_options(), client.clone());

    let start = Instant::now();
    checker
        .check_with_retries(&CancellationToken::new(), 2)
        .await
        .unwrap();

    // Two 150ms waits, none after the last attempt
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(450), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_cancel_during_retry_delay_returns_promptly() {
    let client = ScriptedHttpClient::always(Err(CheckError::Transport("refused".to_string())));
    let checker = checker_with_http(http_options(), client.clone());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result = checker.check_with_retries(&cancel, 10).await;

    assert_eq!(result, Err(CheckError::Cancelled));
    assert!(start.elapsed() < Duration::from_millis(140), "elapsed {:?}", start.elapsed());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_http_request() {
    let client = HangingHttpClient::default();
    let checker = Checker::new(http_options())
        .unwrap()
        .with_http_client(Box::new(client.clone()))
        .with_logger(DebugLogger::disabled());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result = checker.check_with_retries(&cancel, 3).await;

    assert_eq!(result, Err(CheckError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_cancel_stops_running_ping() {
    let runner = MockPingRunner::new(Ok(PingExit::Reachable)).with_delay(Duration::from_secs(30));
    let checker = checker_with_ping(icmp_options("10.1.2.3"), runner);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    assert_eq!(checker.check_once(&cancel).await, Err(CheckError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_already_cancelled_token_skips_check() {
    let client = ScriptedHttpClient::always(Ok(200));
    let checker = checker_with_http(http_options(), client.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(checker.check_with_retries(&cancel, 2).await, Err(CheckError::Cancelled));
    assert_eq!(client.call_count(), 0);
}
