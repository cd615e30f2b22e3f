use super::*;
use crate::config::ProbeConfig;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use proptest::prelude::*;
use std::net::SocketAddr;
use std::time::Duration;
use vigil_types::ProbeStatus;

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route("/moved", get(|| async { Redirect::temporary("/") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .route(
            "/browser-only",
            get(|headers: HeaderMap| async move {
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                if agent.starts_with("Mozilla/5.0") {
                    StatusCode::OK
                } else {
                    StatusCode::FORBIDDEN
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn plain_http_config() -> ProbeConfig {
    ProbeConfig {
        verify_tls: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_ok_is_healthy() {
    let addr = spawn_server().await;
    let client = ProbeClient::new().unwrap();
    let profile = ProbeProfile::standard(&plain_http_config());

    let outcome = client.probe(&format!("http://{}/", addr), &profile).await;
    assert_eq!(outcome.status, ProbeStatus::Healthy);
    assert_eq!(outcome.status_code, Some(200));
    assert!(outcome.response_time.is_some());
}

#[tokio::test]
async fn test_non_200_is_http_error() {
    let addr = spawn_server().await;
    let client = ProbeClient::new().unwrap();
    let profile = ProbeProfile::standard(&plain_http_config());

    let outcome = client.probe(&format!("http://{}/down", addr), &profile).await;
    assert_eq!(outcome.status, ProbeStatus::HttpError(503));
    assert_eq!(outcome.status_code, Some(503));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let addr = spawn_server().await;
    let client = ProbeClient::new().unwrap();
    let profile = ProbeProfile::standard(&plain_http_config());

    let outcome = client.probe(&format!("http://{}/moved", addr), &profile).await;
    assert_eq!(outcome.status, ProbeStatus::Healthy);
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let addr = spawn_server().await;
    let client = ProbeClient::new().unwrap();
    let profile =
        ProbeProfile::standard(&plain_http_config()).with_timeout(Duration::from_millis(200));

    let outcome = client.probe(&format!("http://{}/slow", addr), &profile).await;
    assert_eq!(outcome.status, ProbeStatus::Timeout);
    assert!(outcome.response_time.is_none());
    assert!(outcome.status_code.is_none());
}

#[tokio::test]
async fn test_closed_port_is_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ProbeClient::new().unwrap();
    let profile = ProbeProfile::lightweight(&plain_http_config());

    let outcome = client.probe(&format!("http://127.0.0.1:{}/", port), &profile).await;
    assert_eq!(outcome.status, ProbeStatus::ConnectionError);
    assert!(outcome.detail.is_some());
}

#[tokio::test]
async fn test_profiles_send_their_headers() {
    let addr = spawn_server().await;
    let client = ProbeClient::new().unwrap();
    let config = plain_http_config();
    let url = format!("http://{}/browser-only", addr);

    let standard = client.probe(&url, &ProbeProfile::standard(&config)).await;
    assert_eq!(standard.status, ProbeStatus::Healthy);

    let fast = client.probe(&url, &ProbeProfile::fast_check(&config)).await;
    assert_eq!(fast.status, ProbeStatus::Healthy);

    let light = client.probe(&url, &ProbeProfile::lightweight(&config)).await;
    assert_eq!(light.status, ProbeStatus::HttpError(403));
}

#[test]
fn test_profile_timeouts() {
    let config = ProbeConfig::default();
    assert_eq!(ProbeProfile::standard(&config).timeout, Duration::from_secs(8));
    assert_eq!(ProbeProfile::lightweight(&config).timeout, Duration::from_secs(5));
    assert_eq!(ProbeProfile::fast_check(&config).timeout, Duration::from_secs(3));
    assert_eq!(ProbeProfile::lightweight(&config).headers.len(), 1);
}

#[test]
fn test_tls_markers() {
    assert!(looks_like_tls_failure("invalid peer certificate: UnknownIssuer"));
    assert!(looks_like_tls_failure("received fatal alert: HandshakeFailure"));
    assert!(!looks_like_tls_failure("Connection refused (os error 111)"));
    assert!(!looks_like_tls_failure("operation timed out"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("abcdefghij", 4), "abcd...");
}

proptest! {
    #[test]
    fn healthy_iff_status_is_200(code in 100u16..600) {
        let status = ProbeStatus::from_status_code(code);
        prop_assert_eq!(status.is_healthy(), code == 200);
        if code != 200 {
            prop_assert_eq!(status, ProbeStatus::HttpError(code));
        }
    }
}
