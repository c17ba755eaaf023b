//! /api/tts 接口测试（FakeTtsClient 作为上游）

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::util::ServiceExt;

use voxgate::application::ProviderError;
use voxgate::domain::AudioFormat;
use voxgate::infrastructure::adapters::{FakeTtsClient, FakeTtsClientConfig};
use voxgate::infrastructure::http::{build_router, AppState};

fn fake_provider() -> Arc<FakeTtsClient> {
    Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
        audio_data: b"\xff\xf3fake-mp3-frames".to_vec(),
        format: AudioFormat::Mpeg,
        default_selector: "zh-CN-XiaoxiaoNeural".to_string(),
        cache_max_age: 86400,
    }))
}

fn app(provider: Arc<FakeTtsClient>) -> Router {
    build_router(Arc::new(AppState::new(provider, None)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, header::HeaderMap, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

#[tokio::test]
async fn test_missing_text_returns_400_without_upstream_call() {
    let provider = fake_provider();

    for uri in ["/api/tts", "/api/tts?text=", "/api/tts?voice=en-US-JennyNeural"] {
        let (status, headers, body) = get(app(provider.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert!(String::from_utf8(body).unwrap().contains("text"));
    }

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_success_relays_audio_with_headers() {
    let provider = fake_provider();
    let (status, headers, body) = get(app(provider.clone()), "/api/tts?text=%E4%BD%A0%E5%A5%BD").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "audio/mpeg");
    assert_eq!(
        headers.get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=86400"
    );
    assert_eq!(body, b"\xff\xf3fake-mp3-frames");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_default_selector_applied_when_absent() {
    let provider = fake_provider();
    let (status, _, _) = get(app(provider.clone()), "/api/tts?text=hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.last_selector().as_deref(), Some("zh-CN-XiaoxiaoNeural"));
}

#[tokio::test]
async fn test_selector_aliases() {
    let provider = fake_provider();

    get(app(provider.clone()), "/api/tts?text=hi&voice=en-US-JennyNeural").await;
    assert_eq!(provider.last_selector().as_deref(), Some("en-US-JennyNeural"));

    get(app(provider.clone()), "/api/tts?text=hi&locale=en-US").await;
    assert_eq!(provider.last_selector().as_deref(), Some("en-US"));

    get(app(provider.clone()), "/api/tts?text=hi&lang=ja").await;
    assert_eq!(provider.last_selector().as_deref(), Some("ja"));
}

#[tokio::test]
async fn test_voice_wins_over_alias_in_same_query() {
    let provider = fake_provider();

    let (status, _, _) = get(
        app(provider.clone()),
        "/api/tts?text=hi&voice=zh-CN-XiaoxiaoNeural&lang=zh-CN",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.last_selector().as_deref(), Some("zh-CN-XiaoxiaoNeural"));

    let (status, _, _) = get(app(provider.clone()), "/api/tts?text=hi&lang=ja&locale=en-US").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.last_selector().as_deref(), Some("en-US"));
}

#[tokio::test]
async fn test_malformed_query_is_plain_text_400() {
    let provider = fake_provider();
    let (status, headers, body) = get(app(provider.clone()), "/api/tts?text=a&text=b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert!(String::from_utf8(body).unwrap().contains("text"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_cache_max_age_override() {
    let provider = fake_provider();
    let router = build_router(Arc::new(AppState::new(provider, Some(3600))));

    let (_, headers, _) = get(router, "/api/tts?text=hi").await;
    assert_eq!(
        headers.get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=3600"
    );
}

#[tokio::test]
async fn test_upstream_429_relayed_with_body() {
    let provider = fake_provider();
    provider.fail_with(ProviderError::UpstreamStatus {
        status: 429,
        body: "Too many requests, slow down".to_string(),
    });

    let (status, headers, body) = get(app(provider), "/api/tts?text=hi").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert!(String::from_utf8(body)
        .unwrap()
        .contains("Too many requests, slow down"));
}

#[tokio::test]
async fn test_configuration_error_is_500() {
    let provider = fake_provider();
    provider.fail_with(ProviderError::NotConfigured("Azure subscription key is not set".to_string()));

    let (status, _, body) = get(app(provider), "/api/tts?text=hi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().contains("subscription key"));
}

#[tokio::test]
async fn test_token_failure_is_500() {
    let provider = fake_provider();
    provider.fail_with(ProviderError::TokenRejected {
        status: 401,
        body: "invalid key".to_string(),
    });

    let (status, _, body) = get(app(provider), "/api/tts?text=hi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains("401"));
    assert!(body.contains("invalid key"));
}

#[tokio::test]
async fn test_timeout_is_500() {
    let provider = fake_provider();
    provider.fail_with(ProviderError::Timeout);

    let (status, _, body) = get(app(provider), "/api/tts?text=hi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "Request timeout");
}

#[tokio::test]
async fn test_same_request_twice_is_independent() {
    let provider = fake_provider();
    let router = app(provider.clone());

    for _ in 0..2 {
        let (status, _, body) = get(router.clone(), "/api/tts?text=same&voice=zh-CN-YunxiNeural").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"\xff\xf3fake-mp3-frames");
    }
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_ping_reports_provider() {
    let (status, _, body) = get(app(fake_provider()), "/api/ping").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["provider"], "fake");
}

#[tokio::test]
async fn test_post_not_allowed() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/tts?text=hi")
        .body(Body::empty())
        .unwrap();
    let response = app(fake_provider()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
