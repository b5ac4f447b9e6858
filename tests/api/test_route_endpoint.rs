// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP contract of the route API

use crate::support::{ChatReply, FakeUpstream};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use safe_route::api::http_server::{create_app, AppState};
use safe_route::config::NotFoundPolicy;
use safe_route::planner::RoutePlanner;
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

fn app(upstream: &FakeUpstream, policy: NotFoundPolicy) -> Router {
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();
    create_app(AppState::new(planner, policy))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_root_liveness() {
    let upstream = FakeUpstream::start().await;
    let (status, body) = get(app(&upstream, NotFoundPolicy::Ok200), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API fonctionne !");
}

#[tokio::test]
async fn test_health_reports_strategy() {
    let upstream = FakeUpstream::start().await;
    let (status, body) = get(app(&upstream, NotFoundPolicy::Ok200), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["imagery_strategy"], "along-route");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_route_success() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(2, 31);
    let (status, body) = get(
        app(&upstream, NotFoundPolicy::Ok200),
        "/route?start_place=Tour%20Eiffel&end_place=Arc%20de%20Triomphe",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);

    let first = &routes[0];
    assert_eq!(first["status"], "safe");
    assert_eq!(first["distance"], 2000.0);
    assert_eq!(first["time"], 1_500_000);
    assert_eq!(first["geometry"]["type"], "LineString");
    assert_eq!(first["geometry"]["coordinates"].as_array().unwrap().len(), 31);
    assert_eq!(first["geometry"]["coordinates"][0][0], 2.2945);
    assert_eq!(first["images"].as_array().unwrap().len(), 3);

    assert_eq!(body["start"]["lat"], 48.8584);
    assert_eq!(body["end"]["lon"], 2.295);
}

#[tokio::test]
async fn test_route_bbox_mode_omits_images() {
    let upstream = FakeUpstream::start().await;
    let mut config = upstream.config();
    config.imagery.strategy = safe_route::config::ImageryStrategy::BoundingBox;
    let planner = RoutePlanner::from_config(&config).unwrap();
    let app = create_app(AppState::new(planner, NotFoundPolicy::Ok200));

    let (status, body) = get(
        app,
        "/route?start_place=Tour%20Eiffel&end_place=Arc%20de%20Triomphe",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["routes"][0].get("images").is_none());
}

#[tokio::test]
async fn test_missing_parameter_is_unprocessable() {
    let upstream = FakeUpstream::start().await;
    let (status, body) = get(
        app(&upstream, NotFoundPolicy::Ok200),
        "/route?start_place=Tour%20Eiffel",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "validation_error");
    assert!(body["detail"].as_str().unwrap().contains("end_place"));
    assert!(upstream.state.route_queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_parameter_is_unprocessable() {
    let upstream = FakeUpstream::start().await;
    let (status, _) = get(
        app(&upstream, NotFoundPolicy::Ok200),
        "/route?start_place=%20%20&end_place=Arc%20de%20Triomphe",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_place_defaults_to_ok() {
    let upstream = FakeUpstream::start().await;
    let (status, body) = get(
        app(&upstream, NotFoundPolicy::Ok200),
        "/route?start_place=Atlantis&end_place=Arc%20de%20Triomphe",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"error": "Lieu introuvable"}));
}

#[tokio::test]
async fn test_unknown_place_with_404_policy() {
    let upstream = FakeUpstream::start().await;
    let (status, body) = get(
        app(&upstream, NotFoundPolicy::NotFound404),
        "/route?start_place=Tour%20Eiffel&end_place=Atlantis",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Lieu introuvable");
}

#[tokio::test]
async fn test_exhausted_rate_limit_is_429() {
    let upstream = FakeUpstream::start().await;
    upstream.script([
        ChatReply::RateLimited(Some("0".to_string())),
        ChatReply::RateLimited(Some("0".to_string())),
        ChatReply::RateLimited(Some("0".to_string())),
    ]);
    let (status, body) = get(
        app(&upstream, NotFoundPolicy::Ok200),
        "/route?start_place=Tour%20Eiffel&end_place=Arc%20de%20Triomphe",
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["detail"],
        "Trop de requêtes vers OpenRouter, réessayer plus tard."
    );
    assert_eq!(upstream.chat_calls(), 3);
}

#[tokio::test]
async fn test_upstream_failure_is_500() {
    let upstream = FakeUpstream::start().await;
    upstream.script([ChatReply::Fail(503)]);
    let (status, body) = get(
        app(&upstream, NotFoundPolicy::Ok200),
        "/route?start_place=Tour%20Eiffel&end_place=Arc%20de%20Triomphe",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal Server Error");
}

#[tokio::test]
async fn test_collaborator_failures_are_500() {
    for path in ["/search", "/route", "/images"] {
        let upstream = FakeUpstream::start().await;
        upstream.fail(path, 503);
        let (status, body) = get(
            app(&upstream, NotFoundPolicy::Ok200),
            "/route?start_place=Tour%20Eiffel&end_place=Arc%20de%20Triomphe",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} failing", path);
        assert_eq!(body["detail"], "Internal Server Error");
        assert_eq!(body["error_type"], "upstream_error");
        assert!(body.get("routes").is_none());
    }
}
