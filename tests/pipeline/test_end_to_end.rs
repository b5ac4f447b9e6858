// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route planning against in-process upstreams
//!
//! Drives the production HTTP clients end to end: geocoding, routing,
//! imagery sampling and classification.

use crate::support::{FakeUpstream, ARC_DE_TRIOMPHE, EIFFEL_TOWER};
use safe_route::config::ImageryStrategy;
use safe_route::error::PipelineError;
use safe_route::planner::RoutePlanner;
use safe_route::safety::Verdict;
use std::sync::Arc;

#[tokio::test]
async fn test_plan_rates_every_route() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(2, 31);
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    let plan = planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    assert_eq!(plan.routes.len(), 2);
    assert!((plan.start.lat - 48.8584).abs() < 1e-9);
    assert!((plan.end.lat - 48.8738).abs() < 1e-9);

    for route in &plan.routes {
        assert_eq!(route.verdict, Verdict::Safe);
        assert_eq!(route.candidate.path.len(), 31);
        // points 0, 15 and 30 are sampled, one image each
        assert_eq!(route.assessment.analyzed(), 3);
        assert_eq!(route.preview_images.as_ref().map(Vec::len), Some(3));
    }

    assert_eq!(upstream.image_queries(), 6);
    assert_eq!(upstream.chat_calls(), 6);
}

#[tokio::test]
async fn test_routing_request_parameters() {
    let upstream = FakeUpstream::start().await;
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    let queries = upstream.state.route_queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    let params = &queries[0];
    let value = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let points: Vec<&String> = params
        .iter()
        .filter(|(k, _)| k == "point")
        .map(|(_, v)| v)
        .collect();
    assert_eq!(points, vec!["48.8584,2.2945", "48.8738,2.295"]);
    assert_eq!(value("vehicle").as_deref(), Some("foot"));
    assert_eq!(value("locale").as_deref(), Some("fr"));
    assert_eq!(value("points_encoded").as_deref(), Some("false"));
    assert_eq!(value("algorithm").as_deref(), Some("alternative_route"));
    assert_eq!(value("alternative_route.max_paths").as_deref(), Some("3"));
    assert_eq!(value("key").as_deref(), Some("gh-key"));
}

#[tokio::test]
async fn test_imagery_request_parameters() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(1, 1);
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    let params = upstream.state.image_params.lock().unwrap().clone();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["limit"], "1");
    assert_eq!(params[0]["access_token"], "mly-token");
    assert_eq!(params[0]["fields"], "id,computed_geometry,thumb_1024_url");

    let bbox: Vec<f64> = params[0]["bbox"]
        .split(',')
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(bbox.len(), 4);
    assert!(bbox[0] < 2.2945 && bbox[2] > 2.2945);
    assert!(bbox[1] < 48.8584 && bbox[3] > 48.8584);
}

#[tokio::test]
async fn test_danger_majority_marks_route_dangerous() {
    let upstream = FakeUpstream::start().await;
    upstream.set_default_answer("Danger: no sidewalk");
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    let plan = planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    assert_eq!(plan.routes[0].verdict, Verdict::Danger);
    assert_eq!(plan.routes[0].assessment.danger_count, 3);
}

#[tokio::test]
async fn test_tie_is_safe() {
    let upstream = FakeUpstream::start().await;
    // 16 points sampled at 0 and 15: one vote each way
    upstream.set_paths(1, 16);
    upstream.script([
        crate::support::ChatReply::Answer("danger".to_string()),
        crate::support::ChatReply::Answer("safe".to_string()),
    ]);
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    let plan = planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    assert_eq!(plan.routes[0].assessment.danger_count, 1);
    assert_eq!(plan.routes[0].assessment.safe_count, 1);
    assert_eq!(plan.routes[0].verdict, Verdict::Safe);
}

#[tokio::test]
async fn test_unknown_place_is_not_found() {
    let upstream = FakeUpstream::start().await;
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    let result = planner.plan("Atlantis", ARC_DE_TRIOMPHE).await;

    match result {
        Err(PipelineError::PlaceNotFound { place }) => assert_eq!(place, "Atlantis"),
        other => panic!("expected PlaceNotFound, got {:?}", other.map(|p| p.routes.len())),
    }
    assert!(upstream.state.route_queries.lock().unwrap().is_empty());
    assert_eq!(upstream.chat_calls(), 0);
}

#[tokio::test]
async fn test_bbox_strategy_single_search_per_route() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(2, 31);
    let mut config = upstream.config();
    config.imagery.strategy = ImageryStrategy::BoundingBox;
    let planner = RoutePlanner::from_config(&config).unwrap();

    let plan = planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    assert_eq!(planner.strategy(), ImageryStrategy::BoundingBox);
    assert_eq!(upstream.image_queries(), 2);
    for route in &plan.routes {
        assert!(route.preview_images.is_none());
        assert_eq!(route.assessment.analyzed(), 1);
    }

    let params = upstream.state.image_params.lock().unwrap().clone();
    assert_eq!(params[0]["limit"], "10");
}

#[tokio::test]
async fn test_route_without_images_is_safe() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(1, 0);
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    let plan = planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    assert_eq!(plan.routes[0].verdict, Verdict::Safe);
    assert_eq!(plan.routes[0].assessment.analyzed(), 0);
    assert_eq!(upstream.chat_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_plans_never_overlap_classifications() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(2, 31);
    let planner = Arc::new(RoutePlanner::from_config(&upstream.config()).unwrap());

    let a = tokio::spawn({
        let planner = planner.clone();
        async move { planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await }
    });
    let b = tokio::spawn({
        let planner = planner.clone();
        async move { planner.plan(ARC_DE_TRIOMPHE, EIFFEL_TOWER).await }
    });

    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    assert_eq!(a.routes.len(), 2);
    assert_eq!(b.routes.len(), 2);

    assert_eq!(upstream.chat_calls(), 12);
    assert_eq!(upstream.max_in_flight(), 1);
}

#[tokio::test]
async fn test_twenty_point_route_samples_two_points() {
    let upstream = FakeUpstream::start().await;
    upstream.set_paths(1, 20);
    upstream.script([
        crate::support::ChatReply::Answer("safe".to_string()),
        crate::support::ChatReply::Answer("safe".to_string()),
    ]);
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    let plan = planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await.unwrap();

    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.routes[0].verdict, Verdict::Safe);
    assert_eq!(upstream.image_queries(), 2);
    assert_eq!(upstream.chat_calls(), 2);
}

async fn expect_upstream_failure(path: &'static str, status: u16) -> (&'static str, u16, usize) {
    let upstream = FakeUpstream::start().await;
    upstream.fail(path, status);
    let planner = RoutePlanner::from_config(&upstream.config()).unwrap();

    match planner.plan(EIFFEL_TOWER, ARC_DE_TRIOMPHE).await {
        Err(PipelineError::Upstream {
            service, status, ..
        }) => (service, status, upstream.chat_calls()),
        other => panic!(
            "expected upstream error, got {:?}",
            other.map(|p| p.routes.len())
        ),
    }
}

#[tokio::test]
async fn test_geocoder_failure_is_fatal() {
    let (service, status, chat_calls) = expect_upstream_failure("/search", 503).await;
    assert_eq!(service, "nominatim");
    assert_eq!(status, 503);
    assert_eq!(chat_calls, 0);
}

#[tokio::test]
async fn test_router_failure_is_fatal() {
    let (service, status, chat_calls) = expect_upstream_failure("/route", 400).await;
    assert_eq!(service, "graphhopper");
    assert_eq!(status, 400);
    assert_eq!(chat_calls, 0);
}

#[tokio::test]
async fn test_imagery_failure_is_fatal() {
    let (service, status, chat_calls) = expect_upstream_failure("/images", 500).await;
    assert_eq!(service, "mapillary");
    assert_eq!(status, 500);
    assert_eq!(chat_calls, 0);
}
