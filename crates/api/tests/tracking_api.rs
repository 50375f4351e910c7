//! Integration tests for the tracking endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, petition_source, post_json};
use serde_json::{json, Value};
use sqlx::PgPool;

fn app(pool: PgPool) -> axum::Router {
    build_test_app(pool, petition_source(&common::StubUpstream::new()))
}

fn track_body(petition_id: i64) -> Value {
    json!({
        "petitionId": petition_id,
        "petitionTitle": "Fund rail electrification",
        "currentSignatures": 12034
    })
}

// ---------------------------------------------------------------------------
// POST /api/track
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn track_returns_created_record(pool: PgPool) {
    let response = post_json(app(pool), "/api/track", track_body(700001)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["petitionId"], 700001);
    assert_eq!(json["petitionTitle"], "Fund rail electrification");
    assert_eq!(json["currentSignatures"], 12034);
    assert_eq!(json["notifyAt10k"], true);
    assert_eq!(json["notifyAt100k"], true);
    assert_eq!(json["notified10k"], false);
    assert_eq!(json["notified100k"], false);
    assert!(json["id"].is_string());
    assert!(json["createdAt"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn track_honours_explicit_flags(pool: PgPool) {
    let body = json!({
        "petitionId": 700002,
        "petitionTitle": "Opted out of 10k",
        "currentSignatures": 0,
        "notifyAt10k": false
    });

    let json = body_json(post_json(app(pool), "/api/track", body).await).await;

    assert_eq!(json["notifyAt10k"], false);
    assert_eq!(json["notifyAt100k"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tracking_twice_is_a_conflict(pool: PgPool) {
    let first = post_json(app(pool.clone()), "/api/track", track_body(700003)).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app(pool.clone()), "/api/track", track_body(700003)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");

    let listed = body_json(get(app(pool), "/api/tracked").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_track_requests_are_rejected(pool: PgPool) {
    let bodies = [
        json!({ "petitionId": 0, "petitionTitle": "Zero", "currentSignatures": 0 }),
        json!({ "petitionId": 1, "petitionTitle": "   ", "currentSignatures": 0 }),
        json!({ "petitionId": 1, "petitionTitle": "Negative", "currentSignatures": -5 }),
        json!({ "petitionId": 1, "petitionTitle": "x".repeat(501), "currentSignatures": 0 }),
    ];

    for body in bodies {
        let response = post_json(app(pool.clone()), "/api/track", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let listed = body_json(get(app(pool), "/api/tracked").await).await;
    assert_eq!(listed, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn incomplete_track_body_is_a_validation_error(pool: PgPool) {
    let response = post_json(app(pool), "/api/track", json!({ "petitionId": 1 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Invalid request");
    assert!(json["message"].as_str().unwrap().contains("petitionTitle"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mistyped_track_body_is_a_validation_error(pool: PgPool) {
    let body = json!({
        "petitionId": "seven",
        "petitionTitle": "Wrong type",
        "currentSignatures": 0
    });

    let response = post_json(app(pool), "/api/track", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Status / untrack
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_follows_track_and_untrack(pool: PgPool) {
    let before = body_json(get(app(pool.clone()), "/api/track/700004/status").await).await;
    assert_eq!(before, json!({ "isTracking": false }));

    post_json(app(pool.clone()), "/api/track", track_body(700004)).await;
    let tracked = body_json(get(app(pool.clone()), "/api/track/700004/status").await).await;
    assert_eq!(tracked, json!({ "isTracking": true }));

    let response = delete(app(pool.clone()), "/api/track/700004").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let after = body_json(get(app(pool), "/api/track/700004/status").await).await;
    assert_eq!(after, json!({ "isTracking": false }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn untracking_an_unknown_petition_succeeds(pool: PgPool) {
    let response = delete(app(pool), "/api/track/12345").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_path_ids_are_validation_errors(pool: PgPool) {
    let untrack = delete(app(pool.clone()), "/api/track/abc").await;
    assert_eq!(untrack.status(), StatusCode::BAD_REQUEST);
    let json = body_json(untrack).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("abc"));

    let status = get(app(pool), "/api/track/abc/status").await;
    assert_eq!(status.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(status).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// GET /api/tracked
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tracked_lists_every_record(pool: PgPool) {
    for id in [101, 102, 103] {
        let response = post_json(app(pool.clone()), "/api/track", track_body(id)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app(pool), "/api/tracked").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let mut ids: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["petitionId"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![101, 102, 103]);
}
