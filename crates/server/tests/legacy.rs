mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn legacy_add_is_idempotent() {
    let app = app(true);

    let resp = send(&app, get("/add_key?user=duong2024&pass=duongpizza&key=FOO")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"success": true, "added": "FOO"}));

    let resp = send(&app, get("/add_key?user=duong2024&pass=duongpizza&key=FOO")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"message": "Key already exists"}));

    assert_eq!(send(&app, get("/verify?key=FOO")).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn legacy_remove_reports_missing_keys() {
    let app = app(true);

    let resp = send(&app, get("/remove_key?user=duong2024&pass=duongpizza&key=TESTKEY")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"success": true, "removed": "TESTKEY"}));
    assert_eq!(send(&app, get("/verify?key=TESTKEY")).await.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&app, get("/remove_key?user=duong2024&pass=duongpizza&key=TESTKEY")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"error": "Key not found"}));
}

#[tokio::test]
async fn legacy_rejects_missing_parameters() {
    let app = app(true);
    for uri in [
        "/add_key?user=duong2024&pass=duongpizza",
        "/add_key?user=duong2024&key=FOO",
        "/remove_key?pass=duongpizza&key=FOO",
        "/add_key?user=duong2024&pass=duongpizza&key=%20",
    ] {
        let resp = send(&app, get(uri)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(resp).await, json!({"error": "Missing parameters"}));
    }
}

#[tokio::test]
async fn legacy_rejects_bad_credentials() {
    let app = app(true);
    for uri in [
        "/add_key?user=duong2024&pass=wrong&key=FOO",
        "/remove_key?user=nobody&pass=duongpizza&key=VIP2025",
    ] {
        let resp = send(&app, get(uri)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body_json(resp).await, json!({"error": "Unauthorized"}));
    }
    assert_eq!(send(&app, get("/verify?key=FOO")).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, get("/verify?key=VIP2025")).await.status(), StatusCode::OK);
}
