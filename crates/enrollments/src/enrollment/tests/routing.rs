use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::enrollment::domain::Enrollment;
use crate::enrollment::error::{EnrollmentError, ValidationError};
use crate::enrollment::router::status_for;

#[test]
fn every_error_kind_has_a_status() {
    let cases = [
        (
            EnrollmentError::from(ValidationError::StatusRequired),
            StatusCode::BAD_REQUEST,
        ),
        (EnrollmentError::not_found("20"), StatusCode::NOT_FOUND),
        (
            EnrollmentError::UpstreamNotFound("course not found".to_string()),
            StatusCode::NOT_FOUND,
        ),
        (unexpected("boom"), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, status) in cases {
        assert_eq!(status_for(&error), status, "{error}");
    }
}

#[tokio::test]
async fn create_without_user_id_is_bad_request() {
    let harness = healthy_harness();

    let response = router(&harness, "10")
        .oneshot(json_request(Method::POST, "/enrollments", json!({})))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "user id is required");
    assert_eq!(body["status"], 400);
    assert!(harness.users.requested().is_empty());
    assert!(harness.repository.calls().is_empty());
}

#[tokio::test]
async fn create_without_course_id_is_bad_request() {
    let harness = healthy_harness();

    let response = router(&harness, "10")
        .oneshot(json_request(
            Method::POST,
            "/enrollments",
            json!({ "user_id": "123" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "course id is required");
    assert!(harness.repository.calls().is_empty());
}

#[tokio::test]
async fn create_maps_upstream_and_storage_failures() {
    let cases = [
        (
            ScriptedLookup::broken("unexpected error"),
            ScriptedLookup::found(),
            ScriptedRepository::default(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "unexpected error",
        ),
        (
            ScriptedLookup::missing("user not found"),
            ScriptedLookup::found(),
            ScriptedRepository::default(),
            StatusCode::NOT_FOUND,
            "user not found",
        ),
        (
            ScriptedLookup::found(),
            ScriptedLookup::broken("unexpected error"),
            ScriptedRepository::default(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "unexpected error",
        ),
        (
            ScriptedLookup::found(),
            ScriptedLookup::missing("course not found"),
            ScriptedRepository::default(),
            StatusCode::NOT_FOUND,
            "course not found",
        ),
        (
            ScriptedLookup::found(),
            ScriptedLookup::found(),
            ScriptedRepository {
                create_error: Some(unexpected("unexpected error")),
                ..ScriptedRepository::default()
            },
            StatusCode::INTERNAL_SERVER_ERROR,
            "unexpected error",
        ),
    ];

    for (users, courses, repository, status, message) in cases {
        let harness = harness(repository, users, courses);
        let response = router(&harness, "10")
            .oneshot(json_request(
                Method::POST,
                "/enrollments",
                json!({ "user_id": "1", "course_id": "4" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), status, "{message}");
        let body = read_json_body(response).await;
        assert_eq!(body["message"], message);
        assert_eq!(body["status"], status.as_u16());
        assert!(body["data"].is_null());
    }
}

#[tokio::test]
async fn create_returns_created_enrollment() {
    let harness = healthy_harness();

    let response = router(&harness, "10")
        .oneshot(json_request(
            Method::POST,
            "/enrollments",
            json!({ "user_id": "1", "course_id": "4" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "success");
    assert_eq!(body["status"], 201);
    let created: Enrollment = serde_json::from_value(body["data"].clone()).expect("enrollment");
    assert!(created.is_persisted());
    assert_eq!(created.user_id, "1");
    assert_eq!(created.course_id, "4");
    assert_eq!(created.status, "P");
}

#[tokio::test]
async fn list_reports_count_failures() {
    let harness = harness(
        ScriptedRepository {
            count_error: Some(unexpected("unexpected error")),
            ..ScriptedRepository::default()
        },
        ScriptedLookup::found(),
        ScriptedLookup::found(),
    );

    let response = router(&harness, "")
        .oneshot(get_request("/enrollments"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "unexpected error");
    assert_eq!(harness.repository.calls(), vec!["count"]);
}

#[tokio::test]
async fn list_reports_malformed_default_limit_at_request_time() {
    let harness = healthy_harness();

    let response = router(&harness, "invalid number")
        .oneshot(get_request("/enrollments"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "invalid digit found in string");
    assert_eq!(harness.repository.calls(), vec!["count"]);
}

#[tokio::test]
async fn list_reports_fetch_failures() {
    let harness = harness(
        ScriptedRepository {
            get_all_error: Some(unexpected("unexpected error")),
            ..ScriptedRepository::default()
        },
        ScriptedLookup::found(),
        ScriptedLookup::found(),
    );

    let response = router(&harness, "10")
        .oneshot(get_request("/enrollments"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(harness.repository.calls(), vec!["count", "get_all"]);
}

#[tokio::test]
async fn list_returns_enrollments_with_pagination_meta() {
    let harness = healthy_harness();
    for (user_id, course_id) in [("11", "111"), ("22", "222"), ("33", "333")] {
        harness
            .service
            .create(user_id, course_id)
            .await
            .expect("enrollment created");
    }

    let response = router(&harness, "10")
        .oneshot(get_request("/enrollments?page=1&limit=2"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "success");
    let listed: Vec<Enrollment> = serde_json::from_value(body["data"].clone()).expect("list");
    let users: Vec<_> = listed.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(users, vec!["33", "22"]);
    assert_eq!(body["meta"]["total_count"], 3);
    assert_eq!(body["meta"]["per_page"], 2);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["page_count"], 2);
}

#[tokio::test]
async fn list_applies_filters_and_default_limit() {
    let harness = healthy_harness();
    for (user_id, course_id) in [("11", "22"), ("11", "33"), ("44", "22")] {
        harness
            .service
            .create(user_id, course_id)
            .await
            .expect("enrollment created");
    }

    let response = router(&harness, "10")
        .oneshot(get_request("/enrollments?user_id=11&course_id=22&limit=abc"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let listed: Vec<Enrollment> = serde_json::from_value(body["data"].clone()).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user_id, "11");
    assert_eq!(listed[0].course_id, "22");
    assert_eq!(body["meta"]["per_page"], 10);
    assert_eq!(body["meta"]["total_count"], 1);
}

#[tokio::test]
async fn update_requires_status() {
    let harness = healthy_harness();

    for payload in [json!({ "status": "" }), json!({})] {
        let response = router(&harness, "10")
            .oneshot(json_request(Method::PATCH, "/enrollments/20", payload))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert_eq!(body["message"], "status is required");
    }
    assert!(harness.repository.calls().is_empty());
}

#[tokio::test]
async fn update_unknown_enrollment_is_not_found() {
    let harness = healthy_harness();

    let response = router(&harness, "10")
        .oneshot(json_request(
            Method::PATCH,
            "/enrollments/20",
            json!({ "status": "A" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "enrollment '20' doesn't exist");
}

#[tokio::test]
async fn update_reports_storage_failures() {
    let harness = harness(
        ScriptedRepository {
            update_error: Some(unexpected("unexpected error")),
            ..ScriptedRepository::default()
        },
        ScriptedLookup::found(),
        ScriptedLookup::found(),
    );

    let response = router(&harness, "10")
        .oneshot(json_request(
            Method::PATCH,
            "/enrollments/20",
            json!({ "status": "A" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "unexpected error");
}

#[tokio::test]
async fn update_succeeds_without_data() {
    let harness = healthy_harness();
    let created = harness
        .service
        .create("1", "4")
        .await
        .expect("enrollment created");

    let response = router(&harness, "10")
        .oneshot(json_request(
            Method::PATCH,
            &format!("/enrollments/{}", created.id),
            json!({ "status": "A" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "success");
    assert!(body["data"].is_null());
    assert_eq!(harness.repository.inner.snapshot()[0].status, "A");
}
