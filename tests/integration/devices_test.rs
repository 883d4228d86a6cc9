//! Integration tests for device admission, listing, logout and notices.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use devicegate_auth::StoreHealth;
use devicegate_core::config::AppConfig;

const USER: &str = "auth0|alice";

#[tokio::test]
async fn test_admit_is_idempotent() {
    let app = helpers::TestApp::new();

    let first = app.admit(USER, "laptop").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.admission_status(), "admitted");
    assert_eq!(first.body["session"]["device_name"], "laptop browser");

    let second = app.admit(USER, "laptop").await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.admission_status(), "already_admitted");
    assert_eq!(second.device_ids(), vec!["laptop"]);
    assert_eq!(second.current_ids(), vec!["laptop"]);
}

#[tokio::test]
async fn test_force_admit_flow() {
    let app = helpers::TestApp::new();
    for device in ["a", "b", "c"] {
        assert_eq!(app.admit(USER, device).await.admission_status(), "admitted");
    }

    let rejected = app.admit(USER, "d").await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert_eq!(rejected.admission_status(), "limit_exceeded");
    assert_eq!(rejected.body["max_devices"], 3);
    assert_eq!(rejected.device_ids(), vec!["a", "b", "c"]);

    let token = app.token_for(USER);
    let forced = app
        .request(
            "POST",
            "/api/devices/admit",
            Some(json!({
                "user_id": USER,
                "device_id": "d",
                "device_name": "Phone",
                "force": true,
                "evict_target": "b",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(forced.status, StatusCode::OK);
    assert_eq!(forced.admission_status(), "evicted_then_admitted");
    assert_eq!(forced.body["evicted"]["device_id"], "b");
    assert_eq!(forced.device_ids(), vec!["a", "c", "d"]);
    assert_eq!(forced.current_ids(), vec!["d"]);

    // The evicted device learns why it was signed out, exactly once.
    let path = format!("/api/devices/notice?user_id={}&device_id=b", "auth0%7Calice");
    let notice = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(notice.status, StatusCode::OK);
    assert_eq!(notice.body["notice"]["reason"], "forced_login");
    assert_eq!(notice.body["notice"]["evicted_by"], "d");

    let again = app.request("GET", &path, None, Some(&token)).await;
    assert!(again.body["notice"].is_null());
}

#[tokio::test]
async fn test_force_without_target_is_bad_request() {
    let app = helpers::TestApp::with_max_devices(1);
    app.admit(USER, "a").await;

    let token = app.token_for(USER);
    let response = app
        .request(
            "POST",
            "/api/devices/admit",
            Some(json!({ "user_id": USER, "device_id": "b", "force": true })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_missing_device_id_is_bad_request() {
    let app = helpers::TestApp::new();
    let token = app.token_for(USER);

    let response = app
        .request(
            "POST",
            "/api/devices/admit",
            Some(json!({ "user_id": USER, "device_id": "   " })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/devices/admit",
            Some(json!({ "user_id": USER })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_device_name_gets_default() {
    let app = helpers::TestApp::new();
    let token = app.token_for(USER);
    let response = app
        .request(
            "POST",
            "/api/devices/admit",
            Some(json!({ "user_id": USER, "device_id": "kiosk", "device_name": "" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.body["session"]["device_name"], "Unknown Device");
}

#[tokio::test]
async fn test_list_devices_marks_caller() {
    let app = helpers::TestApp::new();
    for device in ["a", "b", "c"] {
        app.admit(USER, device).await;
    }
    let token = app.token_for(USER);

    let path = "/api/devices?user_id=auth0%7Calice&self_device_id=b";
    let first = app.request("GET", path, None, Some(&token)).await;
    let second = app.request("GET", path, None, Some(&token)).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.device_ids(), vec!["a", "b", "c"]);
    assert_eq!(first.current_ids(), vec!["b"]);
    assert_eq!(first.body, second.body);

    let anonymous = app
        .request("GET", "/api/devices?user_id=auth0%7Calice", None, Some(&token))
        .await;
    assert!(anonymous.current_ids().is_empty());
}

#[tokio::test]
async fn test_logout_single_device() {
    let app = helpers::TestApp::new();
    for device in ["a", "b", "c"] {
        app.admit(USER, device).await;
    }
    let token = app.token_for(USER);

    let response = app
        .request(
            "POST",
            "/api/devices/logout",
            Some(json!({ "user_id": USER, "device_id": "b", "self_device_id": "a" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "removed": true, "was_self": false }));

    let listing = app
        .request("GET", "/api/devices?user_id=auth0%7Calice", None, Some(&token))
        .await;
    assert_eq!(listing.device_ids(), vec!["a", "c"]);

    let own = app
        .request(
            "POST",
            "/api/devices/logout",
            Some(json!({ "user_id": USER, "device_id": "a", "self_device_id": "a" })),
            Some(&token),
        )
        .await;
    assert_eq!(own.body, json!({ "removed": true, "was_self": true }));

    let missing = app
        .request(
            "POST",
            "/api/devices/logout",
            Some(json!({ "user_id": USER, "device_id": "zzz" })),
            Some(&token),
        )
        .await;
    assert_eq!(missing.body["removed"], false);
}

#[tokio::test]
async fn test_logout_without_own_device_leaves_no_notice() {
    let app = helpers::TestApp::new();
    app.admit(USER, "a").await;
    app.admit(USER, "b").await;
    let token = app.token_for(USER);

    let response = app
        .request(
            "POST",
            "/api/devices/logout",
            Some(json!({ "user_id": USER, "device_id": "a" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.body, json!({ "removed": true, "was_self": false }));

    let notice = app
        .request(
            "GET",
            "/api/devices/notice?user_id=auth0%7Calice&device_id=a",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(notice.status, StatusCode::OK);
    assert!(notice.body["notice"].is_null());
}

#[tokio::test]
async fn test_logout_others() {
    let app = helpers::TestApp::new();
    for device in ["a", "b", "c"] {
        app.admit(USER, device).await;
    }
    let token = app.token_for(USER);

    let response = app
        .request(
            "POST",
            "/api/devices/logout-others",
            Some(json!({ "user_id": USER, "self_device_id": "b" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["removed_count"], 2);

    let again = app
        .request(
            "POST",
            "/api/devices/logout-others",
            Some(json!({ "user_id": USER, "self_device_id": "b" })),
            Some(&token),
        )
        .await;
    assert_eq!(again.body["removed_count"], 0);

    // Freed slots can be used again.
    assert_eq!(app.admit(USER, "d").await.admission_status(), "admitted");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/devices/admit",
            Some(json!({ "user_id": USER, "device_id": "a" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "GET",
            "/api/devices?user_id=auth0%7Calice",
            None,
            Some("not-a-jwt"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_acting_for_other_user_is_forbidden() {
    let app = helpers::TestApp::new();
    app.admit("bob", "bob-phone").await;

    let alice = app.token_for(USER);
    let response = app
        .request(
            "POST",
            "/api/devices/logout-others",
            Some(json!({ "user_id": "bob", "self_device_id": "x" })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let bob = app.token_for("bob");
    let listing = app
        .request("GET", "/api/devices?user_id=bob", None, Some(&bob))
        .await;
    assert_eq!(listing.device_ids(), vec!["bob-phone"]);
}

#[tokio::test]
async fn test_users_are_independent() {
    let app = helpers::TestApp::with_max_devices(1);
    assert_eq!(app.admit(USER, "a").await.admission_status(), "admitted");
    assert_eq!(app.admit("bob", "a").await.admission_status(), "admitted");
    assert_eq!(app.admit(USER, "b").await.admission_status(), "limit_exceeded");
}

#[tokio::test]
async fn test_unavailable_store_rejects_new_devices() {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = helpers::TEST_SECRET.to_string();
    let app = helpers::TestApp::with_config(config, StoreHealth::new(true));

    app.admit(USER, "a").await;
    app.state.health.mark_unavailable();

    let rejected = app.admit(USER, "b").await;
    assert_eq!(rejected.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(rejected.body["error"], "STORE_UNAVAILABLE");

    let touched = app.admit(USER, "a").await;
    assert_eq!(touched.status, StatusCode::OK);
    assert_eq!(touched.admission_status(), "already_admitted");
}
