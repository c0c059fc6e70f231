// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! Register and login through the HTTP router
use crate::test_utils::*;
use axum::http::StatusCode;
use serde_json::json;
use sessionauth_backend::auth::verify_password;

#[tokio::test]
async fn test_register_then_duplicate() {
    let (app, _) = test_app();

    let first = register(&app, "sue", "1234").await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body, json!({ "id": 1, "username": "sue" }));

    let second = register(&app, "sue", "1234").await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(second.message(), "Username taken");
}

#[tokio::test]
async fn test_duplicate_creates_no_record() {
    let (app, state) = test_app();

    register(&app, "sue", "1234").await;
    let second = register(&app, "sue", "different-password").await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);

    // the next id is still 2: nothing was inserted for the rejected request
    let bob = register(&app, "bob", "1234").await;
    assert_eq!(bob.body["id"], 2);

    let sue = state.users.find_by_username("sue").await.unwrap().unwrap();
    assert!(verify_password(&sue.password_hash, "1234"));
}

#[tokio::test]
async fn test_short_passwords_rejected_for_any_username() {
    let (app, _) = test_app();
    register(&app, "sue", "1234").await;

    for username in ["sue", "bob", "alice"] {
        for password in ["1", "12", "123", "äöü"] {
            let response = register(&app, username, password).await;
            // a taken username is reported first
            if username == "sue" {
                assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
                continue;
            }
            assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(response.message(), "Password must be longer than 3 chars");
        }
    }
}

#[tokio::test]
async fn test_register_requires_username() {
    let (app, _) = test_app();

    for body in [
        json!({}),
        json!({ "password": "1234" }),
        json!({ "username": "  ", "password": "1234" }),
    ] {
        let response = send(&app, post_json("/api/auth/register", body, None)).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.message(), "Username required");
    }
}

#[tokio::test]
async fn test_register_missing_password_is_too_short() {
    let (app, _) = test_app();

    for body in [
        json!({ "username": "bob" }),
        json!({ "username": "bob", "password": "" }),
    ] {
        let response = send(&app, post_json("/api/auth/register", body, None)).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.message(), "Password must be longer than 3 chars");
    }
}

#[tokio::test]
async fn test_register_trims_username() {
    let (app, _) = test_app();

    let created = register(&app, " sue ", "1234").await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["username"], "sue");

    let again = register(&app, "sue", "1234").await;
    assert_eq!(again.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(again.message(), "Username taken");

    assert_eq!(login(&app, "sue ", "1234").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let (app, _) = test_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid request format");
}

#[tokio::test]
async fn test_password_never_stored_or_returned_in_plaintext() {
    let (app, state) = test_app();
    let password = "correct horse battery staple";

    let response = register(&app, "sue", password).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("password_hash").is_none());
    assert!(!response.body.to_string().contains(password));

    let stored = state.users.find_by_username("sue").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, password);
    assert!(!stored.password_hash.contains(password));
}

#[tokio::test]
async fn test_login_success_sets_session_cookie() {
    let (app, _) = test_app();
    register(&app, "sue", "1234").await;

    let response = login(&app, "sue", "1234").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "welcome sue");

    let set_cookie = response.set_cookie().expect("session cookie");
    assert!(set_cookie.starts_with("sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_login_bad_password_and_unknown_user() {
    let (app, _) = test_app();
    register(&app, "sue", "1234").await;

    let wrong_password = login(&app, "sue", "4321").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.message(), "bad credentials");
    assert!(wrong_password.set_cookie().is_none());

    let unknown_user = login(&app, "bob", "1234").await;
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.message(), "bad credentials");
}

#[tokio::test]
async fn test_login_with_empty_fields_is_bad_credentials() {
    let (app, _) = test_app();
    register(&app, "sue", "1234").await;

    for (username, password) in [("sue", ""), ("", "1234"), ("  ", ""), ("", "")] {
        let response = login(&app, username, password).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.message(), "bad credentials");
        assert!(response.set_cookie().is_none());
    }

    let missing_fields = send(&app, post_json("/api/auth/login", json!({}), None)).await;
    assert_eq!(missing_fields.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing_fields.message(), "bad credentials");
}

#[tokio::test]
async fn test_unknown_usernames_are_not_tracked_for_lockout() {
    let (app, state) = test_app();
    register(&app, "sue", "1234").await;

    for i in 0..50 {
        let response = login(&app, &format!("nobody-{i}"), "1234").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(state.rate_limiter.tracked(), 0);

    login(&app, "sue", "wrong").await;
    assert_eq!(state.rate_limiter.tracked(), 1);
}

#[tokio::test]
async fn test_login_locks_out_after_repeated_failures() {
    let (app, state) = test_app();
    register(&app, "sue", "1234").await;

    let max_attempts = state.settings.login_limit.max_attempts;
    for _ in 0..max_attempts {
        let response = login(&app, "sue", "wrong").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let locked = login(&app, "sue", "1234").await;
    assert_eq!(locked.status, StatusCode::TOO_MANY_REQUESTS);

    // other accounts are unaffected
    register(&app, "bob", "1234").await;
    assert_eq!(login(&app, "bob", "1234").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_registration_has_one_winner() {
    let (app, state) = test_app();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move { register(&app, "sue", "1234").await.status }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            status => assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY),
        }
    }

    assert_eq!(created, 1);
    let sue = state.users.find_by_username("sue").await.unwrap().unwrap();
    assert_eq!(sue.id, 1);

    // losers did not burn an id
    let bob = register(&app, "bob", "1234").await;
    assert_eq!(bob.body["id"], 2);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let response = send(&app, get_request("/health", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Healthy");
}
