mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{TestApp, PASSWORD};

#[tokio::test]
async fn full_signup_login_logout_scenario() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": "a@x.com",
                "name": "A",
                "password": "Secret123!",
                "password_confirmation": "Secret123!",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert!(body.get("password").is_none());

    let (status, tokens) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "Secret123!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = tokens["access"].as_str().unwrap();
    let refresh = tokens["refresh"].as_str().unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, body) = app
        .request("POST", "/auth/logout", Some(access), Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Successfully logged out.");

    let (status, body) = app
        .request("POST", "/auth/logout", Some(access), Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_token");
    assert_eq!(body["detail"], "Invalid token.");
}

#[tokio::test]
async fn duplicate_signup_creates_no_second_row() {
    let app = TestApp::new();
    let (status, _) = app.signup("test@example.com", "Existing User").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.signup("test@example.com", "Test User").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["fields"]["email"].is_array());
    assert_eq!(app.store.user_count().await, 1);
}

#[tokio::test]
async fn signup_with_mismatched_or_missing_fields_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": "test@example.com",
                "name": "Test User",
                "password": PASSWORD,
                "password2": "DifferentPassword123!",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["password"].is_array());

    let (status, body) = app
        .request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": "test@example.com",
                "password": PASSWORD,
                "password2": PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());

    let (status, body) = app
        .request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": "not-an-email",
                "name": "Test User",
                "password": PASSWORD,
                "password2": PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    assert_eq!(app.store.user_count().await, 0);
}

#[tokio::test]
async fn login_does_not_reveal_which_emails_exist() {
    let app = TestApp::new();
    app.signup("test@example.com", "Test User").await;

    let wrong_password = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "test@example.com", "password": "WrongPassword123!" })),
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "nonexistent@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.1["detail"], "Invalid Credentials");
}

#[tokio::test]
async fn login_with_missing_password_is_invalid_credentials() {
    let app = TestApp::new();
    app.signup("test@example.com", "Test User").await;
    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "test@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn logout_requires_authentication_and_token() {
    let app = TestApp::new();
    let (access, refresh) = app.register_and_login("test@example.com").await;

    let (status, body) = app
        .request("POST", "/auth/logout", None, Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, body) = app
        .request("POST", "/auth/logout", Some(access.as_str()), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_field");

    let (status, body) = app
        .request(
            "POST",
            "/auth/logout",
            Some(access.as_str()),
            Some(json!({ "refresh": "invalid-token" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid token.");

    // an access token is not a refresh token
    let (status, _) = app
        .request("POST", "/auth/logout", Some(access.as_str()), Some(json!({ "refresh": access })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn access_token_outlives_logout_but_refresh_does_not() {
    let app = TestApp::new();
    let (access, refresh) = app.register_and_login("test@example.com").await;

    let (status, body) = app
        .request("POST", "/auth/refresh", None, Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());

    let (status, _) = app
        .request("POST", "/auth/logout", Some(access.as_str()), Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request("POST", "/auth/refresh", None, Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_token");

    let (status, _) = app.request("GET", "/auth/profile", Some(access.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_token_cannot_authenticate_requests() {
    let app = TestApp::new();
    let (_, refresh) = app.register_and_login("test@example.com").await;
    let (status, body) = app.request("GET", "/auth/profile", Some(refresh.as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Access token required.");
}

#[tokio::test]
async fn profile_read_and_name_only_update() {
    let app = TestApp::new();
    let (access, _) = app.register_and_login("test@example.com").await;

    let (status, body) = app.request("GET", "/auth/profile", Some(access.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    let mut keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["date_joined", "email", "id", "name"]);
    assert_eq!(body["email"], "test@example.com");

    let (status, body) = app
        .request("PATCH", "/auth/profile", Some(access.as_str()), Some(json!({ "name": "Renamed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");

    let (status, body) = app
        .request(
            "PUT",
            "/auth/profile",
            Some(access.as_str()),
            Some(json!({ "name": "Other", "email": "evil@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    let (_, body) = app.request("GET", "/auth/profile", Some(access.as_str()), None).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], "test@example.com");
}

#[tokio::test]
async fn profile_requires_a_valid_bearer_token() {
    let app = TestApp::new();
    let (status, _) = app.request("GET", "/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app.request("GET", "/auth/profile", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn routes_are_also_served_under_api_prefix() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "a@x.com",
                "name": "A",
                "password": PASSWORD,
                "password2": PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, _) = app.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_gets_structured_error() {
    let app = TestApp::new();
    let response = {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;
        app.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/signup")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap()
    };
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn logout_and_refresh_without_body_report_missing_token() {
    let app = TestApp::new();
    let (access, _) = app.register_and_login("test@example.com").await;

    let (status, body) = app
        .request("POST", "/auth/logout", Some(access.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_field");
    assert_eq!(body["detail"], "Refresh token is required.");

    let (status, body) = app.request("POST", "/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_field");
}

#[tokio::test]
async fn login_with_absent_or_mistyped_body_is_invalid_credentials() {
    let app = TestApp::new();
    app.signup("test@example.com", "Test User").await;

    let (status, body) = app.request("POST", "/auth/login", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    assert_eq!(body["detail"], "Invalid Credentials");

    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": 5, "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid Credentials");
}

#[tokio::test]
async fn profile_update_with_null_email_is_refused() {
    let app = TestApp::new();
    let (access, _) = app.register_and_login("test@example.com").await;

    let (status, body) = app
        .request(
            "PATCH",
            "/auth/profile",
            Some(access.as_str()),
            Some(json!({ "name": "N", "email": null })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    let (_, body) = app.request("GET", "/auth/profile", Some(access.as_str()), None).await;
    assert_eq!(body["name"], "Test User");
}
