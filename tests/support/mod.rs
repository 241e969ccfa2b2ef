#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use ems::{app::build_app, config::AppConfig, memory::MemoryStore, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "TestPassword123!";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_store(AppConfig::for_tests(), store.clone());
        Self {
            router: build_app(state.clone()),
            store,
            state,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn signup(&self, email: &str, name: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": email,
                "name": name,
                "password": PASSWORD,
                "password2": PASSWORD,
            })),
        )
        .await
    }

    /// Signs up and logs in, returning `(access, refresh)`.
    pub async fn register_and_login(&self, email: &str) -> (String, String) {
        let (status, _) = self.signup(email, "Test User").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        (
            body["access"].as_str().unwrap().to_string(),
            body["refresh"].as_str().unwrap().to_string(),
        )
    }
}

pub fn employer_body(company: &str) -> Value {
    json!({
        "company_name": company,
        "contact_person_name": "Test Contact",
        "email": "company@example.com",
        "phone_number": "1234567890",
        "address": "123 Test Street, Test City",
    })
}
