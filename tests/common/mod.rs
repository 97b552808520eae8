// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use cleanstreet::config::Config;
use cleanstreet::db::NewUser;
use cleanstreet::middleware::auth::create_jwt;
use cleanstreet::models::{Role, User};
use cleanstreet::routes::create_router;
use cleanstreet::views::Prompt;
use cleanstreet::AppState;
use serde_json::Value;
use std::sync::Arc;

pub const PASSWORD: &str = "correct-horse-9";

/// Test config with its own upload directory.
#[allow(dead_code)]
pub fn test_config() -> Config {
    let mut config = Config::test_default();
    config.upload_dir =
        std::env::temp_dir().join(format!("cleanstreet-test-{}", uuid::Uuid::new_v4()));
    config
}

/// Create a test app around an empty store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(test_config()).expect("test state"));
    (create_router(state.clone()), state)
}

/// Serve a fresh app on an ephemeral port.
/// Returns the API base URL (ending in `/api`) and the shared state.
#[allow(dead_code)]
pub async fn spawn_server() -> (String, Arc<AppState>) {
    let (app, state) = create_test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    (format!("http://{}/api", addr), state)
}

/// Insert a user directly, bypassing registration.
#[allow(dead_code)]
pub fn seed_user(state: &AppState, name: &str, email: &str, role: Role) -> User {
    let password_hash = state.passwords.hash(PASSWORD).expect("hash");
    state
        .db
        .insert_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
        })
        .expect("seed user")
}

/// Seed a user and return it with a session token.
#[allow(dead_code)]
pub fn seed_with_token(state: &AppState, name: &str, email: &str, role: Role) -> (User, String) {
    let user = seed_user(state, name, email, role);
    let token = create_jwt(
        &user,
        &state.config.jwt_signing_key,
        state.config.jwt_ttl_hours,
    )
    .expect("jwt");
    (user, token)
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub const BOUNDARY: &str = "cleanstreet-test-boundary";

/// Build a `multipart/form-data` body with a JSON `complaint` part and an
/// optional `image` part given as `(file name, bytes)`.
#[allow(dead_code)]
pub fn complaint_multipart(complaint: &Value, image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"complaint\"\r\nContent-Type: application/json\r\n\r\n{}\r\n",
            BOUNDARY, complaint
        )
        .as_bytes(),
    );
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// A multipart complaint request with a bearer token.
#[allow(dead_code)]
pub fn complaint_request(method: &str, uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A JSON (or empty) request, optionally authenticated.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Prompt that answers every confirmation the same way and records what it
/// was shown.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub answer: bool,
    pub confirms: Vec<String>,
    pub alerts: Vec<String>,
}

#[allow(dead_code)]
impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.answer
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
