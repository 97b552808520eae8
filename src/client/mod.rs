// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the CleanStreet API.
//!
//! Every call is an independent request: no caching, no retry, and no token
//! refresh. A non-2xx response becomes [`ClientError::Status`] carrying the
//! response body so callers can show the server's message.

use crate::error::ErrorResponse;
use crate::models::{
    ComplaintDraft, ComplaintView, Feedback, FeedbackRequest, Location, RegisterRequest, Status,
    UserSummary,
};
use crate::routes::HealthResponse;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::PathBuf;

/// API base used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session file {path}: {source}")]
    Session {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body, if there is one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ClientError::Status { body, .. } => serde_json::from_str::<ErrorResponse>(body)
                .ok()
                .and_then(|e| e.message),
            _ => None,
        }
    }

    /// True when the server could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}

/// A file attached to a complaint.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach (or clear) the bearer token sent with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Server origin: the API base without its trailing `/api`.
    pub fn origin(&self) -> &str {
        self.base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "Request rejected");
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET /health` on the server origin.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.origin());
        Self::json(self.http.get(url)).await
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Log in. Returns the raw user payload including `token`, which is
    /// what the session store expects.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ClientError> {
        let body = json!({ "email": email, "password": password });
        Self::json(self.request(Method::POST, "/users/login").json(&body)).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserSummary, ClientError> {
        Self::json(self.request(Method::POST, "/users/register").json(request)).await
    }

    // ─── Complaints ──────────────────────────────────────────────

    pub async fn list_complaints(&self) -> Result<Vec<ComplaintView>, ClientError> {
        Self::json(self.request(Method::GET, "/complaints")).await
    }

    pub async fn user_complaints(&self, user_id: u64) -> Result<Vec<ComplaintView>, ClientError> {
        let path = format!("/complaints/user/{}", user_id);
        Self::json(self.request(Method::GET, &path)).await
    }

    pub async fn get_complaint(&self, id: u64) -> Result<ComplaintView, ClientError> {
        let path = format!("/complaints/{}", id);
        Self::json(self.request(Method::GET, &path)).await
    }

    pub async fn create_complaint(
        &self,
        draft: &ComplaintDraft,
        image: Option<Attachment>,
    ) -> Result<ComplaintView, ClientError> {
        let form = complaint_form(draft, image)?;
        Self::json(self.request(Method::POST, "/complaints").multipart(form)).await
    }

    pub async fn update_complaint(
        &self,
        id: u64,
        draft: &ComplaintDraft,
        image: Option<Attachment>,
    ) -> Result<ComplaintView, ClientError> {
        let form = complaint_form(draft, image)?;
        let path = format!("/complaints/{}", id);
        Self::json(self.request(Method::PUT, &path).multipart(form)).await
    }

    /// Change a complaint's status. Returns the server's confirmation text.
    pub async fn update_status(&self, id: u64, status: Status) -> Result<String, ClientError> {
        let path = format!("/complaints/status/{}", id);
        let request = self
            .request(Method::PUT, &path)
            .query(&[("status", status.as_str())]);
        Ok(Self::send(request).await?.text().await?)
    }

    pub async fn delete_complaint(&self, id: u64) -> Result<(), ClientError> {
        let path = format!("/complaints/{}", id);
        Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    // ─── Feedback & Locations ────────────────────────────────────

    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<Feedback, ClientError> {
        Self::json(self.request(Method::POST, "/feedback").json(request)).await
    }

    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, ClientError> {
        Self::json(self.request(Method::GET, "/feedback")).await
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, ClientError> {
        Self::json(self.request(Method::GET, "/locations")).await
    }
}

/// Multipart body: the draft as a JSON `complaint` part plus an optional
/// `image` file part.
fn complaint_form(draft: &ComplaintDraft, image: Option<Attachment>) -> Result<Form, ClientError> {
    let complaint = Part::text(serde_json::to_string(draft)?).mime_str("application/json")?;
    let mut form = Form::new().part("complaint", complaint);
    if let Some(file) = image {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        form = form.part("image", part);
    }
    Ok(form)
}
