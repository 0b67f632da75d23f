//! REST client for the upstream services.
//!
//! Wraps the three upstream HTTP APIs (program backend, price feed, sheet
//! quality service) using [`reqwest`]. Requests carry the bearer token of the
//! injected [`SessionContext`]. Nothing is retried.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::{LoginRequest, LoginResponse};

use crate::session::SessionContext;

/// Which upstream service a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Farmer, officer, advisory and enquiry CRUD plus statistics.
    Backend,
    /// Rubber market prices.
    Price,
    /// Sheet grading and impurity detection.
    Quality,
}

/// Base URLs of the upstream services, without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrls {
    pub backend: String,
    pub price: String,
    pub quality: String,
}

impl UpstreamUrls {
    fn base(&self, service: Service) -> &str {
        match service {
            Service::Backend => &self.backend,
            Service::Price => &self.price,
            Service::Quality => &self.quality,
        }
    }
}

/// Errors from the upstream REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The upstream answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// A request or response body could not be encoded or decoded.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// `{ "data": T }` or a bare `T`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// HTTP client for the upstream services.
pub struct UpstreamApi {
    client: reqwest::Client,
    urls: UpstreamUrls,
    session: SessionContext,
}

impl UpstreamApi {
    /// Create a client with the given per-request timeout.
    pub fn new(
        urls: UpstreamUrls,
        session: SessionContext,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, urls, session))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, urls: UpstreamUrls, session: SessionContext) -> Self {
        Self {
            client,
            urls,
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn urls(&self) -> &UpstreamUrls {
        &self.urls
    }

    /// Sign in with `POST /webLogin`.
    ///
    /// The response body is inspected even for non-2xx statuses, because the
    /// backend reports bad credentials as `success: false` with an error
    /// status.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url(Service::Backend, "/webLogin"))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<LoginResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(ApiError::Encoding(e.to_string())),
        }
    }

    /// `GET` a JSON resource and unwrap its `data` envelope.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .authorized(self.client.get(self.url(service, path)))
            .query(query)
            .send()
            .await?;
        let value = Self::parse_value(response).await?;
        Self::unwrap_envelope(value)
    }

    /// `POST` a JSON body, returning the raw (already success-checked) reply.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        service: Service,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authorized(self.client.post(self.url(service, path)))
            .json(body)
            .send()
            .await?;
        Self::parse_value(response).await
    }

    /// Submit a form: as JSON when `files` is empty, as multipart otherwise.
    ///
    /// In multipart mode every top-level field of `body` becomes a text part
    /// and every attachment a file part.
    pub async fn post_form<B: Serialize + ?Sized>(
        &self,
        service: Service,
        path: &str,
        body: &B,
        files: &Attachments,
    ) -> Result<serde_json::Value, ApiError> {
        if files.is_empty() {
            return self.post_json(service, path, body).await;
        }
        let form = Self::multipart(body, files)?;
        tracing::debug!(path, files = files.len(), "Submitting multipart form");
        self.post_multipart(service, path, form).await
    }

    /// `POST` a prepared multipart form.
    pub async fn post_multipart(
        &self,
        service: Service,
        path: &str,
        form: Form,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authorized(self.client.post(self.url(service, path)))
            .multipart(form)
            .send()
            .await?;
        Self::parse_value(response).await
    }

    /// `GET` a binary resource from one of the services.
    pub async fn get_bytes(&self, service: Service, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .authorized(self.client.get(self.url(service, path)))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Download an absolute URL (sample photographs). No auth header is sent.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Decode an upstream reply, accepting both enveloped and bare shapes.
    pub fn unwrap_envelope<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
        serde_json::from_value::<Envelope<T>>(value)
            .map(Envelope::into_inner)
            .map_err(|e| ApiError::Encoding(e.to_string()))
    }

    /// The entity the upstream echoed back, if it echoed a decodable one.
    pub fn echoed<T: DeserializeOwned>(value: serde_json::Value) -> Option<T> {
        Self::unwrap_envelope(value).ok()
    }

    // ---- private helpers ----

    fn url(&self, service: Service, path: &str) -> String {
        format!("{}{}", self.urls.base(service), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Build a multipart form from the top-level fields of `body` plus
    /// `files`. `null` fields are skipped; non-string scalars are rendered
    /// as their JSON text.
    fn multipart<B: Serialize + ?Sized>(body: &B, files: &Attachments) -> Result<Form, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
        let serde_json::Value::Object(fields) = value else {
            return Err(ApiError::Encoding("form body must be an object".into()));
        };

        let mut form = Form::new();
        for (name, value) in fields {
            let text = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            form = form.text(name, text);
        }
        for file in files.iter() {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| ApiError::Encoding(e.to_string()))?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Upstream request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON body, rejecting `success: false` envelopes.
    /// An empty body parses as `null`.
    async fn parse_value(response: reqwest::Response) -> Result<serde_json::Value, ApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Encoding(e.to_string()))?;
        if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Request was rejected")
                .to_string();
            return Err(ApiError::Rejected(message));
        }
        Ok(value)
    }
}
