//! HTTP client for the timetable REST endpoints.
//!
//! Wraps `/api/{collection}[/{id}]` CRUD, sample-data seeding and the class
//! export using [`reqwest`]. Paths come from the
//! [`Resource`](timetable_core::resource::Resource) marker of each
//! collection.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use timetable_core::resource::{QueryParams, Resource};
use timetable_core::types::DbId;

/// Client for a single timetable API server.
#[derive(Debug, Clone)]
pub struct TimetableApi {
    client: reqwest::Client,
    base_url: String,
}

/// Which booking the server found to clash with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashKind {
    /// The teacher is already assigned in that slot.
    Teacher,
    /// The class already has a subject in that slot.
    Room,
    #[serde(other)]
    Other,
}

/// Body of a 409 response.
#[derive(Debug, Deserialize)]
struct ConflictBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<ClashKind>,
}

/// Body of the seeding response.
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Errors from the timetable REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected a save because of a scheduling clash (409).
    #[error("Scheduling conflict: {message}")]
    Conflict {
        /// Server-supplied explanation, shown to the user as-is.
        message: String,
        kind: Option<ClashKind>,
    },

    /// Any other non-2xx status.
    #[error("Timetable API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx body that does not match the expected shape.
    #[error("Unexpected response from {path}: {source}")]
    Schema {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The user-facing message of a scheduling conflict.
    pub fn conflict_message(&self) -> Option<&str> {
        match self {
            ApiError::Conflict { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl TimetableApi {
    /// Create a client for `base_url` (e.g. `http://localhost:5000`) whose
    /// requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/{collection}` with only the query parameters that are set.
    pub async fn list<R: Resource>(&self, query: &R::Query) -> Result<Vec<R::Record>, ApiError> {
        let path = collection_path::<R>();
        let pairs = query.query_pairs();
        tracing::debug!(method = "GET", %path, params = pairs.len(), "Timetable API request");

        let mut request = self.client.get(self.url(&path));
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        let response = request.send().await?;
        Self::parse_response(&path, response).await
    }

    /// `POST /api/{collection}`.
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R::Record, ApiError> {
        let path = collection_path::<R>();
        self.send_json(Method::POST, &path, Some(draft)).await
    }

    /// `PUT /api/{collection}/{id}`.
    pub async fn update<R: Resource>(
        &self,
        id: DbId,
        draft: &R::Draft,
    ) -> Result<R::Record, ApiError> {
        let path = item_path::<R>(id);
        self.send_json(Method::PUT, &path, Some(draft)).await
    }

    /// `DELETE /api/{collection}/{id}`. The body (normally empty) is ignored.
    pub async fn delete<R: Resource>(&self, id: DbId) -> Result<(), ApiError> {
        let path = item_path::<R>(id);
        tracing::debug!(method = "DELETE", %path, "Timetable API request");
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::check_status(response).await
    }

    /// `POST /api/init-sample-data`; returns the server's message.
    pub async fn seed_sample_data(&self) -> Result<String, ApiError> {
        let path = "/api/init-sample-data";
        tracing::debug!(method = "POST", %path, "Timetable API request");
        let response = self.client.post(self.url(path)).send().await?;
        let body: MessageBody = Self::parse_response(path, response).await?;
        Ok(body.message)
    }

    /// Address of the server-rendered PDF for one class.
    pub fn export_url(&self, class_id: DbId) -> String {
        self.url(&export_path(class_id))
    }

    /// Download the class export document.
    pub async fn download_export(&self, class_id: DbId) -> Result<Vec<u8>, ApiError> {
        let path = export_path(class_id);
        tracing::debug!(method = "GET", %path, "Timetable API request");
        let response = self.client.get(self.url(&path)).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        tracing::debug!(method = %method, %path, "Timetable API request");
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::parse_response(path, response).await
    }

    /// Map non-2xx responses to errors: 409 becomes
    /// [`ApiError::Conflict`], everything else [`ApiError::Status`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if status == StatusCode::CONFLICT {
            return Err(match serde_json::from_str::<ConflictBody>(&body) {
                Ok(parsed) => ApiError::Conflict {
                    message: parsed.message,
                    kind: parsed.kind,
                },
                Err(_) => ApiError::Conflict {
                    message: if body.trim().is_empty() {
                        "Scheduling conflict".to_string()
                    } else {
                        body
                    },
                    kind: None,
                },
            });
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Decode a successful JSON body, reporting shape mismatches with the
    /// offending path.
    async fn parse_response<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Schema {
            path: path.to_string(),
            source,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

fn collection_path<R: Resource>() -> String {
    format!("/api/{}", R::COLLECTION)
}

fn item_path<R: Resource>(id: DbId) -> String {
    format!("/api/{}/{id}", R::COLLECTION)
}

fn export_path(class_id: DbId) -> String {
    format!("/api/timetable/export/{class_id}")
}
