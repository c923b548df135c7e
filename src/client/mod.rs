//! HTTP client for the report store.
//!
//! The editing workflow never talks to the database directly; it goes through
//! the same REST surface the dashboard uses. The transport is abstracted
//! behind [`ReportStore`] so the save orchestration can be exercised against
//! in-memory fakes.

use std::sync::Mutex;

use serde::Deserialize;

use crate::errors::ErrorResponse;
use crate::models::{ReportDocument, ReportDomain};

/// Errors surfaced by a report store.
#[derive(Debug)]
pub enum StoreError {
    /// The server rejected our credentials; the auth state has been cleared
    /// and the caller must route to login.
    Unauthorized,
    /// Network-level failure (connection, timeout, malformed body)
    Transport(String),
    /// The server answered with an error envelope
    Api { code: String, message: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unauthorized => write!(f, "UNAUTHORIZED: session expired"),
            StoreError::Transport(msg) => write!(f, "TRANSPORT: {}", msg),
            StoreError::Api { code, message } => write!(f, "{}: {}", code, message),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Credentials for the editing session, held explicitly rather than in
/// ambient global state. Initialized on login, cleared on logout or on the
/// first 401 from any call.
#[derive(Debug, Default)]
pub struct AuthState {
    token: Mutex<Option<String>>,
}

impl AuthState {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Mutex::new(token),
        }
    }

    pub fn set_token(&self, token: String) {
        *self.token.lock().unwrap() = Some(token);
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    /// Teardown: forget the credentials.
    pub fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}

/// Persistence surface of one report domain: fetch the whole document, or
/// replace it wholesale.
#[allow(async_fn_in_trait)]
pub trait ReportStore {
    async fn fetch(&self, domain: ReportDomain) -> Result<ReportDocument, StoreError>;

    async fn save(
        &self,
        domain: ReportDomain,
        payload: &ReportDocument,
    ) -> Result<ReportDocument, StoreError>;
}

/// Success envelope the REST surface wraps documents in.
#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[allow(dead_code)]
    success: bool,
    data: ReportDocument,
}

/// `ReportStore` backed by the dashboard's REST API.
pub struct HttpReportStore {
    base_url: String,
    http: reqwest::Client,
    auth: AuthState,
}

impl HttpReportStore {
    pub fn new(base_url: impl Into<String>, auth: AuthState) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            auth,
        }
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    fn with_bearer(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn into_document(
        &self,
        response: reqwest::Response,
    ) -> Result<ReportDocument, StoreError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Global 401 handling: drop the credentials so every consumer of
            // the auth state sees the session as ended.
            self.auth.clear();
            return Err(StoreError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(envelope) => Err(StoreError::Api {
                    code: envelope.error.code,
                    message: envelope.error.message,
                }),
                Err(_) => Err(StoreError::Transport(format!(
                    "unexpected status {}",
                    status
                ))),
            };
        }

        let envelope: DataEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("malformed response: {}", e)))?;
        Ok(envelope.data)
    }
}

impl ReportStore for HttpReportStore {
    async fn fetch(&self, domain: ReportDomain) -> Result<ReportDocument, StoreError> {
        let url = format!("{}{}", self.base_url, domain.data_path());
        let response = self.with_bearer(self.http.get(&url)).send().await?;
        self.into_document(response).await
    }

    async fn save(
        &self,
        domain: ReportDomain,
        payload: &ReportDocument,
    ) -> Result<ReportDocument, StoreError> {
        let url = format!("{}{}", self.base_url, domain.save_path());
        let response = self
            .with_bearer(self.http.post(&url))
            .json(payload)
            .send()
            .await?;
        self.into_document(response).await
    }
}
