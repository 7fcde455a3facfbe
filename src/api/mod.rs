//! HTTP client for the LMS backend.
//!
//! Every endpoint answers with the same envelope, `{ success, data, message }`.
//! The helpers here attach the bearer token from the [`SessionStore`], unwrap
//! the envelope and translate failures into [`ApiError`]. Endpoint groups live
//! in the submodules as further `impl ApiClient` blocks.

mod analytics;
mod assessments;
mod auth;
mod courses;
mod error;
mod live_classes;
mod notifications;
mod profile;

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::session::SessionStore;

pub use analytics::ProgressOverview;
pub use courses::{LectureUpload, StagedFile};
pub use error::{ApiError, Failure};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(settings: &Settings, session: SessionStore) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::MissingToken)?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        debug!(%status, %url, "backend responded");

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_default();
            warn!(%status, %url, %message, "request failed");
            return Err(ApiError::Http { status, message });
        }

        if body.trim().is_empty() {
            return Ok(Envelope {
                success: true,
                data: None,
                message: None,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string());
            warn!(%url, %message, "backend rejected request");
            return Err(ApiError::Rejected(message));
        }
        Ok(envelope)
    }

    /// Runs an authenticated request; a 401 becomes [`ApiError::Unauthorized`].
    async fn execute_authed<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        match self.execute(request).await {
            Err(ApiError::Http { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                Err(ApiError::Unauthorized)
            }
            other => other,
        }
    }

    pub(crate) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authed(Method::GET, path)?;
        self.execute_authed(request).await?.into_data()
    }

    /// GET that tolerates a missing `data` field, as list endpoints do when empty.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ApiError> {
        let request = self.authed(Method::GET, path)?;
        Ok(self
            .execute_authed::<Vec<T>>(request)
            .await?
            .data
            .unwrap_or_default())
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authed(method, path)?.json(body);
        self.execute_authed(request).await?.into_data()
    }

    /// Sends a JSON body and only checks the success flag.
    pub(crate) async fn send_ack<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.authed(method, path)?.json(body);
        self.execute_authed::<serde_json::Value>(request).await?;
        Ok(())
    }

    pub(crate) async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<Option<T>, ApiError> {
        let request = self.authed(method, path)?.multipart(form);
        Ok(self.execute_authed::<T>(request).await?.data)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.authed(Method::DELETE, path)?;
        self.execute_authed::<serde_json::Value>(request).await?;
        Ok(())
    }
}
