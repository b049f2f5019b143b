//! REST client for the back-office API
//!
//! Every endpoint answers with the `{ success, data, error }` envelope.
//! Only `GET` (list) and `POST` (create) are needed by the importer.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, CatalogEntry, EnrollmentStore};
use super::models::{Inscripcion, NewInscripcion, NewParticipante, Participante};
use crate::config::ApiConfig;

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the envelope, turning `success: false` into an error
    pub fn into_result(self) -> Result<Option<T>> {
        if !self.success {
            let message = self
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "API error".to_string());
            bail!(message);
        }
        Ok(self.data)
    }
}

/// Loose shape of a failed response body
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorBody>,
    #[serde(default)]
    message: Option<String>,
}

/// Pick the most specific message out of a failed response body
fn error_message(body: &str, fallback: String) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error.and_then(|e| e.message).or(env.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
}

/// HTTP implementation of the collaborator traits
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn get_list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>> {
        let url = self.url(resource);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?;

        if !status.is_success() {
            let fallback = format!("Error fetching {} ({})", resource, status.as_u16());
            bail!(error_message(&text, fallback));
        }

        let envelope: ApiResponse<Vec<T>> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid response body from {}", url))?;

        Ok(envelope.into_result()?.unwrap_or_default())
    }

    async fn post<B, T>(&self, resource: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(resource);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?;

        if !status.is_success() {
            let fallback = format!("Error creating {} ({})", resource, status.as_u16());
            bail!(error_message(&text, fallback));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid response body from {}", url))?;

        envelope.into_result()?.context("No data returned")
    }
}

#[async_trait]
impl<E: CatalogEntry> Catalog<E> for ApiClient {
    async fn list(&self) -> Result<Vec<E>> {
        self.get_list(E::KIND.resource()).await
    }

    async fn create(&self, draft: &E::Draft) -> Result<E> {
        self.post(E::KIND.resource(), draft).await
    }
}

#[async_trait]
impl EnrollmentStore for ApiClient {
    async fn create_inscripcion(&self, inscripcion: &NewInscripcion) -> Result<Inscripcion> {
        self.post("inscripciones", inscripcion).await
    }

    async fn create_participante(&self, participante: &NewParticipante) -> Result<Participante> {
        self.post("participantes", participante).await
    }
}
