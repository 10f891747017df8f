use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{
    lookup_key, ConfirmationEmail, Paper, PushTime, SearchRequestReply, SubscriptionRequest,
};

const SNIPPET_CHARS: usize = 100;

/// Thin REST client for the paper backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: String,
}

impl ApiClient {
    pub fn new(client: Client, config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_base_url(client, &config.base_url())
    }

    pub fn with_base_url(client: Client, base: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base)?;
        Ok(Self {
            client,
            base: parsed.as_str().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// `GET /papers?category={code}`
    pub async fn list_papers(&self, category: &str) -> Result<Vec<Paper>, ApiError> {
        debug!(%category, "fetching papers");
        let result = async {
            let response = self
                .client
                .get(self.endpoint("papers"))
                .query(&[("category", category)])
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await?;
            decode_json(response, "Failed to fetch papers").await
        }
        .await;
        if let Err(err) = &result {
            warn!(%category, error = %err, "failed to fetch papers");
        }
        result
    }

    /// `POST /papers/{id}/translate`, where `id` is the last path segment of
    /// the entry id.
    pub async fn translate_paper(&self, entry_id: &str) -> Result<Paper, ApiError> {
        let key = lookup_key(entry_id);
        debug!(%entry_id, %key, "requesting translation");
        let result = async {
            let response = self
                .client
                .post(self.endpoint(&format!("papers/{key}/translate")))
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await?;
            decode_json(response, "Failed to translate paper").await
        }
        .await;
        if let Err(err) = &result {
            warn!(%entry_id, error = %err, "failed to translate paper");
        }
        result
    }

    /// `POST /search-request`. The body is read as text first so a non-JSON
    /// reply can be reported with a snippet of what the server sent.
    pub async fn submit_search_request(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SearchRequestReply, ApiError> {
        debug!(email = %request.email, push_time = %request.push_time, "submitting search request");
        let result = async {
            let response = self
                .client
                .post(self.endpoint("search-request"))
                .json(request)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            debug!(status = status.as_u16(), "search request answered");
            let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|_| {
                ApiError::NonJson {
                    snippet: body.chars().take(SNIPPET_CHARS).collect(),
                }
            })?;
            // Anything that isn't a reply object counts as not accepted.
            Ok(serde_json::from_value::<SearchRequestReply>(value).unwrap_or_else(|e| {
                warn!(error = %e, "unexpected search request reply shape");
                SearchRequestReply::default()
            }))
        }
        .await;
        if let Err(err) = &result {
            warn!(error = %err, "failed to submit search request");
        }
        result
    }

    /// `POST /subscribe_success`, asking the backend to send the
    /// confirmation email.
    pub async fn send_subscribe_success(
        &self,
        email: &str,
        push_time: PushTime,
    ) -> Result<serde_json::Value, ApiError> {
        debug!(%email, %push_time, "requesting confirmation email");
        let result = async {
            let response = self
                .client
                .post(self.endpoint("subscribe_success"))
                .json(&ConfirmationEmail { email, push_time })
                .send()
                .await?;
            decode_json(response, "Failed to send confirmation email").await
        }
        .await;
        if let Err(err) = &result {
            warn!(%email, error = %err, "failed to send confirmation email");
        }
        result
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(status_error(response, fallback).await);
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builds a `Status` error, preferring the `detail` string of a JSON body.
async fn status_error(response: Response, fallback: &str) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(ToOwned::to_owned))
        .unwrap_or_else(|| fallback.to_owned());
    ApiError::Status { status, message }
}
