use std::collections::HashSet;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::filter::JobQuery;
use crate::models::{
    FavoriteRequest, JobSource, PageResult, TranslateRequest, TranslateResponse,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client for the job-board REST API. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_jobs(&self, query: &JobQuery) -> Result<PageResult, ApiError> {
        let params = query.to_params();
        debug!(?params, "GET /jobs");
        let response = self
            .client
            .get(self.url("/jobs"))
            .query(&params)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list_sources(&self) -> Result<Vec<JobSource>, ApiError> {
        self.get_json("/job-sources").await
    }

    pub async fn list_locations(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/locations").await
    }

    pub async fn list_favorites(&self) -> Result<HashSet<i64>, ApiError> {
        self.get_json("/favorites").await
    }

    pub async fn add_favorite(&self, job_id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/favorites"))
            .json(&FavoriteRequest {
                job_listing_id: job_id,
            })
            .send()
            .await?;
        acknowledge(response).await
    }

    pub async fn remove_favorite(&self, job_id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/favorites/{}", job_id)))
            .send()
            .await?;
        acknowledge(response).await
    }

    pub async fn translate(&self, job_id: i64, text: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/translate"))
            .json(&TranslateRequest { job_id, text })
            .send()
            .await?;
        let body: TranslateResponse = decode(response).await?;
        Ok(body.translated_text)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }
}

async fn body_text(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status { status, body });
    }
    Ok(body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = body_text(response).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Mutations succeed on 2xx unless the body is an object with an `error`
/// field, which the API uses for refused favorites.
async fn acknowledge(response: Response) -> Result<(), ApiError> {
    let body = body_text(response).await?;
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(&body) {
        if let Some(error) = map.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ApiError::Rejected(message));
        }
    }
    Ok(())
}
