use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSource {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub source: Option<JobSource>, // embedded by the API, absent on some search hits
}

impl Job {
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name.as_str())
    }
}

/// One page of the `/jobs` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub jobs: Vec<Job>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteRequest {
    pub job_listing_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest<'a> {
    pub job_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}
