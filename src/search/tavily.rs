use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::{EditorialError, Result};
use crate::search::{SearchHit, SearchTool};

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<SearchHit>,
}

pub struct TavilySearch {
    client: Client,
    api_base: String,
    api_key: String,
    max_results: u32,
    search_depth: String,
}

impl TavilySearch {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| EditorialError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_results: config.max_results,
            search_depth: config.search_depth.clone(),
        })
    }

    fn parse_results(body: &str) -> Result<Vec<SearchHit>> {
        let response: TavilyResponse = serde_json::from_str(body)?;
        Ok(response.results)
    }
}

#[async_trait]
impl SearchTool for TavilySearch {
    fn name(&self) -> String {
        "tavily_search".to_string()
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            return Err(EditorialError::CredentialError("TAVILY_API_KEY is not set".to_string()));
        }

        let url = format!("{}/search", self.api_base);
        debug!("Searching {} for {:?}", url, query);

        let response = self
            .client
            .post(&url)
            .json(&TavilyRequest {
                api_key: &self.api_key,
                query,
                max_results: self.max_results,
                search_depth: &self.search_depth,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(EditorialError::CredentialError(format!(
                    "search service rejected the API key ({})",
                    status
                )));
            }
            _ => {
                return Err(EditorialError::NetworkError(format!(
                    "search service returned {}: {}",
                    status, body
                )));
            }
        }

        let hits = Self::parse_results(&body)?;
        info!("Search for {:?} returned {} results", query, hits.len());
        Ok(hits)
    }
}
