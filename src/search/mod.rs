pub mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use tavily::TavilySearch;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Live web search available to agents that are allowed to research.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchTool: Send + Sync {
    fn name(&self) -> String;
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Render search hits as a markdown list for inclusion in a prompt.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No search results were returned.".to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let snippet = hit.content.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("{}. [{}]({})\n   {}", i + 1, hit.title, hit.url, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
