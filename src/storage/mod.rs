use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{EditorialError, Result};
use crate::pipeline::slug::slugify;

const ARTICLE_EXTENSION: &str = "md";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleInfo {
    pub file_name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArticle {
    pub file_name: String,
    pub path: PathBuf,
    pub markdown: String,
}

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    async fn save_article(&self, topic: &str, markdown: &str) -> Result<PathBuf>;
    async fn load_article(&self, file_name: &str) -> Result<StoredArticle>;
    async fn list_articles(&self) -> Result<Vec<ArticleInfo>>;
}

/// Writes articles as `{YYYYMMDD-HHMMSS}-{slug}.md` under the output directory.
///
/// Two saves of the same topic within one second map to the same file name,
/// and the second overwrites the first.
#[derive(Debug, Clone)]
pub struct FileArticleStore {
    output_dir: PathBuf,
}

impl FileArticleStore {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn file_name_for(topic: &str, timestamp: DateTime<Local>) -> String {
        format!(
            "{}-{}.{}",
            timestamp.format("%Y%m%d-%H%M%S"),
            slugify(topic),
            ARTICLE_EXTENSION
        )
    }

    /// Absolute form of `dir`, taking relative paths from `base`.
    pub fn resolve_against(dir: &Path, base: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base.join(dir)
        }
    }

    /// Resolve the configured directory against the working directory and
    /// create it with any missing parents.
    pub async fn resolve_output_dir(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()
            .map_err(|e| EditorialError::FilesystemError(format!("Failed to read working directory: {}", e)))?;
        let path = Self::resolve_against(&self.output_dir, &cwd);

        fs::create_dir_all(&path).await.map_err(|e| {
            EditorialError::FilesystemError(format!("Failed to create {}: {}", path.display(), e))
        })?;

        Ok(path)
    }

    /// Save under the name derived from `topic` and `timestamp`, replacing
    /// any file already there.
    pub async fn save_article_at(
        &self,
        topic: &str,
        markdown: &str,
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf> {
        let dir = self.resolve_output_dir().await?;
        let path = dir.join(Self::file_name_for(topic, timestamp));

        fs::write(&path, markdown).await.map_err(|e| {
            EditorialError::FilesystemError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!("Saved article ({} bytes) to {}", markdown.len(), path.display());
        Ok(path)
    }

    fn is_article_file_name(file_name: &str) -> bool {
        let stem = match file_name.strip_suffix(".md") {
            Some(stem) if !stem.is_empty() => stem,
            _ => return false,
        };
        stem.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

#[async_trait]
impl ArticleStorage for FileArticleStore {
    async fn save_article(&self, topic: &str, markdown: &str) -> Result<PathBuf> {
        self.save_article_at(topic, markdown, Local::now()).await
    }

    async fn load_article(&self, file_name: &str) -> Result<StoredArticle> {
        if !Self::is_article_file_name(file_name) {
            return Err(EditorialError::ArticleNotFound(file_name.to_string()));
        }

        let dir = self.resolve_output_dir().await?;
        let path = dir.join(file_name);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(EditorialError::ArticleNotFound(file_name.to_string()));
        }

        let markdown = fs::read_to_string(&path).await.map_err(|e| {
            EditorialError::FilesystemError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        debug!("Loaded article {}", path.display());
        Ok(StoredArticle {
            file_name: file_name.to_string(),
            path,
            markdown,
        })
    }

    async fn list_articles(&self) -> Result<Vec<ArticleInfo>> {
        let dir = self.resolve_output_dir().await?;
        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            EditorialError::FilesystemError(format!("Failed to list {}: {}", dir.display(), e))
        })?;

        let mut articles = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !Self::is_article_file_name(&file_name) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            articles.push(ArticleInfo {
                file_name,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        // timestamp prefix makes name order chronological
        articles.sort_by(|a, b| b.file_name.cmp(&a.file_name));
        Ok(articles)
    }
}
