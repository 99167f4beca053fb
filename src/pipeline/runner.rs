use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::agents::AgentFactory;
use crate::config::Config;
use crate::engine::{ExecutionEngine, ExecutionPlan, SequentialEngine};
use crate::error::{FailurePolicy, Result};
use crate::pipeline::mock::mock_article;
use crate::storage::{ArticleStorage, FileArticleStore};
use crate::tasks::TaskFactory;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSource {
    Live,
    Mock,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub markdown: String,
    pub path: PathBuf,
    pub source: ArticleSource,
}

impl PipelineResult {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Researcher → writer → SEO strategist → editor, then persist the result.
pub struct EditorialPipeline {
    config: Arc<Config>,
    engine: Arc<dyn ExecutionEngine>,
    storage: Arc<dyn ArticleStorage>,
}

impl EditorialPipeline {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_engine(config, Arc::new(SequentialEngine::new()))
    }

    pub fn with_engine(config: Arc<Config>, engine: Arc<dyn ExecutionEngine>) -> Self {
        let storage = Arc::new(FileArticleStore::new(config.output.directory.clone()));
        Self::with_parts(config, engine, storage)
    }

    pub fn with_parts(
        config: Arc<Config>,
        engine: Arc<dyn ExecutionEngine>,
        storage: Arc<dyn ArticleStorage>,
    ) -> Self {
        Self {
            config,
            engine,
            storage,
        }
    }

    pub fn storage(&self) -> Arc<dyn ArticleStorage> {
        self.storage.clone()
    }

    pub async fn run(&self, topic: &str) -> Result<PipelineResult> {
        info!("Starting editorial pipeline for topic {:?}", topic);
        let start_time = Instant::now();

        let (markdown, source) = match self.generate(topic).await {
            Ok(markdown) => (markdown, ArticleSource::Live),
            Err(e) => match e.failure_policy() {
                FailurePolicy::FallbackToMock => {
                    warn!("Live pipeline failed ({}), using mock article", e);
                    (mock_article(topic), ArticleSource::Mock)
                }
                FailurePolicy::Propagate => return Err(e),
            },
        };

        let path = self.storage.save_article(topic, &markdown).await?;

        info!(
            "Editorial pipeline finished in {:?} ({:?} article)",
            start_time.elapsed(),
            source
        );
        Ok(PipelineResult {
            markdown,
            path,
            source,
        })
    }

    async fn generate(&self, topic: &str) -> Result<String> {
        let agents = AgentFactory::new(&self.config)?;
        info!("Agents share model {}", agents.model_name());

        let plan = build_plan(&agents, topic)?;
        let output = self.engine.execute(&plan).await?;
        Ok(output.final_text())
    }
}

/// Research, draft, SEO report and final edit, in dependency order.
pub fn build_plan(agents: &AgentFactory, topic: &str) -> Result<ExecutionPlan> {
    let research = TaskFactory::research_brief_task(agents.lead_researcher(), topic);
    let draft = TaskFactory::draft_article_task(agents.senior_writer(), topic, &research);
    let seo = TaskFactory::seo_optimization_task(agents.seo_strategist(), topic, &draft);
    let editorial = TaskFactory::final_editorial_task(agents.editor_in_chief(), &draft, &seo);

    ExecutionPlan::new(vec![research, draft, seo, editorial])
}
