#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use editorial_board::config::Config;
use editorial_board::engine::{EngineOutput, ExecutionEngine, ExecutionPlan};
use editorial_board::error::{EditorialError, Result};

/// Returns a fixed article without touching the plan's agents.
pub struct CannedEngine {
    pub article: String,
}

#[async_trait]
impl ExecutionEngine for CannedEngine {
    async fn execute(&self, plan: &ExecutionPlan) -> Result<EngineOutput> {
        assert_eq!(plan.len(), 4);
        Ok(EngineOutput {
            raw: Some(self.article.clone()),
            tasks_output: Vec::new(),
        })
    }
}

/// Fails every run with the error produced by `make_error`.
pub struct FailingEngine {
    pub make_error: fn() -> EditorialError,
}

#[async_trait]
impl ExecutionEngine for FailingEngine {
    async fn execute(&self, _plan: &ExecutionPlan) -> Result<EngineOutput> {
        Err((self.make_error)())
    }
}

pub fn test_config(output_dir: &Path) -> Arc<Config> {
    let mut config = Config::default();
    config.output.directory = output_dir.to_path_buf();
    Arc::new(config)
}

pub const CANNED_ARTICLE: &str = "# Quantum Sensors\n\nMeta description: a short tour.\n\n## Why now\n\nCheaper lasers.\n";
