use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use crate::agents::Agent;
use crate::engine::{EngineOutput, ExecutionEngine, ExecutionPlan, TaskOutput};
use crate::error::Result;

/// Runs tasks one after another in plan order, feeding each task the outputs
/// of the tasks it lists as context. The first failure aborts the run.
#[derive(Debug, Default, Clone)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecutionEngine for SequentialEngine {
    async fn execute(&self, plan: &ExecutionPlan) -> Result<EngineOutput> {
        let start_time = Instant::now();
        let total = plan.len();
        let mut completed: Vec<TaskOutput> = Vec::with_capacity(total);

        for (index, task) in plan.tasks().iter().enumerate() {
            info!(
                "Stage {}/{}: {} ({})",
                index + 1,
                total,
                task.kind.title(),
                task.agent.role()
            );

            let context: Vec<TaskOutput> = task
                .context
                .iter()
                .filter_map(|kind| completed.iter().find(|output| output.kind == *kind))
                .cloned()
                .collect();

            let raw = task.agent.perform(task, &context).await?;
            completed.push(TaskOutput {
                kind: task.kind,
                agent: task.agent.role(),
                raw,
            });
        }

        info!("Plan of {} tasks completed in {:?}", total, start_time.elapsed());

        Ok(EngineOutput {
            raw: completed.last().map(|output| output.raw.clone()),
            tasks_output: completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentFactory;
    use crate::error::EditorialError;
    use crate::llm::{ChatMessage, MockLanguageModel};
    use crate::search::{MockSearchTool, SearchHit};
    use crate::tasks::{TaskFactory, TaskKind};
    use std::sync::{Arc, Mutex};

    fn plan_for(agents: &AgentFactory, topic: &str) -> ExecutionPlan {
        let research = TaskFactory::research_brief_task(agents.lead_researcher(), topic);
        let draft = TaskFactory::draft_article_task(agents.senior_writer(), topic, &research);
        let seo = TaskFactory::seo_optimization_task(agents.seo_strategist(), topic, &draft);
        let editorial = TaskFactory::final_editorial_task(agents.editor_in_chief(), &draft, &seo);
        ExecutionPlan::new(vec![research, draft, seo, editorial]).unwrap()
    }

    fn search_tool() -> MockSearchTool {
        let mut tool = MockSearchTool::new();
        tool.expect_name().return_const("mock_search".to_string());
        tool.expect_search().times(1).returning(|query| {
            Ok(vec![SearchHit {
                title: format!("About {}", query),
                url: "https://example.org/source".to_string(),
                content: "A verified fact.".to_string(),
                score: Some(0.9),
            }])
        });
        tool
    }

    #[tokio::test]
    async fn test_runs_tasks_in_order_and_passes_context() {
        let prompts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = prompts.clone();

        let mut llm = MockLanguageModel::new();
        llm.expect_model_name().return_const("mock-model".to_string());
        llm.expect_complete().times(4).returning(move |messages: &[ChatMessage]| {
            let mut log = recorded.lock().unwrap();
            log.push(messages[1].content.clone());
            Ok(format!("output #{}", log.len()))
        });

        let agents = AgentFactory::with_clients(Arc::new(llm), Arc::new(search_tool()));
        let plan = plan_for(&agents, "Quantum networking");

        let output = SequentialEngine::new().execute(&plan).await.unwrap();

        assert_eq!(output.raw.as_deref(), Some("output #4"));
        let kinds: Vec<TaskKind> = output.tasks_output.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TaskKind::ResearchBrief,
                TaskKind::DraftArticle,
                TaskKind::SeoOptimization,
                TaskKind::FinalEditorial
            ]
        );

        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].contains("[About Quantum networking](https://example.org/source)"));
        assert!(prompts[1].contains("## Research Brief\n\noutput #1"));
        assert!(prompts[2].contains("## Draft Article\n\noutput #2"));
        assert!(!prompts[2].contains("output #1"));
        assert!(prompts[3].contains("## Draft Article\n\noutput #2"));
        assert!(prompts[3].contains("## SEO Optimization Report\n\noutput #3"));
    }

    #[tokio::test]
    async fn test_first_failure_aborts_the_run() {
        let mut llm = MockLanguageModel::new();
        llm.expect_model_name().return_const("mock-model".to_string());
        llm.expect_complete()
            .times(1)
            .returning(|_| Err(EditorialError::NetworkError("connection reset".to_string())));

        let agents = AgentFactory::with_clients(Arc::new(llm), Arc::new(search_tool()));
        let plan = plan_for(&agents, "Quantum networking");

        let err = SequentialEngine::new().execute(&plan).await.unwrap_err();
        assert!(matches!(err, EditorialError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_search_failure_stops_before_model_call() {
        let mut llm = MockLanguageModel::new();
        llm.expect_model_name().return_const("mock-model".to_string());
        llm.expect_complete().never();

        let mut tool = MockSearchTool::new();
        tool.expect_name().return_const("mock_search".to_string());
        tool.expect_search()
            .returning(|_| Err(EditorialError::CredentialError("TAVILY_API_KEY is not set".to_string())));

        let agents = AgentFactory::with_clients(Arc::new(llm), Arc::new(tool));
        let plan = plan_for(&agents, "Quantum networking");

        let err = SequentialEngine::new().execute(&plan).await.unwrap_err();
        assert!(err.falls_back_to_mock());
    }
}
