use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::engine::TaskOutput;
use crate::error::Result;
use crate::llm::{ChatMessage, LanguageModel};
use crate::search::{format_hits, SearchTool};
use crate::tasks::TaskDescriptor;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgentRole {
    LeadResearcher,
    SeniorWriter,
    SeoStrategist,
    EditorInChief,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::LeadResearcher,
        AgentRole::SeniorWriter,
        AgentRole::SeoStrategist,
        AgentRole::EditorInChief,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AgentRole::LeadResearcher => "Lead Researcher",
            AgentRole::SeniorWriter => "Senior Writer",
            AgentRole::SeoStrategist => "SEO Strategist",
            AgentRole::EditorInChief => "Editor-in-Chief",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    fn role(&self) -> AgentRole;
    async fn perform(&self, task: &TaskDescriptor, context: &[TaskOutput]) -> Result<String>;
}

/// A role-bound persona presented to the language model.
#[derive(Clone)]
pub struct AgentDescriptor {
    pub role: AgentRole,
    pub goal: String,
    pub backstory: String,
    pub search_tool: Option<Arc<dyn SearchTool>>,
    pub llm: Arc<dyn LanguageModel>,
}

impl fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("search_tool", &self.search_tool.as_ref().map(|t| t.name()))
            .field("llm", &self.llm.model_name())
            .finish()
    }
}

impl AgentDescriptor {
    pub fn can_search(&self) -> bool {
        self.search_tool.is_some()
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role.title(),
            self.backstory,
            self.goal
        )
    }

    /// Build the user prompt for one task from its instructions, upstream
    /// outputs and optional live research.
    pub fn task_prompt(task: &TaskDescriptor, context: &[TaskOutput], research: Option<&str>) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            task.description, task.expected_output
        );

        if let Some(research) = research {
            prompt.push_str("\n\n# Live web research results\n\n");
            prompt.push_str(research);
        }

        if !context.is_empty() {
            prompt.push_str("\n\n# This is the context you're working with\n");
            for output in context {
                prompt.push_str(&format!("\n## {}\n\n{}\n", output.kind.title(), output.raw));
            }
        }

        prompt
    }
}

#[async_trait]
impl Agent for AgentDescriptor {
    fn role(&self) -> AgentRole {
        self.role
    }

    async fn perform(&self, task: &TaskDescriptor, context: &[TaskOutput]) -> Result<String> {
        info!("{} working on {}", self.role, task.kind.title());
        let start_time = Instant::now();

        let research = match &self.search_tool {
            Some(tool) => {
                let hits = tool.search(&task.subject).await?;
                Some(format_hits(&hits))
            }
            None => None,
        };

        let prompt = Self::task_prompt(task, context, research.as_deref());
        debug!("{} prompt is {} chars", self.role, prompt.len());

        let messages = [ChatMessage::system(self.system_prompt()), ChatMessage::user(prompt)];
        let answer = self.llm.complete(&messages).await?;

        info!(
            "{} finished {} in {:?}",
            self.role,
            task.kind.title(),
            start_time.elapsed()
        );
        Ok(answer)
    }
}
