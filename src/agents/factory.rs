use std::sync::Arc;

use crate::agents::agent::{AgentDescriptor, AgentRole};
use crate::config::Config;
use crate::error::Result;
use crate::llm::{ChatCompletionClient, LanguageModel};
use crate::search::{SearchTool, TavilySearch};

/// Builds the four editorial board agents around one shared model client
/// and one shared search client.
pub struct AgentFactory {
    llm: Arc<dyn LanguageModel>,
    research_tool: Arc<dyn SearchTool>,
}

impl AgentFactory {
    /// Missing credentials are not checked here; they surface on the first call.
    pub fn new(config: &Config) -> Result<Self> {
        let llm = ChatCompletionClient::new(&config.llm)?;
        let research_tool = TavilySearch::new(&config.search)?;
        Ok(Self::with_clients(Arc::new(llm), Arc::new(research_tool)))
    }

    pub fn with_clients(llm: Arc<dyn LanguageModel>, research_tool: Arc<dyn SearchTool>) -> Self {
        Self { llm, research_tool }
    }

    pub fn model_name(&self) -> String {
        self.llm.model_name()
    }

    pub fn lead_researcher(&self) -> Arc<AgentDescriptor> {
        self.build(
            AgentRole::LeadResearcher,
            "Gather verified, recent, high-signal facts, quotes, and statistics \
             about the assigned topic using live web research.",
            "You are an investigative fact-checker in a top editorial newsroom. \
             You ignore fluff, cross-check claims, prioritize primary sources, \
             and deliver concise evidence-first research briefs.",
            Some(self.research_tool.clone()),
        )
    }

    pub fn senior_writer(&self) -> Arc<AgentDescriptor> {
        self.build(
            AgentRole::SeniorWriter,
            "Transform raw research into a sharp, engaging, publication-grade \
             narrative with strong flow and clarity.",
            "You are a veteran tech journalist inspired by premium outlets like \
             The Verge and TechCrunch. You craft compelling intros, smooth transitions, \
             and clear explanations without sacrificing factual precision.",
            None,
        )
    }

    pub fn seo_strategist(&self) -> Arc<AgentDescriptor> {
        self.build(
            AgentRole::SeoStrategist,
            "Optimize article discoverability by aligning topic coverage, keyword intent, \
             metadata quality, and heading structure with search best practices.",
            "You are a performance marketer focused on organic traffic growth. \
             You diagnose ranking opportunities, identify high-value keyword angles, \
             and turn good drafts into search-optimized content plans.",
            None,
        )
    }

    pub fn editor_in_chief(&self) -> Arc<AgentDescriptor> {
        self.build(
            AgentRole::EditorInChief,
            "Enforce final quality: merge editorial and SEO feedback into a polished, \
             accurate, and cleanly formatted Markdown article ready for publishing.",
            "You are the final decision-maker in the newsroom: strict on clarity, tone, \
             and credibility. You remove awkward phrasing, ensure structural consistency, \
             and approve only production-ready copy.",
            None,
        )
    }

    fn build(
        &self,
        role: AgentRole,
        goal: &str,
        backstory: &str,
        search_tool: Option<Arc<dyn SearchTool>>,
    ) -> Arc<AgentDescriptor> {
        Arc::new(AgentDescriptor {
            role,
            goal: goal.to_string(),
            backstory: backstory.to_string(),
            search_tool,
            llm: self.llm.clone(),
        })
    }
}
