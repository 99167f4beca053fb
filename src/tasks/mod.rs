use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::agents::AgentDescriptor;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskKind {
    ResearchBrief,
    DraftArticle,
    SeoOptimization,
    FinalEditorial,
}

impl TaskKind {
    pub fn title(&self) -> &'static str {
        match self {
            TaskKind::ResearchBrief => "Research Brief",
            TaskKind::DraftArticle => "Draft Article",
            TaskKind::SeoOptimization => "SEO Optimization Report",
            TaskKind::FinalEditorial => "Final Article",
        }
    }
}

/// An instruction bound to one agent, reading the outputs of `context`.
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub kind: TaskKind,
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<AgentDescriptor>,
    pub context: Vec<TaskKind>,
    /// Topic the task is about; used as the query for agents that search.
    pub subject: String,
}

pub struct TaskFactory;

impl TaskFactory {
    pub fn research_brief_task(agent: Arc<AgentDescriptor>, topic: &str) -> TaskDescriptor {
        TaskDescriptor {
            kind: TaskKind::ResearchBrief,
            description: format!(
                "Research the topic: {}. Use live web sources and produce only verified facts. \
                 Prioritize recent sources and primary references where possible. Ignore generic opinions \
                 and unsupported claims.",
                topic
            ),
            expected_output: "A structured Research Brief in markdown with these sections: \
                 1) Key Facts (8-12 bullets), 2) Verified Statistics with source links, \
                 3) Notable Quotes with attribution, 4) Source List (at least 6 credible URLs). \
                 No narrative article writing."
                .to_string(),
            agent,
            context: Vec::new(),
            subject: topic.to_string(),
        }
    }

    pub fn draft_article_task(
        agent: Arc<AgentDescriptor>,
        topic: &str,
        research_task: &TaskDescriptor,
    ) -> TaskDescriptor {
        TaskDescriptor {
            kind: TaskKind::DraftArticle,
            description: format!(
                "Using the Research Brief, write a compelling long-form draft article about {}. \
                 Maintain a premium tech-journalism tone, strong narrative flow, and factual accuracy. \
                 Do not invent facts; rely on research context.",
                topic
            ),
            expected_output: "A Draft Article in markdown with a clear headline, engaging introduction, \
                 well-structured body sections, and concise conclusion. Target 900-1400 words. \
                 Use short paragraphs and smooth transitions."
                .to_string(),
            agent,
            context: vec![research_task.kind],
            subject: topic.to_string(),
        }
    }

    pub fn seo_optimization_task(
        agent: Arc<AgentDescriptor>,
        topic: &str,
        draft_task: &TaskDescriptor,
    ) -> TaskDescriptor {
        TaskDescriptor {
            kind: TaskKind::SeoOptimization,
            description: format!(
                "Analyze the Draft Article for SEO performance for the topic {}. \
                 Propose practical on-page improvements without changing factual meaning.",
                topic
            ),
            expected_output: "An Optimization Report in markdown containing: \
                 1) Primary keyword, 2) 5 secondary keywords, 3) SEO-friendly meta description (140-160 chars), \
                 4) Suggested H1 and improved H2 structure, 5) Internal/external linking suggestions, \
                 6) Readability and search-intent recommendations."
                .to_string(),
            agent,
            context: vec![draft_task.kind],
            subject: topic.to_string(),
        }
    }

    pub fn final_editorial_task(
        agent: Arc<AgentDescriptor>,
        draft_task: &TaskDescriptor,
        seo_task: &TaskDescriptor,
    ) -> TaskDescriptor {
        TaskDescriptor {
            kind: TaskKind::FinalEditorial,
            description: "Merge the Draft Article and Optimization Report into one production-ready markdown article. \
                 Apply SEO recommendations naturally, fix awkward phrasing, and enforce clean formatting."
                .to_string(),
            expected_output: "Final publish-ready markdown article with:\n\
                 - Exactly one H1 title\n\
                 - Logical H2/H3 hierarchy\n\
                 - A meta description block at the top\n\
                 - Polished grammar and consistent tone\n\
                 - No process notes, only final content"
                .to_string(),
            agent,
            context: vec![draft_task.kind, seo_task.kind],
            subject: draft_task.subject.clone(),
        }
    }
}
