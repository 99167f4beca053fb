pub mod sequential;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::agents::AgentRole;
use crate::error::{EditorialError, Result};
use crate::tasks::{TaskDescriptor, TaskKind};

pub use sequential::SequentialEngine;

/// An ordered task list in which every task only reads tasks listed before it.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    tasks: Vec<TaskDescriptor>,
}

impl ExecutionPlan {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Result<Self> {
        if tasks.is_empty() {
            return Err(EditorialError::WiringError("execution plan has no tasks".to_string()));
        }

        let mut seen: HashSet<TaskKind> = HashSet::new();
        for task in &tasks {
            for upstream in &task.context {
                if *upstream == task.kind {
                    return Err(EditorialError::WiringError(format!(
                        "{} lists itself as context",
                        task.kind.title()
                    )));
                }
                if !seen.contains(upstream) {
                    return Err(EditorialError::WiringError(format!(
                        "{} depends on {} which is not scheduled before it",
                        task.kind.title(),
                        upstream.title()
                    )));
                }
            }
            if !seen.insert(task.kind) {
                return Err(EditorialError::WiringError(format!(
                    "{} is scheduled more than once",
                    task.kind.title()
                )));
            }
        }

        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskOutput {
    pub kind: TaskKind,
    pub agent: AgentRole,
    pub raw: String,
}

/// What an engine hands back after running a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineOutput {
    /// Canonical final text, normally the last task's output.
    pub raw: Option<String>,
    pub tasks_output: Vec<TaskOutput>,
}

impl EngineOutput {
    pub fn final_text(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for EngineOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .tasks_output
            .iter()
            .map(|output| output.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        f.write_str(&joined)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Run every task of the plan in order and wait for the final artifact.
    async fn execute(&self, plan: &ExecutionPlan) -> Result<EngineOutput>;
}
