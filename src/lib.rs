pub mod agents;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod storage;
pub mod tasks;

pub use config::Config;
pub use error::{EditorialError, Result};
pub use pipeline::{EditorialPipeline, PipelineResult};
