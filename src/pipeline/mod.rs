pub mod mock;
pub mod runner;
pub mod slug;
pub mod topic;

pub use mock::mock_article;
pub use runner::{build_plan, ArticleSource, EditorialPipeline, PipelineResult};
pub use slug::slugify;
pub use topic::{Topic, MAX_TOPIC_CHARS};
