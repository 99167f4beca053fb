use axum::{
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;

use crate::api::AppState;

/// Delay between progress frames. The frames are an animation only and do
/// not follow the real pipeline.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Stage {
    pub icon: &'static str,
    pub agent: &'static str,
    pub message: &'static str,
}

pub const STAGES: [Stage; 4] = [
    Stage {
        icon: "🕵️",
        agent: "Lead Researcher",
        message: "Searching the live web for verified facts…",
    },
    Stage {
        icon: "✍️",
        agent: "Senior Writer",
        message: "Crafting the narrative draft…",
    },
    Stage {
        icon: "📈",
        agent: "SEO Strategist",
        message: "Analysing keywords and optimising metadata…",
    },
    Stage {
        icon: "🧐",
        agent: "Editor-in-Chief",
        message: "Polishing and finalising the article…",
    },
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProgressFrame {
    pub stage: usize,
    pub total: usize,
    pub percent: u8,
    pub label: String,
}

/// One frame per stage at 0, 25, 50 and 75 percent. Completion (100%) is
/// shown by the client once the generate request returns.
pub fn progress_schedule() -> Vec<ProgressFrame> {
    let total = STAGES.len();
    STAGES
        .iter()
        .enumerate()
        .map(|(i, stage)| ProgressFrame {
            stage: i + 1,
            total,
            percent: (i * 100 / total) as u8,
            label: format!("{} {}: {}", stage.icon, stage.agent, stage.message),
        })
        .collect()
}

pub fn create_progress_router() -> Router<AppState> {
    Router::new()
        .route("/api/stages", get(stages_handler))
        .route("/api/progress", get(progress_handler))
}

async fn stages_handler() -> Json<Vec<Stage>> {
    Json(STAGES.to_vec())
}

async fn progress_handler() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        for frame in progress_schedule() {
            ticker.tick().await;
            let json = serde_json::to_string(&frame).unwrap_or_default();
            yield Ok(Event::default().event("progress").data(json));
        }
        yield Ok(Event::default().event("done").data("{}"));
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(10)))
}
