pub mod auth;
pub mod render;
pub mod sessions;
pub mod stream;
pub mod ui;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::auth::auth_middleware;
use crate::api::sessions::SessionStore;
use crate::config::Config;
use crate::error::{EditorialError, Result};
use crate::pipeline::{ArticleSource, EditorialPipeline, Topic};
use crate::storage::ArticleInfo;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }

    pub fn failure(data: T, message: String) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message),
        }
    }
}

/// Last run of one browser session. Replaced wholesale by each new run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionResult {
    pub session_id: Uuid,
    pub topic: String,
    pub markdown: Option<String>,
    pub html: Option<String>,
    pub file_name: Option<String>,
    pub path: Option<PathBuf>,
    pub source: Option<ArticleSource>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EditorialPipeline>,
    pub config: Arc<Config>,
    pub sessions: Arc<RwLock<SessionStore>>,
}

impl AppState {
    pub fn new(pipeline: Arc<EditorialPipeline>, config: Arc<Config>) -> Self {
        let capacity = config.server.max_sessions;
        Self::with_session_capacity(pipeline, config, capacity)
    }

    pub fn with_session_capacity(
        pipeline: Arc<EditorialPipeline>,
        config: Arc<Config>,
        capacity: usize,
    ) -> Self {
        Self {
            pipeline,
            config,
            sessions: Arc::new(RwLock::new(SessionStore::new(capacity))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub session_id: Option<Uuid>,
}

pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/generate", post(generate_article))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(ui::index))
        .route("/api/articles", get(list_articles))
        .route("/api/articles/:file_name", get(download_article))
        .route("/api/sessions/:id", get(get_session))
        .merge(stream::create_progress_router())
        .merge(protected_routes)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let addr = state.config.bind_address();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EditorialError::NetworkError(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Editorial board UI listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| EditorialError::NetworkError(format!("Server error: {}", e)))?;

    Ok(())
}

/// Full error chain, including a backtrace when `RUST_BACKTRACE` is set.
pub fn describe_failure(err: EditorialError) -> String {
    format!("{:?}", anyhow::Error::new(err))
}

async fn generate_article(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> (StatusCode, Json<ApiResponse<SessionResult>>) {
    let topic = match Topic::parse(&payload.topic) {
        Ok(topic) => topic,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string()))),
    };
    let session_id = payload.session_id.unwrap_or_else(Uuid::new_v4);

    let mut session = SessionResult {
        session_id,
        topic: topic.to_string(),
        ..Default::default()
    };

    let status = match state.pipeline.run(topic.as_str()).await {
        Ok(result) => {
            session.html = Some(render::render_markdown(&result.markdown));
            session.file_name = Some(result.file_name());
            session.path = Some(result.path);
            session.source = Some(result.source);
            session.markdown = Some(result.markdown);
            StatusCode::OK
        }
        Err(e) => {
            error!("Pipeline failed for session {}: {}", session_id, e);
            session.error = Some(describe_failure(e));
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    state.sessions.write().await.insert(session.clone());

    let body = match session.error.clone() {
        None => ApiResponse::success(session),
        Some(message) => ApiResponse::failure(session, message),
    };
    (status, Json(body))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse<SessionResult>>) {
    match state.sessions.read().await.get(&session_id) {
        Some(session) => (StatusCode::OK, Json(ApiResponse::success(session.clone()))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Session {} not found", session_id))),
        ),
    }
}

async fn list_articles(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<Vec<ArticleInfo>>>) {
    match state.pipeline.storage().list_articles().await {
        Ok(articles) => (StatusCode::OK, Json(ApiResponse::success(articles))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to list articles: {}", e))),
        ),
    }
}

async fn download_article(State(state): State<AppState>, Path(file_name): Path<String>) -> Response {
    match state.pipeline.storage().load_article(&file_name).await {
        Ok(article) => (
            [
                (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", article.file_name),
                ),
            ],
            article.markdown,
        )
            .into_response(),
        Err(EditorialError::ArticleNotFound(name)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(format!("Article {} not found", name))),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}
