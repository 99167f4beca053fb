mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use common::{test_config, CannedEngine, FailingEngine, CANNED_ARTICLE};
use editorial_board::api::{create_router, AppState};
use editorial_board::config::Config;
use editorial_board::error::EditorialError;
use editorial_board::pipeline::EditorialPipeline;

fn app_with(config: Arc<Config>, article: &str) -> Router {
    let engine = Arc::new(CannedEngine {
        article: article.to_string(),
    });
    let pipeline = Arc::new(EditorialPipeline::with_engine(config.clone(), engine));
    create_router(AppState::new(pipeline, config))
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_index_page_is_served() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(page.contains("The Autonomous Editorial Board"));
    assert!(page.contains("maxlength=\"200\""));
}

#[tokio::test]
async fn test_stages_lists_four_agents() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app.oneshot(get("/api/stages")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stages = body_json(response).await;
    let agents: Vec<&str> = stages
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["agent"].as_str().unwrap())
        .collect();
    assert_eq!(
        agents,
        vec!["Lead Researcher", "Senior Writer", "SEO Strategist", "Editor-in-Chief"]
    );
}

#[tokio::test]
async fn test_progress_stream_replays_schedule() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app.oneshot(get("/api/progress")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let stream = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(stream.matches("\"percent\":").count(), 4);
    assert!(stream.contains("\"percent\":75"));
    assert!(stream.contains("done"));
}

#[tokio::test]
async fn test_blank_topic_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app
        .oneshot(generate_request(json!({ "topic": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Topic cannot be empty."));
}

#[tokio::test]
async fn test_overlong_topic_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app
        .oneshot(generate_request(json!({ "topic": "x".repeat(201) })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_then_fetch_session_list_and_download() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);
    let session_id = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(generate_request(json!({
            "topic": "  Quantum sensors ",
            "session_id": session_id,
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["topic"], "Quantum sensors");
    assert_eq!(data["markdown"], CANNED_ARTICLE);
    assert_eq!(data["source"], "live");
    assert!(data["html"].as_str().unwrap().contains("<h1>Quantum Sensors</h1>"));
    let file_name = data["file_name"].as_str().unwrap().to_string();
    assert!(file_name.ends_with("-quantum-sensors.md"));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/sessions/{}", session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["file_name"], file_name.as_str());

    let response = app.clone().oneshot(get("/api/articles")).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed["data"][0]["file_name"], file_name.as_str());

    let response = app
        .oneshot(get(&format!("/api/articles/{}", file_name)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}\"", file_name).as_str()
    );
    assert_eq!(body_bytes(response).await, CANNED_ARTICLE.as_bytes());
}

#[tokio::test]
async fn test_preview_escapes_raw_html() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(
        test_config(temp_dir.path()),
        "# Title\n\n<script>alert('x')</script>\n",
    );

    let response = app
        .oneshot(generate_request(json!({ "topic": "Escaping" })))
        .await
        .unwrap();

    let html = body_json(response).await["data"]["html"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_unknown_session_and_article_are_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/sessions/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get("/api/articles/20250101-000000-missing.md"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/articles/secrets.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_propagated_failure_is_reported_in_session() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let engine = Arc::new(FailingEngine {
        make_error: || EditorialError::FilesystemError("disk full".to_string()),
    });
    let pipeline = Arc::new(EditorialPipeline::with_engine(config.clone(), engine));
    let app = create_router(AppState::new(pipeline, config));
    let session_id = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(generate_request(json!({ "topic": "Doomed", "session_id": session_id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("disk full"));
    assert!(body["data"]["markdown"].is_null());

    let response = app
        .oneshot(get(&format!("/api/sessions/{}", session_id)))
        .await
        .unwrap();
    assert!(body_json(response).await["data"]["error"]
        .as_str()
        .unwrap()
        .contains("disk full"));
}

#[tokio::test]
async fn test_generate_requires_bearer_token_when_configured() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.output.directory = temp_dir.path().to_path_buf();
    config.server.api_token = Some("newsroom-secret".to_string());
    let app = app_with(Arc::new(config), CANNED_ARTICLE);

    let response = app
        .clone()
        .oneshot(generate_request(json!({ "topic": "Guarded" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("API token required"));

    let mut request = generate_request(json!({ "topic": "Guarded" }));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("rejected"));

    let mut request = generate_request(json!({ "topic": "Guarded" }));
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer newsroom-secret".parse().unwrap(),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // read routes stay open
    let response = app.oneshot(get("/api/stages")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_page_sends_saved_token_as_bearer_header() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with(test_config(temp_dir.path()), CANNED_ARTICLE);

    let response = app.oneshot(get("/")).await.unwrap();
    let page = String::from_utf8(body_bytes(response).await).unwrap();

    assert!(page.contains("id=\"api-token\""));
    assert!(page.contains("localStorage.getItem(tokenKey)"));
    assert!(page.contains("headers[\"Authorization\"] = `Bearer ${token}`"));
    assert!(page.contains("headers: generateHeaders()"));
}

#[tokio::test]
async fn test_session_results_are_bounded() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let engine = Arc::new(CannedEngine {
        article: CANNED_ARTICLE.to_string(),
    });
    let pipeline = Arc::new(EditorialPipeline::with_engine(config.clone(), engine));
    let state = AppState::with_session_capacity(pipeline, config, 4);
    let app = create_router(state.clone());

    let mut session_ids = Vec::new();
    for i in 0..10 {
        let session_id = Uuid::new_v4();
        session_ids.push(session_id);
        let response = app
            .clone()
            .oneshot(generate_request(json!({
                "topic": format!("Topic {}", i),
                "session_id": session_id,
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    // requests without a session id count against the same bound
    for i in 0..10 {
        let response = app
            .clone()
            .oneshot(generate_request(json!({ "topic": format!("Anonymous {}", i) })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(state.sessions.read().await.len(), 4);

    let response = app
        .oneshot(get(&format!("/api/sessions/{}", session_ids[0])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_default_state_uses_configured_session_capacity() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.output.directory = temp_dir.path().to_path_buf();
    config.server.max_sessions = 7;
    let config = Arc::new(config);
    let pipeline = Arc::new(EditorialPipeline::new(config.clone()));

    let state = AppState::new(pipeline, config);
    assert_eq!(state.sessions.read().await.capacity(), 7);
}
