use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use std::sync::Arc;

use crate::api::ApiResponse;
use crate::config::Config;

/// Requires `Authorization: Bearer <token>` when `server.api_token` is set.
pub async fn auth_middleware(
    State(config): State<Arc<Config>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(api_token) = &config.server.api_token {
        let presented = req
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string());

        if presented.as_deref() != Some(api_token.as_str()) {
            let message = match presented {
                Some(_) => "API token rejected",
                None => "API token required: send it as a bearer token",
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(message.to_string())),
            )
                .into_response();
        }
    }

    next.run(req).await
}
