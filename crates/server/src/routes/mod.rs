//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `auth`: Bearer-token check
//! - `health`: Liveness probe
//! - `upload`: Multipart upload ingestion
//!
//! The static pages and the fallbacks live here.

pub mod auth;
pub mod health;
pub mod upload;

use crate::error::ServerError;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::json;

/// Landing page served at `GET /`
pub const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>formgate</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        h1 { color: #333; }
        .endpoint { background: #f5f5f5; padding: 10px; margin: 10px 0; }
    </style>
</head>
<body>
    <h1>formgate</h1>
    <p>A small HTTP service for multipart uploads and token checks.</p>

    <div class="endpoint">
        <strong>Available endpoints:</strong>
        <ul>
            <li><a href="/hello">/hello</a> - Hello World message</li>
            <li><a href="/health">/health</a> - Health check</li>
            <li>/auth - Bearer token check (GET or POST)</li>
            <li>/upload - multipart/form-data upload (POST)</li>
        </ul>
    </div>
</body>
</html>
"#;

/// Static landing page
pub async fn home_page() -> impl IntoResponse {
    Html(HOME_PAGE)
}

/// Hello World endpoint
pub async fn hello() -> impl IntoResponse {
    Json(json!({
        "message": "Hello, World!",
        "status": "success",
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// 405 handler attached to every route's method fallback
pub async fn method_not_allowed() -> ServerError {
    ServerError::UnsupportedMethod
}
