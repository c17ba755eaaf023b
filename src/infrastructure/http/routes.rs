//! HTTP Routes
//!
//! API Endpoints:
//! - /api/tts    GET  文本转语音（text, voice|locale|lang）
//! - /api/ping   GET  健康检查

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/tts", get(handlers::synthesize))
}
